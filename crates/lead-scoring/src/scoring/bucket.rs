use serde::{Deserialize, Serialize};

/// Recency placeholder for leads with no recorded contact.
pub const SENTINEL_DAYS: f64 = 999.0;

/// Days of inactivity after which an otherwise untiered lead is dormant.
pub const STALE_AFTER_DAYS: f64 = 25.0;

/// Engagement buckets in classification priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadBucket {
    Hot,
    Engaged,
    Warm,
    Curious,
    Dormant,
    Cold,
}

impl LeadBucket {
    pub const fn ordered() -> [Self; 6] {
        [
            Self::Hot,
            Self::Engaged,
            Self::Warm,
            Self::Curious,
            Self::Dormant,
            Self::Cold,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Hot => "Hot",
            Self::Engaged => "Engaged",
            Self::Warm => "Warm",
            Self::Curious => "Curious",
            Self::Dormant => "Dormant",
            Self::Cold => "Cold",
        }
    }

    pub const fn recommendation(self) -> &'static str {
        match self {
            Self::Hot => "Immediate personal WhatsApp/call + Send cost sheet + Site visit push",
            Self::Engaged => "Send walkthrough videos + clear pricing + interest form",
            Self::Warm => "Testimonials, short videos, ROI case studies",
            Self::Curious => "Light educational content, blog posts, project USP reels",
            Self::Cold => "Monthly newsletters, occasional offers",
            Self::Dormant => "Targeted reactivation message with limited-time incentive",
        }
    }

    /// Engagement playbook in the order it is published to sales.
    pub const fn strategies() -> [(Self, &'static str); 6] {
        [
            (Self::Hot, Self::Hot.recommendation()),
            (Self::Engaged, Self::Engaged.recommendation()),
            (Self::Warm, Self::Warm.recommendation()),
            (Self::Curious, Self::Curious.recommendation()),
            (Self::Cold, Self::Cold.recommendation()),
            (Self::Dormant, Self::Dormant.recommendation()),
        ]
    }

    pub(crate) fn priority(self) -> usize {
        match self {
            Self::Hot => 0,
            Self::Engaged => 1,
            Self::Warm => 2,
            Self::Curious => 3,
            Self::Dormant => 4,
            Self::Cold => 5,
        }
    }
}

impl std::fmt::Display for LeadBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Inactivity gaps in days.
///
/// Inbound and outbound gaps are concrete once ingestion has applied
/// [`SENTINEL_DAYS`]. Web activity stays optional and a missing value never
/// counts as stale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecencySignals {
    pub days_since_last_web_activity: Option<f64>,
    pub days_since_last_inbound: f64,
    pub days_since_last_outbound: f64,
}

impl Default for RecencySignals {
    fn default() -> Self {
        Self {
            days_since_last_web_activity: None,
            days_since_last_inbound: SENTINEL_DAYS,
            days_since_last_outbound: SENTINEL_DAYS,
        }
    }
}

impl RecencySignals {
    fn is_stale(&self) -> bool {
        self.days_since_last_web_activity
            .is_some_and(|days| days > STALE_AFTER_DAYS)
            || self.days_since_last_inbound > STALE_AFTER_DAYS
    }
}

/// First matching rule wins; `Cold` catches everything else.
pub fn classify(score: f64, whatsapp_inbound: f64, recency: &RecencySignals) -> LeadBucket {
    if score >= 150.0 && whatsapp_inbound >= 2.0 {
        LeadBucket::Hot
    } else if (100.0..150.0).contains(&score) && whatsapp_inbound >= 1.0 {
        LeadBucket::Engaged
    } else if (60.0..100.0).contains(&score) {
        LeadBucket::Warm
    } else if (30.0..60.0).contains(&score) {
        LeadBucket::Curious
    } else if recency.is_stale() {
        LeadBucket::Dormant
    } else {
        LeadBucket::Cold
    }
}
