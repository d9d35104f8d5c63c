mod bucket;

pub use bucket::{classify, LeadBucket, RecencySignals, SENTINEL_DAYS, STALE_AFTER_DAYS};

use serde::{Deserialize, Serialize};

/// The seven engagement counters that feed the lead score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct EngagementMetrics {
    pub cumulative_time: f64,
    pub pages_visited: f64,
    pub unique_visits: f64,
    pub high_value_page_views: f64,
    pub downloaded_files: f64,
    pub whatsapp_outbound: f64,
    pub whatsapp_inbound: f64,
}

impl EngagementMetrics {
    pub const fn value(&self, factor: ScoringFactor) -> f64 {
        match factor {
            ScoringFactor::CumulativeTime => self.cumulative_time,
            ScoringFactor::PagesVisited => self.pages_visited,
            ScoringFactor::UniqueVisits => self.unique_visits,
            ScoringFactor::HighValuePageViews => self.high_value_page_views,
            ScoringFactor::DownloadedFiles => self.downloaded_files,
            ScoringFactor::WhatsappOutbound => self.whatsapp_outbound,
            ScoringFactor::WhatsappInbound => self.whatsapp_inbound,
        }
    }
}

/// Scoring inputs paired with their fixed weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFactor {
    CumulativeTime,
    PagesVisited,
    UniqueVisits,
    HighValuePageViews,
    DownloadedFiles,
    WhatsappOutbound,
    WhatsappInbound,
}

impl ScoringFactor {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::CumulativeTime,
            Self::PagesVisited,
            Self::UniqueVisits,
            Self::HighValuePageViews,
            Self::DownloadedFiles,
            Self::WhatsappOutbound,
            Self::WhatsappInbound,
        ]
    }

    pub const fn weight(self) -> f64 {
        match self {
            Self::CumulativeTime => 2.0,
            Self::PagesVisited => 2.0,
            Self::UniqueVisits => 5.0,
            Self::HighValuePageViews => 3.0,
            Self::DownloadedFiles => 2.0,
            Self::WhatsappOutbound => 1.0,
            Self::WhatsappInbound => 10.0,
        }
    }

    /// Normalized spreadsheet header carrying this factor.
    ///
    /// `Unqiue_Visits` keeps the spelling used by existing upload templates.
    pub const fn column(self) -> &'static str {
        match self {
            Self::CumulativeTime => "CumulativeTime",
            Self::PagesVisited => "Number_of_Page_Visited",
            Self::UniqueVisits => "Unqiue_Visits",
            Self::HighValuePageViews => "HighValuePageViews",
            Self::DownloadedFiles => "DownloadedFilesCount",
            Self::WhatsappOutbound => "WhatsappOutbound",
            Self::WhatsappInbound => "WhatsappInbound",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::CumulativeTime => "Cumulative time",
            Self::PagesVisited => "Pages visited",
            Self::UniqueVisits => "Unique visits",
            Self::HighValuePageViews => "High-value page views",
            Self::DownloadedFiles => "Downloaded files",
            Self::WhatsappOutbound => "WhatsApp outbound",
            Self::WhatsappInbound => "WhatsApp inbound",
        }
    }

    pub const fn explanation(self) -> &'static str {
        match self {
            Self::CumulativeTime => "Total time spent on site",
            Self::PagesVisited => "Total page views",
            Self::UniqueVisits => "Each unique site visit",
            Self::HighValuePageViews => {
                "Each high-value page view (pricing, book-visit, cost sheet)"
            }
            Self::DownloadedFiles => "Each file download",
            Self::WhatsappOutbound => "Each outbound WhatsApp sent",
            Self::WhatsappInbound => "Each inbound WhatsApp message",
        }
    }
}

/// Discrete contribution of one factor to a lead score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreComponent {
    pub factor: ScoringFactor,
    pub value: f64,
    pub weight: f64,
    pub points: f64,
}

/// Static row of the scoring-logic explanation block.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoringWeightView {
    pub factor: ScoringFactor,
    pub column: &'static str,
    pub label: &'static str,
    pub weight: f64,
    pub explanation: &'static str,
}

pub fn lead_score(metrics: &EngagementMetrics) -> f64 {
    ScoringFactor::ordered()
        .into_iter()
        .map(|factor| factor.weight() * metrics.value(factor))
        .sum()
}

pub fn score_breakdown(metrics: &EngagementMetrics) -> Vec<ScoreComponent> {
    ScoringFactor::ordered()
        .into_iter()
        .map(|factor| {
            let value = metrics.value(factor);
            ScoreComponent {
                factor,
                value,
                weight: factor.weight(),
                points: factor.weight() * value,
            }
        })
        .collect()
}

/// Weights listed from the strongest signal down.
pub fn scoring_weights() -> Vec<ScoringWeightView> {
    let mut weights: Vec<ScoringWeightView> = ScoringFactor::ordered()
        .into_iter()
        .map(|factor| ScoringWeightView {
            factor,
            column: factor.column(),
            label: factor.label(),
            weight: factor.weight(),
            explanation: factor.explanation(),
        })
        .collect();
    weights.sort_by(|a, b| b.weight.total_cmp(&a.weight));
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    fn only(factor: ScoringFactor, value: f64) -> EngagementMetrics {
        let mut metrics = EngagementMetrics::default();
        match factor {
            ScoringFactor::CumulativeTime => metrics.cumulative_time = value,
            ScoringFactor::PagesVisited => metrics.pages_visited = value,
            ScoringFactor::UniqueVisits => metrics.unique_visits = value,
            ScoringFactor::HighValuePageViews => metrics.high_value_page_views = value,
            ScoringFactor::DownloadedFiles => metrics.downloaded_files = value,
            ScoringFactor::WhatsappOutbound => metrics.whatsapp_outbound = value,
            ScoringFactor::WhatsappInbound => metrics.whatsapp_inbound = value,
        }
        metrics
    }

    #[test]
    fn each_factor_scales_linearly_with_its_weight() {
        let expected = [2.0, 2.0, 5.0, 3.0, 2.0, 1.0, 10.0];
        for (factor, weight) in ScoringFactor::ordered().into_iter().zip(expected) {
            assert_eq!(lead_score(&only(factor, 1.0)), weight, "{factor:?}");
            assert_eq!(lead_score(&only(factor, 7.0)), weight * 7.0, "{factor:?}");
            assert_eq!(lead_score(&only(factor, 0.0)), 0.0, "{factor:?}");
        }
    }

    #[test]
    fn combined_metrics_sum_weighted_contributions() {
        let metrics = EngagementMetrics {
            cumulative_time: 12.5,
            pages_visited: 8.0,
            unique_visits: 3.0,
            high_value_page_views: 2.0,
            downloaded_files: 1.0,
            whatsapp_outbound: 4.0,
            whatsapp_inbound: 2.0,
        };

        // 25 + 16 + 15 + 6 + 2 + 4 + 20
        assert_eq!(lead_score(&metrics), 88.0);
        assert_eq!(lead_score(&metrics), lead_score(&metrics));
    }

    #[test]
    fn breakdown_points_add_up_to_score() {
        let metrics = EngagementMetrics {
            cumulative_time: 3.0,
            pages_visited: 1.0,
            unique_visits: 2.0,
            high_value_page_views: 0.0,
            downloaded_files: 5.0,
            whatsapp_outbound: 6.0,
            whatsapp_inbound: 1.0,
        };

        let components = score_breakdown(&metrics);
        assert_eq!(components.len(), 7);
        let total: f64 = components.iter().map(|component| component.points).sum();
        assert_eq!(total, lead_score(&metrics));

        let inbound = components
            .iter()
            .find(|component| component.factor == ScoringFactor::WhatsappInbound)
            .expect("inbound component present");
        assert_eq!(inbound.points, 10.0);
    }

    #[test]
    fn weights_listed_strongest_first() {
        let weights = scoring_weights();
        assert_eq!(weights.len(), 7);
        assert_eq!(weights[0].factor, ScoringFactor::WhatsappInbound);
        assert_eq!(weights[1].factor, ScoringFactor::UniqueVisits);
        assert_eq!(weights[6].factor, ScoringFactor::WhatsappOutbound);
        assert!(weights.iter().any(|row| row.column == "Unqiue_Visits"));
    }
}
