mod histogram;
mod html;
mod markdown;

pub use histogram::{HistogramBin, ScoreHistogram, SCORE_BINS};
pub use html::{render_error_page, render_html, render_upload_page};
pub use markdown::render_markdown;

use crate::ingest::LeadRecord;
use crate::scoring::{
    classify, lead_score, score_breakdown, scoring_weights, LeadBucket, ScoreComponent,
    ScoringWeightView,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use tracing::info;

/// A record after scoring and bucketing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLead {
    pub lead_id: String,
    pub current_stage: String,
    pub lead_score: f64,
    pub lead_bucket: LeadBucket,
    pub components: Vec<ScoreComponent>,
}

impl ScoredLead {
    pub fn from_record(record: &LeadRecord) -> Self {
        let lead_score = lead_score(&record.metrics);
        let lead_bucket = classify(
            lead_score,
            record.metrics.whatsapp_inbound,
            &record.recency,
        );

        Self {
            lead_id: record.lead_id.clone(),
            current_stage: record.current_stage.clone(),
            lead_score,
            lead_bucket,
            components: score_breakdown(&record.metrics),
        }
    }

    pub fn to_view(&self) -> ScoredLeadView {
        ScoredLeadView {
            lead_id: self.lead_id.clone(),
            lead_score: self.lead_score,
            lead_bucket: self.lead_bucket,
            current_stage: self.current_stage.clone(),
            score_breakdown: self.components.clone(),
        }
    }
}

/// Display row keyed by the upload's own column names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredLeadView {
    #[serde(rename = "LeadId")]
    pub lead_id: String,
    pub lead_score: f64,
    pub lead_bucket: LeadBucket,
    #[serde(rename = "CurrentStage")]
    pub current_stage: String,
    pub score_breakdown: Vec<ScoreComponent>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketCountEntry {
    pub bucket: LeadBucket,
    pub count: usize,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StrategyEntry {
    pub bucket: LeadBucket,
    pub recommendation: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardInsights {
    pub total_leads: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub max_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_bucket: Option<LeadBucket>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSummary {
    pub generated_at: DateTime<Utc>,
    pub leads: Vec<ScoredLeadView>,
    pub bucket_distribution: Vec<BucketCountEntry>,
    pub score_histogram: ScoreHistogram,
    pub insights: DashboardInsights,
    pub strategies: Vec<StrategyEntry>,
    pub scoring_weights: Vec<ScoringWeightView>,
}

#[derive(Debug, Default)]
pub struct LeadDashboard {
    leads: Vec<ScoredLead>,
}

impl LeadDashboard {
    pub fn build(records: &[LeadRecord]) -> Self {
        let leads: Vec<ScoredLead> = records.iter().map(ScoredLead::from_record).collect();
        info!(leads = leads.len(), "lead dashboard scored");
        Self { leads }
    }

    pub fn leads(&self) -> &[ScoredLead] {
        &self.leads
    }

    /// Counts per bucket, most frequent first; ties keep priority order.
    pub fn bucket_distribution(&self) -> Vec<BucketCountEntry> {
        let mut counts: HashMap<LeadBucket, usize> = HashMap::new();
        for lead in &self.leads {
            *counts.entry(lead.lead_bucket).or_insert(0) += 1;
        }

        let total = self.leads.len();
        let mut entries: Vec<BucketCountEntry> = LeadBucket::ordered()
            .into_iter()
            .filter_map(|bucket| {
                counts.get(&bucket).map(|count| BucketCountEntry {
                    bucket,
                    count: *count,
                    share: *count as f64 / total as f64,
                })
            })
            .collect();

        entries.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.bucket.priority().cmp(&b.bucket.priority()))
        });
        entries
    }

    pub fn score_histogram(&self) -> ScoreHistogram {
        let scores: Vec<f64> = self.leads.iter().map(|lead| lead.lead_score).collect();
        ScoreHistogram::compute(&scores, SCORE_BINS)
    }

    pub fn insights(&self) -> DashboardInsights {
        let mut scores: Vec<f64> = self.leads.iter().map(|lead| lead.lead_score).collect();
        scores.sort_by(f64::total_cmp);

        let total_leads = scores.len();
        let (average_score, median_score, max_score) = if total_leads == 0 {
            (0.0, 0.0, 0.0)
        } else {
            let average = scores.iter().sum::<f64>() / total_leads as f64;
            let middle = total_leads / 2;
            let median = if total_leads % 2 == 0 {
                (scores[middle - 1] + scores[middle]) / 2.0
            } else {
                scores[middle]
            };
            (average, median, scores[total_leads - 1])
        };

        DashboardInsights {
            total_leads,
            average_score,
            median_score,
            max_score,
            top_bucket: self
                .bucket_distribution()
                .first()
                .map(|entry| entry.bucket),
        }
    }

    pub fn summary(&self) -> DashboardSummary {
        DashboardSummary {
            generated_at: Utc::now(),
            leads: self.leads.iter().map(ScoredLead::to_view).collect(),
            bucket_distribution: self.bucket_distribution(),
            score_histogram: self.score_histogram(),
            insights: self.insights(),
            strategies: strategies(),
            scoring_weights: scoring_weights(),
        }
    }
}

pub fn strategies() -> Vec<StrategyEntry> {
    LeadBucket::strategies()
        .into_iter()
        .map(|(bucket, recommendation)| StrategyEntry {
            bucket,
            recommendation,
        })
        .collect()
}
