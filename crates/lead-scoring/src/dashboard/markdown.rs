use super::DashboardSummary;
use std::fmt::Write;

pub fn render_markdown(summary: &DashboardSummary) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Lead Scoring & Engagement Strategy Report");
    let _ = writeln!(
        output,
        "Generated {} for {} leads",
        summary.generated_at.format("%Y-%m-%d %H:%M UTC"),
        summary.insights.total_leads
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Scoring Summary");

    if summary.leads.is_empty() {
        let _ = writeln!(output, "No leads found in the upload.");
    } else {
        let _ = writeln!(output, "| LeadId | lead_score | lead_bucket | CurrentStage |");
        let _ = writeln!(output, "|---|---:|---|---|");
        for lead in &summary.leads {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                lead.lead_id,
                format_score(lead.lead_score),
                lead.lead_bucket,
                lead.current_stage
            );
        }
        let _ = writeln!(output);
        let _ = writeln!(
            output,
            "Average score {:.1}, median {:.1}, highest {}",
            summary.insights.average_score,
            summary.insights.median_score,
            format_score(summary.insights.max_score)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Bucket Distribution");
    for entry in &summary.bucket_distribution {
        let _ = writeln!(
            output,
            "- {}: {} leads ({:.0}%)",
            entry.bucket,
            entry.count,
            entry.share * 100.0
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Lead Score Distribution");
    let peak = summary.score_histogram.peak();
    for bin in &summary.score_histogram.bins {
        let bar_len = if peak == 0 { 0 } else { bin.count * 30 / peak };
        let _ = writeln!(
            output,
            "- {:>8.1} to {:>8.1}: {:>4} {}",
            bin.lower,
            bin.upper,
            bin.count,
            "#".repeat(bar_len)
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Content & Engagement Recommendations");
    for strategy in &summary.strategies {
        let _ = writeln!(
            output,
            "- **{}** -> {}",
            strategy.bucket, strategy.recommendation
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Scoring Logic Explained");
    for weight in &summary.scoring_weights {
        let _ = writeln!(
            output,
            "- **+{}** -> {} ({}, `{}`)",
            weight.weight, weight.explanation, weight.label, weight.column
        );
    }

    output
}

/// Whole scores print without a fraction; others print unrounded.
pub(crate) fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{score:.0}")
    } else {
        format!("{score}")
    }
}
