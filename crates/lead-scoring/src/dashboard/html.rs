use super::markdown::format_score;
use super::{BucketCountEntry, DashboardSummary, ScoreHistogram};
use crate::scoring::LeadBucket;
use std::fmt::Write;

const TITLE: &str = "Lead Scoring & Engagement Strategy Dashboard";
const PLACEHOLDER: &str = "Upload an Excel file with columns like: LeadId, CumulativeTime, \
WhatsappInbound, WhatsappOutbound, Unqiue_Visits, etc.";

const CHART_WIDTH: usize = 480;
const CHART_HEIGHT: usize = 260;
const CHART_MARGIN: usize = 30;

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse}td,th{border:1px solid #ccc;padding:4px 8px}\
td.score{text-align:right}.charts{display:flex;gap:2rem;flex-wrap:wrap}\
.notice{padding:.75rem;border-radius:4px;background:#e8f0fe}\
.error{padding:.75rem;border-radius:4px;background:#fdecea;color:#8a1c1c}";

pub fn render_upload_page() -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<p class=\"notice\">{}</p>", escape(PLACEHOLDER));
    page(&body)
}

pub fn render_error_page(message: &str) -> String {
    let mut body = String::new();
    let _ = writeln!(
        body,
        "<p class=\"error\">Could not score this upload: {}</p>",
        escape(message)
    );
    page(&body)
}

pub fn render_html(summary: &DashboardSummary) -> String {
    let mut body = String::new();

    let _ = writeln!(
        body,
        "<p class=\"notice\">File uploaded successfully! Scored {} leads.</p>",
        summary.insights.total_leads
    );

    let _ = writeln!(body, "<h2>Scoring Summary</h2>");
    let _ = writeln!(
        body,
        "<table><thead><tr><th>LeadId</th><th>lead_score</th><th>lead_bucket</th><th>CurrentStage</th></tr></thead><tbody>"
    );
    for lead in &summary.leads {
        let _ = writeln!(
            body,
            "<tr><td>{}</td><td class=\"score\">{}</td><td>{}</td><td>{}</td></tr>",
            escape(&lead.lead_id),
            format_score(lead.lead_score),
            lead.lead_bucket,
            escape(&lead.current_stage)
        );
    }
    let _ = writeln!(body, "</tbody></table>");

    let _ = writeln!(body, "<div class=\"charts\">");
    let _ = writeln!(
        body,
        "<section><h3>Bucket Distribution</h3>{}</section>",
        bucket_chart(&summary.bucket_distribution)
    );
    let _ = writeln!(
        body,
        "<section><h3>Lead Score Distribution</h3>{}</section>",
        histogram_chart(&summary.score_histogram)
    );
    let _ = writeln!(body, "</div>");

    let _ = writeln!(body, "<h2>Content &amp; Engagement Recommendations</h2><ul>");
    for strategy in &summary.strategies {
        let _ = writeln!(
            body,
            "<li><strong>{}</strong> &rarr; {}</li>",
            strategy.bucket,
            escape(strategy.recommendation)
        );
    }
    let _ = writeln!(body, "</ul><hr>");

    let _ = writeln!(body, "<h2>Scoring Logic Explained</h2><ul>");
    for weight in &summary.scoring_weights {
        let _ = writeln!(
            body,
            "<li><strong>+{}</strong> &rarr; {}</li>",
            weight.weight,
            escape(weight.explanation)
        );
    }
    let _ = writeln!(body, "</ul>");

    page(&body)
}

fn page(body: &str) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "<!DOCTYPE html>");
    let _ = writeln!(
        output,
        "<html lang=\"en\"><head><meta charset=\"utf-8\"><title>Lead Scoring Dashboard</title><style>{STYLE}</style></head><body>"
    );
    let _ = writeln!(output, "<h1>{}</h1>", escape(TITLE));
    let _ = writeln!(
        output,
        "<p>Upload your lead data (.xlsx format). The app will score and bucket leads automatically.</p>"
    );
    let _ = writeln!(
        output,
        "<form method=\"post\" action=\"/\" enctype=\"multipart/form-data\">\
<input type=\"file\" name=\"file\" accept=\".xlsx,.xls,.ods,.csv\" required> \
<button type=\"submit\">Upload Excel File</button></form>"
    );
    output.push_str(body);
    let _ = writeln!(output, "</body></html>");
    output
}

fn bucket_colour(bucket: LeadBucket) -> &'static str {
    match bucket {
        LeadBucket::Hot => "#440154",
        LeadBucket::Engaged => "#414487",
        LeadBucket::Warm => "#2a788e",
        LeadBucket::Curious => "#22a884",
        LeadBucket::Dormant => "#7ad151",
        LeadBucket::Cold => "#fde725",
    }
}

fn bucket_chart(entries: &[BucketCountEntry]) -> String {
    let mut svg = svg_open("Lead Buckets");
    let peak = entries.iter().map(|entry| entry.count).max().unwrap_or(0);
    if peak > 0 {
        let plot_width = CHART_WIDTH - 2 * CHART_MARGIN;
        let plot_height = CHART_HEIGHT - 2 * CHART_MARGIN;
        let slot = plot_width / entries.len();
        for (index, entry) in entries.iter().enumerate() {
            let height = entry.count * plot_height / peak;
            let x = CHART_MARGIN + index * slot + slot / 8;
            let y = CHART_MARGIN + plot_height - height;
            let _ = write!(
                svg,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{}\" height=\"{height}\" fill=\"{}\"><title>{}: {}</title></rect>",
                slot * 3 / 4,
                bucket_colour(entry.bucket),
                entry.bucket,
                entry.count
            );
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" font-size=\"11\" text-anchor=\"middle\">{}</text>",
                x + slot * 3 / 8,
                CHART_HEIGHT - CHART_MARGIN / 2,
                entry.bucket
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

fn histogram_chart(histogram: &ScoreHistogram) -> String {
    let mut svg = svg_open("Lead Score Histogram");
    let peak = histogram.peak();
    if peak > 0 {
        let plot_width = CHART_WIDTH - 2 * CHART_MARGIN;
        let plot_height = CHART_HEIGHT - 2 * CHART_MARGIN;
        let slot = plot_width / histogram.bins.len();
        for (index, bin) in histogram.bins.iter().enumerate() {
            let height = bin.count * plot_height / peak;
            let x = CHART_MARGIN + index * slot;
            let y = CHART_MARGIN + plot_height - height;
            let _ = write!(
                svg,
                "<rect x=\"{x}\" y=\"{y}\" width=\"{slot}\" height=\"{height}\" fill=\"skyblue\" stroke=\"#fff\"><title>{:.1}-{:.1}: {}</title></rect>",
                bin.lower, bin.upper, bin.count
            );
        }
        if let (Some(first), Some(last)) = (histogram.bins.first(), histogram.bins.last()) {
            let baseline = CHART_HEIGHT - CHART_MARGIN / 2;
            let _ = write!(
                svg,
                "<text x=\"{CHART_MARGIN}\" y=\"{baseline}\" font-size=\"11\">{:.0}</text>\
<text x=\"{}\" y=\"{baseline}\" font-size=\"11\" text-anchor=\"end\">{:.0}</text>",
                first.lower,
                CHART_WIDTH - CHART_MARGIN,
                last.upper
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

fn svg_open(title: &str) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{CHART_WIDTH}\" height=\"{CHART_HEIGHT}\" role=\"img\"><text x=\"{}\" y=\"18\" font-size=\"13\" text-anchor=\"middle\">{}</text>",
        CHART_WIDTH / 2,
        escape(title)
    )
}

pub(crate) fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::LeadDashboard;
    use crate::ingest::LeadRecord;
    use crate::scoring::{EngagementMetrics, RecencySignals};

    fn summary_for(lead_id: &str) -> DashboardSummary {
        let records = vec![LeadRecord {
            lead_id: lead_id.to_string(),
            current_stage: "New".to_string(),
            metrics: EngagementMetrics {
                unique_visits: 8.0,
                ..EngagementMetrics::default()
            },
            recency: RecencySignals::default(),
        }];
        LeadDashboard::build(&records).summary()
    }

    #[test]
    fn upload_page_shows_placeholder() {
        let html = render_upload_page();
        assert!(html.contains("Upload an Excel file with columns like"));
        assert!(html.contains("enctype=\"multipart/form-data\""));
        assert!(!html.contains("Scoring Summary"));
    }

    #[test]
    fn dashboard_escapes_uploaded_text() {
        let html = render_html(&summary_for("<script>x</script>"));
        assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
        assert!(!html.contains("<script>x"));
    }

    #[test]
    fn dashboard_includes_tables_and_charts() {
        let html = render_html(&summary_for("L-1"));
        assert!(html.contains("<td>L-1</td><td class=\"score\">40</td><td>Curious</td>"));
        assert_eq!(html.matches("<svg").count(), 2);
        assert!(html.contains("Targeted reactivation message"));
        assert!(html.contains("<strong>+5</strong>"));
    }

    #[test]
    fn error_page_replaces_results() {
        let html = render_error_page("required column 'LeadId' is missing");
        assert!(html.contains("Could not score this upload"));
        assert!(html.contains("&#39;LeadId&#39;"));
        assert!(!html.contains("Scoring Summary"));
    }
}
