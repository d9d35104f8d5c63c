use lead_scoring::dashboard::{render_markdown, LeadDashboard, SCORE_BINS};
use lead_scoring::ingest::{IngestError, LeadImporter, SpreadsheetFormat};
use lead_scoring::scoring::{LeadBucket, SENTINEL_DAYS};
use rust_xlsxwriter::Workbook;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/leads.csv");

#[test]
fn fixture_scores_and_buckets_every_lead() {
    let records = LeadImporter::from_path(FIXTURE).expect("fixture imports");
    let dashboard = LeadDashboard::build(&records);

    let scored: Vec<(&str, f64, LeadBucket)> = dashboard
        .leads()
        .iter()
        .map(|lead| (lead.lead_id.as_str(), lead.lead_score, lead.lead_bucket))
        .collect();

    assert_eq!(
        scored,
        vec![
            ("L001", 154.0, LeadBucket::Hot),
            ("L002", 113.0, LeadBucket::Engaged),
            ("L003", 68.0, LeadBucket::Warm),
            ("L004", 35.0, LeadBucket::Curious),
            ("L005", 14.0, LeadBucket::Dormant),
            ("L006", 11.0, LeadBucket::Cold),
            ("L007", 169.0, LeadBucket::Cold),
            ("L008", 13.0, LeadBucket::Dormant),
        ]
    );
}

#[test]
fn fixture_summary_feeds_charts_and_tables() {
    let records = LeadImporter::from_path(FIXTURE).expect("fixture imports");
    let summary = LeadDashboard::build(&records).summary();

    let order: Vec<(LeadBucket, usize)> = summary
        .bucket_distribution
        .iter()
        .map(|entry| (entry.bucket, entry.count))
        .collect();
    assert_eq!(
        order,
        vec![
            (LeadBucket::Dormant, 2),
            (LeadBucket::Cold, 2),
            (LeadBucket::Hot, 1),
            (LeadBucket::Engaged, 1),
            (LeadBucket::Warm, 1),
            (LeadBucket::Curious, 1),
        ]
    );

    assert_eq!(summary.score_histogram.bins.len(), SCORE_BINS);
    assert_eq!(summary.score_histogram.total(), 8);
    assert_eq!(summary.leads[6].current_stage, "Callback Requested");
    assert_eq!(summary.insights.max_score, 169.0);
    assert_eq!(summary.insights.top_bucket, Some(LeadBucket::Dormant));

    let report = render_markdown(&summary);
    assert!(report.contains("| L007 | 169 | Cold | Callback Requested |"));
}

#[test]
fn blank_recency_matches_explicit_sentinel() {
    let header = "LeadId,CumulativeTime,Number_of_Page_Visited,Unqiue_Visits,HighValuePageViews,DownloadedFilesCount,WhatsappOutbound,WhatsappInbound,daysSinceLastWebActivity,daysSinceLastInbound,daysSinceLastOutbound,CurrentStage";
    let blank = format!("{header}\nA,1,1,1,0,0,0,0,2,,,New\n");
    let explicit = format!("{header}\nA,1,1,1,0,0,0,0,2,999,999,New\n");

    let blank = LeadImporter::from_reader(blank.as_bytes(), SpreadsheetFormat::Csv)
        .expect("blank recency imports");
    let explicit = LeadImporter::from_reader(explicit.as_bytes(), SpreadsheetFormat::Csv)
        .expect("explicit recency imports");

    assert_eq!(blank, explicit);
    assert_eq!(blank[0].recency.days_since_last_inbound, SENTINEL_DAYS);

    let blank = LeadDashboard::build(&blank);
    let explicit = LeadDashboard::build(&explicit);
    assert_eq!(blank.leads(), explicit.leads());
    assert_eq!(blank.leads()[0].lead_bucket, LeadBucket::Dormant);
}

#[test]
fn non_numeric_scoring_value_aborts_whole_upload() {
    let csv = "LeadId,CumulativeTime,Number_of_Page_Visited,Unqiue_Visits,HighValuePageViews,DownloadedFilesCount,WhatsappOutbound,WhatsappInbound,daysSinceLastWebActivity,daysSinceLastInbound,daysSinceLastOutbound,CurrentStage\n\
A,1,1,1,0,0,0,0,2,3,4,New\n\
B,1,1,1,0,0,0,many,2,3,4,New\n";

    let error = LeadImporter::from_reader(csv.as_bytes(), SpreadsheetFormat::Csv)
        .expect_err("invalid value rejected");
    match error {
        IngestError::InvalidNumber { row, column, value } => {
            assert_eq!(row, 3);
            assert_eq!(column, "WhatsappInbound");
            assert_eq!(value, "many");
        }
        other => panic!("expected invalid number, got {other:?}"),
    }
}

#[test]
fn corrupt_workbook_is_reported() {
    let error = LeadImporter::from_reader(&b"PK\x03\x04 truncated"[..], SpreadsheetFormat::Xlsx)
        .expect_err("corrupt workbook rejected");
    assert!(matches!(error, IngestError::Workbook(_)));
}

#[test]
fn workbook_upload_scores_like_csv() {
    let headers = [
        " LeadId ",
        "CumulativeTime",
        "Number of Page Visited",
        "Unqiue Visits",
        "HighValuePageViews",
        "DownloadedFilesCount",
        "WhatsappOutbound",
        "WhatsappInbound",
        "daysSinceLastWebActivity",
        "daysSinceLastInbound",
        "daysSinceLastOutbound",
        "CurrentStage",
    ];
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, *header).expect("header");
    }
    // 40 + 20 + 30 + 12 + 2 + 10 + 40 = 154
    for (col, value) in [1042.0, 20.0, 10.0, 6.0, 4.0, 1.0, 10.0, 4.0, 1.0, 1.0, 2.0]
        .into_iter()
        .enumerate()
    {
        sheet.write_number(1, col as u16, value).expect("metric");
    }
    sheet.write_string(1, 11, "Site Visit").expect("stage");
    // Recency cells left blank on the second lead.
    for (col, value) in [7.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 3.0]
        .into_iter()
        .enumerate()
    {
        sheet.write_number(2, col as u16, value).expect("metric");
    }
    sheet.write_string(2, 11, "New").expect("stage");
    let bytes = workbook.save_to_buffer().expect("workbook saves");

    let records = LeadImporter::from_reader(bytes.as_slice(), SpreadsheetFormat::Xlsx)
        .expect("workbook imports");
    assert_eq!(records.len(), 2);
    assert_eq!(records[1].recency.days_since_last_inbound, SENTINEL_DAYS);
    assert_eq!(records[1].recency.days_since_last_outbound, SENTINEL_DAYS);

    let dashboard = LeadDashboard::build(&records);
    let scored: Vec<(&str, f64, LeadBucket, &str)> = dashboard
        .leads()
        .iter()
        .map(|lead| {
            (
                lead.lead_id.as_str(),
                lead.lead_score,
                lead.lead_bucket,
                lead.current_stage.as_str(),
            )
        })
        .collect();
    assert_eq!(
        scored,
        vec![
            ("1042", 154.0, LeadBucket::Hot, "Site Visit"),
            ("7", 0.0, LeadBucket::Dormant, "New"),
        ]
    );
}

#[test]
fn non_finite_text_aborts_upload() {
    let csv = "LeadId,CumulativeTime,Number_of_Page_Visited,Unqiue_Visits,HighValuePageViews,DownloadedFilesCount,WhatsappOutbound,WhatsappInbound,daysSinceLastWebActivity,daysSinceLastInbound,daysSinceLastOutbound,CurrentStage\n\
B,nan,0,0,0,0,0,0,1,1,1,New\n";

    let error = LeadImporter::from_reader(csv.as_bytes(), SpreadsheetFormat::Csv)
        .expect_err("nan rejected");
    assert!(matches!(
        error,
        IngestError::InvalidNumber { row: 2, column: "CumulativeTime", .. }
    ));
}
