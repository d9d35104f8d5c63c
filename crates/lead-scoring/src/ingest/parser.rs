use super::table::{Cell, RawTable};
use super::{IngestError, LeadRecord};
use crate::scoring::{EngagementMetrics, RecencySignals, ScoringFactor, SENTINEL_DAYS};

pub(crate) const LEAD_ID: &str = "LeadId";
pub(crate) const CURRENT_STAGE: &str = "CurrentStage";
pub(crate) const DAYS_SINCE_WEB_ACTIVITY: &str = "daysSinceLastWebActivity";
pub(crate) const DAYS_SINCE_INBOUND: &str = "daysSinceLastInbound";
pub(crate) const DAYS_SINCE_OUTBOUND: &str = "daysSinceLastOutbound";

/// Resolved positions of every column the scorer and classifier read.
struct ColumnLayout {
    lead_id: usize,
    current_stage: usize,
    factors: [(ScoringFactor, usize); 7],
    web_activity: usize,
    inbound: usize,
    outbound: usize,
}

impl ColumnLayout {
    fn resolve(table: &RawTable) -> Result<Self, IngestError> {
        let find = |name: &'static str| {
            table
                .column_index(name)
                .ok_or(IngestError::MissingColumn { column: name })
        };

        let mut factors = [(ScoringFactor::CumulativeTime, 0); 7];
        for (slot, factor) in factors.iter_mut().zip(ScoringFactor::ordered()) {
            *slot = (factor, find(factor.column())?);
        }

        Ok(Self {
            lead_id: find(LEAD_ID)?,
            current_stage: find(CURRENT_STAGE)?,
            factors,
            web_activity: find(DAYS_SINCE_WEB_ACTIVITY)?,
            inbound: find(DAYS_SINCE_INBOUND)?,
            outbound: find(DAYS_SINCE_OUTBOUND)?,
        })
    }
}

pub(crate) fn parse_records(table: &RawTable) -> Result<Vec<LeadRecord>, IngestError> {
    let layout = ColumnLayout::resolve(table)?;
    let mut records = Vec::with_capacity(table.rows.len());

    for (index, row) in table.rows.iter().enumerate() {
        if row.iter().all(Cell::is_empty) {
            continue;
        }
        // Spreadsheet row number, counting the header as row 1.
        let row_number = index + 2;
        records.push(parse_row(row, row_number, &layout)?);
    }

    Ok(records)
}

fn parse_row(
    row: &[Cell],
    row_number: usize,
    layout: &ColumnLayout,
) -> Result<LeadRecord, IngestError> {
    let mut metrics = EngagementMetrics::default();
    for (factor, index) in layout.factors {
        let value = required_number(row, index, row_number, factor.column())?;
        match factor {
            ScoringFactor::CumulativeTime => metrics.cumulative_time = value,
            ScoringFactor::PagesVisited => metrics.pages_visited = value,
            ScoringFactor::UniqueVisits => metrics.unique_visits = value,
            ScoringFactor::HighValuePageViews => metrics.high_value_page_views = value,
            ScoringFactor::DownloadedFiles => metrics.downloaded_files = value,
            ScoringFactor::WhatsappOutbound => metrics.whatsapp_outbound = value,
            ScoringFactor::WhatsappInbound => metrics.whatsapp_inbound = value,
        }
    }

    let recency = RecencySignals {
        days_since_last_web_activity: optional_number(
            row,
            layout.web_activity,
            row_number,
            DAYS_SINCE_WEB_ACTIVITY,
        )?,
        days_since_last_inbound: optional_number(
            row,
            layout.inbound,
            row_number,
            DAYS_SINCE_INBOUND,
        )?
        .unwrap_or(SENTINEL_DAYS),
        days_since_last_outbound: optional_number(
            row,
            layout.outbound,
            row_number,
            DAYS_SINCE_OUTBOUND,
        )?
        .unwrap_or(SENTINEL_DAYS),
    };

    Ok(LeadRecord {
        lead_id: cell_text(row.get(layout.lead_id)),
        current_stage: cell_text(row.get(layout.current_stage)),
        metrics,
        recency,
    })
}

fn required_number(
    row: &[Cell],
    index: usize,
    row_number: usize,
    column: &'static str,
) -> Result<f64, IngestError> {
    optional_number(row, index, row_number, column)?.ok_or(IngestError::MissingValue {
        row: row_number,
        column,
    })
}

fn optional_number(
    row: &[Cell],
    index: usize,
    row_number: usize,
    column: &'static str,
) -> Result<Option<f64>, IngestError> {
    match row.get(index) {
        None | Some(Cell::Empty) => Ok(None),
        Some(Cell::Number(value)) => Ok(Some(*value)),
        Some(Cell::Text(raw)) => raw
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Some)
            .ok_or_else(|| IngestError::InvalidNumber {
                row: row_number,
                column,
                value: raw.clone(),
            }),
    }
}

fn cell_text(cell: Option<&Cell>) -> String {
    match cell {
        None | Some(Cell::Empty) => String::new(),
        Some(Cell::Number(value)) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Some(Cell::Number(value)) => value.to_string(),
        Some(Cell::Text(text)) => text.clone(),
    }
}
