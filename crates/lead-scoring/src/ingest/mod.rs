mod normalizer;
mod parser;
mod table;

pub use normalizer::normalize_header;

use crate::scoring::{EngagementMetrics, RecencySignals};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const XLS_MIME: &str = "application/vnd.ms-excel";
const ODS_MIME: &str = "application/vnd.oasis.opendocument.spreadsheet";

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read lead upload: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("unreadable spreadsheet: {0}")]
    Workbook(#[from] calamine::Error),
    #[error("spreadsheet has no worksheet or header row")]
    EmptyWorkbook,
    #[error("unsupported upload format '{0}', expected .xlsx or .csv")]
    UnsupportedFormat(String),
    #[error("required column '{column}' is missing")]
    MissingColumn { column: &'static str },
    #[error("row {row}: '{column}' is empty")]
    MissingValue { row: usize, column: &'static str },
    #[error("row {row}: '{column}' value '{value}' is not a number")]
    InvalidNumber {
        row: usize,
        column: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadsheetFormat {
    Xlsx,
    Csv,
}

impl SpreadsheetFormat {
    /// Workbook extensions all go through the workbook reader.
    pub fn from_file_name(name: &str) -> Result<Self, IngestError> {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("xlsx" | "xlsm" | "xls" | "ods") => Ok(Self::Xlsx),
            Some("csv") => Ok(Self::Csv),
            _ => Err(IngestError::UnsupportedFormat(name.to_string())),
        }
    }

    pub fn from_content_type(content_type: &str) -> Result<Self, IngestError> {
        let parsed = content_type
            .parse::<mime::Mime>()
            .map_err(|_| IngestError::UnsupportedFormat(content_type.to_string()))?;

        match parsed.essence_str() {
            XLSX_MIME | XLS_MIME | ODS_MIME => Ok(Self::Xlsx),
            essence if essence == mime::TEXT_CSV.essence_str() => Ok(Self::Csv),
            _ => Err(IngestError::UnsupportedFormat(content_type.to_string())),
        }
    }
}

/// One uploaded row, normalized and with recency defaults applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeadRecord {
    pub lead_id: String,
    pub current_stage: String,
    pub metrics: EngagementMetrics,
    pub recency: RecencySignals,
}

pub struct LeadImporter;

impl LeadImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Vec<LeadRecord>, IngestError> {
        let path = path.as_ref();
        let format = SpreadsheetFormat::from_file_name(&path.to_string_lossy())?;
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, format)
    }

    pub fn from_reader<R: Read>(
        reader: R,
        format: SpreadsheetFormat,
    ) -> Result<Vec<LeadRecord>, IngestError> {
        let table = match format {
            SpreadsheetFormat::Xlsx => table::read_workbook(reader)?,
            SpreadsheetFormat::Csv => table::read_csv(reader)?,
        };
        debug!(
            ?format,
            columns = table.headers.len(),
            rows = table.rows.len(),
            "lead table loaded"
        );

        parser::parse_records(&table)
    }
}
