use super::normalizer::normalize_header;
use super::IngestError;
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::{Cursor, Read};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    /// Whitespace-only text is empty; anything else is kept verbatim.
    fn from_text(raw: &str) -> Self {
        if raw.trim().is_empty() {
            Cell::Empty
        } else {
            Cell::Text(raw.to_string())
        }
    }

    fn from_workbook(data: &Data) -> Self {
        match data {
            Data::Empty => Cell::Empty,
            Data::Int(value) => Cell::Number(*value as f64),
            Data::Float(value) => Cell::Number(*value),
            Data::Bool(value) => Cell::Number(if *value { 1.0 } else { 0.0 }),
            Data::DateTime(value) => Cell::Number(value.as_f64()),
            Data::String(value) | Data::DateTimeIso(value) | Data::DurationIso(value) => {
                Cell::from_text(value)
            }
            Data::Error(value) => Cell::Text(format!("#{value:?}")),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Header row plus data rows, with headers already normalized.
#[derive(Debug, Default)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub(crate) fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }
}

pub(crate) fn read_csv<R: Read>(reader: R) -> Result<RawTable, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        rows.push(record.iter().map(Cell::from_text).collect());
    }

    Ok(RawTable { headers, rows })
}

/// Reads the first worksheet; the first used row is the header row.
pub(crate) fn read_workbook<R: Read>(mut reader: R) -> Result<RawTable, IngestError> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(IngestError::EmptyWorkbook)??;

    let mut sheet_rows = range.rows();
    let headers = match sheet_rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| match cell {
                Data::Empty => String::new(),
                other => normalize_header(&other.to_string()),
            })
            .collect(),
        None => return Err(IngestError::EmptyWorkbook),
    };

    let rows = sheet_rows
        .map(|row| row.iter().map(Cell::from_workbook).collect())
        .collect();

    Ok(RawTable { headers, rows })
}
