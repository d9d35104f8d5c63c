use axum::body::Bytes;
use axum::extract::Multipart;
use lead_scoring::error::AppError;
use lead_scoring::ingest::{IngestError, SpreadsheetFormat};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Debug)]
pub(crate) struct SpreadsheetUpload {
    pub(crate) file_name: Option<String>,
    pub(crate) format: SpreadsheetFormat,
    pub(crate) bytes: Bytes,
}

/// Pulls the spreadsheet out of the `file` form field.
///
/// The file name extension decides the format; the part's content type is
/// consulted only when the name has no usable extension.
pub(crate) async fn read_upload(mut multipart: Multipart) -> Result<SpreadsheetUpload, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| AppError::Upload(err.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let format = detect_format(file_name.as_deref(), content_type.as_deref())?;
        let bytes = field
            .bytes()
            .await
            .map_err(|err| AppError::Upload(err.to_string()))?;

        if bytes.is_empty() {
            return Err(AppError::Upload("uploaded file is empty".to_string()));
        }

        return Ok(SpreadsheetUpload {
            file_name,
            format,
            bytes,
        });
    }

    Err(AppError::Upload(format!(
        "no file was attached in the '{UPLOAD_FIELD}' form field"
    )))
}

fn detect_format(
    file_name: Option<&str>,
    content_type: Option<&str>,
) -> Result<SpreadsheetFormat, IngestError> {
    match (file_name, content_type) {
        (Some(name), content_type) => SpreadsheetFormat::from_file_name(name).or_else(|err| {
            content_type
                .map(SpreadsheetFormat::from_content_type)
                .unwrap_or(Err(err))
        }),
        (None, Some(content_type)) => SpreadsheetFormat::from_content_type(content_type),
        (None, None) => Err(IngestError::UnsupportedFormat("unnamed upload".to_string())),
    }
}
