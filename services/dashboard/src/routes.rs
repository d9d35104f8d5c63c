use crate::infra::{read_upload, AppState};
use axum::extract::{DefaultBodyLimit, Multipart};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use lead_scoring::config::UploadConfig;
use lead_scoring::dashboard::{
    render_error_page, render_html, render_upload_page, DashboardSummary, LeadDashboard,
};
use lead_scoring::error::AppError;
use lead_scoring::ingest::LeadImporter;
use serde_json::json;
use tracing::{info, warn};

pub(crate) fn dashboard_routes(upload: &UploadConfig) -> Router {
    Router::new()
        .route("/", get(dashboard_page).post(upload_page))
        .route("/api/v1/leads/score", post(score_endpoint))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .layer(DefaultBodyLimit::max(upload.max_upload_bytes))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn dashboard_page() -> Html<String> {
    Html(render_upload_page())
}

pub(crate) async fn upload_page(multipart: Multipart) -> Response {
    match score_upload(multipart).await {
        Ok(summary) => Html(render_html(&summary)).into_response(),
        Err(err) => {
            warn!(error = %err, "lead upload rejected");
            (err.status(), Html(render_error_page(&err.to_string()))).into_response()
        }
    }
}

pub(crate) async fn score_endpoint(
    multipart: Multipart,
) -> Result<Json<DashboardSummary>, AppError> {
    score_upload(multipart).await.map(Json)
}

async fn score_upload(multipart: Multipart) -> Result<DashboardSummary, AppError> {
    let upload = read_upload(multipart).await?;
    info!(
        file_name = upload.file_name.as_deref().unwrap_or("<unnamed>"),
        format = ?upload.format,
        bytes = upload.bytes.len(),
        "lead upload received"
    );

    let records = LeadImporter::from_reader(&upload.bytes[..], upload.format)?;
    Ok(LeadDashboard::build(&records).summary())
}
