use axum::{
    body::Body,
    extract::State,
    http::header::{self, HeaderValue},
    response::Response,
};
use chrono::Utc;

use crate::common::AppState;
use crate::dashboard::export::CSV_CONTENT_TYPE;
use crate::error::{AppError, AppResult};

/// Download the filtered view as CSV
///
/// Uses the current filter, search and sort; pagination is ignored.
#[utoipa::path(
    get,
    path = "/api/export.csv",
    responses(
        (status = 200, description = "CSV file", body = String, content_type = "text/csv"),
        (status = 422, description = "Nothing to export"),
    ),
    tag = "export"
)]
pub async fn export_csv(State(state): State<AppState>) -> AppResult<Response> {
    let export = {
        let dashboard = state.dashboard.read().await;
        dashboard.export_csv(Utc::now().date_naive())?
    };

    tracing::info!(filename = %export.filename, rows = export.rows, "CSV exported");

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export.filename.replace('"', "")
    );

    Response::builder()
        .header(header::CONTENT_TYPE, HeaderValue::from_static(CSV_CONTENT_TYPE))
        .header(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_str(&disposition).map_err(|e| AppError::Internal(e.to_string()))?,
        )
        .body(Body::from(export.body))
        .map_err(|e| AppError::Internal(e.to_string()))
}
