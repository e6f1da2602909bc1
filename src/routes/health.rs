use axum::{Json, extract::State, http::StatusCode};

use crate::common::AppState;
use crate::sync::PollStatus;

/// Health check endpoint
///
/// Returns 200 OK if the service is running, whatever the poller's state.
#[utoipa::path(
    get,
    path = "/healthz",
    responses(
        (status = 200, description = "Service is healthy"),
    ),
    tag = "health"
)]
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

/// Background poller status
#[utoipa::path(
    get,
    path = "/api/status",
    responses(
        (status = 200, description = "Poller status", body = PollStatus),
    ),
    tag = "health"
)]
pub async fn poll_status(State(state): State<AppState>) -> Json<PollStatus> {
    Json(state.poll_status.read().await.clone())
}
