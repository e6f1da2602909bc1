use crate::common::AppState;
use crate::dashboard::PollOutcome;
use crate::error::AppResult;

/// Fetch the location's readings once and offer them to the dashboard as poll `seq`.
///
/// # Errors
///
/// Returns `AppError::Upstream` on network, HTTP status or decode failures.
/// The dashboard is untouched in that case.
pub async fn poll_once(state: &AppState, location_id: &str, seq: u64) -> AppResult<PollOutcome> {
    let payload = state.upstream_client.get_location_data(location_id).await?;
    let outcome = state.dashboard.write().await.apply_poll(seq, payload);
    Ok(outcome)
}

/// One poll cycle: fetch, apply, and record the result. Never fails.
pub async fn run_cycle(state: &AppState, location_id: &str, seq: u64) {
    state.poll_status.write().await.polls_started += 1;

    match poll_once(state, location_id, seq).await {
        Ok(outcome) => {
            match outcome {
                PollOutcome::Applied { rows } => {
                    tracing::debug!(seq, rows, "Poll applied");
                }
                PollOutcome::Empty => {
                    tracing::debug!(seq, "Poll returned no rows, keeping current data");
                }
                PollOutcome::Stale { last_applied } => {
                    tracing::warn!(seq, last_applied, "Discarding stale poll response");
                }
            }
            let applied = matches!(outcome, PollOutcome::Applied { .. }).then_some(seq);
            state.poll_status.write().await.record_success(applied);
        }
        Err(e) => {
            tracing::warn!(seq, location_id, error = %e, "Poll failed, keeping last known state");
            state.poll_status.write().await.record_failure(e.to_string());
        }
    }
}
