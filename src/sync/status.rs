use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PollPhase {
    /// Waiting for the initial delay to pass
    #[default]
    Idle,
    Polling,
    /// Cancelled or shut down
    Stopped,
    /// No location id, polling never started
    Disabled,
}

/// Health of the background poller, served at `/api/status`.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct PollStatus {
    pub phase: PollPhase,
    pub polls_started: u64,
    pub last_success_at: Option<DateTime<Utc>>,
    pub last_applied_seq: Option<u64>,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
}

impl PollStatus {
    pub fn record_success(&mut self, applied_seq: Option<u64>) {
        self.last_success_at = Some(Utc::now());
        if applied_seq.is_some() {
            self.last_applied_seq = applied_seq;
        }
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    pub fn record_failure(&mut self, error: String) {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(error);
    }
}
