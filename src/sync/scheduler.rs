use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};

use crate::common::AppState;
use crate::sync::status::PollPhase;
use crate::sync::worker;

/// Handle to the running poller. Dropping the handle also stops polling.
pub struct PollerHandle {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// Ask the poller to stop after its current step.
    pub fn cancel(&self) {
        let _ = self.shutdown.send(true);
    }

    /// Cancel and wait for the task to finish.
    pub async fn shutdown(self) {
        self.cancel();
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "Poller task ended abnormally");
        }
    }
}

/// Start polling the configured location.
///
/// Returns `None` and marks polling disabled when the dashboard has no
/// location id; the rest of the dashboard keeps working on its seed data.
pub async fn spawn_polling(state: AppState) -> Option<PollerHandle> {
    let location_id = state.dashboard.read().await.location().id.clone();

    let Some(location_id) = location_id else {
        tracing::error!("Location ID not found, live updates disabled");
        let mut status = state.poll_status.write().await;
        status.phase = PollPhase::Disabled;
        status.last_error = Some("location id not configured".to_string());
        return None;
    };

    let (shutdown, receiver) = watch::channel(false);
    let task = tokio::spawn(run_polling(state, location_id, receiver));
    Some(PollerHandle { shutdown, task })
}

/// Poll the location on a schedule until cancelled.
///
/// Waits the initial delay, fetches once, then fetches every interval.
/// Fetches never overlap: a slow fetch delays the next one and missed ticks
/// are skipped. Each fetch carries the next sequence number.
pub async fn run_polling(
    state: AppState,
    location_id: String,
    mut shutdown: watch::Receiver<bool>,
) {
    let initial_delay = state.config.poll_initial_delay();
    let poll_interval = state.config.poll_interval();

    tracing::info!(
        location_id = %location_id,
        initial_delay_ms = initial_delay.as_millis() as u64,
        interval_ms = poll_interval.as_millis() as u64,
        "Starting live updates"
    );

    tokio::select! {
        () = tokio::time::sleep(initial_delay) => {}
        _ = shutdown.changed() => {
            mark_stopped(&state).await;
            return;
        }
    }

    state.poll_status.write().await.phase = PollPhase::Polling;

    let mut ticker = interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut seq: u64 = 0;

    loop {
        // The first tick completes immediately: first fetch right after the delay
        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.changed() => break,
        }

        seq += 1;
        tokio::select! {
            () = worker::run_cycle(&state, &location_id, seq) => {}
            _ = shutdown.changed() => break,
        }
    }

    mark_stopped(&state).await;
}

async fn mark_stopped(state: &AppState) {
    state.poll_status.write().await.phase = PollPhase::Stopped;
    tracing::info!("Live updates stopped");
}
