use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::sync::PollStatus;
use crate::upstream::UpstreamClient;

/// The dashboard is the single writer target; readers take short read locks to render.
pub type SharedDashboard = Arc<RwLock<Dashboard>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub upstream_client: Arc<UpstreamClient>,
    pub dashboard: SharedDashboard,
    pub poll_status: Arc<RwLock<PollStatus>>,
}

impl AppState {
    pub fn new(config: Config, upstream_client: UpstreamClient, dashboard: Dashboard) -> Self {
        Self {
            config: Arc::new(config),
            upstream_client: Arc::new(upstream_client),
            dashboard: Arc::new(RwLock::new(dashboard)),
            poll_status: Arc::new(RwLock::new(PollStatus::default())),
        }
    }
}
