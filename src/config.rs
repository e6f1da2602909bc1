use chrono_tz::Tz;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::dashboard::filter::{CHART_LIMIT_MAX, CHART_LIMIT_MIN, DEFAULT_CHART_LIMIT};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deployment {
    Local,
    Dev,
    Stage,
    Prod,
}

impl Deployment {
    #[must_use]
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "dev" | "development" => Self::Dev,
            "stage" | "staging" => Self::Stage,
            "prod" | "production" => Self::Prod,
            _ => Self::Local,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    // Upstream sensor server
    pub upstream_base_url: String,
    pub upstream_timeout_seconds: u64,
    pub upstream_row_limit: Option<u32>,
    pub upstream_device_id: Option<String>,

    // Dashboard
    pub location_id: Option<String>,
    pub location_name: String,
    pub bootstrap_page: Option<PathBuf>,
    pub display_timezone: Tz,
    pub chart_limit_default: usize,

    // Polling
    pub poll_initial_delay_ms: u64,
    pub poll_interval_ms: u64,

    // API settings
    pub api_host: String,
    pub api_port: u16,

    // Application metadata
    pub deployment: Deployment,
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if required environment variables are not set,
    /// `ConfigError::Invalid` if a value cannot be interpreted at all.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// Optional numeric settings fall back to their defaults when unparsable.
    ///
    /// # Errors
    ///
    /// Same as [`Config::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };
        let non_empty = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let upstream_base_url = non_empty("UPSTREAM_BASE_URL")
            .ok_or(ConfigError::Missing("UPSTREAM_BASE_URL"))?
            .trim_end_matches('/')
            .to_string();

        let timezone_name =
            non_empty("DASHBOARD_TIMEZONE").unwrap_or_else(|| "Asia/Jakarta".to_string());
        let display_timezone: Tz = timezone_name.parse().map_err(|_| ConfigError::Invalid {
            key: "DASHBOARD_TIMEZONE",
            value: timezone_name.clone(),
        })?;

        let chart_limit_raw = parsed("CHART_LIMIT_DEFAULT", DEFAULT_CHART_LIMIT as u64);
        let chart_limit_default = usize::try_from(chart_limit_raw)
            .unwrap_or(DEFAULT_CHART_LIMIT)
            .clamp(CHART_LIMIT_MIN, CHART_LIMIT_MAX);

        let log_format = match non_empty("LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            upstream_base_url,
            upstream_timeout_seconds: parsed("UPSTREAM_TIMEOUT_SECONDS", 10),
            upstream_row_limit: non_empty("UPSTREAM_ROW_LIMIT").and_then(|v| v.parse().ok()),
            upstream_device_id: non_empty("UPSTREAM_DEVICE_ID"),

            location_id: non_empty("DASHBOARD_LOCATION_ID"),
            location_name: non_empty("DASHBOARD_LOCATION_NAME")
                .unwrap_or_else(|| "Unknown".to_string()),
            bootstrap_page: non_empty("DASHBOARD_BOOTSTRAP_PAGE").map(PathBuf::from),
            display_timezone,
            chart_limit_default,

            poll_initial_delay_ms: parsed("POLL_INITIAL_DELAY_MS", 3000),
            poll_interval_ms: parsed("POLL_INTERVAL_MS", 5000).max(1),

            api_host: non_empty("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            api_port: lookup("API_PORT")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(3000),

            deployment: Deployment::from_str(
                &non_empty("DEPLOYMENT").unwrap_or_else(|| "local".to_string()),
            ),
            log_format,
        })
    }

    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    #[must_use]
    pub fn poll_initial_delay(&self) -> Duration {
        Duration::from_millis(self.poll_initial_delay_ms)
    }

    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}
