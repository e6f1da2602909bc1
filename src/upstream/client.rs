use reqwest::Client;
use std::time::Duration;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::upstream::models::LocationDataPayload;

/// HTTP client for the sensor server that stores readings per location.
pub struct UpstreamClient {
    http_client: Client,
    base_url: String,
    row_limit: Option<u32>,
    device_id: Option<String>,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns `AppError::Internal` if the HTTP client cannot be built.
    pub fn new(config: &Config) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_seconds))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http_client,
            base_url: config.upstream_base_url.clone(),
            row_limit: config.upstream_row_limit,
            device_id: config.upstream_device_id.clone(),
        })
    }

    #[must_use]
    pub fn location_data_url(&self, location_id: &str) -> String {
        format!("{}/location/{location_id}/data.json", self.base_url)
    }

    /// Get the latest readings and status totals for a location.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Upstream` if the request fails, returns an error status,
    /// or the body is not a valid payload.
    pub async fn get_location_data(&self, location_id: &str) -> AppResult<LocationDataPayload> {
        let url = self.location_data_url(location_id);

        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(limit) = self.row_limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(device) = &self.device_id {
            query.push(("device_id", device.clone()));
        }

        let response = self
            .http_client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!("HTTP {}", response.status())));
        }

        let text = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Failed to get response text: {e}")))?;

        serde_json::from_str(&text).map_err(|e| {
            tracing::debug!(
                error = %e,
                body_preview = %text.chars().take(500).collect::<String>(),
                "Failed to parse location data response"
            );
            AppError::Upstream(format!("Failed to parse response: {e}"))
        })
    }
}
