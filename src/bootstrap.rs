//! Seed data embedded in the dashboard page.
//!
//! The sensor server renders the location page with several
//! `<script id="..._json">` payloads holding the initial chart series and the
//! location id. Each blob is read on its own: a missing blob yields its
//! default, a malformed one yields its default and a warning, so a damaged
//! page degrades to empty charts instead of failing the dashboard.

use regex::Regex;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

pub const LABELS_BLOB: &str = "chart_labels_json";
pub const TEMPS_BLOB: &str = "chart_temps_json";
pub const HUMIDS_BLOB: &str = "chart_humids_json";
pub const ANOMALY_COUNT_BLOB: &str = "anomaly_count_json";
pub const NORMAL_COUNT_BLOB: &str = "normal_count_json";
pub const LOCATION_ID_BLOB: &str = "current_location_id_json";

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Bootstrap {
    pub labels: Vec<String>,
    pub temperatures: Vec<f64>,
    pub humidities: Vec<f64>,
    pub anomaly_count: u64,
    pub normal_count: u64,
    pub location_id: Option<String>,
}

impl Bootstrap {
    /// Read every seed blob out of a rendered page.
    #[must_use]
    pub fn from_page(html: &str) -> Self {
        Self {
            labels: read_blob(html, LABELS_BLOB),
            temperatures: read_blob(html, TEMPS_BLOB),
            humidities: read_blob(html, HUMIDS_BLOB),
            anomaly_count: read_blob(html, ANOMALY_COUNT_BLOB),
            normal_count: read_blob(html, NORMAL_COUNT_BLOB),
            location_id: read_blob::<Option<serde_json::Value>>(html, LOCATION_ID_BLOB)
                .and_then(location_id_text),
        }
    }

    /// Read a saved page from disk; an unreadable file gives an empty seed.
    pub async fn from_file(path: &Path) -> Self {
        match tokio::fs::read_to_string(path).await {
            Ok(html) => {
                let seed = Self::from_page(&html);
                tracing::info!(
                    path = %path.display(),
                    points = seed.labels.len(),
                    location_id = ?seed.location_id,
                    "Bootstrap page loaded"
                );
                seed
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Bootstrap page unreadable, starting empty"
                );
                Self::default()
            }
        }
    }
}

/// Raw text of `<script id="{id}">...</script>`, if present.
#[must_use]
pub fn extract_blob<'a>(html: &'a str, id: &str) -> Option<&'a str> {
    let pattern = format!(
        r#"(?is)<script\b[^>]*\bid\s*=\s*["']{}["'][^>]*>(.*?)</script>"#,
        regex::escape(id)
    );
    let re = Regex::new(&pattern).ok()?;
    re.captures(html)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
}

fn read_blob<T: DeserializeOwned + Default>(html: &str, id: &str) -> T {
    let Some(text) = extract_blob(html, id).filter(|t| !t.is_empty()) else {
        return T::default();
    };
    match serde_json::from_str::<Option<T>>(text) {
        Ok(value) => value.unwrap_or_default(),
        Err(e) => {
            tracing::warn!(blob = id, error = %e, "Malformed bootstrap blob, using default");
            T::default()
        }
    }
}

fn location_id_text(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}
