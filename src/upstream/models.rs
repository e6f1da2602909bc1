use serde::{Deserialize, Serialize};
use std::fmt;

/// Response from `/location/{location_id}/data.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationDataPayload {
    #[serde(default)]
    pub location_id: Option<serde_json::Value>,
    /// Number of rows in `data`
    #[serde(default)]
    pub count: Option<u64>,
    /// Latest readings, newest first. Absent and `null` are treated as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<SensorReading>,
    /// Aggregate over every stored reading for the location, not just `data`
    #[serde(default)]
    pub total_normal_count: Option<u64>,
    #[serde(default)]
    pub total_anomaly_count: Option<u64>,
    #[serde(default)]
    pub total_count: Option<u64>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<SensorReading>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<SensorReading>>::deserialize(deserializer)?.unwrap_or_default())
}

/// One sensor reading as delivered by the server.
///
/// Readings are immutable once received and have no stable identity on the
/// dashboard side: every successful poll replaces the whole set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(default)]
    pub id: Option<i64>,
    /// ISO 8601 timestamp text; parsed on demand so malformed values survive
    pub timestamp: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub temperature: Measurement,
    #[serde(default)]
    pub humidity: Measurement,
    #[serde(default)]
    pub is_anomaly: bool,
}

impl SensorReading {
    /// Device id for display, `-` when the server sent none.
    #[must_use]
    pub fn device_label(&self) -> &str {
        match self.device_id.as_deref() {
            Some(id) if !id.is_empty() => id,
            _ => "-",
        }
    }
}

/// A measured value that may arrive as a JSON number, a string or `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Measurement {
    Number(f64),
    Text(String),
    #[default]
    Missing,
}

impl Measurement {
    /// Numeric value, `None` when the value is missing, non-numeric or not finite.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(v) => *v,
            Self::Text(s) => s.trim().parse().ok()?,
            Self::Missing => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Text(s) => f.write_str(s),
            Self::Missing => Ok(()),
        }
    }
}

impl From<f64> for Measurement {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Measurement {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}
