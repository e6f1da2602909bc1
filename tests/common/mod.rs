//! Shared fixtures for the integration tests.
#![allow(dead_code)]

use chrono::{Duration, TimeZone, Utc};

use safe_dashboard::bootstrap::Bootstrap;
use safe_dashboard::dashboard::{Dashboard, Location};
use safe_dashboard::upstream::{LocationDataPayload, Measurement, SensorReading};

pub fn reading(timestamp: &str, temperature: f64, is_anomaly: bool) -> SensorReading {
    SensorReading {
        id: None,
        timestamp: timestamp.to_string(),
        device_id: Some("dev-a".to_string()),
        temperature: Measurement::Number(temperature),
        humidity: Measurement::Number(50.0),
        is_anomaly,
    }
}

/// `count` readings one minute apart, newest first, starting at 2024-01-01 10:00 UTC.
///
/// Temperature of row `i` is `i`; every third row is an anomaly.
pub fn minute_series(count: usize) -> Vec<SensorReading> {
    let newest = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            let ts = newest - Duration::minutes(i as i64);
            reading(&ts.to_rfc3339(), i as f64, i % 3 == 0)
        })
        .collect()
}

pub fn payload(
    rows: Vec<SensorReading>,
    normal: Option<u64>,
    anomaly: Option<u64>,
) -> LocationDataPayload {
    LocationDataPayload {
        count: Some(rows.len() as u64),
        data: rows,
        total_normal_count: normal,
        total_anomaly_count: anomaly,
        ..LocationDataPayload::default()
    }
}

pub fn location() -> Location {
    Location {
        id: Some("7".to_string()),
        name: "Gudang".to_string(),
    }
}

pub fn dashboard() -> Dashboard {
    Dashboard::new(location(), &Bootstrap::default(), chrono_tz::UTC, 30)
}

pub fn dashboard_with(rows: Vec<SensorReading>) -> Dashboard {
    let mut dashboard = dashboard();
    dashboard.apply_poll(1, payload(rows, None, None));
    dashboard
}
