//! Filter, search and sort stages of the view pipeline.
//!
//! The engine is a pure function of the held rows and the user's
//! [`FilterState`]; the controller recomputes the whole view on every change.

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::str::FromStr;
use utoipa::ToSchema;

use crate::dashboard::locale::parse_timestamp;
use crate::upstream::SensorReading;

pub const DEFAULT_CHART_LIMIT: usize = 30;
pub const CHART_LIMIT_MIN: usize = 1;
/// Matches the sensor server's default row limit per response
pub const CHART_LIMIT_MAX: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Normal,
    Anomaly,
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, reading: &SensorReading) -> bool {
        match self {
            Self::All => true,
            Self::Normal => !reading.is_anomaly,
            Self::Anomaly => reading.is_anomaly,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = String;

    /// Accepts the API keys as well as the filter button captions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "all" | "Semua Data" => Ok(Self::All),
            "normal" | "Normal" => Ok(Self::Normal),
            "anomaly" | "Anomali" => Ok(Self::Anomaly),
            other => Err(format!("unknown filter '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    TempHigh,
    TempLow,
}

impl FromStr for SortOrder {
    type Err = String;

    /// Accepts the API keys as well as the sort selector captions.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" | "Urutkan Terbaru" => Ok(Self::Newest),
            "oldest" | "Urutkan Terlama" => Ok(Self::Oldest),
            "temp_high" | "Suhu Tertinggi" => Ok(Self::TempHigh),
            "temp_low" | "Suhu Terendah" => Ok(Self::TempLow),
            other => Err(format!("unknown sort order '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FilterState {
    pub filter: StatusFilter,
    pub sort: SortOrder,
    pub search_query: String,
    pub chart_limit: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            filter: StatusFilter::All,
            sort: SortOrder::Newest,
            search_query: String::new(),
            chart_limit: DEFAULT_CHART_LIMIT,
        }
    }
}

/// Clamp a requested chart window to the supported range.
#[must_use]
pub fn clamp_chart_limit(limit: usize) -> usize {
    limit.clamp(CHART_LIMIT_MIN, CHART_LIMIT_MAX)
}

/// Run filter, search and sort over `rows`, returning the ordered view.
#[must_use]
pub fn apply(rows: &[SensorReading], state: &FilterState, tz: Tz) -> Vec<SensorReading> {
    let query = state.search_query.trim().to_lowercase();

    let mut view: Vec<SensorReading> = rows
        .iter()
        .filter(|r| state.filter.matches(r))
        .filter(|r| query.is_empty() || matches_search(r, &query))
        .cloned()
        .collect();

    sort_rows(&mut view, state.sort, tz);
    view
}

/// Case-insensitive device id containment, plain text containment for the
/// measurements (`"25"` matches `25.5`).
#[must_use]
pub fn matches_search(reading: &SensorReading, lowercase_query: &str) -> bool {
    reading
        .device_id
        .as_deref()
        .is_some_and(|id| id.to_lowercase().contains(lowercase_query))
        || reading.temperature.to_string().contains(lowercase_query)
        || reading.humidity.to_string().contains(lowercase_query)
}

/// Stable sort; rows whose key cannot be parsed go last in either direction.
pub fn sort_rows(rows: &mut [SensorReading], order: SortOrder, tz: Tz) {
    match order {
        SortOrder::Newest | SortOrder::Oldest => {
            let descending = order == SortOrder::Newest;
            // (validity, signed instant): invalid timestamps carry rank 1 and sort last
            rows.sort_by_cached_key(|r| {
                parse_timestamp(&r.timestamp, tz).map_or((1, 0), |dt| {
                    let micros = dt.timestamp_micros();
                    (0, if descending { -micros } else { micros })
                })
            });
        }
        SortOrder::TempHigh | SortOrder::TempLow => {
            let descending = order == SortOrder::TempHigh;
            rows.sort_by(|a, b| {
                invalid_last(a.temperature.as_f64(), b.temperature.as_f64(), |x, y| {
                    let ord = x.total_cmp(y);
                    if descending { ord.reverse() } else { ord }
                })
            });
        }
    }
}

fn invalid_last<T>(a: Option<T>, b: Option<T>, cmp: impl Fn(&T, &T) -> Ordering) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(&x, &y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
