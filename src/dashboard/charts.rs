//! Chart adapter: the line chart, the status donut and the stat cards.
//!
//! Both charts are created once from the page seed and afterwards mutated in
//! place. Every refresh bumps the chart's revision and records the update mode
//! so the browser can push the new series into its existing Chart.js instance
//! with `chart.update('none')` instead of rebuilding it.

use chrono_tz::Tz;
use serde::Serialize;
use utoipa::ToSchema;

use crate::bootstrap::Bootstrap;
use crate::dashboard::locale::display_time;
use crate::upstream::SensorReading;

/// Chart.js update mode applied on refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum UpdateMode {
    /// Initial render with the default animation
    #[default]
    Default,
    /// Live update without animation
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct StatusCounts {
    pub normal: u64,
    pub anomaly: u64,
}

impl StatusCounts {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.normal.saturating_add(self.anomaly)
    }

    /// Count normal and anomalous readings in `rows`.
    #[must_use]
    pub fn tally(rows: &[SensorReading]) -> Self {
        let anomaly = rows.iter().filter(|r| r.is_anomaly).count() as u64;
        Self {
            normal: rows.len() as u64 - anomaly,
            anomaly,
        }
    }
}

/// Temperature and humidity over time, oldest point first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct LineChart {
    pub labels: Vec<String>,
    pub temperature: Vec<f64>,
    pub humidity: Vec<f64>,
    pub revision: u64,
    pub mode: UpdateMode,
}

impl LineChart {
    pub fn update(
        &mut self,
        labels: Vec<String>,
        temperature: Vec<f64>,
        humidity: Vec<f64>,
        mode: UpdateMode,
    ) {
        self.labels = labels;
        self.temperature = temperature;
        self.humidity = humidity;
        self.revision += 1;
        self.mode = mode;
    }
}

/// Normal/anomaly distribution, series order `[normal, anomaly]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, ToSchema)]
pub struct DonutChart {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
    pub revision: u64,
    pub mode: UpdateMode,
}

impl DonutChart {
    fn new(counts: StatusCounts) -> Self {
        Self {
            labels: vec!["Normal".to_string(), "Anomali".to_string()],
            data: vec![counts.normal, counts.anomaly],
            revision: 0,
            mode: UpdateMode::Default,
        }
    }

    pub fn update(&mut self, counts: StatusCounts, mode: UpdateMode) {
        self.data = vec![counts.normal, counts.anomaly];
        self.revision += 1;
        self.mode = mode;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatCards {
    pub total: u64,
    pub normal: u64,
    pub anomaly: u64,
}

impl From<StatusCounts> for StatCards {
    fn from(counts: StatusCounts) -> Self {
        Self {
            total: counts.total(),
            normal: counts.normal,
            anomaly: counts.anomaly,
        }
    }
}

/// Server-supplied totals; each field is optional on the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerTotals {
    pub normal: Option<u64>,
    pub anomaly: Option<u64>,
}

impl ServerTotals {
    /// Fill whichever total the server omitted from a local tally.
    #[must_use]
    pub fn resolve(&self, rows: &[SensorReading]) -> StatusCounts {
        let local = StatusCounts::tally(rows);
        StatusCounts {
            normal: self.normal.unwrap_or(local.normal),
            anomaly: self.anomaly.unwrap_or(local.anomaly),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ChartAdapter {
    pub line: LineChart,
    pub donut: DonutChart,
    pub stats: StatCards,
}

impl ChartAdapter {
    /// Build both charts from the seed arrays embedded in the page.
    #[must_use]
    pub fn from_seed(seed: &Bootstrap) -> Self {
        let counts = StatusCounts {
            normal: seed.normal_count,
            anomaly: seed.anomaly_count,
        };
        Self {
            line: LineChart {
                labels: seed.labels.clone(),
                temperature: seed.temperatures.clone(),
                humidity: seed.humidities.clone(),
                revision: 0,
                mode: UpdateMode::Default,
            },
            donut: DonutChart::new(counts),
            stats: counts.into(),
        }
    }

    /// Redraw from the held rows (newest first).
    ///
    /// The line chart gets the newest `limit` rows in chronological order;
    /// donut and stat cards use `totals`, falling back to counts over `rows`.
    /// Does nothing when `rows` is empty.
    pub fn refresh(&mut self, rows: &[SensorReading], limit: usize, totals: ServerTotals, tz: Tz) {
        if rows.is_empty() {
            return;
        }

        let window: Vec<&SensorReading> = rows.iter().take(limit).rev().collect();
        let labels = window.iter().map(|r| display_time(&r.timestamp, tz)).collect();
        let temperature = window
            .iter()
            .map(|r| r.temperature.as_f64().unwrap_or(0.0))
            .collect();
        let humidity = window
            .iter()
            .map(|r| r.humidity.as_f64().unwrap_or(0.0))
            .collect();
        self.line.update(labels, temperature, humidity, UpdateMode::None);

        let counts = totals.resolve(rows);
        self.donut.update(counts, UpdateMode::None);
        self.stats = counts.into();
    }
}
