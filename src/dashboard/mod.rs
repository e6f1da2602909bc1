//! Dashboard controller for one sensor location.
//!
//! [`Dashboard`] is the single owner of the data store, the user's filter
//! state, the derived view and the chart state. UI events and poll results
//! mutate it through methods; rendering reads it through pure functions.
//!
//! Pipeline on every state change: filter → search → sort → paginate → render.
//! The view is always recomputed wholesale, never patched.

pub mod charts;
pub mod export;
pub mod filter;
pub mod locale;
pub mod paginate;
pub mod table;

use chrono::NaiveDate;
use chrono_tz::Tz;

use crate::bootstrap::Bootstrap;
use crate::upstream::{LocationDataPayload, SensorReading};
use charts::{ChartAdapter, ServerTotals};
use export::{CsvExport, ExportError};
use filter::{FilterState, SortOrder, StatusFilter};
use paginate::Pagination;

/// The location a dashboard shows, passed in explicitly at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Path segment for `/location/{id}/data.json`; polling is disabled without it
    pub id: Option<String>,
    pub name: String,
}

/// Result of offering a poll response to the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Store replaced and every view refreshed
    Applied { rows: usize },
    /// No rows in the response, previous state kept
    Empty,
    /// An equal or newer poll was already applied
    Stale { last_applied: u64 },
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    location: Location,
    tz: Tz,
    rows: Vec<SensorReading>,
    filters: FilterState,
    view: Vec<SensorReading>,
    current_page: usize,
    charts: ChartAdapter,
    last_totals: ServerTotals,
    last_applied_seq: Option<u64>,
    revision: u64,
}

impl Dashboard {
    /// Create the dashboard with charts seeded from the page bootstrap.
    #[must_use]
    pub fn new(location: Location, seed: &Bootstrap, tz: Tz, chart_limit: usize) -> Self {
        let filters = FilterState {
            chart_limit: filter::clamp_chart_limit(chart_limit),
            ..FilterState::default()
        };
        Self {
            location,
            tz,
            rows: Vec::new(),
            filters,
            view: Vec::new(),
            current_page: 1,
            charts: ChartAdapter::from_seed(seed),
            last_totals: ServerTotals::default(),
            last_applied_seq: None,
            revision: 0,
        }
    }

    #[must_use]
    pub fn location(&self) -> &Location {
        &self.location
    }

    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Every reading held, newest first as delivered.
    #[must_use]
    pub fn rows(&self) -> &[SensorReading] {
        &self.rows
    }

    #[must_use]
    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    /// The filtered and sorted rows across all pages.
    #[must_use]
    pub fn view(&self) -> &[SensorReading] {
        &self.view
    }

    #[must_use]
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    #[must_use]
    pub fn total_pages(&self) -> usize {
        paginate::total_pages(self.view.len())
    }

    #[must_use]
    pub fn charts(&self) -> &ChartAdapter {
        &self.charts
    }

    /// Increments on every observable change.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    #[must_use]
    pub fn last_applied_seq(&self) -> Option<u64> {
        self.last_applied_seq
    }

    pub fn set_filter(&mut self, filter: StatusFilter) {
        self.filters.filter = filter;
        self.run_pipeline();
    }

    pub fn set_sort(&mut self, sort: SortOrder) {
        self.filters.sort = sort;
        self.run_pipeline();
    }

    pub fn set_search(&mut self, query: &str) {
        self.filters.search_query = query.trim().to_string();
        self.run_pipeline();
    }

    /// Show another page of the current view without re-filtering.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = paginate::clamp_page(page, self.view.len());
        self.revision += 1;
    }

    /// Change the line chart window and redraw from the rows already held.
    pub fn set_chart_limit(&mut self, limit: usize) {
        self.filters.chart_limit = filter::clamp_chart_limit(limit);
        self.charts
            .refresh(&self.rows, self.filters.chart_limit, self.last_totals, self.tz);
        self.revision += 1;
    }

    /// Offer the response of poll number `seq`.
    ///
    /// Responses older than the last applied one are dropped so a slow fetch
    /// can never overwrite fresher data. Empty row sets leave everything as is.
    pub fn apply_poll(&mut self, seq: u64, payload: LocationDataPayload) -> PollOutcome {
        if let Some(last_applied) = self.last_applied_seq
            && seq <= last_applied
        {
            return PollOutcome::Stale { last_applied };
        }
        if payload.data.is_empty() {
            return PollOutcome::Empty;
        }

        let rows = payload.data.len();
        self.last_applied_seq = Some(seq);
        self.last_totals = ServerTotals {
            normal: payload.total_normal_count,
            anomaly: payload.total_anomaly_count,
        };
        self.rows = payload.data;
        self.run_pipeline();
        self.charts
            .refresh(&self.rows, self.filters.chart_limit, self.last_totals, self.tz);

        PollOutcome::Applied { rows }
    }

    /// Rows shown on the current page.
    #[must_use]
    pub fn page_rows(&self) -> &[SensorReading] {
        paginate::page_slice(&self.view, self.current_page)
    }

    #[must_use]
    pub fn pagination(&self) -> Option<Pagination> {
        Pagination::for_view(self.view.len(), self.current_page)
    }

    /// Markup for `#sensor-rows`.
    #[must_use]
    pub fn render_table(&self) -> String {
        table::render_rows(
            self.page_rows(),
            self.current_page,
            &self.location.name,
            self.tz,
            self.view.is_empty(),
        )
    }

    /// Markup for `#pagination-controls`.
    #[must_use]
    pub fn render_pagination(&self) -> String {
        paginate::render(self.pagination().as_ref())
    }

    /// CSV of the current filtered view.
    ///
    /// # Errors
    ///
    /// Returns `ExportError::Empty` when the view has no rows.
    pub fn export_csv(&self, today: NaiveDate) -> Result<CsvExport, ExportError> {
        export::export_csv(&self.view, &self.location.name, self.tz, today)
    }

    fn run_pipeline(&mut self) {
        self.view = filter::apply(&self.rows, &self.filters, self.tz);
        self.current_page = 1;
        self.revision += 1;
    }
}

/// Escape text for HTML element content and attribute values.
#[must_use]
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
