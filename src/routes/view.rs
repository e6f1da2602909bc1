use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::common::AppState;
use crate::dashboard::Dashboard;
use crate::dashboard::charts::{DonutChart, LineChart, StatCards};
use crate::dashboard::filter::{FilterState, SortOrder, StatusFilter};
use crate::error::{AppError, AppResult};

/// Rendered table state for the current page
#[derive(Debug, Serialize, ToSchema)]
pub struct ViewResponse {
    /// Changes whenever anything on the dashboard changes
    pub revision: u64,
    pub filters: FilterState,
    pub current_page: usize,
    pub total_pages: usize,
    /// Rows matching the filter and search, across all pages
    pub filtered_count: usize,
    /// Rows held from the last successful poll
    pub total_rows: usize,
    /// Content for `#sensor-rows`
    pub table_html: String,
    /// Content for `#pagination-controls`
    pub pagination_html: String,
}

impl ViewResponse {
    #[must_use]
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        Self {
            revision: dashboard.revision(),
            filters: dashboard.filters().clone(),
            current_page: dashboard.current_page(),
            total_pages: dashboard.total_pages(),
            filtered_count: dashboard.view().len(),
            total_rows: dashboard.rows().len(),
            table_html: dashboard.render_table(),
            pagination_html: dashboard.render_pagination(),
        }
    }
}

/// Chart series and stat card values
#[derive(Debug, Serialize, ToSchema)]
pub struct ChartsResponse {
    pub revision: u64,
    /// Number of newest readings shown on the line chart
    pub limit: usize,
    pub line: LineChart,
    pub donut: DonutChart,
    pub stats: StatCards,
}

impl ChartsResponse {
    #[must_use]
    pub fn from_dashboard(dashboard: &Dashboard) -> Self {
        let charts = dashboard.charts();
        Self {
            revision: dashboard.revision(),
            limit: dashboard.filters().chart_limit,
            line: charts.line.clone(),
            donut: charts.donut.clone(),
            stats: charts.stats,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct FilterCommand {
    /// `all`, `normal`, `anomaly` or the button caption
    pub filter: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SortCommand {
    /// `newest`, `oldest`, `temp_high`, `temp_low` or the selector caption
    pub sort: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SearchCommand {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PageCommand {
    pub page: usize,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ChartLimitCommand {
    pub limit: usize,
}

/// Get the current table page
#[utoipa::path(
    get,
    path = "/api/view",
    responses(
        (status = 200, description = "Current view", body = ViewResponse),
    ),
    tag = "view"
)]
pub async fn get_view(State(state): State<AppState>) -> Json<ViewResponse> {
    let dashboard = state.dashboard.read().await;
    Json(ViewResponse::from_dashboard(&dashboard))
}

/// Select the status filter (resets to page 1)
#[utoipa::path(
    post,
    path = "/api/view/filter",
    request_body = FilterCommand,
    responses(
        (status = 200, description = "Filter applied", body = ViewResponse),
        (status = 400, description = "Unknown filter"),
    ),
    tag = "view"
)]
pub async fn set_filter(
    State(state): State<AppState>,
    Json(command): Json<FilterCommand>,
) -> AppResult<Json<ViewResponse>> {
    let filter: StatusFilter = command.filter.parse().map_err(AppError::BadRequest)?;
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_filter(filter);
    tracing::debug!(?filter, matching = dashboard.view().len(), "Filter changed");
    Ok(Json(ViewResponse::from_dashboard(&dashboard)))
}

/// Select the sort order (resets to page 1)
#[utoipa::path(
    post,
    path = "/api/view/sort",
    request_body = SortCommand,
    responses(
        (status = 200, description = "Sort applied", body = ViewResponse),
        (status = 400, description = "Unknown sort order"),
    ),
    tag = "view"
)]
pub async fn set_sort(
    State(state): State<AppState>,
    Json(command): Json<SortCommand>,
) -> AppResult<Json<ViewResponse>> {
    let sort: SortOrder = command.sort.parse().map_err(AppError::BadRequest)?;
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_sort(sort);
    tracing::debug!(?sort, "Sort changed");
    Ok(Json(ViewResponse::from_dashboard(&dashboard)))
}

/// Search device ids and measurements (resets to page 1)
#[utoipa::path(
    post,
    path = "/api/view/search",
    request_body = SearchCommand,
    responses(
        (status = 200, description = "Search applied", body = ViewResponse),
    ),
    tag = "view"
)]
pub async fn set_search(
    State(state): State<AppState>,
    Json(command): Json<SearchCommand>,
) -> Json<ViewResponse> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_search(&command.query);
    tracing::debug!(
        query = %dashboard.filters().search_query,
        matching = dashboard.view().len(),
        "Search changed"
    );
    Json(ViewResponse::from_dashboard(&dashboard))
}

/// Show another page of the current view
#[utoipa::path(
    post,
    path = "/api/view/page",
    request_body = PageCommand,
    responses(
        (status = 200, description = "Page shown", body = ViewResponse),
    ),
    tag = "view"
)]
pub async fn go_to_page(
    State(state): State<AppState>,
    Json(command): Json<PageCommand>,
) -> Json<ViewResponse> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.go_to_page(command.page);
    Json(ViewResponse::from_dashboard(&dashboard))
}

/// Get chart series and stat card values
#[utoipa::path(
    get,
    path = "/api/charts",
    responses(
        (status = 200, description = "Current charts", body = ChartsResponse),
    ),
    tag = "charts"
)]
pub async fn get_charts(State(state): State<AppState>) -> Json<ChartsResponse> {
    let dashboard = state.dashboard.read().await;
    Json(ChartsResponse::from_dashboard(&dashboard))
}

/// Change how many readings the line chart shows and redraw immediately
#[utoipa::path(
    post,
    path = "/api/charts/limit",
    request_body = ChartLimitCommand,
    responses(
        (status = 200, description = "Charts redrawn", body = ChartsResponse),
    ),
    tag = "charts"
)]
pub async fn set_chart_limit(
    State(state): State<AppState>,
    Json(command): Json<ChartLimitCommand>,
) -> Json<ChartsResponse> {
    let mut dashboard = state.dashboard.write().await;
    dashboard.set_chart_limit(command.limit);
    tracing::debug!(limit = dashboard.filters().chart_limit, "Chart limit changed");
    Json(ChartsResponse::from_dashboard(&dashboard))
}
