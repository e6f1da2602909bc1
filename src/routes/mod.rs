pub mod dashboard;
pub mod export;
pub mod health;
pub mod view;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::common::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthz,
        health::poll_status,
        view::get_view,
        view::set_filter,
        view::set_sort,
        view::set_search,
        view::go_to_page,
        view::get_charts,
        view::set_chart_limit,
        export::export_csv,
    ),
    components(
        schemas(
            view::ViewResponse,
            view::ChartsResponse,
            view::FilterCommand,
            view::SortCommand,
            view::SearchCommand,
            view::PageCommand,
            view::ChartLimitCommand,
            crate::sync::PollStatus,
        )
    ),
    tags(
        (name = "health", description = "Service and poller health"),
        (name = "view", description = "Filtered, sorted and paginated readings table"),
        (name = "charts", description = "Line chart, status donut and stat cards"),
        (name = "export", description = "CSV download of the filtered view"),
    ),
    info(
        title = "SAFE Dashboard API",
        description = "Live sensor dashboard for a SAFE monitoring location",
        version = "0.1.0"
    )
)]
struct ApiDoc;

pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/view", get(view::get_view))
        .route("/view/filter", post(view::set_filter))
        .route("/view/sort", post(view::set_sort))
        .route("/view/search", post(view::set_search))
        .route("/view/page", post(view::go_to_page))
        .route("/charts", get(view::get_charts))
        .route("/charts/limit", post(view::set_chart_limit))
        .route("/export.csv", get(export::export_csv))
        .route("/status", get(health::poll_status))
        .layer(RequestBodyLimitLayer::new(64 * 1024)); // UI commands are tiny

    let docs_routes = Router::new().merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/healthz", get(health::healthz))
        .nest("/api", api_routes)
        .merge(docs_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
