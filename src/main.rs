use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use safe_dashboard::bootstrap::Bootstrap;
use safe_dashboard::common::AppState;
use safe_dashboard::config::{Config, LogFormat};
use safe_dashboard::dashboard::{Dashboard, Location};
use safe_dashboard::routes;
use safe_dashboard::sync;
use safe_dashboard::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (fail-fast)
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,safe_dashboard=debug".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }

    tracing::info!("Starting safe-dashboard...");
    tracing::info!(
        deployment = ?config.deployment,
        upstream = %config.upstream_base_url,
        host = %config.api_host,
        port = config.api_port,
        timezone = %config.display_timezone,
        "Configuration loaded"
    );

    // Seed charts from the saved location page, if any
    let seed = match &config.bootstrap_page {
        Some(path) => Bootstrap::from_file(path).await,
        None => Bootstrap::default(),
    };

    let location = Location {
        id: config.location_id.clone().or_else(|| seed.location_id.clone()),
        name: config.location_name.clone(),
    };
    tracing::info!(
        location_id = ?location.id,
        location_name = %location.name,
        "Dashboard location"
    );

    let dashboard = Dashboard::new(
        location,
        &seed,
        config.display_timezone,
        config.chart_limit_default,
    );

    let upstream_client = UpstreamClient::new(&config)?;
    tracing::info!("Upstream client initialized");

    let state = AppState::new(config.clone(), upstream_client, dashboard);

    // Background polling; missing location id only disables live updates
    let poller = sync::spawn_polling(state.clone()).await;

    let app = routes::build_router(state);

    // Start server with graceful shutdown
    let addr = config.bind_address();
    tracing::info!(address = %addr, "Starting server");
    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(poller) = poller {
        poller.shutdown().await;
    }

    tracing::info!("Server shut down gracefully");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down...");
        },
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down...");
        },
    }
}
