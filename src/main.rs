// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::chart_service::ChartService;
use crate::application::farm_repository::FarmRepository;
use crate::application::status_service::StatusService;
use crate::infrastructure::backend_api::BackendApi;
use crate::infrastructure::config::{load_backend_config, load_chart_tuning};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    capture_image, get_alerts, get_chart, get_compare, get_dates, get_status, health_check,
    image_at, image_times, latest_image, toggle_actuator,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("smartfarm_telemetry=info,tower_http=info")),
        )
        .init();

    // Load configuration
    let backend_config = load_backend_config()?;
    let tuning = load_chart_tuning()?;

    // Create repository (infrastructure layer)
    let repository: Arc<dyn FarmRepository> = Arc::new(BackendApi::new(
        &backend_config.backend.base_url,
        Duration::from_secs(backend_config.backend.timeout_secs),
    )?);

    // Create services (application layer)
    let chart_service = ChartService::new(repository.clone(), tuning.clone());
    let status_service = StatusService::new(repository.clone());

    // Start the 30s status/alerts poller; the first tick fires immediately
    // so the cache is warm for the first page load
    status_service
        .clone()
        .spawn_poller(Duration::from_secs(tuning.poll_interval_secs));

    // Create application state
    let state = Arc::new(AppState {
        chart_service,
        status_service,
        repository,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/api/chart", get(get_chart))
        .route("/api/compare", get(get_compare))
        .route("/api/status", get(get_status))
        .route("/api/alerts", get(get_alerts))
        .route("/api/dates", get(get_dates))
        .route("/api/actuator/:kind/toggle", post(toggle_actuator))
        .route("/api/camera/capture", post(capture_image))
        .route("/api/camera/latest", get(latest_image))
        .route("/api/camera/image", get(image_at))
        .route("/api/camera/times", get(image_times))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], backend_config.server.port));
    tracing::info!(%addr, "starting smartfarm-telemetry service");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
