// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod error;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::application::datasource_service::DatasourceService;
use crate::infrastructure::config::load_datasource_config;
use crate::infrastructure::http_backend::HttpQueryBackend;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_devices, list_measurements, list_metrics, run_query, test_datasource,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load configuration
    let config = load_datasource_config()?;

    // Create backend client (infrastructure layer)
    let backend = Arc::new(HttpQueryBackend::new(config.datasource.url));

    // Create service (application layer)
    let datasource_service = DatasourceService::new(backend, config.datasource.id);

    // Create application state
    let state = Arc::new(AppState { datasource_service });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/test", get(test_datasource))
        .route("/query", post(run_query))
        .route("/devices", get(list_devices))
        .route("/devices/:obid/measurements", get(list_measurements))
        .route("/measurements/:obid/metrics", get(list_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.listen.parse()?;
    println!("Starting stablenet-datasource service on {}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
