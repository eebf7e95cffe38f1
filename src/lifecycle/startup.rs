//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the tracer, HTTP client and service for the selected role
//! - Start the metrics endpoint when enabled
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - The listener binds last, once the service is fully built

use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;

use crate::config::{AppConfig, ObservabilityConfig};
use crate::http::{self, HttpServer};
use crate::observability::metrics;
use crate::observability::tracing::Tracer;
use crate::providers;
use crate::services::{DownstreamService, EdgeService};

/// Errors that abort startup or serving.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the edge server.
pub fn edge_server(config: &AppConfig, tracer: Tracer) -> Result<HttpServer, StartupError> {
    let client = providers::http_client()?;
    let service = EdgeService::new(client, config.edge.downstream_url.as_str(), tracer);
    let routes = http::edge::router(service, &config.edge.service_name);
    Ok(HttpServer::new(&config.edge.service_name, routes, &config.limits))
}

/// Build the downstream server.
pub fn downstream_server(config: &AppConfig, tracer: Tracer) -> Result<HttpServer, StartupError> {
    let client = providers::http_client()?;
    let service = DownstreamService::from_config(config, client, tracer);
    let routes = http::downstream::router(service, &config.downstream.service_name);
    Ok(HttpServer::new(&config.downstream.service_name, routes, &config.limits))
}

/// Run the edge service on its configured address.
pub async fn run_edge(
    config: AppConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    start_metrics(&config.observability);
    tracing::info!(
        bind_address = %config.edge.bind_address,
        downstream_url = %config.edge.downstream_url,
        "Configuration loaded"
    );

    let server = edge_server(&config, Tracer::logging(config.edge.service_name.as_str()))?;
    let listener = TcpListener::bind(&config.edge.bind_address).await?;
    server.run(listener, shutdown).await?;
    Ok(())
}

/// Run the downstream service on its configured address.
pub async fn run_downstream(
    config: AppConfig,
    shutdown: broadcast::Receiver<()>,
) -> Result<(), StartupError> {
    start_metrics(&config.observability);
    tracing::info!(
        bind_address = %config.downstream.bind_address,
        address_provider = %config.providers.address_base_url,
        weather_provider = %config.providers.weather_base_url,
        "Configuration loaded"
    );

    let server = downstream_server(
        &config,
        Tracer::logging(config.downstream.service_name.as_str()),
    )?;
    let listener = TcpListener::bind(&config.downstream.bind_address).await?;
    server.run(listener, shutdown).await?;
    Ok(())
}

fn start_metrics(config: &ObservabilityConfig) {
    if !config.metrics_enabled {
        return;
    }
    match config.metrics_address.parse() {
        Ok(addr) => metrics::init_metrics(addr),
        Err(_) => tracing::error!(
            metrics_address = %config.metrics_address,
            "Failed to parse metrics address"
        ),
    }
}
