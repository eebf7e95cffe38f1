//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cep_requests_total` (counter): requests by service, status
//! - `cep_request_duration_seconds` (histogram): latency by service
//! - `cep_upstream_calls_total` (counter): provider calls by provider, outcome
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Prometheus listener is opt-in via config

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape listener on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one handled request.
pub fn record_request(service: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "cep_requests_total",
        "service" => service,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cep_request_duration_seconds", "service" => service)
        .record(start.elapsed().as_secs_f64());
}

/// Record the outcome of one provider call.
pub fn record_upstream(provider: &'static str, outcome: &'static str) {
    metrics::counter!(
        "cep_upstream_calls_total",
        "provider" => provider,
        "outcome" => outcome
    )
    .increment(1);
}
