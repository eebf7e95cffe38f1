//! Liveness endpoint shared by both services.

use axum::{routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub service: String,
    pub version: &'static str,
    pub status: &'static str,
}

/// `GET /health` reporting `service_name`.
pub fn router(service_name: &str) -> Router {
    let name: Arc<str> = Arc::from(service_name);
    Router::new().route(
        "/health",
        get(move || {
            let name = name.clone();
            async move {
                Json(HealthStatus {
                    service: name.to_string(),
                    version: env!("CARGO_PKG_VERSION"),
                    status: "operational",
                })
            }
        }),
    )
}
