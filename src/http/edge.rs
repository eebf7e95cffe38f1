//! Edge service routes.

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::ServiceError;
use crate::http::health;
use crate::observability::{metrics, tracing as trace};
use crate::services::EdgeService;

const SERVICE: &str = "edge";

/// Request body. A missing or null `cep` reads as empty and fails validation.
#[derive(Debug, Deserialize)]
pub struct CepInput {
    #[serde(default)]
    pub cep: Option<String>,
}

/// `POST /` plus `/health`.
pub fn router(service: EdgeService, service_name: &str) -> Router {
    Router::new()
        .route("/", post(temperature_handler))
        .with_state(Arc::new(service))
        .merge(health::router(service_name))
}

async fn temperature_handler(
    State(service): State<Arc<EdgeService>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();

    let response = match serde_json::from_slice::<CepInput>(&body) {
        Ok(input) => {
            let cep = input.cep.unwrap_or_default();
            match service.temperature(&cep, trace::extract(&headers)).await {
                Ok(conversion) => (StatusCode::OK, Json(conversion)).into_response(),
                Err(e) => e.into_response(),
            }
        }
        Err(e) => ServiceError::MalformedRequest(e.to_string()).into_response(),
    };

    metrics::record_request(SERVICE, response.status().as_u16(), start);
    response
}
