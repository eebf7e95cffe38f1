//! Downstream service routes.

use axum::{
    extract::{RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;

use crate::http::health;
use crate::observability::{metrics, tracing as trace};
use crate::services::DownstreamService;

const SERVICE: &str = "downstream";

/// `GET /?cep=` plus `/health`.
pub fn router(service: DownstreamService, service_name: &str) -> Router {
    Router::new()
        .route("/", get(temperature_handler))
        .with_state(Arc::new(service))
        .merge(health::router(service_name))
}

async fn temperature_handler(
    State(service): State<Arc<DownstreamService>>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    let start = Instant::now();
    let cep = cep_from_query(query.as_deref());

    let response = match service.temperature(&cep, trace::extract(&headers)).await {
        Ok(conversion) => (StatusCode::OK, Json(conversion)).into_response(),
        Err(e) => e.into_response(),
    };

    metrics::record_request(SERVICE, response.status().as_u16(), start);
    response
}

/// First `cep` value in the query string. Missing reads as empty and fails validation.
fn cep_from_query(query: Option<&str>) -> String {
    query
        .and_then(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .find(|(key, _)| key == "cep")
                .map(|(_, value)| value.into_owned())
        })
        .unwrap_or_default()
}
