//! Edge service: validates input and forwards to the downstream service.
//!
//! # Responsibilities
//! - Reject malformed postal codes before any network call
//! - Forward valid codes with the request span injected as `traceparent`
//! - Translate the downstream outcome back into the error taxonomy
//!
//! # Design Decisions
//! - Exactly one outbound call and one span per valid request
//! - Downstream 404 becomes `NotFound`; every other failure is `Upstream`

use axum::http::HeaderMap;
use reqwest::{Client, StatusCode};
use tracing::Instrument;

use crate::domain::{PostalCode, ServiceError, ServiceResult, TemperatureConversion, UpstreamError};
use crate::observability::tracing::{self as trace, SpanContext, Tracer};

const REQUEST_SPAN: &str = "start";
const DOWNSTREAM: &str = "downstream";

/// Caller-facing hop.
#[derive(Debug, Clone)]
pub struct EdgeService {
    client: Client,
    downstream_url: String,
    tracer: Tracer,
}

impl EdgeService {
    pub fn new(client: Client, downstream_url: impl Into<String>, tracer: Tracer) -> Self {
        Self {
            client,
            downstream_url: downstream_url.into(),
            tracer,
        }
    }

    /// Validate `raw_cep` and ask the downstream service for its temperature.
    pub async fn temperature(
        &self,
        raw_cep: &str,
        parent: Option<SpanContext>,
    ) -> ServiceResult<TemperatureConversion> {
        let cep = PostalCode::parse(raw_cep)?;

        let span = self.tracer.start(REQUEST_SPAN, parent.as_ref());
        let result = self
            .forward(&cep, &span.context())
            .instrument(span.log_span().clone())
            .await;
        span.end();
        result
    }

    async fn forward(&self, cep: &PostalCode, ctx: &SpanContext) -> ServiceResult<TemperatureConversion> {
        let mut headers = HeaderMap::new();
        trace::inject(ctx, &mut headers);

        tracing::debug!(cep = %cep, url = %self.downstream_url, "Forwarding to downstream");
        let response = self
            .client
            .get(&self.downstream_url)
            .query(&[("cep", cep.as_str())])
            .headers(headers)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                service: DOWNSTREAM,
                source,
            })?;

        match response.status() {
            StatusCode::OK => {
                let body = response
                    .bytes()
                    .await
                    .map_err(|source| UpstreamError::Transport {
                        service: DOWNSTREAM,
                        source,
                    })?;
                let conversion = serde_json::from_slice(&body).map_err(|e| UpstreamError::Payload {
                    service: DOWNSTREAM,
                    reason: e.to_string(),
                })?;
                Ok(conversion)
            }
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound),
            status => Err(UpstreamError::Status {
                service: DOWNSTREAM,
                status: status.as_u16(),
            }
            .into()),
        }
    }
}
