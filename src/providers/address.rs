//! Address-resolution client (ViaCEP).
//!
//! # Responsibilities
//! - Look up a postal code at `{base}/ws/{cep}/json/`
//! - Turn the provider's `erro` flag into `AddressLookup::NotFound`
//! - Surface transport and parse failures as `UpstreamError`

use reqwest::Client;
use serde::Deserialize;
use tracing::Instrument;

use crate::domain::{Address, AddressLookup, PostalCode, UpstreamError};
use crate::observability::metrics;
use crate::observability::tracing::{SpanContext, Tracer};

const PROVIDER: &str = "address";
const SPAN_NAME: &str = "getting location";

#[derive(Debug, Deserialize)]
struct ViaCepPayload {
    #[serde(default)]
    cep: String,
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    complemento: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    ibge: String,
    /// `true` or `"true"` when the code does not exist.
    #[serde(default)]
    erro: Option<serde_json::Value>,
}

impl ViaCepPayload {
    fn reports_missing(&self) -> bool {
        match &self.erro {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(flag)) => flag.eq_ignore_ascii_case("true"),
            _ => false,
        }
    }
}

/// Client for the address-resolution provider.
#[derive(Debug, Clone)]
pub struct AddressClient {
    client: Client,
    base_url: String,
    tracer: Tracer,
}

impl AddressClient {
    pub fn new(client: Client, base_url: impl Into<String>, tracer: Tracer) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tracer,
        }
    }

    /// Resolve `cep` to an address, inside a span nested under `parent`.
    pub async fn resolve(
        &self,
        cep: &PostalCode,
        parent: &SpanContext,
    ) -> Result<AddressLookup, UpstreamError> {
        let span = self.tracer.start(SPAN_NAME, Some(parent));
        let result = self.lookup(cep).instrument(span.log_span().clone()).await;
        span.end();

        let outcome = match &result {
            Ok(AddressLookup::Found(_)) => "found",
            Ok(AddressLookup::NotFound) => "not_found",
            Err(_) => "error",
        };
        metrics::record_upstream(PROVIDER, outcome);
        result
    }

    async fn lookup(&self, cep: &PostalCode) -> Result<AddressLookup, UpstreamError> {
        let url = format!("{}/ws/{}/json/", self.base_url, cep);
        tracing::debug!(url = %url, "Requesting address");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|source| UpstreamError::Transport {
                service: PROVIDER,
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                service: PROVIDER,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| UpstreamError::Transport {
                service: PROVIDER,
                source,
            })?;
        parse_address(&body)
    }
}

/// Decode a ViaCEP body. The not-found decision is made here.
pub(crate) fn parse_address(body: &[u8]) -> Result<AddressLookup, UpstreamError> {
    let payload: ViaCepPayload =
        serde_json::from_slice(body).map_err(|e| UpstreamError::Payload {
            service: PROVIDER,
            reason: e.to_string(),
        })?;

    if payload.reports_missing() {
        return Ok(AddressLookup::NotFound);
    }
    if payload.localidade.trim().is_empty() {
        return Err(UpstreamError::Payload {
            service: PROVIDER,
            reason: "missing localidade".to_string(),
        });
    }

    Ok(AddressLookup::Found(Address {
        cep: payload.cep,
        street: payload.logradouro,
        complement: payload.complemento,
        neighborhood: payload.bairro,
        locality: payload.localidade,
        state: payload.uf,
        ibge: payload.ibge,
    }))
}
