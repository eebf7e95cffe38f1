//! Weather client (WeatherAPI current conditions).
//!
//! # Responsibilities
//! - Query `{base}/v1/current.json?q=<locality>&key=<api key>`
//! - Check transport, then status, then parse `current.temp_c` / `current.temp_f`
//!
//! # Design Decisions
//! - The rest of the provider schema is ignored
//! - The API key is never logged

use reqwest::Client;
use serde::Deserialize;
use std::fmt;
use tracing::Instrument;

use crate::domain::{UpstreamError, WeatherReading};
use crate::observability::metrics;
use crate::observability::tracing::{SpanContext, Tracer};

const PROVIDER: &str = "weather";
const SPAN_NAME: &str = "getting weather";

#[derive(Debug, Deserialize)]
struct CurrentPayload {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temp_c: f64,
    temp_f: f64,
}

/// Client for the weather provider.
#[derive(Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    tracer: Tracer,
}

impl WeatherClient {
    pub fn new(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        tracer: Tracer,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            tracer,
        }
    }

    /// Fetch current conditions for `locality`, inside a span nested under `parent`.
    pub async fn fetch(
        &self,
        locality: &str,
        parent: &SpanContext,
    ) -> Result<WeatherReading, UpstreamError> {
        let span = self.tracer.start(SPAN_NAME, Some(parent));
        let result = self
            .current(locality)
            .instrument(span.log_span().clone())
            .await;
        span.end();

        metrics::record_upstream(PROVIDER, if result.is_ok() { "ok" } else { "error" });
        result
    }

    async fn current(&self, locality: &str) -> Result<WeatherReading, UpstreamError> {
        let url = format!("{}/v1/current.json", self.base_url);
        tracing::debug!(url = %url, locality = %locality, "Requesting weather");

        // The query builder percent-encodes spaces and accents in the locality.
        let response = self
            .client
            .get(&url)
            .query(&[("q", locality), ("key", self.api_key.as_str())])
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
        parse_weather(&body)
    }
}

impl fmt::Debug for WeatherClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

pub(crate) fn parse_weather(body: &[u8]) -> Result<WeatherReading, UpstreamError> {
    let payload: CurrentPayload =
        serde_json::from_slice(body).map_err(|e| UpstreamError::Payload {
            service: PROVIDER,
            reason: e.to_string(),
        })?;

    Ok(WeatherReading {
        temperature_celsius: payload.current.temp_c,
        temperature_fahrenheit: payload.current.temp_f,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::tracing::RecordingSink;
    use std::sync::Arc;

    #[test]
    fn test_parse_reads_only_temperatures() {
        let body = br#"{
            "location": {"name": "Sao Paulo", "region": "Sao Paulo", "country": "Brazil",
                         "lat": -23.53, "lon": -46.62, "tz_id": "America/Sao_Paulo",
                         "localtime_epoch": 1741700000, "localtime": "2025-03-11 10:00"},
            "current": {"last_updated_epoch": 1741700000, "temp_c": 25.0, "temp_f": 77.0,
                        "is_day": 1, "condition": {"text": "Sunny", "icon": "", "code": 1000},
                        "wind_kph": 9.0, "humidity": 70, "feelslike_c": 26.1}
        }"#;

        let reading = parse_weather(body).unwrap();
        assert_eq!(reading.temperature_celsius, 25.0);
        assert_eq!(reading.temperature_fahrenheit, 77.0);
    }

    #[test]
    fn test_parse_rejects_missing_current() {
        let err = parse_weather(br#"{"error": {"code": 1006, "message": "No matching location found."}}"#)
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Payload { service: "weather", .. }));
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let client = WeatherClient::new(
            Client::new(),
            "http://api.weatherapi.com/",
            "super-secret",
            Tracer::new("test", Arc::new(RecordingSink::new())),
        );
        let debug = format!("{client:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("http://api.weatherapi.com\""));
    }
}
