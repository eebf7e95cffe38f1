//! Downstream service: postal code → temperature in three units.
//!
//! # Responsibilities
//! - Re-validate the postal code; nothing from the edge is trusted
//! - Resolve the address, then fetch the weather for its locality
//! - Derive Kelvin and build the `TemperatureConversion`
//!
//! # Design Decisions
//! - The two provider calls are strictly sequential
//! - `NotFound` short-circuits before the weather provider is called

use reqwest::Client;
use tracing::Instrument;

use crate::config::AppConfig;
use crate::domain::{AddressLookup, PostalCode, ServiceError, ServiceResult, TemperatureConversion};
use crate::observability::tracing::{SpanContext, Tracer};
use crate::providers::{AddressClient, WeatherClient};

const REQUEST_SPAN: &str = "start";

/// Orchestrates the address and weather providers.
#[derive(Debug, Clone)]
pub struct DownstreamService {
    address: AddressClient,
    weather: WeatherClient,
    tracer: Tracer,
}

impl DownstreamService {
    pub fn new(address: AddressClient, weather: WeatherClient, tracer: Tracer) -> Self {
        Self {
            address,
            weather,
            tracer,
        }
    }

    /// Build the service and its provider clients from configuration.
    pub fn from_config(config: &AppConfig, client: Client, tracer: Tracer) -> Self {
        let providers = &config.providers;
        let address = AddressClient::new(
            client.clone(),
            providers.address_base_url.as_str(),
            tracer.clone(),
        );
        let weather = WeatherClient::new(
            client,
            providers.weather_base_url.as_str(),
            providers.weather_api_key.as_str(),
            tracer.clone(),
        );
        Self::new(address, weather, tracer)
    }

    /// Handle one lookup. The request span is opened before validation and
    /// joins `parent` when the caller propagated one.
    pub async fn temperature(
        &self,
        raw_cep: &str,
        parent: Option<SpanContext>,
    ) -> ServiceResult<TemperatureConversion> {
        let span = self.tracer.start(REQUEST_SPAN, parent.as_ref());
        let result = self
            .convert(raw_cep, &span.context())
            .instrument(span.log_span().clone())
            .await;
        span.end();
        result
    }

    async fn convert(
        &self,
        raw_cep: &str,
        ctx: &SpanContext,
    ) -> ServiceResult<TemperatureConversion> {
        let cep = PostalCode::parse(raw_cep)?;

        let address = match self.address.resolve(&cep, ctx).await? {
            AddressLookup::Found(address) => address,
            AddressLookup::NotFound => {
                tracing::info!(cep = %cep, "No address for postal code");
                return Err(ServiceError::NotFound);
            }
        };
        tracing::debug!(cep = %cep, locality = %address.locality, state = %address.state, "Address resolved");

        let reading = self.weather.fetch(&address.locality, ctx).await?;
        let conversion = TemperatureConversion::from(reading);

        tracing::info!(
            cep = %cep,
            locality = %address.locality,
            temp_c = conversion.celsius,
            "Temperature resolved"
        );
        Ok(conversion)
    }
}
