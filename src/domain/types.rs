//! Postal code, address and temperature types.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::error::ServiceError;

/// Offset added to Celsius to obtain Kelvin.
///
/// Fixed at 273.0, not 273.15.
pub const KELVIN_OFFSET: f64 = 273.0;

const POSTAL_CODE_LEN: usize = 8;

/// A validated 8-digit Brazilian postal code (CEP).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PostalCode(String);

impl PostalCode {
    /// Validate a raw string as a postal code.
    ///
    /// Only the format is checked: exactly eight ASCII decimal digits.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        if raw.len() == POSTAL_CODE_LEN && raw.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(raw.to_string()))
        } else {
            Err(ServiceError::InvalidInput)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Locality information resolved from a postal code.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Address {
    pub cep: String,
    pub street: String,
    pub complement: String,
    pub neighborhood: String,
    /// City name, used as the weather query.
    pub locality: String,
    pub state: String,
    pub ibge: String,
}

/// Outcome of an address lookup that reached the provider successfully.
#[derive(Debug, Clone, PartialEq)]
pub enum AddressLookup {
    Found(Address),
    /// The provider has no address for this postal code.
    NotFound,
}

/// The slice of the weather provider's payload the pipeline cares about.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherReading {
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
}

/// Response body shared by both services.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureConversion {
    #[serde(rename = "temp_C")]
    pub celsius: f64,
    #[serde(rename = "temp_F")]
    pub fahrenheit: f64,
    #[serde(rename = "temp_K")]
    pub kelvin: f64,
}

impl From<WeatherReading> for TemperatureConversion {
    /// Celsius and Fahrenheit come straight from the provider; only Kelvin is computed.
    fn from(reading: WeatherReading) -> Self {
        Self {
            celsius: reading.temperature_celsius,
            fahrenheit: reading.temperature_fahrenheit,
            kelvin: reading.temperature_celsius + KELVIN_OFFSET,
        }
    }
}
