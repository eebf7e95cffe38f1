//! Domain model for postal-code temperature lookups.
//!
//! # Data Flow
//! ```text
//! raw "cep" string
//!     → types.rs (PostalCode::parse, format check only)
//!     → Address lookup (Found / NotFound)
//!     → WeatherReading (provider Celsius + Fahrenheit)
//!     → TemperatureConversion (Kelvin derived locally)
//! ```
//!
//! # Design Decisions
//! - Every entity is built fresh per request and dropped after the response
//! - "Not found" is a variant, decided where the provider payload is parsed
//! - Kelvin uses a fixed +273.0 offset

pub mod error;
pub mod types;

pub use error::{ServiceError, ServiceResult, UpstreamError};
pub use types::{
    Address, AddressLookup, PostalCode, TemperatureConversion, WeatherReading, KELVIN_OFFSET,
};
