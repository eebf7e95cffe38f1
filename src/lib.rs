//! Postal-code temperature services.
//!
//! An edge service validates a CEP and forwards it, with W3C trace context,
//! to a downstream service that resolves the address and queries a weather
//! provider, answering in Celsius, Fahrenheit and Kelvin.

pub mod config;
pub mod domain;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod providers;
pub mod services;

pub use config::AppConfig;
pub use domain::{ServiceError, TemperatureConversion};
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use observability::Tracer;
