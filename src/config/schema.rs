//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for both services.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Which of the two services a process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceRole {
    Edge,
    Downstream,
}

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Edge service settings.
    pub edge: EdgeConfig,

    /// Downstream service settings.
    pub downstream: DownstreamConfig,

    /// External provider endpoints and credentials.
    pub providers: ProviderConfig,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Edge service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct EdgeConfig {
    /// Bind address (e.g., "0.0.0.0:8082").
    pub bind_address: String,

    /// Base URL of the downstream service.
    pub downstream_url: String,

    /// Service name stamped on spans.
    pub service_name: String,
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8082".to_string(),
            downstream_url: "http://goapp-b:8083".to_string(),
            service_name: "edge-service".to_string(),
        }
    }
}

/// Downstream service configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Bind address (e.g., "0.0.0.0:8083").
    pub bind_address: String,

    /// Service name stamped on spans.
    pub service_name: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8083".to_string(),
            service_name: "downstream-service".to_string(),
        }
    }
}

/// Address-resolution and weather provider settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the address-resolution provider (ViaCEP).
    pub address_base_url: String,

    /// Base URL of the weather provider (WeatherAPI).
    pub weather_base_url: String,

    /// Weather provider API key. `WEATHER_API_KEY` overrides it.
    pub weather_api_key: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            address_base_url: "http://viacep.com.br".to_string(),
            weather_base_url: "http://api.weatherapi.com".to_string(),
            weather_api_key: String::new(),
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub max_body_size: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_size: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
