//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URLs and value ranges
//! - Check the credentials the selected role needs
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: (AppConfig, role) → Result<(), Vec<ValidationError>>

use std::net::SocketAddr;
use thiserror::Error;
use url::Url;

use crate::config::schema::{AppConfig, ServiceRole};

/// A single semantic problem in the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{field}: '{value}' is not a valid socket address")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: '{value}' is not a valid http(s) URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },

    #[error("{field} must not be empty")]
    Empty { field: &'static str },
}

/// Validate the parts of `config` that `role` depends on.
pub fn validate_config(config: &AppConfig, role: ServiceRole) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match role {
        ServiceRole::Edge => {
            check_address(&mut errors, "edge.bind_address", &config.edge.bind_address);
            check_url(&mut errors, "edge.downstream_url", &config.edge.downstream_url);
            check_non_empty(&mut errors, "edge.service_name", &config.edge.service_name);
        }
        ServiceRole::Downstream => {
            check_address(
                &mut errors,
                "downstream.bind_address",
                &config.downstream.bind_address,
            );
            check_non_empty(
                &mut errors,
                "downstream.service_name",
                &config.downstream.service_name,
            );
            check_url(
                &mut errors,
                "providers.address_base_url",
                &config.providers.address_base_url,
            );
            check_url(
                &mut errors,
                "providers.weather_base_url",
                &config.providers.weather_base_url,
            );
            check_non_empty(
                &mut errors,
                "providers.weather_api_key",
                &config.providers.weather_api_key,
            );
        }
    }

    if config.limits.max_body_size == 0 {
        errors.push(ValidationError::Zero {
            field: "limits.max_body_size",
        });
    }
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let valid = Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false);
    if !valid {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn check_non_empty(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Empty { field });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn downstream_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.providers.weather_api_key = "key".into();
        config
    }

    #[test]
    fn test_defaults_are_valid_for_edge() {
        assert_eq!(validate_config(&AppConfig::default(), ServiceRole::Edge), Ok(()));
    }

    #[test]
    fn test_downstream_requires_api_key() {
        let errors = validate_config(&AppConfig::default(), ServiceRole::Downstream).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::Empty {
                field: "providers.weather_api_key"
            }]
        );
        assert_eq!(validate_config(&downstream_config(), ServiceRole::Downstream), Ok(()));
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = downstream_config();
        config.downstream.bind_address = "nope".into();
        config.providers.weather_base_url = "ftp://weather".into();
        config.limits.max_body_size = 0;

        let errors = validate_config(&config, ServiceRole::Downstream).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::Zero {
            field: "limits.max_body_size"
        }));
    }

    #[test]
    fn test_edge_ignores_provider_settings() {
        let mut config = AppConfig::default();
        config.providers.address_base_url = "not a url".into();
        assert!(validate_config(&config, ServiceRole::Edge).is_ok());

        config.edge.downstream_url = "goapp-b:8083".into();
        assert!(validate_config(&config, ServiceRole::Edge).is_err());
    }
}
