//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::{AppConfig, ServiceRole};
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `providers.weather_api_key`.
pub const WEATHER_API_KEY_ENV: &str = "WEATHER_API_KEY";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load, override from env, and validate configuration for `role`.
///
/// Without a path the built-in defaults are used.
pub fn load_config(path: Option<&Path>, role: ServiceRole) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config, role).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment overrides using `lookup` to read variables.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(key) = lookup(WEATHER_API_KEY_ENV).filter(|k| !k.is_empty()) {
        config.providers.weather_api_key = key;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_env_overrides_api_key() {
        let mut config = AppConfig::default();
        config.providers.weather_api_key = "from-file".into();

        apply_env_overrides(&mut config, |key| {
            (key == WEATHER_API_KEY_ENV).then(|| "from-env".to_string())
        });
        assert_eq!(config.providers.weather_api_key, "from-env");

        apply_env_overrides(&mut config, |_| Some(String::new()));
        assert_eq!(config.providers.weather_api_key, "from-env");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("cep-weather-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[edge]\nbind_address = \"127.0.0.1:9000\"\ndownstream_url = \"http://localhost:9001\""
        )
        .unwrap();

        let config = load_config(Some(&path), ServiceRole::Edge).unwrap();
        assert_eq!(config.edge.bind_address, "127.0.0.1:9000");
        assert_eq!(config.edge.downstream_url, "http://localhost:9001");

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_load_reports_parse_error() {
        let path = std::env::temp_dir().join(format!("cep-weather-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[edge\nbind_address = 1").unwrap();

        let err = load_config(Some(&path), ServiceRole::Edge).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_validation_error_display() {
        let err = ConfigError::Validation(vec![
            ValidationError::Empty {
                field: "providers.weather_api_key",
            },
            ValidationError::Zero {
                field: "limits.max_body_size",
            },
        ]);
        assert_eq!(
            err.to_string(),
            "Validation failed: providers.weather_api_key must not be empty, limits.max_body_size must be greater than zero"
        );
    }
}
