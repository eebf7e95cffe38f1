//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem
//! - Pick the log level from `RUST_LOG`, falling back to config
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::{LogFormat, ObservabilityConfig};

/// Install the global subscriber. Call once, before anything logs.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config));

    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn default_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::new(format!(
        "cep_weather={level},spans={level},tower_http=debug",
        level = config.log_level
    ))
}
