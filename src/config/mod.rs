//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize, env overrides)
//!     → validation.rs (semantic checks for the selected role)
//!     → AppConfig (validated, immutable)
//!     → handed to the service being started
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Secrets may come from the environment instead of the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    AppConfig, DownstreamConfig, EdgeConfig, LimitsConfig, LogFormat, ObservabilityConfig,
    ProviderConfig, ServiceRole,
};
