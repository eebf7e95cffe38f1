//! Postal-code temperature services (v1)
//!
//! One binary, two roles.
//!
//! ```text
//!   Client                 ┌───────────────┐   GET /?cep=     ┌────────────────────┐
//!   POST / {"cep"} ───────▶│ edge service  │─────────────────▶│ downstream service │
//!                          │ validate, 422 │   traceparent    │ validate, 422      │
//!   ◀──────────────────────│ map 404 / 400 │◀─────────────────│                    │
//!   {"temp_C","temp_F",    └───────────────┘                  └─────────┬──────────┘
//!    "temp_K"}                                                          │
//!                                               ┌───────────────────────┴──┐
//!                                               ▼                          ▼
//!                                        address provider  ──then──▶  weather provider
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use cep_weather::config::{load_config, ServiceRole};
use cep_weather::lifecycle::{self, Shutdown};
use cep_weather::observability::logging;

#[derive(Parser)]
#[command(name = "cep-weather")]
#[command(about = "Resolve a Brazilian postal code to its current temperature", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the caller-facing edge service
    Edge,
    /// Run the downstream address + weather service
    Downstream,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let role = match cli.command {
        Commands::Edge => ServiceRole::Edge,
        Commands::Downstream => ServiceRole::Downstream,
    };

    let config = load_config(cli.config.as_deref(), role)?;
    logging::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        role = ?role,
        "cep-weather starting"
    );

    let shutdown = Shutdown::new();
    match role {
        ServiceRole::Edge => lifecycle::run_edge(config, shutdown.subscribe()).await?,
        ServiceRole::Downstream => lifecycle::run_downstream(config, shutdown.subscribe()).await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
