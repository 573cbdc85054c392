//! # Mediator CLI
//!
//! Command-line entry point.
//!
//! Provides:
//! - Configuration loading and validation
//! - The task-list demo dispatched through a handler registry
//! - Logging / metrics initialization from config and flags

mod cli;
mod commands;
mod error;
mod scenario;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use config_loader::ConfigLoader;
use contracts::{MediatorConfig, TelemetryConfig};
use observability::ObservabilityConfig;
use tracing::info;

use cli::{Cli, Commands};
use commands::{run_demo, run_info, run_validate};
use error::CliError;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let loaded = load_config(cli.config.as_deref());
    let telemetry = loaded
        .as_ref()
        .map(|config| config.telemetry.clone())
        .unwrap_or_default();

    init_logging(&cli, &telemetry)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Mediator CLI starting"
    );

    let result = match &cli.command {
        Commands::Demo(args) => match loaded {
            Ok(config) => run_demo(args, &config).await,
            Err(e) => Err(e.into()),
        },
        Commands::Validate(args) => run_validate(args, cli.config.as_deref(), loaded),
        Commands::Info(args) => match loaded {
            Ok(config) => run_info(args, cli.config.as_deref(), &config),
            Err(e) => Err(e.into()),
        },
    };

    if let Err(ref e) = result {
        tracing::error!(error = %e, "Command failed");
    }

    result
}

/// Load configuration from `--config`, or defaults when no path is given
fn load_config(path: Option<&Path>) -> Result<MediatorConfig, CliError> {
    let Some(path) = path else {
        return Ok(MediatorConfig::default());
    };

    if !path.exists() {
        return Err(CliError::config_not_found(path.display().to_string()));
    }

    Ok(ConfigLoader::load_from_path(path)?)
}

/// Initialize logging from the config's telemetry section and CLI options
fn init_logging(cli: &Cli, telemetry: &TelemetryConfig) -> Result<()> {
    let mut config = ObservabilityConfig::from(telemetry);

    if let Some(format) = cli.log_format {
        config.log_format = format.into();
    }

    if cli.quiet {
        config.default_log_level = "warn".to_string();
        config.honor_env_filter = false;
    } else if cli.verbose > 0 {
        config.default_log_level = match cli.verbose {
            1 => "debug",
            _ => "trace",
        }
        .to_string();
    }

    // Only the demo dispatches anything worth exporting.
    config.metrics_port = match &cli.command {
        Commands::Demo(args) => match args.metrics_port {
            Some(0) => None,
            Some(port) => Some(port),
            None => telemetry.metrics_port,
        },
        _ => None,
    };

    observability::init_with_config(config)
}
