//! `info` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::MediatorConfig;
use tracing::info;

use crate::cli::InfoArgs;

/// Execute the `info` command
pub fn run_info(args: &InfoArgs, config_path: Option<&Path>, config: &MediatorConfig) -> Result<()> {
    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<defaults>".to_string());
    info!(config = %source, "Loading configuration info");

    if args.json {
        let json = ConfigLoader::to_json(config).context("Failed to serialize config info")?;
        println!("{}", json);
    } else if args.toml {
        let toml = ConfigLoader::to_toml(config).context("Failed to serialize config info")?;
        print!("{}", toml);
    } else {
        print_config_info(&source, config);
    }

    Ok(())
}

fn print_config_info(source: &str, config: &MediatorConfig) {
    println!("=== Mediator Configuration ===");
    println!("Source: {}", source);
    println!("Version: {:?}", config.version);

    println!("\n[Dispatch]");
    let strategy = config.dispatch.publish_strategy;
    println!("  Publish strategy: {}", strategy);
    println!(
        "  Runs all handlers on failure: {}",
        if strategy.runs_all_handlers() { "yes" } else { "no" }
    );

    println!("\n[Telemetry]");
    println!("  Log format: {:?}", config.telemetry.log_format);
    println!("  Log level: {}", config.telemetry.log_level);
    match config.telemetry.metrics_port {
        Some(port) => println!("  Metrics: http://0.0.0.0:{}/metrics", port),
        None => println!("  Metrics: disabled"),
    }
}
