//! `validate` command implementation.

use std::path::Path;

use anyhow::{Context, Result};
use contracts::{MediatorConfig, PublishStrategy};
use serde::Serialize;
use tracing::info;

use crate::cli::ValidateArgs;
use crate::error::CliError;

/// Validation result for JSON output
#[derive(Serialize)]
struct ValidationResult {
    valid: bool,
    config_path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    warnings: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    summary: Option<ConfigSummary>,
}

#[derive(Serialize)]
struct ConfigSummary {
    version: String,
    publish_strategy: String,
    log_format: String,
    log_level: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    metrics_port: Option<u16>,
}

/// Execute the `validate` command
///
/// `loaded` is the outcome of loading `config_path`; it is reported, not
/// propagated, so an invalid file still yields a structured result.
pub fn run_validate(
    args: &ValidateArgs,
    config_path: Option<&Path>,
    loaded: Result<MediatorConfig, CliError>,
) -> Result<()> {
    let path = config_path.ok_or_else(|| CliError::config_required("validate"))?;
    info!(config = %path.display(), "Validating configuration");

    let result = build_result(path, loaded);

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .context("Failed to serialize validation result")?;
        println!("{}", json);
    } else {
        print_validation_result(&result);
    }

    if result.valid {
        Ok(())
    } else {
        anyhow::bail!("Configuration validation failed")
    }
}

fn build_result(path: &Path, loaded: Result<MediatorConfig, CliError>) -> ValidationResult {
    let config_path = path.display().to_string();

    match loaded {
        Ok(config) => {
            let warnings = collect_warnings(&config);
            ValidationResult {
                valid: true,
                config_path,
                error: None,
                warnings: if warnings.is_empty() {
                    None
                } else {
                    Some(warnings)
                },
                summary: Some(ConfigSummary {
                    version: format!("{:?}", config.version),
                    publish_strategy: config.dispatch.publish_strategy.to_string(),
                    log_format: format!("{:?}", config.telemetry.log_format),
                    log_level: config.telemetry.log_level.clone(),
                    metrics_port: config.telemetry.metrics_port,
                }),
            }
        }
        Err(e) => ValidationResult {
            valid: false,
            config_path,
            error: Some(e.to_string()),
            warnings: None,
            summary: None,
        },
    }
}

/// Collect configuration warnings (non-fatal issues)
fn collect_warnings(config: &MediatorConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.dispatch.publish_strategy == PublishStrategy::Parallel {
        warnings.push(
            "dispatch.publish_strategy = parallel - handler side effects may interleave"
                .to_string(),
        );
    }

    if config.telemetry.log_level.eq_ignore_ascii_case("trace") {
        warnings.push("telemetry.log_level = trace - every dispatch is logged".to_string());
    }

    if config.telemetry.metrics_port.is_none() {
        warnings.push("telemetry.metrics_port not set - Prometheus exporter disabled".to_string());
    }

    warnings
}

fn print_validation_result(result: &ValidationResult) {
    if result.valid {
        println!("✓ Configuration is valid: {}", result.config_path);

        if let Some(ref summary) = result.summary {
            println!("\n  Version: {}", summary.version);
            println!("  Publish strategy: {}", summary.publish_strategy);
            println!("  Log format: {}", summary.log_format);
            println!("  Log level: {}", summary.log_level);
            if let Some(port) = summary.metrics_port {
                println!("  Metrics port: {}", port);
            }
        }

        if let Some(ref warnings) = result.warnings {
            println!("\n⚠ Warnings:");
            for warning in warnings {
                println!("  - {}", warning);
            }
        }
    } else {
        println!("✗ Configuration is invalid: {}", result.config_path);
        if let Some(ref error) = result.error {
            println!("\n  Error: {}", error);
        }
    }
}
