//! Config validation
//!
//! Rules:
//! - telemetry.log_level is a known level or an `EnvFilter` directive
//! - telemetry.metrics_port is not 0

use contracts::{ContractError, MediatorConfig};

const LOG_LEVELS: [&str; 6] = ["trace", "debug", "info", "warn", "error", "off"];

/// Validate a MediatorConfig
///
/// Returns the first error encountered, or Ok(()).
pub fn validate(config: &MediatorConfig) -> Result<(), ContractError> {
    validate_log_level(config)?;
    validate_metrics_port(config)?;
    Ok(())
}

/// Validate log level / filter directive
fn validate_log_level(config: &MediatorConfig) -> Result<(), ContractError> {
    let level = config.telemetry.log_level.trim();

    if level.is_empty() {
        return Err(ContractError::config_validation(
            "telemetry.log_level",
            "log_level cannot be empty",
        ));
    }

    // Directives such as "dispatcher=debug,info" are passed to EnvFilter as-is.
    let is_directive = level.contains('=') || level.contains(',');
    if !is_directive && !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
        return Err(ContractError::config_validation(
            "telemetry.log_level",
            format!(
                "unknown log level '{}', expected one of {:?} or a filter directive",
                level, LOG_LEVELS
            ),
        ));
    }

    Ok(())
}

/// Validate exporter port
fn validate_metrics_port(config: &MediatorConfig) -> Result<(), ContractError> {
    if config.telemetry.metrics_port == Some(0) {
        return Err(ContractError::config_validation(
            "telemetry.metrics_port",
            "metrics_port must be > 0 (omit it to disable the exporter)",
        ));
    }
    Ok(())
}
