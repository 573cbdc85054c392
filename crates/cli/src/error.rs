//! Error types for CLI operations.

use contracts::ContractError;
use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// A command needs a configuration file but none was given
    #[error("`{command}` requires a configuration file (--config or MEDIATOR_CONFIG)")]
    ConfigRequired { command: &'static str },

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Configuration loading error
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ContractError),
}

impl CliError {
    pub fn config_required(command: &'static str) -> Self {
        Self::ConfigRequired { command }
    }

    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }
}
