//! MediatorConfig - Config Loader output
//!
//! Describes dispatch policy and telemetry settings.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Configuration version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConfigVersion {
    #[default]
    V1,
}

/// Complete mediator configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediatorConfig {
    /// Configuration version
    #[serde(default)]
    pub version: ConfigVersion,

    /// Dispatch policy
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Logging and metrics
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Dispatch policy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Failure policy for notification fan-out
    #[serde(default)]
    pub publish_strategy: PublishStrategy,
}

/// Failure policy for notification fan-out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PublishStrategy {
    /// Sequential; the first failure aborts the publish and later handlers are skipped
    #[default]
    FailFast,
    /// Sequential; every handler runs and all failures are reported together
    ContinueOnError,
    /// Concurrent on the caller's task; every handler runs and all failures are reported together
    Parallel,
}

impl PublishStrategy {
    /// Snake-case label, matching the config file spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FailFast => "fail_fast",
            Self::ContinueOnError => "continue_on_error",
            Self::Parallel => "parallel",
        }
    }

    /// Whether later handlers still run after a failure
    pub fn runs_all_handlers(&self) -> bool {
        !matches!(self, Self::FailFast)
    }
}

impl fmt::Display for PublishStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Logging and metrics settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Log output format
    #[serde(default)]
    pub log_format: LogFormat,

    /// Default log level or `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Prometheus exporter port (None = disabled)
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::default(),
            log_level: default_log_level(),
            metrics_port: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}
