//! # Observability
//!
//! Tracing + Prometheus metrics for the mediator.
//!
//! ## Features
//!
//! - Tracing initialization (JSON / Pretty / Compact)
//! - Prometheus metrics exporter
//! - Dispatch metrics recording and in-memory statistics
//!
//! ## Usage
//!
//! ```ignore
//! use observability::{DispatchStatsAggregator, ObservabilityConfig};
//!
//! observability::init_with_config(ObservabilityConfig::default())?;
//!
//! // The dispatcher records to the metrics facade on every call;
//! // an observer can additionally aggregate in memory.
//! let stats = Arc::new(Mutex::new(DispatchStatsAggregator::new()));
//! let sink = Arc::clone(&stats);
//! let dispatcher = DispatcherBuilder::new(registry)
//!     .on_dispatch(Arc::new(move |record| sink.lock().unwrap().update(record)))
//!     .build();
//! ```

pub mod metrics;

use anyhow::{Context, Result};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use contracts::LogFormat;
use contracts::TelemetryConfig;

// Re-exports
pub use crate::metrics::{
    record_dispatch_metrics, DispatchStatsAggregator, LatencyStats, LatencySummary, MetricsSummary,
};

/// Observability configuration
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    /// Log format
    pub log_format: LogFormat,
    /// Prometheus port (None = disabled)
    pub metrics_port: Option<u16>,
    /// Default log level, used when `RUST_LOG` is unset
    pub default_log_level: String,
    /// Let `RUST_LOG` override `default_log_level`
    pub honor_env_filter: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Json,
            metrics_port: None,
            default_log_level: "info".to_string(),
            honor_env_filter: true,
        }
    }
}

impl From<&TelemetryConfig> for ObservabilityConfig {
    fn from(telemetry: &TelemetryConfig) -> Self {
        Self {
            log_format: telemetry.log_format,
            metrics_port: telemetry.metrics_port,
            default_log_level: telemetry.log_level.clone(),
            honor_env_filter: true,
        }
    }
}

/// Build the level filter for a configuration
fn build_filter(config: &ObservabilityConfig) -> EnvFilter {
    if config.honor_env_filter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&config.default_log_level))
    } else {
        EnvFilter::new(&config.default_log_level)
    }
}

/// Initialize with custom configuration
///
/// Logs go to stderr; stdout is left to command output.
pub fn init_with_config(config: ObservabilityConfig) -> Result<()> {
    // 1. Initialize Tracing
    let filter = build_filter(&config);

    match config.log_format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(std::io::stderr);

            tracing_subscriber::registry()
                .with(filter)
                .with(fmt_layer)
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
        LogFormat::Compact => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize tracing subscriber")?;
        }
    }

    // 2. Initialize Prometheus Exporter (if enabled)
    if let Some(port) = config.metrics_port {
        init_metrics_only(port)?;
    }

    tracing::info!(
        log_format = ?config.log_format,
        metrics_port = ?config.metrics_port,
        "Observability initialized"
    );

    Ok(())
}

/// Initialize only the Prometheus exporter (tracing set up elsewhere)
pub fn init_metrics_only(port: u16) -> Result<()> {
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], port))
        .install()
        .context("Failed to install Prometheus recorder")?;

    tracing::info!(port = port, "Prometheus metrics endpoint initialized");
    Ok(())
}
