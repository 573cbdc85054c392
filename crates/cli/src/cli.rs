//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use contracts::{LogFormat, PublishStrategy};

/// Mediator - in-process request/notification dispatch
#[derive(Parser, Debug)]
#[command(
    name = "mediator",
    author,
    version,
    about = "In-process mediator: typed request/response and notification fan-out",
    long_about = "Routes strongly-typed messages to handlers resolved at call time.\n\n\
                  The `demo` command wires a task-list scenario into a handler registry \n\
                  and dispatches it with the configured publish strategy."
)]
pub struct Cli {
    /// Path to configuration file (TOML or JSON)
    #[arg(short, long, global = true, env = "MEDIATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "MEDIATOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format (defaults to the configured format)
    #[arg(long, value_enum, global = true, env = "MEDIATOR_LOG_FORMAT")]
    pub log_format: Option<LogFormatArg>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch the task-list scenario
    Demo(DemoArgs),

    /// Validate configuration file
    Validate(ValidateArgs),

    /// Display effective configuration
    Info(InfoArgs),
}

/// Arguments for the `demo` command
#[derive(Parser, Debug, Clone)]
pub struct DemoArgs {
    /// Task names to publish as `TaskAdded` notifications
    #[arg(short, long = "task", default_value = "cleaning")]
    pub tasks: Vec<String>,

    /// How many times the same handler instance is registered for `TaskAdded`
    #[arg(long, default_value = "2", env = "MEDIATOR_DEMO_HANDLERS")]
    pub handlers: usize,

    /// Registration slot replaced by a handler that always fails
    #[arg(long)]
    pub fail_at: Option<usize>,

    /// Number of publish rounds
    #[arg(long, default_value = "1")]
    pub rounds: u32,

    /// Override the configured publish strategy
    #[arg(long, value_enum, env = "MEDIATOR_PUBLISH_STRATEGY")]
    pub strategy: Option<StrategyArg>,

    /// Prometheus exporter port, overrides the configuration (0 = disabled)
    #[arg(long, env = "MEDIATOR_METRICS_PORT")]
    pub metrics_port: Option<u16>,

    /// Output report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Output as JSON
    #[arg(long, conflicts_with = "toml")]
    pub json: bool,

    /// Output as TOML
    #[arg(long)]
    pub toml: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum LogFormatArg {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
        }
    }
}

/// Publish strategy
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum StrategyArg {
    /// Stop at the first failing handler
    FailFast,
    /// Run every handler and report all failures
    ContinueOnError,
    /// Run every handler concurrently and report all failures
    Parallel,
}

impl From<StrategyArg> for PublishStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::FailFast => PublishStrategy::FailFast,
            StrategyArg::ContinueOnError => PublishStrategy::ContinueOnError,
            StrategyArg::Parallel => PublishStrategy::Parallel,
        }
    }
}
