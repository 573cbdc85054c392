//! Layered error definitions
//!
//! Categorized by source: resolution / handler / dispatch / config

use thiserror::Error;

use crate::HandlerKey;

/// Boxed error carried as the source of a handler failure
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// The resolver could not produce the handler(s) required for a key.
///
/// Produced by the host's resolver and relayed to the caller unchanged.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// No handler registered for a single-handler slot
    #[error("no handler registered for '{key}'")]
    NotRegistered { key: HandlerKey },

    /// More than one handler registered for a single-handler slot
    #[error("expected exactly one handler for '{key}', found {count}")]
    Ambiguous { key: HandlerKey, count: usize },

    /// Registered instance does not implement the handler trait for the key
    #[error("registered handler for '{key}' has an unexpected type")]
    TypeMismatch { key: HandlerKey },

    /// Host-defined resolution failure
    #[error("resolver failed for '{key}': {message}")]
    Host { key: HandlerKey, message: String },
}

impl ResolutionError {
    /// Create host-defined resolution error
    pub fn host(key: HandlerKey, message: impl Into<String>) -> Self {
        Self::Host {
            key,
            message: message.into(),
        }
    }

    /// Key the resolution was attempted for
    pub fn key(&self) -> HandlerKey {
        match self {
            Self::NotRegistered { key }
            | Self::Ambiguous { key, .. }
            | Self::TypeMismatch { key }
            | Self::Host { key, .. } => *key,
        }
    }
}

/// A handler's own processing failure.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl HandlerError {
    /// Create handler error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Wrap an underlying error, keeping it as the source
    pub fn from_source(source: impl Into<BoxError>) -> Self {
        let source = source.into();
        Self {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Failure message
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// One failed handler within a publish call.
#[derive(Debug)]
pub struct HandlerFailure {
    /// Position of the handler in the resolved sequence
    pub index: usize,
    /// The handler's error
    pub error: HandlerError,
}

/// Error returned by `send` / `publish`.
#[derive(Debug, Error)]
pub enum MediatorError {
    /// Resolution failure, relayed unchanged
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// A single handler failed
    #[error("handler #{index} for '{key}' failed: {source}")]
    Handler {
        key: HandlerKey,
        index: usize,
        #[source]
        source: HandlerError,
    },

    /// One or more handlers failed during a collecting publish
    #[error("{} of {total} handlers for '{key}' failed", failures.len())]
    Aggregate {
        key: HandlerKey,
        total: usize,
        failures: Vec<HandlerFailure>,
    },
}

impl MediatorError {
    /// Create single-handler failure
    pub fn handler(key: HandlerKey, index: usize, source: HandlerError) -> Self {
        Self::Handler { key, index, source }
    }

    /// Key of the failed dispatch
    pub fn key(&self) -> HandlerKey {
        match self {
            Self::Resolution(e) => e.key(),
            Self::Handler { key, .. } | Self::Aggregate { key, .. } => *key,
        }
    }

    /// Whether the failure happened before any handler ran
    pub fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// Number of failed handler invocations carried by this error
    pub fn failure_count(&self) -> usize {
        match self {
            Self::Resolution(_) => 0,
            Self::Handler { .. } => 1,
            Self::Aggregate { failures, .. } => failures.len(),
        }
    }
}

/// Configuration and I/O errors
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }
}
