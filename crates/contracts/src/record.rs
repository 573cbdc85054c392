//! DispatchRecord - per-dispatch observation
//!
//! Emitted by the dispatcher after every `send` / `publish`.

use std::sync::Arc;

use crate::{HandlerKey, MessageKind};

/// Callback receiving one record per dispatch
pub type DispatchObserver = Arc<dyn Fn(&DispatchRecord) + Send + Sync>;

/// Outcome of a single dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Every invoked handler succeeded
    Completed,
    /// The resolver failed; no handler ran
    ResolutionFailed,
    /// At least one handler failed
    HandlerFailed,
}

impl DispatchOutcome {
    /// Label used for the `status` metric dimension
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "success",
            Self::ResolutionFailed => "resolution_failure",
            Self::HandlerFailed => "handler_failure",
        }
    }
}

/// Observation of one `send` / `publish` call
#[derive(Debug, Clone)]
pub struct DispatchRecord {
    /// Dispatch key
    pub key: HandlerKey,

    /// Number of handlers resolved for the call
    pub handlers_resolved: usize,

    /// Number of handlers actually invoked
    pub handlers_invoked: usize,

    /// Number of handler failures
    pub failures: usize,

    /// Outcome
    pub outcome: DispatchOutcome,

    /// Wall-clock latency in milliseconds
    pub latency_ms: f64,
}

impl DispatchRecord {
    /// Message kind of the dispatch
    pub fn kind(&self) -> MessageKind {
        self.key.kind()
    }

    /// Whether the dispatch succeeded
    pub fn is_success(&self) -> bool {
        self.outcome == DispatchOutcome::Completed
    }
}
