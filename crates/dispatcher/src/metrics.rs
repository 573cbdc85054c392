//! Dispatcher counters for observability

use std::sync::atomic::{AtomicU64, Ordering};

use contracts::{DispatchOutcome, DispatchRecord, MessageKind};

/// Counters for a single dispatcher
#[derive(Debug, Default)]
pub struct DispatchMetrics {
    /// Total `send` calls
    requests_sent: AtomicU64,
    /// Total `publish` calls
    notifications_published: AtomicU64,
    /// Total handler invocations
    handlers_invoked: AtomicU64,
    /// Total handler failures
    handler_failures: AtomicU64,
    /// Total dispatches that failed resolution
    resolution_failures: AtomicU64,
}

impl DispatchMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Get total `send` calls
    pub fn requests_sent(&self) -> u64 {
        self.requests_sent.load(Ordering::Relaxed)
    }

    /// Get total `publish` calls
    pub fn notifications_published(&self) -> u64 {
        self.notifications_published.load(Ordering::Relaxed)
    }

    /// Get total handler invocations
    pub fn handlers_invoked(&self) -> u64 {
        self.handlers_invoked.load(Ordering::Relaxed)
    }

    /// Get total handler failures
    pub fn handler_failures(&self) -> u64 {
        self.handler_failures.load(Ordering::Relaxed)
    }

    /// Get total resolution failures
    pub fn resolution_failures(&self) -> u64 {
        self.resolution_failures.load(Ordering::Relaxed)
    }

    /// Fold one dispatch into the counters
    pub fn record(&self, record: &DispatchRecord) {
        match record.kind() {
            MessageKind::Request => self.requests_sent.fetch_add(1, Ordering::Relaxed),
            MessageKind::Notification => {
                self.notifications_published.fetch_add(1, Ordering::Relaxed)
            }
        };
        self.handlers_invoked
            .fetch_add(record.handlers_invoked as u64, Ordering::Relaxed);
        self.handler_failures
            .fetch_add(record.failures as u64, Ordering::Relaxed);
        if record.outcome == DispatchOutcome::ResolutionFailed {
            self.resolution_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests_sent: self.requests_sent(),
            notifications_published: self.notifications_published(),
            handlers_invoked: self.handlers_invoked(),
            handler_failures: self.handler_failures(),
            resolution_failures: self.resolution_failures(),
        }
    }
}

/// Snapshot of dispatcher metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests_sent: u64,
    pub notifications_published: u64,
    pub handlers_invoked: u64,
    pub handler_failures: u64,
    pub resolution_failures: u64,
}
