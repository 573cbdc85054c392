//! Dispatch metrics
//!
//! Records `DispatchRecord`s to the `metrics` facade and aggregates them in memory.

use std::collections::HashMap;

use contracts::{DispatchOutcome, DispatchRecord, MessageKind};
use metrics::{counter, histogram};

/// Record metrics from a DispatchRecord
///
/// The dispatcher calls this once per `send` / `publish`. Without an
/// installed recorder the calls are no-ops.
pub fn record_dispatch_metrics(record: &DispatchRecord) {
    let message = record.key.short_name();
    let status = record.outcome.as_str();

    match record.kind() {
        MessageKind::Request => {
            counter!(
                "mediator_requests_total",
                "message" => message,
                "status" => status
            )
            .increment(1);
        }
        MessageKind::Notification => {
            counter!(
                "mediator_notifications_total",
                "message" => message,
                "status" => status
            )
            .increment(1);
        }
    }

    if record.handlers_invoked > 0 {
        counter!("mediator_handlers_invoked_total", "message" => message)
            .increment(record.handlers_invoked as u64);
    }

    if record.failures > 0 {
        counter!("mediator_handler_failures_total", "message" => message)
            .increment(record.failures as u64);
    }

    if record.outcome == DispatchOutcome::ResolutionFailed {
        counter!("mediator_resolution_failures_total", "message" => message).increment(1);
    }

    histogram!("mediator_dispatch_latency_ms", "kind" => record.kind().as_str())
        .record(record.latency_ms);
}

/// Dispatch metrics aggregator
///
/// Aggregates records in memory for summaries.
#[derive(Debug, Clone, Default)]
pub struct DispatchStatsAggregator {
    /// Total requests sent
    pub total_requests: u64,

    /// Total notifications published
    pub total_notifications: u64,

    /// Total handler invocations
    pub handlers_invoked: u64,

    /// Total handler failures
    pub handler_failures: u64,

    /// Dispatches that failed resolution
    pub resolution_failures: u64,

    /// Request latency statistics (ms)
    pub request_latency: LatencyStats,

    /// Publish latency statistics (ms)
    pub publish_latency: LatencyStats,

    /// Dispatch count per fully qualified message type
    pub per_message: HashMap<String, u64>,
}

impl DispatchStatsAggregator {
    /// Create a new aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Update aggregate statistics
    pub fn update(&mut self, record: &DispatchRecord) {
        match record.kind() {
            MessageKind::Request => {
                self.total_requests += 1;
                self.request_latency.record(record.latency_ms);
            }
            MessageKind::Notification => {
                self.total_notifications += 1;
                self.publish_latency.record(record.latency_ms);
            }
        }

        self.handlers_invoked += record.handlers_invoked as u64;
        self.handler_failures += record.failures as u64;
        if record.outcome == DispatchOutcome::ResolutionFailed {
            self.resolution_failures += 1;
        }

        *self
            .per_message
            .entry(record.key.type_name().to_string())
            .or_insert(0) += 1;
    }

    /// Build a summary report
    pub fn summary(&self) -> MetricsSummary {
        let total = self.total_requests + self.total_notifications;
        MetricsSummary {
            total_requests: self.total_requests,
            total_notifications: self.total_notifications,
            handlers_invoked: self.handlers_invoked,
            handler_failures: self.handler_failures,
            resolution_failures: self.resolution_failures,
            failure_rate: if self.handlers_invoked > 0 {
                self.handler_failures as f64 / self.handlers_invoked as f64 * 100.0
            } else {
                0.0
            },
            resolution_failure_rate: if total > 0 {
                self.resolution_failures as f64 / total as f64 * 100.0
            } else {
                0.0
            },
            request_latency_ms: self.request_latency.summary(),
            publish_latency_ms: self.publish_latency.summary(),
            per_message: self.per_message.clone(),
        }
    }

}

/// Metrics summary
#[derive(Debug, Clone, Default)]
pub struct MetricsSummary {
    pub total_requests: u64,
    pub total_notifications: u64,
    pub handlers_invoked: u64,
    pub handler_failures: u64,
    pub resolution_failures: u64,
    pub failure_rate: f64,
    pub resolution_failure_rate: f64,
    pub request_latency_ms: LatencySummary,
    pub publish_latency_ms: LatencySummary,
    pub per_message: HashMap<String, u64>,
}

impl std::fmt::Display for MetricsSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Metrics Summary ===")?;
        writeln!(f, "Requests sent: {}", self.total_requests)?;
        writeln!(f, "Notifications published: {}", self.total_notifications)?;
        writeln!(f, "Handlers invoked: {}", self.handlers_invoked)?;
        writeln!(
            f,
            "Handler failures: {} ({:.2}%)",
            self.handler_failures, self.failure_rate
        )?;
        writeln!(
            f,
            "Resolution failures: {} ({:.2}%)",
            self.resolution_failures, self.resolution_failure_rate
        )?;
        writeln!(f, "Request latency (ms): {}", self.request_latency_ms)?;
        writeln!(f, "Publish latency (ms): {}", self.publish_latency_ms)?;

        if !self.per_message.is_empty() {
            writeln!(f, "Dispatches per message:")?;
            let mut entries: Vec<_> = self.per_message.iter().collect();
            entries.sort();
            for (message, count) in entries {
                writeln!(f, "  {}: {}", message, count)?;
            }
        }

        Ok(())
    }
}

/// Latency summary for one message kind
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LatencySummary {
    pub count: u64,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl std::fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 0 {
            return write!(f, "N/A");
        }
        write!(
            f,
            "n={} mean={:.3} std={:.3} [{:.3}..{:.3}]",
            self.count, self.mean, self.std_dev, self.min, self.max
        )
    }
}

/// Streaming latency statistics (Welford update, no samples retained)
#[derive(Debug, Clone, Default)]
pub struct LatencyStats {
    count: u64,
    mean: f64,
    m2: f64,
    range: Option<(f64, f64)>,
}

impl LatencyStats {
    /// Record one latency sample in milliseconds
    pub fn record(&mut self, latency_ms: f64) {
        self.count += 1;
        let delta = latency_ms - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (latency_ms - self.mean);

        self.range = Some(match self.range {
            None => (latency_ms, latency_ms),
            Some((lo, hi)) => (lo.min(latency_ms), hi.max(latency_ms)),
        });
    }

    /// Samples recorded
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Sample variance (0 below two samples)
    pub fn variance(&self) -> f64 {
        match self.count {
            0 | 1 => 0.0,
            n => self.m2 / (n - 1) as f64,
        }
    }

    pub fn summary(&self) -> LatencySummary {
        let (min, max) = self.range.unwrap_or_default();
        LatencySummary {
            count: self.count,
            min,
            max,
            mean: self.mean,
            std_dev: self.variance().sqrt(),
        }
    }
}

impl Extend<f64> for LatencyStats {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, samples: I) {
        for sample in samples {
            self.record(sample);
        }
    }
}
