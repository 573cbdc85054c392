//! Dispatcher - routes requests and notifications through the resolver

use std::any::type_name;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use contracts::{
    DispatchConfig, DispatchObserver, DispatchOutcome, DispatchRecord, HandlerKey, Mediator,
    MediatorConfig, MediatorError, Notification, PublishStrategy, Request, Resolver,
};
use observability::record_dispatch_metrics;

use crate::metrics::{DispatchMetrics, MetricsSnapshot};
use crate::publish::fan_out;

/// Dispatcher configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Default failure policy for `publish`
    pub publish_strategy: PublishStrategy,
}

impl From<&DispatchConfig> for DispatcherConfig {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            publish_strategy: config.publish_strategy,
        }
    }
}

/// Builder for creating a Dispatcher
pub struct DispatcherBuilder<Res> {
    resolver: Res,
    config: DispatcherConfig,
    observer: Option<DispatchObserver>,
}

impl<Res: Resolver> DispatcherBuilder<Res> {
    /// Create a new DispatcherBuilder around a host resolver
    pub fn new(resolver: Res) -> Self {
        Self {
            resolver,
            config: DispatcherConfig::default(),
            observer: None,
        }
    }

    /// Replace the whole configuration
    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the default publish strategy
    pub fn publish_strategy(mut self, strategy: PublishStrategy) -> Self {
        self.config.publish_strategy = strategy;
        self
    }

    /// Receive a [`DispatchRecord`] after every dispatch
    pub fn on_dispatch(mut self, observer: DispatchObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Build the dispatcher
    pub fn build(self) -> Dispatcher<Res> {
        debug!(
            publish_strategy = %self.config.publish_strategy,
            observer = self.observer.is_some(),
            "Dispatcher built"
        );
        Dispatcher {
            resolver: self.resolver,
            config: self.config,
            observer: self.observer,
            metrics: Arc::new(DispatchMetrics::new()),
        }
    }
}

/// The mediator core: resolves handlers per call and invokes them
///
/// Holds no handler state between calls; every dispatch re-runs resolution,
/// so changes in the host's registry are visible on the next call.
pub struct Dispatcher<Res> {
    resolver: Res,
    config: DispatcherConfig,
    observer: Option<DispatchObserver>,
    metrics: Arc<DispatchMetrics>,
}

impl<Res: Resolver> Dispatcher<Res> {
    /// Create a dispatcher with the default configuration
    pub fn new(resolver: Res) -> Self {
        DispatcherBuilder::new(resolver).build()
    }

    /// Start building a dispatcher
    pub fn builder(resolver: Res) -> DispatcherBuilder<Res> {
        DispatcherBuilder::new(resolver)
    }

    /// Default publish strategy
    pub fn publish_strategy(&self) -> PublishStrategy {
        self.config.publish_strategy
    }

    /// Get dispatcher counters
    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Route a request to its single handler and return the response
    ///
    /// # Errors
    /// - [`MediatorError::Resolution`]: the resolver's error, unchanged; no handler ran
    /// - [`MediatorError::Handler`]: the handler's own failure
    #[instrument(name = "dispatcher_send", skip_all, fields(message = type_name::<R>()))]
    pub async fn send<R: Request>(&self, request: R) -> Result<R::Response, MediatorError> {
        let key = HandlerKey::request::<R>();
        let started = Instant::now();

        let handler = match self.resolver.resolve_one::<R>(&key) {
            Ok(handler) => handler,
            Err(e) => {
                debug!(key = %key, error = %e, "Request resolution failed");
                self.finish(DispatchRecord {
                    key,
                    handlers_resolved: 0,
                    handlers_invoked: 0,
                    failures: 0,
                    outcome: DispatchOutcome::ResolutionFailed,
                    latency_ms: elapsed_ms(started),
                });
                return Err(e.into());
            }
        };

        let result = handler.handle(&request).await;

        self.finish(DispatchRecord {
            key,
            handlers_resolved: 1,
            handlers_invoked: 1,
            failures: usize::from(result.is_err()),
            outcome: if result.is_ok() {
                DispatchOutcome::Completed
            } else {
                DispatchOutcome::HandlerFailed
            },
            latency_ms: elapsed_ms(started),
        });

        result.map_err(|e| {
            warn!(key = %key, error = %e, "Request handler failed");
            MediatorError::handler(key, 0, e)
        })
    }

    /// Fan a notification out using the configured strategy
    ///
    /// # Errors
    /// See [`publish_with`](Self::publish_with)
    pub async fn publish<N: Notification>(&self, notification: &N) -> Result<(), MediatorError> {
        self.publish_with(notification, self.config.publish_strategy)
            .await
    }

    /// Fan a notification out to every resolved handler using `strategy`
    ///
    /// Handlers run in the order the resolver returns them. Zero handlers is
    /// a successful no-op.
    ///
    /// # Errors
    /// - [`MediatorError::Resolution`]: the resolver's error, unchanged; no handler ran
    /// - [`MediatorError::Handler`]: first failure under [`PublishStrategy::FailFast`]
    /// - [`MediatorError::Aggregate`]: all failures under the collecting strategies
    #[instrument(
        name = "dispatcher_publish",
        skip_all,
        fields(message = type_name::<N>(), strategy = %strategy)
    )]
    pub async fn publish_with<N: Notification>(
        &self,
        notification: &N,
        strategy: PublishStrategy,
    ) -> Result<(), MediatorError> {
        let key = HandlerKey::notification::<N>();
        let started = Instant::now();

        let handlers = match self.resolver.resolve_many::<N>(&key) {
            Ok(handlers) => handlers,
            Err(e) => {
                debug!(key = %key, error = %e, "Notification resolution failed");
                self.finish(DispatchRecord {
                    key,
                    handlers_resolved: 0,
                    handlers_invoked: 0,
                    failures: 0,
                    outcome: DispatchOutcome::ResolutionFailed,
                    latency_ms: elapsed_ms(started),
                });
                return Err(e.into());
            }
        };

        debug!(key = %key, handlers = handlers.len(), "Publishing notification");

        let report = fan_out(&key, &handlers, notification, strategy).await;

        self.finish(DispatchRecord {
            key,
            handlers_resolved: handlers.len(),
            handlers_invoked: report.invoked,
            failures: report.failures.len(),
            outcome: if report.failures.is_empty() {
                DispatchOutcome::Completed
            } else {
                DispatchOutcome::HandlerFailed
            },
            latency_ms: elapsed_ms(started),
        });

        report.into_result(key, handlers.len(), strategy)
    }

    fn finish(&self, record: DispatchRecord) {
        self.metrics.record(&record);
        record_dispatch_metrics(&record);
        if let Some(observer) = &self.observer {
            observer(&record);
        }
    }
}

impl<Res: Resolver> Mediator for Dispatcher<Res> {
    async fn send<R: Request>(&self, request: R) -> Result<R::Response, MediatorError> {
        Dispatcher::send(self, request).await
    }

    async fn publish<N: Notification>(&self, notification: &N) -> Result<(), MediatorError> {
        Dispatcher::publish(self, notification).await
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

/// Convenience function to create a dispatcher from the loaded configuration
#[instrument(name = "dispatcher_create", skip_all)]
pub fn create_dispatcher<Res: Resolver>(resolver: Res, config: &MediatorConfig) -> Dispatcher<Res> {
    DispatcherBuilder::new(resolver)
        .config(DispatcherConfig::from(&config.dispatch))
        .build()
}
