//! Notification fan-out strategies

use std::sync::Arc;

use contracts::{
    HandlerFailure, HandlerKey, MediatorError, Notification, NotificationHandler, PublishStrategy,
};
use futures_util::future::join_all;
use tracing::warn;

/// Result of running the resolved handlers for one publish
#[derive(Debug, Default)]
pub(crate) struct FanOutReport {
    /// Handlers started
    pub invoked: usize,
    /// Failed handlers, in registration order
    pub failures: Vec<HandlerFailure>,
}

impl FanOutReport {
    /// Convert into the caller-facing result
    pub fn into_result(
        mut self,
        key: HandlerKey,
        total: usize,
        strategy: PublishStrategy,
    ) -> Result<(), MediatorError> {
        if self.failures.is_empty() {
            return Ok(());
        }
        match strategy {
            PublishStrategy::FailFast => {
                let failure = self.failures.remove(0);
                Err(MediatorError::handler(key, failure.index, failure.error))
            }
            PublishStrategy::ContinueOnError | PublishStrategy::Parallel => {
                Err(MediatorError::Aggregate {
                    key,
                    total,
                    failures: self.failures,
                })
            }
        }
    }
}

/// Invoke every handler per the strategy
pub(crate) async fn fan_out<N: Notification>(
    key: &HandlerKey,
    handlers: &[Arc<dyn NotificationHandler<N>>],
    notification: &N,
    strategy: PublishStrategy,
) -> FanOutReport {
    match strategy {
        PublishStrategy::FailFast => sequential(key, handlers, notification, true).await,
        PublishStrategy::ContinueOnError => sequential(key, handlers, notification, false).await,
        PublishStrategy::Parallel => concurrent(key, handlers, notification).await,
    }
}

async fn sequential<N: Notification>(
    key: &HandlerKey,
    handlers: &[Arc<dyn NotificationHandler<N>>],
    notification: &N,
    stop_on_failure: bool,
) -> FanOutReport {
    let mut report = FanOutReport::default();

    for (index, handler) in handlers.iter().enumerate() {
        report.invoked += 1;
        if let Err(error) = handler.handle(notification).await {
            warn!(key = %key, index, error = %error, "Notification handler failed");
            report.failures.push(HandlerFailure { index, error });
            if stop_on_failure {
                break;
            }
        }
    }

    report
}

async fn concurrent<N: Notification>(
    key: &HandlerKey,
    handlers: &[Arc<dyn NotificationHandler<N>>],
    notification: &N,
) -> FanOutReport {
    let results = join_all(handlers.iter().map(|handler| handler.handle(notification))).await;

    let mut report = FanOutReport {
        invoked: results.len(),
        failures: Vec::new(),
    };
    for (index, result) in results.into_iter().enumerate() {
        if let Err(error) = result {
            warn!(key = %key, index, error = %error, "Notification handler failed");
            report.failures.push(HandlerFailure { index, error });
        }
    }

    report
}
