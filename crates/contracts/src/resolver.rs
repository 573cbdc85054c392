//! Resolver trait - host-provided handler lookup
//!
//! The only boundary between the dispatcher and the host. Registration,
//! construction and storage of handlers all live behind it.

use std::sync::Arc;

use crate::{HandlerKey, Notification, NotificationHandler, Request, RequestHandler, ResolutionError};

/// Handler lookup capability pair
///
/// # Contract
///
/// - `resolve_one` returns exactly one instance. Cardinality checks are the
///   implementation's responsibility; the dispatcher relays whatever error it
///   returns.
/// - `resolve_many` returns every registered instance in registration order,
///   duplicates included, and an empty vector when nothing is registered.
/// - Both are called on every dispatch; implementations must not expect
///   the dispatcher to cache results.
pub trait Resolver: Send + Sync {
    /// Resolve the single handler for request type `R`
    fn resolve_one<R: Request>(
        &self,
        key: &HandlerKey,
    ) -> Result<Arc<dyn RequestHandler<R>>, ResolutionError>;

    /// Resolve all handlers for notification type `N`
    fn resolve_many<N: Notification>(
        &self,
        key: &HandlerKey,
    ) -> Result<Vec<Arc<dyn NotificationHandler<N>>>, ResolutionError>;
}

impl<T: Resolver> Resolver for Arc<T> {
    fn resolve_one<R: Request>(
        &self,
        key: &HandlerKey,
    ) -> Result<Arc<dyn RequestHandler<R>>, ResolutionError> {
        (**self).resolve_one::<R>(key)
    }

    fn resolve_many<N: Notification>(
        &self,
        key: &HandlerKey,
    ) -> Result<Vec<Arc<dyn NotificationHandler<N>>>, ResolutionError> {
        (**self).resolve_many::<N>(key)
    }
}
