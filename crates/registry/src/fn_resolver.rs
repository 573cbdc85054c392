//! FnResolver - resolver built from a pair of host lookup functions
//!
//! Lets a host plug an existing service locator in without implementing
//! [`Resolver`] itself. The functions return type-erased entries produced by
//! [`erase_request_handler`](crate::erase_request_handler) /
//! [`erase_notification_handler`](crate::erase_notification_handler).

use std::sync::Arc;

use contracts::{
    HandlerKey, Notification, NotificationHandler, Request, RequestHandler, ResolutionError,
    Resolver,
};

use crate::erased::{downcast_notification_handler, downcast_request_handler, ErasedHandler};

/// Single-instance lookup
pub type ResolveOneFn =
    Box<dyn Fn(&HandlerKey) -> Result<ErasedHandler, ResolutionError> + Send + Sync>;

/// Multi-instance lookup
pub type ResolveManyFn =
    Box<dyn Fn(&HandlerKey) -> Result<Vec<ErasedHandler>, ResolutionError> + Send + Sync>;

/// Resolver delegating to two host functions.
pub struct FnResolver {
    resolve_one: ResolveOneFn,
    resolve_many: ResolveManyFn,
}

impl FnResolver {
    /// Create a resolver from the single and multi lookup functions.
    pub fn new<One, Many>(resolve_one: One, resolve_many: Many) -> Self
    where
        One: Fn(&HandlerKey) -> Result<ErasedHandler, ResolutionError> + Send + Sync + 'static,
        Many: Fn(&HandlerKey) -> Result<Vec<ErasedHandler>, ResolutionError>
            + Send
            + Sync
            + 'static,
    {
        Self {
            resolve_one: Box::new(resolve_one),
            resolve_many: Box::new(resolve_many),
        }
    }
}

impl Resolver for FnResolver {
    fn resolve_one<R: Request>(
        &self,
        key: &HandlerKey,
    ) -> Result<Arc<dyn RequestHandler<R>>, ResolutionError> {
        let erased = (self.resolve_one)(key)?;
        downcast_request_handler::<R>(key, &erased)
    }

    fn resolve_many<N: Notification>(
        &self,
        key: &HandlerKey,
    ) -> Result<Vec<Arc<dyn NotificationHandler<N>>>, ResolutionError> {
        (self.resolve_many)(key)?
            .iter()
            .map(|erased| downcast_notification_handler::<N>(key, erased))
            .collect()
    }
}
