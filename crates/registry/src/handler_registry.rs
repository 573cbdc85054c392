//! HandlerRegistry - in-memory handler table keyed by `HandlerKey`
//!
//! Registration appends, so the stored sequence keeps insertion order and
//! duplicates. Resolution clones the `Arc`s out under a read lock, so a
//! registration made while a publish is running is seen by the next dispatch.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use contracts::{
    HandlerKey, Notification, NotificationHandler, Request, RequestHandler, ResolutionError,
    Resolver,
};
use tracing::debug;

use crate::erased::{
    downcast_notification_handler, downcast_request_handler, erase_notification_handler,
    erase_request_handler, ErasedHandler,
};

/// Registry mapping handler keys to ordered handler instances.
#[derive(Default)]
pub struct HandlerRegistry {
    /// Handlers by key, in registration order
    handlers: RwLock<HashMap<HandlerKey, Vec<ErasedHandler>>>,
}

impl HandlerRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request handler.
    ///
    /// Registering a second handler for the same request type makes
    /// resolution fail with [`ResolutionError::Ambiguous`].
    pub fn register_request<R, H>(&self, handler: H) -> &Self
    where
        R: Request,
        H: RequestHandler<R> + 'static,
    {
        let handler: Arc<dyn RequestHandler<R>> = Arc::new(handler);
        self.insert(HandlerKey::request::<R>(), erase_request_handler(handler))
    }

    /// Register a notification handler.
    ///
    /// Each call adds one entry; registering the same instance twice
    /// (e.g. two clones of one `Arc`) makes it run twice per publish.
    pub fn register_notification<N, H>(&self, handler: H) -> &Self
    where
        N: Notification,
        H: NotificationHandler<N> + 'static,
    {
        let handler: Arc<dyn NotificationHandler<N>> = Arc::new(handler);
        self.insert(
            HandlerKey::notification::<N>(),
            erase_notification_handler(handler),
        )
    }

    /// Register a pre-erased handler under an explicit key.
    pub fn register_erased(&self, key: HandlerKey, handler: ErasedHandler) -> &Self {
        self.insert(key, handler)
    }

    /// Number of handlers registered under a key
    pub fn handler_count(&self, key: &HandlerKey) -> usize {
        self.read().get(key).map_or(0, Vec::len)
    }

    /// Number of handlers registered for request type `R`
    pub fn request_handler_count<R: Request>(&self) -> usize {
        self.handler_count(&HandlerKey::request::<R>())
    }

    /// Number of handlers registered for notification type `N`
    pub fn notification_handler_count<N: Notification>(&self) -> usize {
        self.handler_count(&HandlerKey::notification::<N>())
    }

    /// Remove every handler under a key, returning how many were removed
    pub fn remove(&self, key: &HandlerKey) -> usize {
        let removed = self.write().remove(key).map_or(0, |entries| entries.len());
        debug!(key = %key, removed, "Handlers removed");
        removed
    }

    /// Remove all handlers
    pub fn clear(&self) {
        self.write().clear();
    }

    /// All keys with at least one handler
    pub fn keys(&self) -> Vec<HandlerKey> {
        self.read().keys().copied().collect()
    }

    /// Number of registered keys
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether nothing is registered
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn insert(&self, key: HandlerKey, handler: ErasedHandler) -> &Self {
        let mut handlers = self.write();
        let entries = handlers.entry(key).or_default();
        entries.push(handler);
        debug!(key = %key, count = entries.len(), "Handler registered");
        self
    }

    // Entries are only ever appended or removed whole, so a poisoned lock
    // still guards a consistent table.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<HandlerKey, Vec<ErasedHandler>>> {
        self.handlers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<HandlerKey, Vec<ErasedHandler>>> {
        self.handlers.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Resolver for HandlerRegistry {
    fn resolve_one<R: Request>(
        &self,
        key: &HandlerKey,
    ) -> Result<Arc<dyn RequestHandler<R>>, ResolutionError> {
        let handlers = self.read();
        match handlers.get(key).map(Vec::as_slice) {
            None | Some([]) => Err(ResolutionError::NotRegistered { key: *key }),
            Some([single]) => downcast_request_handler::<R>(key, single),
            Some(many) => Err(ResolutionError::Ambiguous {
                key: *key,
                count: many.len(),
            }),
        }
    }

    fn resolve_many<N: Notification>(
        &self,
        key: &HandlerKey,
    ) -> Result<Vec<Arc<dyn NotificationHandler<N>>>, ResolutionError> {
        let handlers = self.read();
        match handlers.get(key) {
            Some(entries) => entries
                .iter()
                .map(|entry| downcast_notification_handler::<N>(key, entry))
                .collect(),
            None => Ok(Vec::new()),
        }
    }
}
