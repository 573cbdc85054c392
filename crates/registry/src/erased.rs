//! Type-erased handler entries
//!
//! Each entry is an `Arc<dyn Any>` wrapping `Arc<dyn RequestHandler<R>>` or
//! `Arc<dyn NotificationHandler<N>>`, recovered by downcast at resolution.

use std::any::Any;
use std::sync::Arc;

use contracts::{
    HandlerKey, Notification, NotificationHandler, Request, RequestHandler, ResolutionError,
};

/// Handler instance with its message type erased
pub type ErasedHandler = Arc<dyn Any + Send + Sync>;

/// Erase a request handler for storage in a heterogeneous table
pub fn erase_request_handler<R: Request>(handler: Arc<dyn RequestHandler<R>>) -> ErasedHandler {
    Arc::new(handler)
}

/// Erase a notification handler for storage in a heterogeneous table
pub fn erase_notification_handler<N: Notification>(
    handler: Arc<dyn NotificationHandler<N>>,
) -> ErasedHandler {
    Arc::new(handler)
}

pub(crate) fn downcast_request_handler<R: Request>(
    key: &HandlerKey,
    erased: &ErasedHandler,
) -> Result<Arc<dyn RequestHandler<R>>, ResolutionError> {
    erased
        .downcast_ref::<Arc<dyn RequestHandler<R>>>()
        .cloned()
        .ok_or(ResolutionError::TypeMismatch { key: *key })
}

pub(crate) fn downcast_notification_handler<N: Notification>(
    key: &HandlerKey,
    erased: &ErasedHandler,
) -> Result<Arc<dyn NotificationHandler<N>>, ResolutionError> {
    erased
        .downcast_ref::<Arc<dyn NotificationHandler<N>>>()
        .cloned()
        .ok_or(ResolutionError::TypeMismatch { key: *key })
}
