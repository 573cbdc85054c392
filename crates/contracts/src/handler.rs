//! Handler traits - the single `handle` capability
//!
//! Handlers are object safe so a resolver can hand out `Arc<dyn ...>`
//! instances of heterogeneous concrete types under one key.
//!
//! # Example
//!
//! ```
//! use contracts::{notification_fn, request_fn, Notification, Request};
//!
//! struct TaskAdded { name: String }
//! impl Notification for TaskAdded {}
//!
//! struct GetTaskCount;
//! impl Request for GetTaskCount { type Response = usize; }
//!
//! let on_added = notification_fn(|event: &TaskAdded| {
//!     println!("added {}", event.name);
//!     Ok(())
//! });
//! let count = request_fn(|_: &GetTaskCount| Ok(3));
//! ```

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::Arc;

use crate::{HandlerError, Notification, Request};

/// Boxed future for handler results.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Result type for handler functions.
pub type HandlerResult<T = ()> = Result<T, HandlerError>;

/// Handles exactly one request type and produces its response.
pub trait RequestHandler<R: Request>: Send + Sync {
    /// Handle a request.
    fn handle<'a>(&'a self, request: &'a R) -> BoxFuture<'a, HandlerResult<R::Response>>;
}

/// Handles exactly one notification type.
pub trait NotificationHandler<N: Notification>: Send + Sync {
    /// Handle a notification.
    fn handle<'a>(&'a self, notification: &'a N) -> BoxFuture<'a, HandlerResult>;
}

impl<R: Request, H: RequestHandler<R> + ?Sized> RequestHandler<R> for Arc<H> {
    fn handle<'a>(&'a self, request: &'a R) -> BoxFuture<'a, HandlerResult<R::Response>> {
        (**self).handle(request)
    }
}

impl<N: Notification, H: NotificationHandler<N> + ?Sized> NotificationHandler<N> for Arc<H> {
    fn handle<'a>(&'a self, notification: &'a N) -> BoxFuture<'a, HandlerResult> {
        (**self).handle(notification)
    }
}

/// Request handler backed by a synchronous closure.
pub struct FnRequestHandler<F, R> {
    handler: F,
    _phantom: PhantomData<fn(&R)>,
}

impl<F, R> RequestHandler<R> for FnRequestHandler<F, R>
where
    R: Request,
    F: Fn(&R) -> HandlerResult<R::Response> + Send + Sync,
{
    fn handle<'a>(&'a self, request: &'a R) -> BoxFuture<'a, HandlerResult<R::Response>> {
        let result = (self.handler)(request);
        Box::pin(async move { result })
    }
}

/// Notification handler backed by a synchronous closure.
pub struct FnNotificationHandler<F, N> {
    handler: F,
    _phantom: PhantomData<fn(&N)>,
}

impl<F, N> NotificationHandler<N> for FnNotificationHandler<F, N>
where
    N: Notification,
    F: Fn(&N) -> HandlerResult + Send + Sync,
{
    fn handle<'a>(&'a self, notification: &'a N) -> BoxFuture<'a, HandlerResult> {
        let result = (self.handler)(notification);
        Box::pin(async move { result })
    }
}

/// Request handler backed by an async closure over an owned copy of the request.
pub struct AsyncFnRequestHandler<F, R, Fut> {
    handler: F,
    _phantom: PhantomData<fn(R) -> Fut>,
}

impl<F, R, Fut> RequestHandler<R> for AsyncFnRequestHandler<F, R, Fut>
where
    R: Request + Clone,
    F: Fn(R) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult<R::Response>> + Send + 'static,
{
    fn handle<'a>(&'a self, request: &'a R) -> BoxFuture<'a, HandlerResult<R::Response>> {
        Box::pin((self.handler)(request.clone()))
    }
}

/// Notification handler backed by an async closure over an owned copy of the notification.
pub struct AsyncFnNotificationHandler<F, N, Fut> {
    handler: F,
    _phantom: PhantomData<fn(N) -> Fut>,
}

impl<F, N, Fut> NotificationHandler<N> for AsyncFnNotificationHandler<F, N, Fut>
where
    N: Notification + Clone,
    F: Fn(N) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    fn handle<'a>(&'a self, notification: &'a N) -> BoxFuture<'a, HandlerResult> {
        Box::pin((self.handler)(notification.clone()))
    }
}

/// Wrap a synchronous closure as a request handler.
pub fn request_fn<R, F>(handler: F) -> FnRequestHandler<F, R>
where
    R: Request,
    F: Fn(&R) -> HandlerResult<R::Response> + Send + Sync,
{
    FnRequestHandler {
        handler,
        _phantom: PhantomData,
    }
}

/// Wrap a synchronous closure as a notification handler.
pub fn notification_fn<N, F>(handler: F) -> FnNotificationHandler<F, N>
where
    N: Notification,
    F: Fn(&N) -> HandlerResult + Send + Sync,
{
    FnNotificationHandler {
        handler,
        _phantom: PhantomData,
    }
}

/// Wrap an async closure as a request handler.
///
/// The closure receives a clone of the request, so the returned future can be `'static`.
pub fn async_request_fn<R, F, Fut>(handler: F) -> AsyncFnRequestHandler<F, R, Fut>
where
    R: Request + Clone,
    F: Fn(R) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult<R::Response>> + Send + 'static,
{
    AsyncFnRequestHandler {
        handler,
        _phantom: PhantomData,
    }
}

/// Wrap an async closure as a notification handler.
pub fn async_notification_fn<N, F, Fut>(handler: F) -> AsyncFnNotificationHandler<F, N, Fut>
where
    N: Notification + Clone,
    F: Fn(N) -> Fut + Send + Sync,
    Fut: Future<Output = HandlerResult> + Send + 'static,
{
    AsyncFnNotificationHandler {
        handler,
        _phantom: PhantomData,
    }
}
