//! Mediator trait - caller-facing dispatch interface
//!
//! Application code depends on this trait instead of a concrete dispatcher.

use crate::{MediatorError, Notification, Request};

/// Dispatch interface
///
/// All mediator implementations must implement this trait.
#[trait_variant::make(Mediator: Send)]
pub trait LocalMediator {
    /// Route a request to its single handler and return the response
    ///
    /// # Errors
    /// Resolution failures are relayed unchanged; handler failures carry the key
    async fn send<R: Request>(&self, request: R) -> Result<R::Response, MediatorError>;

    /// Fan a notification out to every registered handler
    ///
    /// # Errors
    /// Resolution or handler failure, per the configured publish strategy
    async fn publish<N: Notification>(&self, notification: &N) -> Result<(), MediatorError>;
}
