//! # Dispatcher
//!
//! The mediator core.
//!
//! Responsibilities:
//! - Derive the `HandlerKey` of each message
//! - `send`: resolve exactly one handler and return its response
//! - `publish`: resolve every handler and fan out in registration order
//! - Relay resolver and handler failures without masking them
//!
//! The dispatcher holds no handler state: every call goes through the resolver.

pub mod dispatcher;
pub mod metrics;
mod publish;

pub use contracts::{Mediator, MediatorError, PublishStrategy, Resolver};
pub use dispatcher::{create_dispatcher, Dispatcher, DispatcherBuilder, DispatcherConfig};
pub use metrics::{DispatchMetrics, MetricsSnapshot};
