//! # Contracts
//!
//! Frozen interface contracts for the mediator, shared by every crate in the workspace.
//! Business crates depend only on this crate, reverse dependencies are prohibited.
//!
//! ## Dispatch Model
//! - A message is either a [`Request`] (exactly one handler, typed response)
//!   or a [`Notification`] (zero or more handlers, no response)
//! - Handlers are looked up by [`HandlerKey`] through a host-provided [`Resolver`]
//! - The dispatcher never owns handler instances

mod config;
mod error;
mod handler;
mod handler_key;
mod mediator;
mod message;
mod record;
mod resolver;

pub use config::*;
pub use error::*;
pub use handler::*;
pub use handler_key::HandlerKey;
pub use mediator::{LocalMediator, Mediator};
pub use message::*;
pub use record::*;
pub use resolver::Resolver;
