//! # Registry
//!
//! Host-side handler stores implementing [`contracts::Resolver`].
//!
//! Provides:
//! - [`HandlerRegistry`] - type-keyed table preserving registration order
//! - [`FnResolver`] - adapts a pair of host lookup functions
//!
//! # Example
//!
//! ```
//! use contracts::{notification_fn, Notification};
//! use registry::HandlerRegistry;
//!
//! struct TaskAdded;
//! impl Notification for TaskAdded {}
//!
//! let registry = HandlerRegistry::new();
//! registry
//!     .register_notification::<TaskAdded, _>(notification_fn(|_: &TaskAdded| Ok(())))
//!     .register_notification::<TaskAdded, _>(notification_fn(|_: &TaskAdded| Ok(())));
//!
//! assert_eq!(registry.notification_handler_count::<TaskAdded>(), 2);
//! ```

mod erased;
mod fn_resolver;
mod handler_registry;

pub use erased::{erase_notification_handler, erase_request_handler, ErasedHandler};
pub use fn_resolver::{FnResolver, ResolveManyFn, ResolveOneFn};
pub use handler_registry::HandlerRegistry;
