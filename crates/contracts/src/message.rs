//! Message kinds
//!
//! A concrete message type opts into one (or both) dispatch paths by
//! implementing [`Request`] or [`Notification`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Message expecting exactly one handler and a typed response.
///
/// # Example
///
/// ```
/// use contracts::Request;
///
/// struct GetTaskCount;
///
/// impl Request for GetTaskCount {
///     type Response = usize;
/// }
/// ```
pub trait Request: Send + Sync + 'static {
    /// Value produced by the single handler
    type Response: Send + 'static;
}

/// Message fanned out to zero or more handlers, with no response.
pub trait Notification: Send + Sync + 'static {}

/// Dispatch path of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Single handler, typed response
    Request,
    /// Fan-out, no response
    Notification,
}

impl MessageKind {
    /// Lower-case label used in keys, logs and metric labels
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Request => "request",
            Self::Notification => "notification",
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
