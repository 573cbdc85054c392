//! HandlerKey - Type-derived dispatch key
//!
//! Combines the message kind with the message's `TypeId`, so identical
//! message types always produce identical keys.

use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::{MessageKind, Notification, Request};

/// Dispatch key derived from (message kind, message type).
///
/// Equality and hashing use only the kind and the `TypeId`; the type name is
/// carried for logs and error messages.
///
/// # Examples
/// ```
/// use contracts::{HandlerKey, MessageKind, Notification};
///
/// struct TaskAdded;
/// impl Notification for TaskAdded {}
///
/// let key = HandlerKey::notification::<TaskAdded>();
/// assert_eq!(key, HandlerKey::notification::<TaskAdded>());
/// assert_eq!(key.kind(), MessageKind::Notification);
/// ```
#[derive(Clone, Copy)]
pub struct HandlerKey {
    kind: MessageKind,
    type_id: TypeId,
    type_name: &'static str,
}

impl HandlerKey {
    /// Key of the single-handler slot for request type `R`.
    #[inline]
    pub fn request<R: Request>() -> Self {
        Self {
            kind: MessageKind::Request,
            type_id: TypeId::of::<R>(),
            type_name: type_name::<R>(),
        }
    }

    /// Key of the multi-handler slot for notification type `N`.
    #[inline]
    pub fn notification<N: Notification>() -> Self {
        Self {
            kind: MessageKind::Notification,
            type_id: TypeId::of::<N>(),
            type_name: type_name::<N>(),
        }
    }

    /// Message kind
    #[inline]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// `TypeId` of the message
    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// Fully qualified type name of the message
    #[inline]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Type name without the module path (used as metric label)
    pub fn short_name(&self) -> &'static str {
        let name = self.type_name;
        // Generic arguments may contain `::`, so only look before the first `<`.
        let head_end = name.find('<').unwrap_or(name.len());
        match name[..head_end].rfind("::") {
            Some(pos) => &name[pos + 2..],
            None => name,
        }
    }
}

impl PartialEq for HandlerKey {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind && self.type_id == other.type_id
    }
}

impl Eq for HandlerKey {}

impl Hash for HandlerKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
        self.type_id.hash(state);
    }
}

impl fmt::Debug for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HandlerKey({}:{})", self.kind, self.type_name)
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.type_name)
    }
}
