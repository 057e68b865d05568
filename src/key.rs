//! Erased lookup keys for the dependency injection container.

use std::any::TypeId;
use std::fmt;
use std::sync::Arc;

/// Key for binding storage and lookup.
///
/// A `Key` is the type-erased form of a [`Token`](crate::Token). Two keys are
/// equal iff they carry the same identity; the human readable label is only
/// kept for diagnostics and never takes part in comparison or hashing.
///
/// # Key Types
///
/// - **Type**: a type used directly as its own token (`Token::<T>::of()`)
/// - **Symbol**: an explicitly created token (`Token::<T>::new("label")`),
///   unique even when two symbols share a label
///
/// # Examples
///
/// ```rust
/// use keystone_di::{Key, Token};
///
/// struct Database;
///
/// let by_type = Key::of::<Database>();
/// assert_eq!(by_type, Token::<Database>::of().key().clone());
///
/// let a = Token::<Database>::new("primary");
/// let b = Token::<Database>::new("primary");
/// assert_ne!(a.key(), b.key());
/// assert_eq!(a.key().display_name(), "primary");
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Type identity with the type name for diagnostics.
    Type(TypeId, &'static str),
    /// Explicitly created symbolic identity: a process-unique serial and a debug label.
    Symbol(u64, Arc<str>),
}

impl Key {
    /// Key for a type used as its own token.
    #[inline]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
    }

    /// Get the type name or symbol label for display
    ///
    /// # Examples
    ///
    /// ```rust
    /// use keystone_di::Key;
    ///
    /// assert_eq!(Key::of::<String>().display_name(), "alloc::string::String");
    /// ```
    pub fn display_name(&self) -> &str {
        match self {
            Key::Type(_, name) => name,
            Key::Symbol(_, label) => label,
        }
    }

    /// Returns `true` for keys created with `Token::new`.
    pub fn is_symbol(&self) -> bool {
        matches!(self, Key::Symbol(..))
    }
}

// Identity-only equality: labels are diagnostics
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::Symbol(a, _), Key::Symbol(b, _)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Key {}

impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;

        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a.cmp(b),
            (Key::Symbol(a, _), Key::Symbol(b, _)) => a.cmp(b),
            (Key::Type(..), Key::Symbol(..)) => Ordering::Less,
            (Key::Symbol(..), Key::Type(..)) => Ordering::Greater,
        }
    }
}

impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::Symbol(serial, _) => {
                1u8.hash(state);
                serial.hash(state);
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Type(_, name) => f.write_str(name),
            Key::Symbol(serial, label) => write!(f, "{}#{}", label, serial),
        }
    }
}
