//! Typed identity tokens.

use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::key::Key;

static NEXT_SYMBOL: AtomicU64 = AtomicU64::new(1);

/// Typed registration and lookup key.
///
/// A token pairs an identity ([`Key`]) with a compile-time-only marker for the
/// shape of the value it resolves to. The marker never takes part in equality:
/// two tokens are equal iff they carry the same identity.
///
/// Tokens come in two flavours:
///
/// - `Token::<T>::of()` uses the type `T` itself as the identity. Every call
///   returns an equal token, so a type can be registered and resolved without
///   passing tokens around. `T` may be a trait object (`dyn Logger`).
/// - `Token::<T>::new(label)` creates a fresh symbolic identity. The label is a
///   debug aid only; two symbols with the same label are different tokens.
///
/// # Examples
///
/// ```rust
/// use keystone_di::Token;
///
/// trait Clock: Send + Sync {}
///
/// let a = Token::<dyn Clock>::new("clock");
/// let b = Token::<dyn Clock>::new("clock");
/// assert_ne!(a, b);
/// assert_eq!(a, a.clone());
///
/// assert_eq!(Token::<dyn Clock>::of(), Token::<dyn Clock>::of());
/// ```
pub struct Token<T: ?Sized> {
    key: Key,
    _shape: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + 'static> Token<T> {
    /// Creates a globally unique symbolic token.
    pub fn new(label: impl Into<Arc<str>>) -> Self {
        let serial = NEXT_SYMBOL.fetch_add(1, Ordering::Relaxed);
        Self::from_key(Key::Symbol(serial, label.into()))
    }

    /// Canonical token for the type `T` used as its own identity.
    pub fn of() -> Self {
        Self::from_key(Key::of::<T>())
    }

    /// The erased identity of this token.
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// Debug label: the symbol label or the type name.
    pub fn name(&self) -> &str {
        self.key.display_name()
    }

    fn from_key(key: Key) -> Self {
        Self {
            key,
            _shape: PhantomData,
        }
    }
}

impl<T: ?Sized> Clone for Token<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _shape: PhantomData,
        }
    }
}

impl<T: ?Sized> PartialEq for Token<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T: ?Sized> Eq for Token<T> {}

impl<T: ?Sized> std::hash::Hash for Token<T> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Token").field(&self.key).finish()
    }
}

impl<T: ?Sized> fmt::Display for Token<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.key, f)
    }
}

impl<T: ?Sized> From<&Token<T>> for Key {
    fn from(token: &Token<T>) -> Self {
        token.key.clone()
    }
}

impl<T: ?Sized> From<Token<T>> for Key {
    fn from(token: Token<T>) -> Self {
        token.key
    }
}

/// Creates a fresh, globally unique token. `name` is a debug label only.
pub fn create_token<T: ?Sized + 'static>(name: impl Into<Arc<str>>) -> Token<T> {
    Token::new(name)
}

/// Returns the canonical token for a type used directly as a token.
pub fn create_dependency_token<T: ?Sized + 'static>() -> Token<T> {
    Token::of()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[test]
    fn same_label_distinct_identity() {
        let a = create_token::<Widget>("widget");
        let b = create_token::<Widget>("widget");
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }

    #[test]
    fn type_token_is_canonical() {
        assert_eq!(create_dependency_token::<Widget>(), Token::<Widget>::of());
        assert_ne!(Token::<Widget>::of().key(), Token::<Widget>::new("Widget").key());
    }

    #[test]
    fn converts_into_key() {
        let token = Token::<Widget>::new("w");
        let key: Key = (&token).into();
        assert_eq!(&key, token.key());
        assert!(key.is_symbol());
    }
}
