//! Binding lifetime definitions.

use std::fmt;

/// Binding lifetimes controlling instance caching behavior
///
/// # Examples
///
/// ```rust
/// use keystone_di::{Container, Dependencies, DiResult, Injectable, Lifetime};
///
/// struct Clock;
/// impl Injectable for Clock {
///     fn construct(_: &mut Dependencies) -> DiResult<Self> {
///         Ok(Clock)
///     }
/// }
///
/// struct Request;
/// impl Injectable for Request {
///     fn construct(_: &mut Dependencies) -> DiResult<Self> {
///         Ok(Request)
///     }
/// }
///
/// let container = Container::new();
/// container.register_singleton::<Clock>().unwrap();
/// container.register_transient::<Request>().unwrap();
///
/// // Singleton: same instance on every resolution
/// let c1 = container.get::<Clock>().unwrap();
/// let c2 = container.get::<Clock>().unwrap();
/// assert!(std::sync::Arc::ptr_eq(&c1, &c2));
///
/// // Transient: fresh instance on every resolution
/// let r1 = container.get::<Request>().unwrap();
/// let r2 = container.get::<Request>().unwrap();
/// assert!(!std::sync::Arc::ptr_eq(&r1, &r2));
///
/// assert_eq!(container.registered_dependencies()[&keystone_di::Key::of::<Clock>()], Lifetime::Singleton);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "config", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "config", serde(rename_all = "lowercase"))]
pub enum Lifetime {
    /// One instance per container, created on first resolution and kept for
    /// the container's lifetime.
    Singleton,
    /// New instance per resolution, never cached.
    Transient,
}

impl Lifetime {
    /// Whether a binding with this lifetime may hold a direct dependency with
    /// lifetime `child` without capturing it.
    ///
    /// Only `Singleton -> Transient` is rejected.
    pub fn may_depend_on(self, child: Lifetime) -> bool {
        !matches!((self, child), (Lifetime::Singleton, Lifetime::Transient))
    }
}

impl fmt::Display for Lifetime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifetime::Singleton => f.write_str("singleton"),
            Lifetime::Transient => f.write_str("transient"),
        }
    }
}
