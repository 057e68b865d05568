//! Dependency descriptor and constructor for types used as their own token.

use crate::container::Dependencies;
use crate::error::DiResult;
use crate::key::Key;

/// A type that knows its own dependencies and how to build itself.
///
/// This is the descriptor the container consumes at registration time:
/// [`dependencies`](Self::dependencies) returns the ordered dependency list and
/// [`construct`](Self::construct) receives the resolved instances in that same
/// order. Both are captured into the binding when the type is registered.
///
/// # Examples
///
/// ```
/// use keystone_di::{Dependencies, DiResult, Injectable, Key};
/// use std::sync::Arc;
///
/// struct Database;
/// impl Injectable for Database {
///     fn construct(_: &mut Dependencies) -> DiResult<Self> {
///         Ok(Database)
///     }
/// }
///
/// struct Repository {
///     db: Arc<Database>,
/// }
///
/// impl Injectable for Repository {
///     fn dependencies() -> Vec<Key> {
///         vec![Key::of::<Database>()]
///     }
///
///     fn construct(deps: &mut Dependencies) -> DiResult<Self> {
///         Ok(Repository { db: deps.next()? })
///     }
/// }
/// ```
pub trait Injectable: Sized + Send + Sync + 'static {
    /// Ordered dependency keys; empty by default.
    fn dependencies() -> Vec<Key> {
        Vec::new()
    }

    /// Builds an instance from its resolved dependencies.
    fn construct(deps: &mut Dependencies) -> DiResult<Self>;
}
