//! Resolved constructor arguments.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::registration::{downcast, AnyArc};
use crate::token::Token;

/// Resolved dependencies handed to a constructor.
///
/// Holds one instance per declared dependency, in declared order. Constructors
/// take them positionally with [`next`](Self::next), or by token with
/// [`get`](Self::get) when a dependency is needed out of order.
///
/// # Examples
///
/// ```
/// use keystone_di::{Container, Dependencies, DiResult, Injectable, Key};
/// use std::sync::Arc;
///
/// struct Config { port: u16 }
/// impl Injectable for Config {
///     fn construct(_: &mut Dependencies) -> DiResult<Self> {
///         Ok(Config { port: 8080 })
///     }
/// }
///
/// struct Server { config: Arc<Config> }
/// impl Injectable for Server {
///     fn dependencies() -> Vec<Key> {
///         vec![Key::of::<Config>()]
///     }
///     fn construct(deps: &mut Dependencies) -> DiResult<Self> {
///         Ok(Server { config: deps.next()? })
///     }
/// }
///
/// let container = Container::new();
/// container.register_singleton::<Config>().unwrap();
/// container.register_transient::<Server>().unwrap();
/// assert_eq!(container.get::<Server>().unwrap().config.port, 8080);
/// ```
pub struct Dependencies {
    owner: Key,
    resolved: Vec<(Key, AnyArc)>,
    cursor: usize,
}

impl Dependencies {
    pub(crate) fn new(owner: Key, resolved: Vec<(Key, AnyArc)>) -> Self {
        Self {
            owner,
            resolved,
            cursor: 0,
        }
    }

    /// The binding being constructed.
    pub fn owner(&self) -> &Key {
        &self.owner
    }

    /// Takes the next dependency in declared order.
    pub fn next<T: ?Sized + Send + Sync + 'static>(&mut self) -> DiResult<Arc<T>> {
        let (key, instance) = self.resolved.get(self.cursor).ok_or_else(|| DiError::ArgumentMismatch {
            owner: self.owner.clone(),
            detail: format!(
                "requested argument {} but only {} were declared",
                self.cursor + 1,
                self.resolved.len()
            ),
        })?;
        let value = downcast::<T>(key, instance)?;
        self.cursor += 1;
        Ok(value)
    }

    /// Looks up a declared dependency by token, independent of the cursor.
    pub fn get<T: ?Sized + Send + Sync + 'static>(&self, token: &Token<T>) -> DiResult<Arc<T>> {
        let (key, instance) = self
            .resolved
            .iter()
            .find(|(key, _)| key == token.key())
            .ok_or_else(|| DiError::ArgumentMismatch {
                owner: self.owner.clone(),
                detail: format!("{} was not declared as a dependency", token.name()),
            })?;
        downcast::<T>(key, instance)
    }

    /// Declared dependency keys, in order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.resolved.iter().map(|(key, _)| key)
    }

    /// Number of dependencies not yet taken with `next`.
    pub fn remaining(&self) -> usize {
        self.resolved.len() - self.cursor
    }

    pub fn len(&self) -> usize {
        self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolved.is_empty()
    }
}
