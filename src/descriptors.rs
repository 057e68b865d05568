//! Binding descriptors for introspection and diagnostics.

use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Binding;

/// Binding descriptor for introspection and diagnostics
///
/// A detached copy of what was registered for one token. Descriptors are
/// snapshots; holding one does not keep the container or its bindings alive.
///
/// # Examples
///
/// ```rust
/// use keystone_di::{Container, Dependencies, DiResult, Injectable, Key, Lifetime};
///
/// struct Database;
/// impl Injectable for Database {
///     fn construct(_: &mut Dependencies) -> DiResult<Self> { Ok(Database) }
/// }
///
/// struct Repository;
/// impl Injectable for Repository {
///     fn dependencies() -> Vec<Key> { vec![Key::of::<Database>()] }
///     fn construct(_: &mut Dependencies) -> DiResult<Self> { Ok(Repository) }
/// }
///
/// let container = Container::new();
/// container.register_singleton::<Database>().unwrap();
/// container.register_transient::<Repository>().unwrap();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let repo = descriptors.iter().find(|d| d.type_name().contains("Repository")).unwrap();
/// assert_eq!(repo.lifetime, Lifetime::Transient);
/// assert_eq!(repo.dependencies, vec![Key::of::<Database>()]);
/// ```
#[derive(Debug, Clone)]
pub struct BindingDescriptor {
    /// The token the binding is registered under
    pub key: Key,
    /// Binding lifetime
    pub lifetime: Lifetime,
    /// Declared dependencies, in constructor order
    pub dependencies: Vec<Key>,
    /// Implementation type name
    pub implementation: &'static str,
    /// Description from `RegistrationOptions::describe`
    pub description: Option<String>,
}

impl BindingDescriptor {
    /// Get the token's type name or symbol label
    pub fn type_name(&self) -> &str {
        self.key.display_name()
    }

    /// Check if the binding is keyed by a symbolic token
    pub fn is_symbolic(&self) -> bool {
        self.key.is_symbol()
    }

    pub(crate) fn of_binding(binding: &Binding) -> Self {
        Self {
            key: binding.key.clone(),
            lifetime: binding.lifetime,
            dependencies: binding.dependencies.clone(),
            implementation: binding.implementation,
            description: binding.description.clone(),
        }
    }
}
