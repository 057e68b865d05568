//! Process-wide container registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::Container;
use crate::config::ContainerConfig;

// The one process-wide registry, created on first access.
static GLOBAL_REGISTRY: Lazy<ContainerRegistry> = Lazy::new(|| {
    let config = ContainerConfig::from_env();
    tracing::debug!(max_depth = config.max_depth, "global container registry initialised");
    ContainerRegistry::with_config(config)
});

/// Identifier of a container within a [`ContainerRegistry`].
///
/// `Default` is reserved and never equal to a named identifier, including
/// one spelled `"default"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContainerId {
    Default,
    Named(Arc<str>),
}

impl ContainerId {
    pub fn named(name: impl Into<Arc<str>>) -> Self {
        ContainerId::Named(name.into())
    }

    pub fn is_default(&self) -> bool {
        matches!(self, ContainerId::Default)
    }
}

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerId::Default => f.write_str("<default>"),
            ContainerId::Named(name) => f.write_str(name),
        }
    }
}

impl From<&str> for ContainerId {
    fn from(name: &str) -> Self {
        ContainerId::named(name)
    }
}

impl From<String> for ContainerId {
    fn from(name: String) -> Self {
        ContainerId::named(name)
    }
}

impl From<Option<&str>> for ContainerId {
    fn from(name: Option<&str>) -> Self {
        name.map_or(ContainerId::Default, ContainerId::named)
    }
}

/// Mapping from container identifier to container.
///
/// Containers are created lazily on the first [`of`](Self::of) call for
/// their identifier and are never removed. The process-wide instance behind
/// [`Container::of`] is [`ContainerRegistry::global`]; separate registries can
/// be created for tests or embedding.
///
/// # Examples
///
/// ```
/// use keystone_di::{ContainerId, ContainerRegistry};
/// use std::sync::Arc;
///
/// let registry = ContainerRegistry::new();
/// let default = registry.of(ContainerId::Default);
/// let named = registry.of("plugins");
///
/// assert!(Arc::ptr_eq(&default, &registry.of(None::<&str>)));
/// assert!(!Arc::ptr_eq(&default, &named));
/// assert_eq!(registry.len(), 2);
/// ```
pub struct ContainerRegistry {
    config: ContainerConfig,
    containers: RwLock<HashMap<ContainerId, Arc<Container>>>,
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    /// Registry whose containers are all created with `config`.
    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            config,
            containers: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide registry. Its containers use
    /// [`ContainerConfig::from_env`] read at first access.
    pub fn global() -> &'static ContainerRegistry {
        &GLOBAL_REGISTRY
    }

    /// Returns the container for `id`, creating it on first call.
    pub fn of(&self, id: impl Into<ContainerId>) -> Arc<Container> {
        let id = id.into();
        if let Some(existing) = self.containers.read().get(&id) {
            return Arc::clone(existing);
        }

        let mut containers = self.containers.write();
        // Re-check: another caller may have created it between the locks.
        let container = containers
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Container::with_config(id, self.config.clone())));
        Arc::clone(container)
    }

    /// Returns the container for `id` only if it already exists.
    pub fn get(&self, id: &ContainerId) -> Option<Arc<Container>> {
        self.containers.read().get(id).cloned()
    }

    /// Identifiers of all containers created so far, sorted.
    pub fn ids(&self) -> Vec<ContainerId> {
        let mut ids: Vec<ContainerId> = self.containers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.containers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.containers.read().is_empty()
    }
}

impl Default for ContainerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("containers", &self.ids())
            .finish()
    }
}
