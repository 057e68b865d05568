//! The container: one registry, one singleton cache, isolated from every other container.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, ReentrantMutex, RwLock};

use crate::config::ContainerConfig;
use crate::descriptors::BindingDescriptor;
use crate::error::DiResult;
use crate::internal::FastMap;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::observer::{Observers, ResolutionObserver};
use crate::registration::{downcast, AnyArc, Binding, Implementation, RegistrationOptions, Registry};
use crate::token::Token;
use crate::traits::Injectable;
use crate::validation::{self, ValidationReport};

mod dependencies;
mod global;
mod resolve;

pub use dependencies::Dependencies;
pub use global::{ContainerId, ContainerRegistry};

static NEXT_CONTAINER: AtomicU64 = AtomicU64::new(1);

/// Dependency injection container.
///
/// A container owns a registry of bindings keyed by [`Token`] and a cache of
/// constructed singletons. Containers never look into one another: a token
/// registered in one container cannot be resolved from another.
///
/// All methods take `&self`; containers are usually shared as
/// `Arc<Container>` through [`Container::of`].
///
/// # Thread Safety
///
/// Registration and resolution may happen from any thread. The first
/// construction of each singleton is serialized per container, so a singleton
/// binding produces exactly one instance even when several threads race to
/// resolve it. Cycle detection state is per thread.
///
/// # Examples
///
/// ```
/// use keystone_di::{Container, Dependencies, DiResult, Injectable, Key};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// impl Injectable for Database {
///     fn construct(_: &mut Dependencies) -> DiResult<Self> {
///         Ok(Database { url: "postgres://localhost".to_string() })
///     }
/// }
///
/// struct UserService { db: Arc<Database> }
/// impl Injectable for UserService {
///     fn dependencies() -> Vec<Key> {
///         vec![Key::of::<Database>()]
///     }
///     fn construct(deps: &mut Dependencies) -> DiResult<Self> {
///         Ok(UserService { db: deps.next()? })
///     }
/// }
///
/// let container = Container::new();
/// container
///     .register_singleton::<Database>().unwrap()
///     .register_transient::<UserService>().unwrap();
///
/// let service = container.get::<UserService>().unwrap();
/// assert_eq!(service.db.url, "postgres://localhost");
/// ```
pub struct Container {
    id: ContainerId,
    serial: u64,
    config: ContainerConfig,
    registry: RwLock<Registry>,
    singletons: Mutex<FastMap<Key, AnyArc>>,
    // Held while a singleton is first constructed; reentrant so that the
    // singleton's own dependency chain can build on the same thread.
    construction: ReentrantMutex<()>,
    observers: RwLock<Observers>,
}

impl Container {
    /// Creates a detached container that is not tracked by any
    /// [`ContainerRegistry`].
    pub fn new() -> Self {
        Self::with_config(ContainerId::Default, ContainerConfig::default())
    }

    /// Creates a detached container with an explicit identifier and configuration.
    pub fn with_config(id: impl Into<ContainerId>, config: ContainerConfig) -> Self {
        let id = id.into();
        let serial = NEXT_CONTAINER.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(container = %id, serial, max_depth = config.max_depth, "container created");
        Self {
            id,
            serial,
            config,
            registry: RwLock::new(Registry::new()),
            singletons: Mutex::new(FastMap::default()),
            construction: ReentrantMutex::new(()),
            observers: RwLock::new(Observers::new()),
        }
    }

    /// Returns the process-wide container for `id`, creating it on first use.
    ///
    /// Repeated calls with the same identifier return the same container.
    ///
    /// ```
    /// use keystone_di::Container;
    /// use std::sync::Arc;
    ///
    /// let a = Container::of("billing");
    /// assert!(Arc::ptr_eq(&a, &Container::of("billing")));
    /// assert!(!Arc::ptr_eq(&a, &Container::of("shipping")));
    /// ```
    pub fn of(id: impl Into<ContainerId>) -> Arc<Container> {
        ContainerRegistry::global().of(id)
    }

    /// Returns the process-wide default container.
    pub fn default_container() -> Arc<Container> {
        ContainerRegistry::global().of(ContainerId::Default)
    }

    pub fn id(&self) -> &ContainerId {
        &self.id
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    /// Attaches an observer to every subsequent resolution.
    pub fn add_observer(&self, observer: Arc<dyn ResolutionObserver>) -> &Self {
        self.observers.write().add(observer);
        self
    }

    // ----- Registration -----

    /// Registers `I` as a singleton under its own type token.
    pub fn register_singleton<I: Injectable>(&self) -> DiResult<&Self> {
        self.register(&Token::<I>::of(), Implementation::injectable(), RegistrationOptions::singleton())
    }

    /// Registers `I` as a transient under its own type token.
    pub fn register_transient<I: Injectable>(&self) -> DiResult<&Self> {
        self.register(&Token::<I>::of(), Implementation::injectable(), RegistrationOptions::transient())
    }

    /// Registers a singleton implementation under `token`.
    pub fn register_singleton_as<T>(&self, token: &Token<T>, implementation: Implementation<T>) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register(token, implementation, RegistrationOptions::singleton())
    }

    /// Registers a transient implementation under `token`.
    pub fn register_transient_as<T>(&self, token: &Token<T>, implementation: Implementation<T>) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.register(token, implementation, RegistrationOptions::transient())
    }

    /// Registers `implementation` under `token` with explicit options.
    ///
    /// Fails with [`DiError::DuplicateBinding`](crate::DiError::DuplicateBinding) if the token is already bound in
    /// this container; the existing binding is left untouched.
    pub fn register<T>(
        &self,
        token: &Token<T>,
        implementation: Implementation<T>,
        options: RegistrationOptions,
    ) -> DiResult<&Self>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let binding = Binding::new(token.key().clone(), implementation, options);
        let lifetime = binding.lifetime;
        let dependencies = binding.dependencies.len();

        if let Err(err) = self.registry.write().register(binding) {
            tracing::debug!(container = %self.id, token = %token, "duplicate registration rejected");
            return Err(err);
        }

        tracing::debug!(container = %self.id, token = %token, %lifetime, dependencies, "binding registered");
        Ok(self)
    }

    // ----- Resolution -----

    /// Resolves `token` to a fully constructed instance.
    ///
    /// Singletons are constructed once and cached; transients are constructed
    /// on every call. The first error aborts the call.
    pub fn resolve<T>(&self, token: &Token<T>) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let instance = self.resolve_key(token.key())?;
        downcast::<T>(token.key(), &instance)
    }

    /// Resolves the type `T` used as its own token.
    pub fn get<T>(&self) -> DiResult<Arc<T>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        self.resolve(&Token::<T>::of())
    }

    /// Like [`resolve`](Self::resolve), but an unregistered root yields `Ok(None)`.
    ///
    /// Failures further down the graph, including unregistered dependencies,
    /// are still errors.
    pub fn try_resolve<T>(&self, token: &Token<T>) -> DiResult<Option<Arc<T>>>
    where
        T: ?Sized + Send + Sync + 'static,
    {
        if !self.is_registered(token.key()) {
            return Ok(None);
        }
        self.resolve(token).map(Some)
    }

    // ----- Introspection -----

    /// Returns the canonical token for a type used directly as a token.
    pub fn create_dependency_token<T: ?Sized + 'static>(&self) -> Token<T> {
        Token::of()
    }

    pub fn is_registered(&self, key: &Key) -> bool {
        self.registry.read().contains_key(key)
    }

    /// Number of registered bindings.
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the singleton cache.
    ///
    /// The map is an owned copy: changing it has no effect on the container.
    pub fn resolved_singletons(&self) -> HashMap<Key, ResolvedInstance> {
        self.singletons
            .lock()
            .iter()
            .map(|(key, instance)| {
                (
                    key.clone(),
                    ResolvedInstance {
                        key: key.clone(),
                        instance: Arc::clone(instance),
                    },
                )
            })
            .collect()
    }

    /// Snapshot of registered tokens and their lifetimes.
    pub fn registered_dependencies(&self) -> HashMap<Key, Lifetime> {
        self.registry
            .read()
            .iter()
            .map(|binding| (binding.key.clone(), binding.lifetime))
            .collect()
    }

    /// Descriptors for every binding, in registration order.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry
            .read()
            .iter()
            .map(|binding| BindingDescriptor::of_binding(binding))
            .collect()
    }

    /// Checks every binding without constructing anything.
    ///
    /// Reports unregistered dependencies, captive edges, cycles and chains
    /// deeper than the configured `max_depth`; see
    /// [`ValidationReport`].
    pub fn validate(&self) -> ValidationReport {
        validation::validate(&self.registry.read(), self.config.max_depth)
    }

    /// Like [`validate`](Self::validate), returning the first problem as an error.
    pub fn validate_strict(&self) -> DiResult<()> {
        match self.validate().errors.into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    pub(crate) fn lookup(&self, key: &Key) -> Option<Arc<Binding>> {
        self.registry.read().lookup(key)
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("id", &self.id)
            .field("bindings", &self.len())
            .field("singletons", &self.singletons.lock().len())
            .finish()
    }
}

/// A cached singleton as returned by [`Container::resolved_singletons`].
#[derive(Clone)]
pub struct ResolvedInstance {
    key: Key,
    instance: AnyArc,
}

impl ResolvedInstance {
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The cached instance, if it has the shape `T`.
    pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        downcast::<T>(&self.key, &self.instance).ok()
    }
}

impl fmt::Debug for ResolvedInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResolvedInstance").field(&self.key).finish()
    }
}
