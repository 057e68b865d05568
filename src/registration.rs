//! Binding types and the per-container registry.

use std::any::Any;
use std::sync::Arc;

use crate::container::Dependencies;
use crate::error::{DiError, DiResult};
use crate::internal::FastMap;
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::traits::Injectable;

// Type-erased instance: always an `Arc<T>` boxed behind `Arc<dyn Any>`, so
// concrete types and trait objects share one representation.
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

pub(crate) type ErasedCtor = Arc<dyn Fn(&mut Dependencies) -> DiResult<AnyArc> + Send + Sync>;

pub(crate) fn erase<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> AnyArc {
    Arc::new(value)
}

pub(crate) fn downcast<T: ?Sized + Send + Sync + 'static>(key: &Key, instance: &AnyArc) -> DiResult<Arc<T>> {
    instance
        .downcast_ref::<Arc<T>>()
        .cloned()
        .ok_or_else(|| DiError::TypeMismatch {
            token: key.clone(),
            expected: std::any::type_name::<T>(),
        })
}

/// How a token's instances are built.
///
/// An implementation carries its own ordered dependency list next to the
/// constructor, so the list cannot be lost by wrapping the constructor later.
///
/// # Examples
///
/// ```
/// use keystone_di::{Container, Implementation, Key, Token};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {
///     fn greet(&self) -> String;
/// }
///
/// struct English { name: Arc<String> }
/// impl Greeter for English {
///     fn greet(&self) -> String {
///         format!("Hello, {}", self.name)
///     }
/// }
///
/// let name = Token::<String>::new("name");
/// let greeter = Token::<dyn Greeter>::new("greeter");
///
/// let container = Container::new();
/// container
///     .register_singleton_as(&name, Implementation::factory([], |_| Ok(Arc::new("Ada".to_string()))))
///     .unwrap();
/// container
///     .register_transient_as(
///         &greeter,
///         Implementation::factory([Key::from(&name)], |deps| {
///             Ok(Arc::new(English { name: deps.next()? }) as Arc<dyn Greeter>)
///         }),
///     )
///     .unwrap();
///
/// assert_eq!(container.resolve(&greeter).unwrap().greet(), "Hello, Ada");
/// ```
pub struct Implementation<T: ?Sized> {
    name: &'static str,
    dependencies: Vec<Key>,
    ctor: Arc<dyn Fn(&mut Dependencies) -> DiResult<Arc<T>> + Send + Sync>,
}

impl<T: ?Sized + Send + Sync + 'static> Implementation<T> {
    /// Constructor closure with an explicit, ordered dependency list.
    pub fn factory<D, F>(dependencies: D, factory: F) -> Self
    where
        D: IntoIterator<Item = Key>,
        F: Fn(&mut Dependencies) -> DiResult<Arc<T>> + Send + Sync + 'static,
    {
        Self {
            name: std::any::type_name::<T>(),
            dependencies: dependencies.into_iter().collect(),
            ctor: Arc::new(factory),
        }
    }

    /// An [`Injectable`] type bound under a token of another shape, usually a
    /// trait object. `cast` performs the unsizing coercion.
    pub fn injectable_as<I: Injectable>(cast: fn(Arc<I>) -> Arc<T>) -> Self {
        Self {
            name: std::any::type_name::<I>(),
            dependencies: I::dependencies(),
            ctor: Arc::new(move |deps: &mut Dependencies| I::construct(deps).map(|value| cast(Arc::new(value)))),
        }
    }

    /// Declared dependency keys, in order.
    pub fn dependencies(&self) -> &[Key] {
        &self.dependencies
    }

    /// Type name of the implementation, for diagnostics.
    pub fn name(&self) -> &'static str {
        self.name
    }

    fn into_erased(self) -> (&'static str, Vec<Key>, ErasedCtor) {
        let ctor = self.ctor;
        let erased: ErasedCtor = Arc::new(move |deps: &mut Dependencies| ctor(deps).map(erase));
        (self.name, self.dependencies, erased)
    }
}

impl<I: Injectable> Implementation<I> {
    /// The type's own constructor and dependency list.
    pub fn injectable() -> Self {
        Self {
            name: std::any::type_name::<I>(),
            dependencies: I::dependencies(),
            ctor: Arc::new(|deps: &mut Dependencies| I::construct(deps).map(Arc::new)),
        }
    }
}

/// Options accepted by [`Container::register`](crate::Container::register).
///
/// ```
/// use keystone_di::{Lifetime, RegistrationOptions};
///
/// assert_eq!(RegistrationOptions::singleton().lifetime(), Lifetime::Singleton);
/// assert_eq!(RegistrationOptions::default().lifetime(), Lifetime::Transient);
/// assert_eq!(
///     RegistrationOptions::with_lifetime(Lifetime::Singleton).describe("shared pool").lifetime(),
///     Lifetime::Singleton
/// );
/// ```
#[derive(Debug, Clone)]
pub struct RegistrationOptions {
    pub(crate) lifetime: Lifetime,
    pub(crate) description: Option<String>,
}

impl RegistrationOptions {
    /// One shared instance per container.
    pub fn singleton() -> Self {
        Self::with_lifetime(Lifetime::Singleton)
    }

    /// A fresh instance on every resolution.
    pub fn transient() -> Self {
        Self::with_lifetime(Lifetime::Transient)
    }

    /// Options for `lifetime` with no description.
    pub fn with_lifetime(lifetime: Lifetime) -> Self {
        Self {
            lifetime,
            description: None,
        }
    }

    /// Free-form description surfaced through descriptors.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The lifetime the binding will be registered with.
    pub fn lifetime(&self) -> Lifetime {
        self.lifetime
    }
}

impl Default for RegistrationOptions {
    fn default() -> Self {
        Self::transient()
    }
}

/// Immutable binding: token, implementation, lifetime and dependency list
pub(crate) struct Binding {
    pub(crate) key: Key,
    pub(crate) lifetime: Lifetime,
    pub(crate) dependencies: Vec<Key>,
    pub(crate) implementation: &'static str,
    pub(crate) description: Option<String>,
    pub(crate) ctor: ErasedCtor,
}

impl Binding {
    pub(crate) fn new<T: ?Sized + Send + Sync + 'static>(
        key: Key,
        implementation: Implementation<T>,
        options: RegistrationOptions,
    ) -> Self {
        let (name, dependencies, ctor) = implementation.into_erased();
        Self {
            key,
            lifetime: options.lifetime,
            dependencies,
            implementation: name,
            description: options.description,
            ctor,
        }
    }
}

/// Binding registry holding all registrations of one container
///
/// Keeps registration order for deterministic snapshots and validation.
#[derive(Default)]
pub(crate) struct Registry {
    bindings: Vec<Arc<Binding>>,
    index: FastMap<Key, usize>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `binding`; the first binding for a key always wins.
    pub(crate) fn register(&mut self, binding: Binding) -> DiResult<()> {
        if self.index.contains_key(&binding.key) {
            return Err(DiError::DuplicateBinding(binding.key));
        }
        self.index.insert(binding.key.clone(), self.bindings.len());
        self.bindings.push(Arc::new(binding));
        Ok(())
    }

    #[inline]
    pub(crate) fn lookup(&self, key: &Key) -> Option<Arc<Binding>> {
        self.index.get(key).map(|&pos| Arc::clone(&self.bindings[pos]))
    }

    /// Registration index of `key`.
    pub(crate) fn position(&self, key: &Key) -> Option<usize> {
        self.index.get(key).copied()
    }

    #[inline]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.index.contains_key(key)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Arc<Binding>> {
        self.bindings.iter()
    }

    pub(crate) fn len(&self) -> usize {
        self.bindings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn binding(key: Key, lifetime: Lifetime) -> Binding {
        Binding::new(
            key,
            Implementation::factory([], |_| Ok(Arc::new(0u8))),
            RegistrationOptions::with_lifetime(lifetime),
        )
    }

    #[test]
    fn duplicate_keeps_first_binding() {
        let mut registry = Registry::new();
        registry.register(binding(Key::of::<u8>(), Lifetime::Singleton)).unwrap();

        let err = registry.register(binding(Key::of::<u8>(), Lifetime::Transient)).unwrap_err();
        assert!(matches!(err, DiError::DuplicateBinding(ref k) if *k == Key::of::<u8>()));
        assert_eq!(registry.lookup(&Key::of::<u8>()).unwrap().lifetime, Lifetime::Singleton);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn iterates_in_registration_order() {
        let mut registry = Registry::new();
        registry.register(binding(Key::of::<u16>(), Lifetime::Transient)).unwrap();
        registry.register(binding(Key::of::<u8>(), Lifetime::Transient)).unwrap();

        let keys: Vec<Key> = registry.iter().map(|b| b.key.clone()).collect();
        assert_eq!(keys, vec![Key::of::<u16>(), Key::of::<u8>()]);
        assert!(registry.contains_key(&Key::of::<u8>()));
        assert!(!registry.contains_key(&Key::of::<u32>()));
    }

    #[test]
    fn erased_instances_round_trip_trait_objects() {
        trait Named: Send + Sync {
            fn name(&self) -> &str;
        }
        struct Impl;
        impl Named for Impl {
            fn name(&self) -> &str {
                "impl"
            }
        }

        let instance = erase(Arc::new(Impl) as Arc<dyn Named>);
        let key = Key::of::<dyn Named>();
        assert_eq!(downcast::<dyn Named>(&key, &instance).unwrap().name(), "impl");
        assert!(downcast::<Impl>(&key, &instance).is_err());
    }
}
