//! Depth-first graph construction.

use std::sync::Arc;
use std::time::Instant;

use super::{Container, Dependencies};
use crate::captivity::ensure_not_captive;
use crate::error::{DiError, DiResult};
use crate::internal::{circular, StackGuard};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::{AnyArc, Binding};

/// A constructed node together with the lifetime of the binding that produced it.
struct Resolved {
    instance: AnyArc,
    lifetime: Lifetime,
}

impl Container {
    /// Resolves `key` to its erased instance.
    ///
    /// Reuses the thread's in-progress resolution stack when called from inside
    /// a constructor running in this container.
    pub(crate) fn resolve_key(&self, key: &Key) -> DiResult<AnyArc> {
        let nested = circular::current(self.serial).is_some();
        match self.resolve_node(key) {
            Ok(resolved) => Ok(resolved.instance),
            Err(err) => {
                if !nested {
                    tracing::debug!(container = %self.id, token = %key, error = %err, "resolution failed");
                }
                Err(err)
            }
        }
    }

    fn resolve_node(&self, key: &Key) -> DiResult<Resolved> {
        circular::ensure_not_in_progress(self.serial, key)?;

        let binding = self.lookup(key).ok_or_else(|| DiError::Unregistered {
            token: key.clone(),
            required_by: circular::current(self.serial),
        })?;

        let instance = match binding.lifetime {
            Lifetime::Singleton => self.resolve_singleton(&binding)?,
            Lifetime::Transient => self.construct(&binding)?,
        };

        Ok(Resolved {
            instance,
            lifetime: binding.lifetime,
        })
    }

    fn resolve_singleton(&self, binding: &Binding) -> DiResult<AnyArc> {
        if let Some(cached) = self.cached(&binding.key) {
            return Ok(cached);
        }

        let _exclusive = self.construction.lock();
        // Another thread may have finished construction while we waited.
        if let Some(cached) = self.cached(&binding.key) {
            return Ok(cached);
        }

        let instance = self.construct(binding)?;
        self.singletons.lock().insert(binding.key.clone(), Arc::clone(&instance));
        Ok(instance)
    }

    fn cached(&self, key: &Key) -> Option<AnyArc> {
        let hit = self.singletons.lock().get(key).cloned();
        if hit.is_some() {
            tracing::trace!(container = %self.id, token = %key, "singleton cache hit");
        }
        hit
    }

    /// Builds a fresh instance of `binding`. Nothing is cached here.
    fn construct(&self, binding: &Binding) -> DiResult<AnyArc> {
        let observers = {
            let observers = self.observers.read();
            observers.has_observers().then(|| observers.clone())
        };
        let started = Instant::now();
        if let Some(observers) = &observers {
            observers.resolving(&binding.key);
        }

        let result = self.construct_unobserved(binding);

        if let Some(observers) = &observers {
            match &result {
                Ok(_) => observers.resolved(&binding.key, started.elapsed()),
                Err(err) => observers.failed(&binding.key, err),
            }
        }
        result
    }

    fn construct_unobserved(&self, binding: &Binding) -> DiResult<AnyArc> {
        let _frame = StackGuard::enter(self.serial, &binding.key, self.config.max_depth)?;

        let mut resolved = Vec::with_capacity(binding.dependencies.len());
        for dependency in &binding.dependencies {
            let child = self.resolve_node(dependency)?;
            resolved.push((dependency.clone(), child));
        }

        for (dependency, child) in &resolved {
            ensure_not_captive(binding, dependency, child.lifetime)?;
        }

        let arguments = resolved
            .into_iter()
            .map(|(key, child)| (key, child.instance))
            .collect();
        let mut deps = Dependencies::new(binding.key.clone(), arguments);
        (binding.ctor)(&mut deps)
    }
}
