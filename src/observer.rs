//! Diagnostic observers for resolution events.
//!
//! Observers see every binding the resolver constructs: when construction
//! starts, when it finishes and how long it took, and when it fails. Cached
//! singleton hits are not reported.

use std::sync::Arc;
use std::time::Duration;

use crate::error::DiError;
use crate::key::Key;

/// Observer trait for dependency injection resolution events.
///
/// Observer calls are made synchronously on the resolving thread. Keep
/// implementations lightweight.
///
/// # Examples
///
/// ```
/// use keystone_di::{Container, DiError, Key, ResolutionObserver};
/// use std::sync::{Arc, Mutex};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct Recorder {
///     seen: Mutex<Vec<String>>,
/// }
///
/// impl ResolutionObserver for Recorder {
///     fn resolving(&self, key: &Key) {
///         self.seen.lock().unwrap().push(format!("start {}", key.display_name()));
///     }
///
///     fn resolved(&self, key: &Key, _duration: Duration) {
///         self.seen.lock().unwrap().push(format!("done {}", key.display_name()));
///     }
/// }
///
/// let container = Container::new();
/// let recorder = Arc::new(Recorder::default());
/// container.add_observer(recorder.clone());
/// ```
pub trait ResolutionObserver: Send + Sync {
    /// Called before a binding's dependencies are resolved.
    fn resolving(&self, key: &Key);

    /// Called after a binding was constructed.
    fn resolved(&self, key: &Key, duration: Duration);

    /// Called when constructing a binding failed. The error is still returned
    /// to the caller.
    fn failed(&self, key: &Key, error: &DiError) {
        let _ = (key, error);
    }
}

/// Container for registered observers.
///
/// Designed to have minimal overhead when no observers are registered.
#[derive(Default, Clone)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn ResolutionObserver>>,
}

impl Observers {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, observer: Arc<dyn ResolutionObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.observers.is_empty()
    }

    #[inline]
    pub(crate) fn resolving(&self, key: &Key) {
        for observer in &self.observers {
            observer.resolving(key);
        }
    }

    #[inline]
    pub(crate) fn resolved(&self, key: &Key, duration: Duration) {
        for observer in &self.observers {
            observer.resolved(key, duration);
        }
    }

    #[inline]
    pub(crate) fn failed(&self, key: &Key, error: &DiError) {
        for observer in &self.observers {
            observer.failed(key, error);
        }
    }
}

/// Built-in observer that forwards events to `tracing`.
///
/// Construction start and completion are emitted at `TRACE`, failures at
/// `DEBUG`, all under the `keystone_di::resolve` target.
///
/// ```
/// use keystone_di::{Container, TracingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(TracingObserver::new()));
/// ```
#[derive(Debug, Clone)]
pub struct TracingObserver {
    label: String,
}

impl TracingObserver {
    pub fn new() -> Self {
        Self {
            label: "keystone-di".to_string(),
        }
    }

    /// Observer whose events carry a custom `label` field.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self { label: label.into() }
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for TracingObserver {
    fn resolving(&self, key: &Key) {
        tracing::trace!(target: "keystone_di::resolve", label = %self.label, token = %key, "constructing");
    }

    fn resolved(&self, key: &Key, duration: Duration) {
        tracing::trace!(
            target: "keystone_di::resolve",
            label = %self.label,
            token = %key,
            elapsed_us = duration.as_micros() as u64,
            "constructed"
        );
    }

    fn failed(&self, key: &Key, error: &DiError) {
        tracing::debug!(target: "keystone_di::resolve", label = %self.label, token = %key, %error, "construction failed");
    }
}
