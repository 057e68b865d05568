//! Eager validation of a container's bindings.
//!
//! Runtime resolution only discovers problems on the paths it actually walks.
//! Validation walks every binding up front, without constructing anything, so
//! configuration errors surface at startup instead of on first use.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::captivity::ensure_not_captive;
use crate::error::DiError;
use crate::key::Key;
use crate::registration::{Binding, Registry};

/// Result of [`Container::validate`](crate::Container::validate).
///
/// # Validation Rules
///
/// - **Unregistered dependency**: a declared dependency has no binding
///   (`DiError::Unregistered` naming the dependency and the binding that declared it)
/// - **Captive dependency**: a singleton directly depends on a transient
///   (`DiError::Captive`); like the runtime check, only direct edges count
/// - **Circular dependency**: a binding reaches itself (`DiError::Circular`);
///   each cycle is reported once
/// - **Depth**: a dependency chain holds more bindings than the container's
///   `max_depth` (`DiError::DepthExceeded`); reported once, for the first
///   binding in registration order that heads such a chain
///
/// Errors are grouped by the binding they concern, in registration order.
/// Within one binding, edge errors come first, then a cycle that starts at
/// the binding, then the depth error.
///
/// # Examples
///
/// ```
/// use keystone_di::{Container, DiError, Implementation, Key, Token};
/// use std::sync::Arc;
///
/// let clock = Token::<u64>::new("clock");
/// let cache = Token::<String>::new("cache");
///
/// let container = Container::new();
/// container.register_transient_as(&clock, Implementation::factory([], |_| Ok(Arc::new(0u64)))).unwrap();
/// container
///     .register_singleton_as(&cache, Implementation::factory([Key::from(&clock)], |_| Ok(Arc::new(String::new()))))
///     .unwrap();
///
/// let report = container.validate();
/// assert!(!report.is_valid());
/// assert!(matches!(report.errors[0], DiError::Captive { .. }));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ValidationReport {
    /// Problems found, grouped by binding in registration order
    pub errors: Vec<DiError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Converts into `Ok(())` or the full list of problems.
    pub fn into_result(self) -> Result<(), Vec<DiError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub(crate) fn validate(registry: &Registry, max_depth: usize) -> ValidationReport {
    // One bucket per binding, indexed by registration position
    let mut buckets: Vec<Vec<DiError>> = registry.iter().map(|_| Vec::new()).collect();

    for (pos, binding) in registry.iter().enumerate() {
        for dependency in &binding.dependencies {
            match registry.lookup(dependency) {
                None => buckets[pos].push(DiError::Unregistered {
                    token: dependency.clone(),
                    required_by: Some(binding.key.clone()),
                }),
                Some(child) => {
                    if let Err(err) = ensure_not_captive(binding, dependency, child.lifetime) {
                        buckets[pos].push(err);
                    }
                }
            }
        }
    }

    let mut walker = GraphWalker::new(registry);
    let mut depth_reported = false;
    for (pos, binding) in registry.iter().enumerate() {
        for cycle in walker.walk(binding) {
            let owner = registry.position(&cycle[0]).unwrap_or(pos);
            buckets[owner].push(DiError::Circular(cycle));
        }
        if !depth_reported && walker.height(&binding.key) > max_depth {
            buckets[pos].push(DiError::DepthExceeded(max_depth));
            depth_reported = true;
        }
    }

    ValidationReport {
        errors: buckets.into_iter().flatten().collect(),
    }
}

#[derive(Clone, Copy)]
enum Mark {
    OnPath,
    // Longest chain of bindings starting here, this one included
    Done(usize),
}

struct Frame {
    binding: Arc<Binding>,
    next: usize,
    height: usize,
}

/// Depth-first walk over the binding graph with an explicit work stack.
struct GraphWalker<'a> {
    registry: &'a Registry,
    marks: HashMap<Key, Mark>,
    // Cycles already reported, keyed by their member set
    reported: HashSet<Vec<Key>>,
}

impl<'a> GraphWalker<'a> {
    fn new(registry: &'a Registry) -> Self {
        Self {
            registry,
            marks: HashMap::new(),
            reported: HashSet::new(),
        }
    }

    /// Longest chain below `key`; 0 for keys never walked or unregistered.
    fn height(&self, key: &Key) -> usize {
        match self.marks.get(key) {
            Some(Mark::Done(height)) => *height,
            _ => 0,
        }
    }

    /// Walks everything reachable from `root` not walked before and returns
    /// the new cycles found, each running from its first key back to itself.
    fn walk(&mut self, root: &Arc<Binding>) -> Vec<Vec<Key>> {
        let mut cycles = Vec::new();
        if self.marks.contains_key(&root.key) {
            return cycles;
        }

        let mut path: Vec<Key> = vec![root.key.clone()];
        let mut stack = vec![Frame {
            binding: Arc::clone(root),
            next: 0,
            height: 1,
        }];
        self.marks.insert(root.key.clone(), Mark::OnPath);

        while let Some(frame) = stack.last_mut() {
            let Some(dependency) = frame.binding.dependencies.get(frame.next).cloned() else {
                let Some(done) = stack.pop() else { break };
                path.pop();
                self.marks.insert(done.binding.key.clone(), Mark::Done(done.height));
                if let Some(parent) = stack.last_mut() {
                    parent.height = parent.height.max(done.height + 1);
                }
                continue;
            };
            frame.next += 1;

            match self.marks.get(&dependency).copied() {
                Some(Mark::Done(height)) => frame.height = frame.height.max(height + 1),
                Some(Mark::OnPath) => {
                    if let Some(start) = path.iter().position(|k| *k == dependency) {
                        let mut cycle = path[start..].to_vec();
                        let mut members = cycle.clone();
                        members.sort();
                        if self.reported.insert(members) {
                            cycle.push(dependency);
                            cycles.push(cycle);
                        }
                    }
                }
                None => {
                    if let Some(child) = self.registry.lookup(&dependency) {
                        self.marks.insert(dependency.clone(), Mark::OnPath);
                        path.push(dependency);
                        stack.push(Frame {
                            binding: child,
                            next: 0,
                            height: 1,
                        });
                    }
                }
            }
        }

        cycles
    }
}
