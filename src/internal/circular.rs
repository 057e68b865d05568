//! Circular dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};
use crate::key::Key;

// Thread-local resolution state for circular dependency detection.
// Frames are tagged with the owning container so that nested resolutions
// against other containers never see each other's chains.
thread_local! {
    static RESOLUTION_TLS: RefCell<Vec<Frame>> = const { RefCell::new(Vec::new()) };
}

struct Frame {
    container: u64,
    key: Key,
}

/// Fails with `Circular` if `key` is already being constructed by `container`
/// on this thread. The reported path runs from the first occurrence of `key`
/// back to `key` itself.
pub(crate) fn ensure_not_in_progress(container: u64, key: &Key) -> DiResult<()> {
    RESOLUTION_TLS.with(|tls| {
        let stack = tls.borrow();
        let mut chain = stack
            .iter()
            .filter(|frame| frame.container == container)
            .map(|frame| &frame.key)
            .skip_while(|k| *k != key)
            .cloned()
            .peekable();

        if chain.peek().is_none() {
            return Ok(());
        }
        let mut path: Vec<Key> = chain.collect();
        path.push(key.clone());
        Err(DiError::Circular(path))
    })
}

/// The binding currently under construction in `container` on this thread.
pub(crate) fn current(container: u64) -> Option<Key> {
    RESOLUTION_TLS.with(|tls| {
        tls.borrow()
            .iter()
            .rev()
            .find(|frame| frame.container == container)
            .map(|frame| frame.key.clone())
    })
}

/// Number of frames `container` has on this thread's stack.
pub(crate) fn depth(container: u64) -> usize {
    RESOLUTION_TLS.with(|tls| {
        tls.borrow()
            .iter()
            .filter(|frame| frame.container == container)
            .count()
    })
}

/// RAII frame on the thread-local resolution stack.
///
/// Popped on drop, so the stack unwinds whether construction succeeds,
/// returns an error or panics.
pub(crate) struct StackGuard {
    container: u64,
}

impl StackGuard {
    pub(crate) fn enter(container: u64, key: &Key, max_depth: usize) -> DiResult<Self> {
        ensure_not_in_progress(container, key)?;

        let depth = depth(container);
        if depth >= max_depth {
            return Err(DiError::DepthExceeded(depth));
        }

        RESOLUTION_TLS.with(|tls| {
            tls.borrow_mut().push(Frame {
                container,
                key: key.clone(),
            });
        });
        Ok(Self { container })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|frame| frame.container == self.container) {
                stack.remove(pos);
            }
        });
    }
}
