//! Captive dependency rule.

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;
use crate::registration::Binding;

/// Direct-edge captivity rule: a singleton must not hold a transient.
///
/// Only the edge between `parent` and its immediate dependency is checked.
/// A singleton reaching a transient through another singleton is reported at
/// that intermediate edge, when the intermediate binding is built.
pub(crate) fn ensure_not_captive(parent: &Binding, child: &Key, child_lifetime: Lifetime) -> DiResult<()> {
    if parent.lifetime.may_depend_on(child_lifetime) {
        return Ok(());
    }
    Err(DiError::Captive {
        parent: parent.key.clone(),
        parent_lifetime: parent.lifetime,
        child: child.clone(),
        child_lifetime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration::{Implementation, RegistrationOptions};
    use std::sync::Arc;

    fn parent(lifetime: Lifetime) -> Binding {
        Binding::new(
            Key::of::<u8>(),
            Implementation::factory([Key::of::<u16>()], |_| Ok(Arc::new(0u8))),
            RegistrationOptions::with_lifetime(lifetime),
        )
    }

    #[test]
    fn singleton_over_transient_reports_both_ends() {
        let err = ensure_not_captive(&parent(Lifetime::Singleton), &Key::of::<u16>(), Lifetime::Transient)
            .unwrap_err();
        match err {
            DiError::Captive {
                parent,
                parent_lifetime,
                child,
                child_lifetime,
            } => {
                assert_eq!(parent, Key::of::<u8>());
                assert_eq!(parent_lifetime, Lifetime::Singleton);
                assert_eq!(child, Key::of::<u16>());
                assert_eq!(child_lifetime, Lifetime::Transient);
            }
            other => panic!("expected Captive, got {other:?}"),
        }
    }

    #[test]
    fn other_pairs_pass() {
        assert!(ensure_not_captive(&parent(Lifetime::Transient), &Key::of::<u16>(), Lifetime::Singleton).is_ok());
        assert!(ensure_not_captive(&parent(Lifetime::Singleton), &Key::of::<u16>(), Lifetime::Singleton).is_ok());
        assert!(ensure_not_captive(&parent(Lifetime::Transient), &Key::of::<u16>(), Lifetime::Transient).is_ok());
    }
}
