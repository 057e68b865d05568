/// Property-based tests for resolution
///
/// These tests verify that resolution behavior follows expected patterns
/// regardless of the values, graph shapes or registration orders used.

use keystone_di::{Container, DiError, Implementation, Key, Token};
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// Property: a singleton token resolves to the same instance every time
proptest! {
    #[test]
    fn singleton_resolution_consistency(value in "\\PC{0,50}", resolutions in 2usize..10) {
        let token = Token::<String>::new("value");
        let container = Container::new();
        let stored = value.clone();
        container
            .register_singleton_as(&token, Implementation::factory([], move |_| Ok(Arc::new(stored.clone()))))
            .unwrap();

        let first = container.resolve(&token).unwrap();
        for _ in 1..resolutions {
            let again = container.resolve(&token).unwrap();
            prop_assert!(Arc::ptr_eq(&first, &again));
        }
        prop_assert_eq!(first.as_str(), value.as_str());
    }
}

// Property: a transient constructor runs once per resolution
proptest! {
    #[test]
    fn transient_runs_per_resolution(resolutions in 1usize..20) {
        let calls = Arc::new(AtomicUsize::new(0));
        let token = Token::<usize>::new("fresh");
        let container = Container::new();
        let counter = calls.clone();
        container
            .register_transient_as(
                &token,
                Implementation::factory([], move |_| Ok(Arc::new(counter.fetch_add(1, Ordering::SeqCst)))),
            )
            .unwrap();

        let values: Vec<usize> = (0..resolutions).map(|_| *container.resolve(&token).unwrap()).collect();
        prop_assert_eq!(calls.load(Ordering::SeqCst), resolutions);
        prop_assert_eq!(values, (0..resolutions).collect::<Vec<_>>());
    }
}

// Property: constructor arguments arrive in declared order, whatever the registration order
proptest! {
    #[test]
    fn arguments_follow_declared_order(
        labels in prop::collection::vec("[a-z]{1,4}", 1..8),
        order in any::<prop::sample::Index>(),
    ) {
        let tokens: Vec<Token<String>> = labels.iter().map(|label| Token::new(label.as_str())).collect();
        let root = Token::<String>::new("root");
        let container = Container::new();

        // Rotate the registration order of the leaves
        let shift = order.index(tokens.len());
        for i in 0..tokens.len() {
            let idx = (i + shift) % tokens.len();
            let label = labels[idx].clone();
            container
                .register_singleton_as(&tokens[idx], Implementation::factory([], move |_| Ok(Arc::new(label.clone()))))
                .unwrap();
        }

        let keys: Vec<Key> = tokens.iter().map(Key::from).collect();
        container
            .register_transient_as(
                &root,
                Implementation::factory(keys, |deps| {
                    let mut joined = String::new();
                    while deps.remaining() > 0 {
                        let part: Arc<String> = deps.next()?;
                        joined.push_str(&part);
                        joined.push(',');
                    }
                    Ok(Arc::new(joined))
                }),
            )
            .unwrap();

        let expected: String = labels.iter().map(|label| format!("{label},")).collect();
        let resolved = container.resolve(&root).unwrap();
        prop_assert_eq!(resolved.as_str(), expected.as_str());
    }
}

// Property: a ring of any length is reported with its full path
proptest! {
    #[test]
    fn ring_reports_full_path(len in 1usize..12, entry in any::<prop::sample::Index>()) {
        let tokens: Vec<Token<u8>> = (0..len).map(|i| Token::new(format!("node{i}"))).collect();
        let container = Container::new();
        for i in 0..len {
            let next = Key::from(&tokens[(i + 1) % len]);
            container
                .register_transient_as(&tokens[i], Implementation::factory([next], |_| Ok(Arc::new(0u8))))
                .unwrap();
        }

        let start = entry.index(len);
        let err = container.resolve(&tokens[start]).unwrap_err();
        let path = match err {
            DiError::Circular(path) => path,
            other => return Err(TestCaseError::fail(format!("unexpected error: {other}"))),
        };

        prop_assert_eq!(path.len(), len + 1);
        for (step, key) in path.iter().enumerate() {
            prop_assert_eq!(key, tokens[(start + step) % len].key());
        }
    }
}

// Property: registration reports success or DuplicateBinding depending only on prior state
proptest! {
    #[test]
    fn duplicate_registration_keeps_first(attempts in 1usize..6) {
        let token = Token::<usize>::new("once");
        let container = Container::new();
        for attempt in 0..attempts {
            let result = container.register_singleton_as(
                &token,
                Implementation::factory([], move |_| Ok(Arc::new(attempt))),
            );
            if attempt == 0 {
                prop_assert!(result.is_ok());
            } else {
                prop_assert!(matches!(result, Err(DiError::DuplicateBinding(_))));
            }
        }
        prop_assert_eq!(*container.resolve(&token).unwrap(), 0);
        prop_assert_eq!(container.len(), 1);
    }
}
