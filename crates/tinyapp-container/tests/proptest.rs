use std::cell::Cell;
use std::collections::HashSet;
use std::rc::Rc;

use proptest::prelude::*;
use tinyapp_container::{Container, ContainerError};

proptest! {
    #[test]
    fn unregistered_keys_are_not_found(
        registered in prop::collection::hash_set("[a-z]{1,6}", 0..8),
        lookup in "[a-z]{1,6}",
    ) {
        let c = Container::new();
        for key in &registered {
            c.set(key.clone(), key.len()).unwrap();
        }
        let result = c.get::<usize>(&lookup);
        if registered.contains(&lookup) {
            prop_assert_eq!(result.unwrap(), lookup.len());
        } else {
            prop_assert!(
                matches!(result, Err(ContainerError::KeyNotFound(ref k)) if *k == lookup),
                "expected KeyNotFound"
            );
        }
    }

    #[test]
    fn factories_run_at_most_once(keys in prop::collection::vec("[a-z]{1,4}", 1..10)) {
        let c = Container::new();
        let calls = Rc::new(Cell::new(0usize));
        let unique: HashSet<&String> = keys.iter().collect();

        for key in &unique {
            let counter = calls.clone();
            let value = (*key).clone();
            c.set_factory((*key).clone(), move |_| {
                counter.set(counter.get() + 1);
                Ok(Rc::new(value.clone()))
            })
            .unwrap();
        }

        // Resolve every key as many times as it appears in the input
        for key in &keys {
            let first = c.get::<Rc<String>>(key).unwrap();
            let second = c.get::<Rc<String>>(key).unwrap();
            prop_assert!(Rc::ptr_eq(&first, &second));
            prop_assert_eq!(first.as_str(), key.as_str());
        }

        prop_assert_eq!(calls.get(), unique.len());
    }

    #[test]
    fn second_set_always_fails(key in "[a-z]{1,8}", first in any::<i64>(), second in any::<i64>()) {
        let c = Container::new();
        c.set(key.clone(), first).unwrap();
        prop_assert!(matches!(c.set(key.clone(), second), Err(ContainerError::KeyAlreadySet(_))));
        prop_assert!(matches!(c.remove(&key), Err(ContainerError::KeyAlreadySet(_))));
        prop_assert_eq!(c.get::<i64>(&key).unwrap(), first);
    }
}
