//! The dependency container.

use std::any::{type_name, Any};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{ContainerError, ContainerResult};

/// A factory as stored in the container: type-erased, shared so it can be
/// invoked without holding the entry map borrowed.
type Factory = Rc<dyn Fn(&Container) -> anyhow::Result<Rc<dyn Any>>>;

/// Per-key state. A key that is absent from the map is unregistered.
enum Entry {
    /// Registered factory, not yet (successfully) invoked.
    ///
    /// `in_progress` is set only while the factory runs and is cleared again
    /// whether it succeeds or fails.
    Pending { factory: Factory, in_progress: bool },
    /// Produced value. Never replaced or removed.
    Resolved(Rc<dyn Any>),
}

/// Lazy, memoized, cycle-detecting key-value registry.
///
/// Each key holds either a pending factory or a resolved value. A factory runs
/// at most once successfully: the first [`get`](Self::get) invokes it with the
/// container itself (so it can resolve its own dependencies) and every later
/// call returns the stored result. Keys are write-once; once set, a key cannot
/// be set again, and once resolved it cannot be removed.
///
/// # Values and identity
///
/// [`get`](Self::get) clones the stored value out. Store an `Rc<T>` (or an
/// `Rc<dyn Trait>`) when callers must share one instance; every `get` then
/// hands out a pointer to the same allocation.
///
/// # Cycles
///
/// While a factory runs its key is marked in progress. If the factory's
/// dependency chain comes back to that key, resolution fails with
/// [`ContainerError::CircularDependency`] naming it, instead of recursing
/// forever.
///
/// # Single-Threaded Design
///
/// The container uses `Rc` and `RefCell` and is neither `Send` nor `Sync`.
/// A host that needs to share it across threads must put the whole container
/// behind one lock.
///
/// # Example
///
/// ```rust
/// use std::rc::Rc;
/// use tinyapp_container::Container;
///
/// struct Config { url: String }
/// struct Client { config: Rc<Config> }
///
/// let container = Container::new();
/// container.set("config", Rc::new(Config { url: "db://local".into() }))?;
/// container.set_factory("client", |c| {
///     Ok(Rc::new(Client { config: c.get::<Rc<Config>>("config")? }))
/// })?;
///
/// let client = container.get::<Rc<Client>>("client")?;
/// assert_eq!(client.config.url, "db://local");
/// assert!(Rc::ptr_eq(&client, &container.get::<Rc<Client>>("client")?));
/// # Ok::<(), tinyapp_container::ContainerError>(())
/// ```
#[derive(Default)]
pub struct Container {
    entries: RefCell<HashMap<String, Entry>>,
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a plain value under `key`.
    ///
    /// The key is resolved immediately and becomes read-only.
    ///
    /// # Errors
    ///
    /// [`ContainerError::KeyAlreadySet`] if the key holds anything already.
    pub fn set<T: 'static>(&self, key: impl Into<String>, value: T) -> ContainerResult<()> {
        self.insert(key.into(), Entry::Resolved(Rc::new(value)))
    }

    /// Registers a factory under `key`.
    ///
    /// The factory is not called here. It runs on the first
    /// [`get`](Self::get) of the key and receives the container so it can
    /// look up its own dependencies.
    ///
    /// # Errors
    ///
    /// [`ContainerError::KeyAlreadySet`] if the key holds anything already.
    pub fn set_factory<T, F>(&self, key: impl Into<String>, factory: F) -> ContainerResult<()>
    where
        T: 'static,
        F: Fn(&Container) -> anyhow::Result<T> + 'static,
    {
        let factory: Factory = Rc::new(move |c: &Container| -> anyhow::Result<Rc<dyn Any>> {
            let value = factory(c)?;
            Ok(Rc::new(value))
        });
        self.insert(
            key.into(),
            Entry::Pending {
                factory,
                in_progress: false,
            },
        )
    }

    /// Resolves `key` and returns a clone of its value.
    ///
    /// # Errors
    ///
    /// Everything [`get_any`](Self::get_any) fails with, plus
    /// [`ContainerError::TypeMismatch`] if the value is not a `T`.
    pub fn get<T: Any + Clone>(&self, key: &str) -> ContainerResult<T> {
        let value = self.get_any(key)?;
        value
            .downcast_ref::<T>()
            .cloned()
            .ok_or_else(|| ContainerError::TypeMismatch {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Resolves `key` and returns the type-erased value.
    ///
    /// # Errors
    ///
    /// - [`ContainerError::KeyNotFound`] if the key was never registered
    /// - [`ContainerError::CircularDependency`] if the key is being resolved
    ///   further up the current call stack
    /// - any `ContainerError` raised inside the factory, unchanged
    /// - [`ContainerError::Factory`] wrapping any other factory error
    pub fn get_any(&self, key: &str) -> ContainerResult<Rc<dyn Any>> {
        let factory = {
            let mut entries = self.entries.borrow_mut();
            match entries.get_mut(key) {
                None => return Err(ContainerError::KeyNotFound(key.to_string())),
                Some(Entry::Resolved(value)) => {
                    tracing::trace!(key, "container hit");
                    return Ok(Rc::clone(value));
                }
                Some(Entry::Pending {
                    in_progress: true, ..
                }) => {
                    tracing::debug!(key, "dependency cycle detected");
                    return Err(ContainerError::CircularDependency(key.to_string()));
                }
                Some(Entry::Pending {
                    factory,
                    in_progress,
                }) => {
                    *in_progress = true;
                    Rc::clone(factory)
                }
            }
        };

        tracing::debug!(key, "invoking factory");
        let outcome = factory(self);

        let mut entries = self.entries.borrow_mut();
        match outcome {
            Ok(value) => {
                entries.insert(key.to_string(), Entry::Resolved(Rc::clone(&value)));
                Ok(value)
            }
            Err(err) => {
                if let Some(Entry::Pending { in_progress, .. }) = entries.get_mut(key) {
                    *in_progress = false;
                }
                match err.downcast::<ContainerError>() {
                    Ok(inner) => Err(inner),
                    Err(source) => Err(ContainerError::Factory {
                        key: key.to_string(),
                        source,
                    }),
                }
            }
        }
    }

    /// Returns `true` if `key` holds a pending factory or a resolved value.
    pub fn exists(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }

    /// Returns `true` if `key` holds a resolved value.
    pub fn is_resolved(&self, key: &str) -> bool {
        matches!(self.entries.borrow().get(key), Some(Entry::Resolved(_)))
    }

    /// Removes a pending factory.
    ///
    /// Returns `Ok(false)` if the key was not registered at all.
    ///
    /// # Errors
    ///
    /// [`ContainerError::KeyAlreadySet`] if the key is resolved, or if its
    /// factory is running right now.
    pub fn remove(&self, key: &str) -> ContainerResult<bool> {
        let mut entries = self.entries.borrow_mut();
        match entries.get(key) {
            None => Ok(false),
            Some(Entry::Pending {
                in_progress: false, ..
            }) => {
                entries.remove(key);
                Ok(true)
            }
            Some(_) => Err(ContainerError::KeyAlreadySet(key.to_string())),
        }
    }

    /// Returns all registered keys, sorted.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.borrow().keys().cloned().collect();
        keys.sort();
        keys
    }

    /// Returns the number of registered keys.
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    fn insert(&self, key: String, entry: Entry) -> ContainerResult<()> {
        let mut entries = self.entries.borrow_mut();
        if entries.contains_key(&key) {
            return Err(ContainerError::KeyAlreadySet(key));
        }
        entries.insert(key, entry);
        Ok(())
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.entries.borrow();
        let resolved = entries
            .values()
            .filter(|e| matches!(e, Entry::Resolved(_)))
            .count();
        f.debug_struct("Container")
            .field("len", &entries.len())
            .field("resolved", &resolved)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_get_unregistered_key() {
        let c = Container::new();
        let err = c.get::<i32>("missing").unwrap_err();
        assert!(matches!(err, ContainerError::KeyNotFound(ref k) if k == "missing"));
    }

    #[test]
    fn test_set_value_is_resolved_immediately() {
        let c = Container::new();
        c.set("port", 8080u16).unwrap();
        assert!(c.exists("port"));
        assert!(c.is_resolved("port"));
        assert_eq!(c.get::<u16>("port").unwrap(), 8080);
    }

    #[test]
    fn test_unit_value_is_a_value() {
        let c = Container::new();
        c.set("nothing", ()).unwrap();
        assert!(c.exists("nothing"));
        c.get::<()>("nothing").unwrap();
    }

    #[test]
    fn test_factory_is_lazy_and_memoized() {
        let calls = Rc::new(Cell::new(0));
        let counter = calls.clone();

        let c = Container::new();
        c.set_factory("svc", move |_| {
            counter.set(counter.get() + 1);
            Ok(Rc::new(String::from("service")))
        })
        .unwrap();

        assert_eq!(calls.get(), 0);
        assert!(!c.is_resolved("svc"));

        let first = c.get::<Rc<String>>("svc").unwrap();
        let second = c.get::<Rc<String>>("svc").unwrap();

        assert_eq!(calls.get(), 1);
        assert!(Rc::ptr_eq(&first, &second));
        assert!(c.is_resolved("svc"));
    }

    #[test]
    fn test_factory_receives_container() {
        let c = Container::new();
        c.set("base", 40i64).unwrap();
        c.set_factory("answer", |c| Ok(c.get::<i64>("base")? + 2))
            .unwrap();
        assert_eq!(c.get::<i64>("answer").unwrap(), 42);
    }

    #[test]
    fn test_set_twice_fails() {
        let c = Container::new();
        c.set("k", 1).unwrap();
        assert!(matches!(
            c.set("k", 2),
            Err(ContainerError::KeyAlreadySet(_))
        ));
        assert_eq!(c.get::<i32>("k").unwrap(), 1);
    }

    #[test]
    fn test_set_over_pending_factory_fails() {
        let c = Container::new();
        c.set_factory("k", |_| Ok(1)).unwrap();
        assert!(matches!(
            c.set_factory("k", |_| Ok(2)),
            Err(ContainerError::KeyAlreadySet(_))
        ));
        assert_eq!(c.get::<i32>("k").unwrap(), 1);
    }

    #[test]
    fn test_remove_pending() {
        let c = Container::new();
        c.set_factory("k", |_| Ok(1)).unwrap();
        assert!(c.remove("k").unwrap());
        assert!(!c.exists("k"));
        assert!(matches!(
            c.get::<i32>("k"),
            Err(ContainerError::KeyNotFound(_))
        ));
        // The key may be registered again after removal
        c.set("k", 5).unwrap();
        assert_eq!(c.get::<i32>("k").unwrap(), 5);
    }

    #[test]
    fn test_remove_resolved_fails() {
        let c = Container::new();
        c.set_factory("k", |_| Ok(1)).unwrap();
        c.get::<i32>("k").unwrap();
        assert!(matches!(
            c.remove("k"),
            Err(ContainerError::KeyAlreadySet(_))
        ));

        c.set("v", 1).unwrap();
        assert!(matches!(
            c.remove("v"),
            Err(ContainerError::KeyAlreadySet(_))
        ));
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let c = Container::new();
        assert!(!c.remove("nope").unwrap());
    }

    #[test]
    fn test_self_cycle() {
        let c = Container::new();
        c.set_factory("a", |c| Ok(c.get::<i32>("a")?)).unwrap();
        let err = c.get::<i32>("a").unwrap_err();
        assert!(matches!(err, ContainerError::CircularDependency(ref k) if k == "a"));
    }

    #[test]
    fn test_transitive_cycle_names_reentered_key() {
        let c = Container::new();
        c.set_factory("a", |c| Ok(c.get::<i32>("b")?)).unwrap();
        c.set_factory("b", |c| Ok(c.get::<i32>("a")?)).unwrap();

        let err = c.get::<i32>("a").unwrap_err();
        assert!(matches!(err, ContainerError::CircularDependency(ref k) if k == "a"));
    }

    #[test]
    fn test_in_progress_marker_cleared_after_error() {
        let fail = Rc::new(Cell::new(true));
        let flag = fail.clone();

        let c = Container::new();
        c.set_factory("flaky", move |_| {
            if flag.get() {
                anyhow::bail!("not ready");
            }
            Ok(7)
        })
        .unwrap();

        let err = c.get::<i32>("flaky").unwrap_err();
        assert!(matches!(err, ContainerError::Factory { ref key, .. } if key == "flaky"));
        assert!(c.exists("flaky"));
        assert!(!c.is_resolved("flaky"));

        // A second attempt is not mistaken for a cycle
        fail.set(false);
        assert_eq!(c.get::<i32>("flaky").unwrap(), 7);
    }

    #[test]
    fn test_nested_container_error_propagates_unchanged() {
        let c = Container::new();
        c.set_factory("outer", |c| Ok(c.get::<i32>("inner")?))
            .unwrap();
        let err = c.get::<i32>("outer").unwrap_err();
        assert!(matches!(err, ContainerError::KeyNotFound(ref k) if k == "inner"));
    }

    #[test]
    fn test_type_mismatch() {
        let c = Container::new();
        c.set("n", 1u8).unwrap();
        let err = c.get::<String>("n").unwrap_err();
        assert!(matches!(err, ContainerError::TypeMismatch { ref key, .. } if key == "n"));
    }

    #[test]
    fn test_remove_during_own_resolution_fails() {
        let c = Container::new();
        c.set_factory("self_removing", |c| {
            c.remove("self_removing")?;
            Ok(1)
        })
        .unwrap();
        let err = c.get::<i32>("self_removing").unwrap_err();
        assert!(matches!(err, ContainerError::KeyAlreadySet(_)));
    }

    #[test]
    fn test_keys_and_len() {
        let c = Container::new();
        assert!(c.is_empty());
        c.set("b", 1).unwrap();
        c.set_factory("a", |_| Ok(2)).unwrap();
        assert_eq!(c.len(), 2);
        assert_eq!(c.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_debug_output() {
        let c = Container::new();
        c.set("a", 1).unwrap();
        c.set_factory("b", |_| Ok(2)).unwrap();
        let debug = format!("{:?}", c);
        assert!(debug.contains("len: 2"));
        assert!(debug.contains("resolved: 1"));
    }
}
