//! Keyed registry of shared objects with lazy construction.

mod error;

use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

pub use error::ContainerError;

type Object = Arc<dyn Any + Send + Sync>;
type Factory = Box<dyn FnOnce() -> Object + Send>;

enum Entry {
    Ready(Object),
    Lazy(Factory),
}

/// Shared objects keyed by name.
///
/// Objects are stored behind an [`Arc`] and handed out as clones of it.
/// Factories registered with [`register`](Self::register) run on the first
/// [`get`](Self::get) for their key and the result replaces them.
///
/// ## Example
///
/// ```
/// use nested_config::{ConfigRegistry, Container};
///
/// let mut container = Container::new();
/// container.register("config", ConfigRegistry::new);
///
/// let config = container.get::<ConfigRegistry>("config")?;
/// config.set("app.name", "demo");
/// assert_eq!(container.get::<ConfigRegistry>("config")?.name(), "demo");
/// # Ok::<(), nested_config::ContainerError>(())
/// ```
#[derive(Default)]
pub struct Container {
    entries: HashMap<String, Entry>,
    order: Vec<String>,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `object` under its type name and returns the shared handle.
    pub fn set<T: Any + Send + Sync>(&mut self, object: T) -> Arc<T> {
        self.set_as(type_name::<T>(), object)
    }

    /// Stores `object` under `key`, replacing any previous entry.
    pub fn set_as<T: Any + Send + Sync>(&mut self, key: impl Into<String>, object: T) -> Arc<T> {
        let object = Arc::new(object);
        self.insert(key.into(), Entry::Ready(object.clone()));
        object
    }

    /// Registers a factory that builds the entry for `key` on first use.
    pub fn register<T, F>(&mut self, key: impl Into<String>, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: FnOnce() -> T + Send + 'static,
    {
        let factory: Factory = Box::new(move || Arc::new(factory()) as Object);
        self.insert(key.into(), Entry::Lazy(factory));
        self
    }

    /// Returns the entry for `key`, running its factory if it has not run yet.
    pub fn get<T: Any + Send + Sync>(&mut self, key: &str) -> Result<Arc<T>, ContainerError> {
        let object = match self.entries.get(key) {
            None => return Err(ContainerError::EntryNotFound(key.to_string())),
            Some(Entry::Ready(object)) => object.clone(),
            Some(Entry::Lazy(_)) => {
                let Some(Entry::Lazy(factory)) = self.entries.remove(key) else {
                    return Err(ContainerError::EntryNotFound(key.to_string()));
                };
                debug!(key, "resolving lazy container entry");
                let object = factory();
                self.entries
                    .insert(key.to_string(), Entry::Ready(object.clone()));
                object
            }
        };

        object
            .downcast::<T>()
            .map_err(|_| ContainerError::InvalidEntry {
                key: key.to_string(),
                expected: type_name::<T>(),
            })
    }

    /// Returns the entry stored under `T`'s type name.
    pub fn get_typed<T: Any + Send + Sync>(&mut self) -> Result<Arc<T>, ContainerError> {
        self.get(type_name::<T>())
    }

    pub fn has(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys in registration order.
    pub fn keys(&self) -> &[String] {
        &self.order
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        if self.entries.remove(key).is_some() {
            self.order.retain(|k| k != key);
        }
        self
    }

    pub fn flush(&mut self) -> &mut Self {
        self.entries.clear();
        self.order.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn insert(&mut self, key: String, entry: Entry) {
        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.push(key);
        }
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container").field("keys", &self.order).finish()
    }
}
