//! Process-wide configuration registry.
//!
//! Holds named top-level sections (`app`, `debug`, anything loaded from a
//! [`Reader`]) that the rest of an application consults while bootstrapping.
//! Unlike [`ConfigContainer`](super::ConfigContainer) there are no defaults
//! and no coercion.

use std::sync::{Mutex, MutexGuard, OnceLock};

use serde_json::{Map, Value};
use tracing::debug;

use super::coerce;
use super::reader::Reader;
use super::store::Store;
use super::ConfigError;

static GLOBAL: OnceLock<ConfigRegistry> = OnceLock::new();

const DEFAULT_ENCODING: &str = "UTF-8";

/// A lock-guarded [`Store`] of configuration sections.
///
/// Every operation holds the lock for its whole read-modify-write step, so
/// [`add`](Self::add) and [`load`](Self::load) are atomic with respect to
/// other threads.
///
/// ## Example
///
/// ```
/// use nested_config::ConfigRegistry;
///
/// let registry = ConfigRegistry::new();
/// registry.set("app.name", "Titan");
///
/// assert_eq!(registry.name(), "Titan");
/// assert_eq!(registry.encoding(), "UTF-8");
/// ```
#[derive(Debug, Default)]
pub struct ConfigRegistry {
    store: Mutex<Store>,
}

impl ConfigRegistry {
    /// Creates an isolated, empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide registry, created on first use.
    pub fn global() -> &'static ConfigRegistry {
        GLOBAL.get_or_init(|| {
            debug!("initialized global config registry");
            ConfigRegistry::new()
        })
    }

    pub fn set(&self, key: &str, value: impl Into<Value>) {
        self.lock().set(key, value);
    }

    /// Returns a copy of the value at `key`, if any.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.lock().lookup(key).cloned()
    }

    pub fn get_or(&self, key: &str, fallback: impl Into<Value>) -> Value {
        self.lock().get_or(key, fallback)
    }

    pub fn has(&self, key: &str) -> bool {
        self.lock().has(key)
    }

    pub fn remove(&self, key: &str) {
        self.lock().remove(key);
    }

    /// Adds to the value at `key`; see [`store::add`](super::store::add).
    pub fn add(&self, key: &str, value: impl Into<Value>) {
        self.lock().add(key, value);
    }

    /// A snapshot of every section.
    pub fn all(&self) -> Map<String, Value> {
        self.lock().all().clone()
    }

    /// Removes every section.
    pub fn flush(&self) {
        self.lock().flush();
        debug!("flushed config registry");
    }

    /// Reads a mapping from `reader` and stores it under `name`.
    ///
    /// A dotted `name` nests the section. Whatever was stored under `name`
    /// before is replaced.
    pub fn load(&self, name: &str, reader: &dyn Reader) -> Result<(), ConfigError> {
        let section = reader.read()?;
        debug!(section = name, keys = section.len(), "loaded config section");
        self.lock().set(name, Value::Object(section));
        Ok(())
    }

    /// `app.name`, or an empty string.
    pub fn name(&self) -> String {
        self.string_at("app.name").unwrap_or_default()
    }

    /// `app.salt`, or an empty string.
    pub fn salt(&self) -> String {
        self.string_at("app.salt").unwrap_or_default()
    }

    /// `app.seed`, or an empty string.
    pub fn seed(&self) -> String {
        self.string_at("app.seed").unwrap_or_default()
    }

    /// `app.encoding`, or `UTF-8` when unset or empty.
    pub fn encoding(&self) -> String {
        self.string_at("app.encoding")
            .filter(|encoding| !encoding.is_empty())
            .unwrap_or_else(|| DEFAULT_ENCODING.to_string())
    }

    fn string_at(&self, key: &str) -> Option<String> {
        self.lock().lookup(key).map(coerce::to_string)
    }

    // Poisoning is ignored; the store holds plain data.
    fn lock(&self) -> MutexGuard<'_, Store> {
        self.store
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
