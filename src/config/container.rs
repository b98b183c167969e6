//! Configuration with declared defaults.

use std::ops::Index;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::trace;

use super::coerce;
use super::store::{self, Store};
use super::ConfigError;

/// Configuration merged over a set of defaults.
///
/// The defaults are captured once at construction and never change. Every
/// [`set`](Self::set) on a key that has a default casts the new value to the
/// kind of that default, so a key declared as an integer stays an integer no
/// matter what is written to it. Keys without a default are stored as given.
///
/// ## Example
///
/// ```
/// use nested_config::ConfigContainer;
/// use serde_json::json;
///
/// let defaults = json!({"port": 8080, "debug": false}).as_object().cloned().unwrap();
/// let mut config = ConfigContainer::new(Default::default(), defaults);
///
/// config.set("port", "9090abc").set("debug", "1");
/// assert_eq!(config.get("port")?, &json!(9090));
/// assert_eq!(config.get("debug")?, &json!(true));
/// # Ok::<(), nested_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigContainer {
    data: Store,
    defaults: Map<String, Value>,
}

impl ConfigContainer {
    /// Deep-merges `config` over `defaults`.
    ///
    /// The defaults snapshot is an independent copy of `defaults`.
    pub fn new(config: Map<String, Value>, defaults: Map<String, Value>) -> Self {
        Self {
            data: Store::from_map(store::merge(defaults.clone(), config)),
            defaults,
        }
    }

    /// Like [`new`](Self::new), with defaults folded from layers, base first.
    pub fn with_defaults_chain<I>(config: Map<String, Value>, chain: I) -> Self
    where
        I: IntoIterator<Item = Map<String, Value>>,
    {
        Self::new(config, store::merge_chain(chain))
    }

    /// Returns the value at `key`, or [`ConfigError::KeyNotFound`].
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.data.get(key)
    }

    pub fn get_or(&self, key: &str, fallback: impl Into<Value>) -> Value {
        self.data.get_or(key, fallback)
    }

    pub fn lookup(&self, key: &str) -> Option<&Value> {
        self.data.lookup(key)
    }

    /// Stores `value` at `key`, cast to the kind of the key's default if it has one.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        let value = self.coerce(key, value.into());
        self.data.set(key, value);
        self
    }

    /// Sets each entry of `values` in turn, coercing as [`set`](Self::set) does.
    pub fn add_all(&mut self, values: Map<String, Value>) -> &mut Self {
        for (key, value) in values {
            self.set(&key, value);
        }
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.has(key)
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.data.remove(key);
        self
    }

    pub fn all(&self) -> &Map<String, Value> {
        self.data.all()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.data.keys()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> serde_json::map::Iter<'_> {
        self.data.iter()
    }

    /// The defaults captured at construction.
    pub fn defaults(&self) -> &Map<String, Value> {
        &self.defaults
    }

    pub fn extract<'a, T: Deserialize<'a>>(&'a self, key: &str) -> Result<T, ConfigError> {
        self.data.extract(key)
    }

    /// Deserializes the whole configuration into `T`.
    pub fn to_typed<T: DeserializeOwned>(&self) -> Result<T, ConfigError> {
        T::deserialize(Value::Object(self.all().clone())).map_err(ConfigError::DeserializeError)
    }

    fn coerce(&self, key: &str, value: Value) -> Value {
        match store::get(&self.defaults, key) {
            Some(reference) => {
                let coerced = coerce::coerce(reference, value);
                trace!(key, value = %coerced, "coerced config value");
                coerced
            }
            None => value,
        }
    }
}

impl Default for ConfigContainer {
    fn default() -> Self {
        Self::new(Map::new(), Map::new())
    }
}

impl Serialize for ConfigContainer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl Index<&str> for ConfigContainer {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if nothing is stored at `key`.
    fn index(&self, key: &str) -> &Value {
        &self.data[key]
    }
}

impl<'a> IntoIterator for &'a ConfigContainer {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl<K: AsRef<str>> Extend<(K, Value)> for ConfigContainer {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key.as_ref(), value);
        }
    }
}
