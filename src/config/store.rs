//! Nested mappings addressed by dotted paths.
//!
//! The free functions operate on any root [`Map`]; [`Store`] owns one and
//! layers the accessor conveniences on top.

use std::ops::Index;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::path;
use super::ConfigError;

/// Looks up the value at `key`.
///
/// Returns `None` as soon as a segment is missing or resolves to something
/// that is not a mapping. There is no partial match.
pub fn get<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if !path::is_nested(key) {
        return root.get(key);
    }

    let mut segments = path::split(key).into_iter();
    let mut current = root.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Mutable counterpart of [`get`].
pub fn get_mut<'a>(root: &'a mut Map<String, Value>, key: &str) -> Option<&'a mut Value> {
    if !path::is_nested(key) {
        return root.get_mut(key);
    }

    let mut segments = path::split(key).into_iter();
    let mut current = root.get_mut(segments.next()?)?;
    for segment in segments {
        current = current.as_object_mut()?.get_mut(segment)?;
    }
    Some(current)
}

/// Returns true if something is stored at `key`, even a null or falsy value.
pub fn has(root: &Map<String, Value>, key: &str) -> bool {
    get(root, key).is_some()
}

/// Stores `value` at `key`, creating intermediate mappings as needed.
///
/// An intermediate segment holding a non-mapping is replaced by an empty
/// mapping, discarding whatever was there.
pub fn set(root: &mut Map<String, Value>, key: &str, value: Value) {
    insert_at(root, path::split(key).as_slice(), value);
}

pub(crate) fn insert_at<S: AsRef<str>>(
    table: &mut Map<String, Value>,
    segments: &[S],
    value: Value,
) {
    let Some((first, rest)) = segments.split_first() else {
        return;
    };
    let first = first.as_ref();

    if rest.is_empty() {
        table.insert(first.to_string(), value);
        return;
    }

    if !matches!(table.get(first), Some(Value::Object(_))) {
        table.insert(first.to_string(), Value::Object(Map::new()));
    }

    if let Some(Value::Object(nested)) = table.get_mut(first) {
        insert_at(nested, rest, value);
    }
}

/// Adds `value` at `key` without discarding what is already there.
///
/// A missing key is simply set. An existing sequence gets the value appended;
/// any other existing value becomes the first element of `[old, value]`.
pub fn add(root: &mut Map<String, Value>, key: &str, value: Value) {
    match get_mut(root, key) {
        None => set(root, key, value),
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let old = existing.take();
            *existing = Value::Array(vec![old, value]);
        }
    }
}

/// Removes the value at `key`, returning it.
///
/// Missing intermediate segments make this a no-op. The remaining keys keep
/// their order.
pub fn remove(root: &mut Map<String, Value>, key: &str) -> Option<Value> {
    let segments = path::split(key);
    let (last, parents) = segments.split_last()?;

    let mut current = root;
    for segment in parents {
        current = current.get_mut(*segment)?.as_object_mut()?;
    }
    current.shift_remove(*last)
}

/// Deep-merges `overlay` over `base` and returns the result.
///
/// Mappings present on both sides are merged key by key. Every other value,
/// sequences included, is replaced outright by the overlay, so a scalar in the
/// overlay discards an entire subtree of the base.
pub fn merge(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    deep_merge(&mut base, overlay);
    base
}

/// In-place form of [`merge`].
pub fn deep_merge(base: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(Value::Object(base_table)), Value::Object(overlay_table)) => {
                deep_merge(base_table, overlay_table);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}

/// Folds layers of defaults into one mapping, base layer first.
///
/// Each later layer overrides the ones before it, the way a subtype's
/// defaults override those it inherits.
pub fn merge_chain<I>(chain: I) -> Map<String, Value>
where
    I: IntoIterator<Item = Map<String, Value>>,
{
    chain.into_iter().fold(Map::new(), merge)
}

/// An owned mapping with dotted-path access.
///
/// ```
/// use nested_config::Store;
/// use serde_json::json;
///
/// let mut params = Store::new();
/// params.set("db.host", "localhost").set("db.port", 5432);
///
/// assert_eq!(params.get("db.port")?, &json!(5432));
/// assert!(params.get("db.user").is_err());
/// # Ok::<(), nested_config::ConfigError>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Store {
    data: Map<String, Value>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_map(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Returns the value at `key`, or [`ConfigError::KeyNotFound`].
    ///
    /// A key holding `null` is found; only structural absence is an error.
    pub fn get(&self, key: &str) -> Result<&Value, ConfigError> {
        self.lookup(key)
            .ok_or_else(|| ConfigError::KeyNotFound(key.to_string()))
    }

    /// Returns a copy of the value at `key`, or `fallback` if absent.
    pub fn get_or(&self, key: &str, fallback: impl Into<Value>) -> Value {
        match self.lookup(key) {
            Some(value) => value.clone(),
            None => fallback.into(),
        }
    }

    pub fn lookup(&self, key: &str) -> Option<&Value> {
        get(&self.data, key)
    }

    pub fn lookup_mut(&mut self, key: &str) -> Option<&mut Value> {
        get_mut(&mut self.data, key)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        set(&mut self.data, key, value.into());
        self
    }

    pub fn add(&mut self, key: &str, value: impl Into<Value>) -> &mut Self {
        add(&mut self.data, key, value.into());
        self
    }

    /// Sets every entry of `values`; keys may be dotted paths.
    pub fn add_all(&mut self, values: Map<String, Value>) -> &mut Self {
        for (key, value) in values {
            set(&mut self.data, &key, value);
        }
        self
    }

    pub fn has(&self, key: &str) -> bool {
        has(&self.data, key)
    }

    pub fn remove(&mut self, key: &str) -> &mut Self {
        remove(&mut self.data, key);
        self
    }

    /// Removes the value at `key` and hands it back.
    pub fn take(&mut self, key: &str) -> Option<Value> {
        remove(&mut self.data, key)
    }

    /// Deep-merges `overlay` into the stored data.
    pub fn merge(&mut self, overlay: Map<String, Value>) -> &mut Self {
        deep_merge(&mut self.data, overlay);
        self
    }

    pub fn flush(&mut self) -> &mut Self {
        self.data.clear();
        self
    }

    pub fn all(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_inner(self) -> Map<String, Value> {
        self.data
    }

    /// Top-level keys in insertion order.
    pub fn keys(&self) -> Vec<&str> {
        self.data.keys().map(String::as_str).collect()
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

    /// Deserializes the value at `key` into `T`.
    pub fn extract<'a, T: Deserialize<'a>>(&'a self, key: &str) -> Result<T, ConfigError> {
        let value = self.get(key)?;
        T::deserialize(value).map_err(ConfigError::DeserializeError)
    }
}

impl From<Map<String, Value>> for Store {
    fn from(data: Map<String, Value>) -> Self {
        Self::from_map(data)
    }
}

impl From<Store> for Value {
    fn from(store: Store) -> Self {
        Value::Object(store.data)
    }
}

impl Index<&str> for Store {
    type Output = Value;

    /// # Panics
    ///
    /// Panics if nothing is stored at `key`.
    fn index(&self, key: &str) -> &Value {
        match self.lookup(key) {
            Some(value) => value,
            None => panic!("no value stored at '{key}'"),
        }
    }
}

impl<'a> IntoIterator for &'a Store {
    type Item = (&'a String, &'a Value);
    type IntoIter = serde_json::map::Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl IntoIterator for Store {
    type Item = (String, Value);
    type IntoIter = serde_json::map::IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<K: AsRef<str>> Extend<(K, Value)> for Store {
    fn extend<I: IntoIterator<Item = (K, Value)>>(&mut self, iter: I) {
        for (key, value) in iter {
            set(&mut self.data, key.as_ref(), value);
        }
    }
}

impl<K: AsRef<str>> FromIterator<(K, Value)> for Store {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut store = Store::new();
        store.extend(iter);
        store
    }
}
