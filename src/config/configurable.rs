use serde_json::{Map, Value};

use super::ConfigContainer;

/// A type that carries its own [`ConfigContainer`].
///
/// Implementors build the container once, usually with
/// [`ConfigContainer::with_defaults_chain`] so that defaults shared with a
/// more general type come first and the implementor's own override them.
/// The provided methods are thin forwards to the container.
pub trait Configurable {
    fn config(&self) -> &ConfigContainer;

    fn config_mut(&mut self) -> &mut ConfigContainer;

    /// The value at `key`, or `None` when absent.
    fn get_config(&self, key: &str) -> Option<&Value> {
        self.config().lookup(key)
    }

    fn set_config(&mut self, key: &str, value: impl Into<Value>) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().set(key, value);
        self
    }

    fn has_config(&self, key: &str) -> bool {
        self.config().has(key)
    }

    fn remove_config(&mut self, key: &str) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().remove(key);
        self
    }

    fn add_config(&mut self, values: Map<String, Value>) -> &mut Self
    where
        Self: Sized,
    {
        self.config_mut().add_all(values);
        self
    }

    fn all_config(&self) -> &Map<String, Value> {
        self.config().all()
    }
}
