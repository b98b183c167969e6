//! Nested configuration: dotted-path stores, defaults with coercion, and the
//! process-wide registry.

pub mod coerce;
mod configurable;
mod container;
mod env;
mod error;
pub mod path;
mod reader;
mod registry;
pub mod store;

pub use configurable::Configurable;
pub use container::ConfigContainer;
pub use env::EnvReader;
pub use error::ConfigError;
pub use reader::{JsonReader, Reader, TomlReader};
pub use registry::ConfigRegistry;
pub use store::Store;
