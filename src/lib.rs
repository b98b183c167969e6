pub mod config;
pub mod container;
mod error;

pub use config::{
    ConfigContainer, ConfigError, ConfigRegistry, Configurable, EnvReader, JsonReader, Reader,
    Store, TomlReader,
};
pub use container::{Container, ContainerError};
pub use error::Error;
