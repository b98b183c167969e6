use thiserror::Error;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ContainerError {
    #[error("no entry registered under '{0}'")]
    EntryNotFound(String),

    #[error("entry '{key}' is not a {expected}")]
    InvalidEntry {
        key: String,
        expected: &'static str,
    },
}
