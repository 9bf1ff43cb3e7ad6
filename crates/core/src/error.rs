//! Shared error type

use thiserror::Error;

/// Result alias used by the core traits
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced across crate boundaries
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Speech recognition error: {0}")]
    Recognition(String),

    #[error("Speech synthesis error: {0}")]
    Synthesis(String),

    #[error("Capability not supported: {0}")]
    Unsupported(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl Error {
    /// Whether the session stays usable after this error.
    ///
    /// Only configuration errors are fatal, and only at startup.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Configuration(_))
    }
}
