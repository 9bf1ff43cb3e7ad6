//! Persistence errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Unexpected status {0}")]
    Status(u16),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl From<PersistenceError> for calorisensei_core::Error {
    fn from(err: PersistenceError) -> Self {
        calorisensei_core::Error::Storage(err.to_string())
    }
}
