//! Local persistence for the CaloriSensei assistant
//!
//! Provides:
//! - A key/value [`LocalStore`] backed by a JSON file or memory
//! - The health summary mirror: cached value first, then a refresh from the
//!   backend that overwrites the cache on success

pub mod error;
pub mod health;
pub mod store;

pub use error::PersistenceError;
pub use health::{HealthMirror, HealthRecord, HealthSource, HealthSummary, HttpHealthSource};
pub use store::{InMemoryStore, JsonFileStore, LocalStore};
