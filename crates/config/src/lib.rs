//! Configuration management for the CaloriSensei assistant
//!
//! Supports loading configuration from:
//! - YAML files under `config/` (`default`, then `{env}`)
//! - Environment variables (CALORISENSEI_ prefix, `__` between sections)
//!
//! Fixed values that are not worth exposing as settings live in [`constants`].

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, CacheConfig, CompletionConfig, HealthConfig,
    ObservabilityConfig, RetryConfig, ServerConfig, Settings, VoiceConfig,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
