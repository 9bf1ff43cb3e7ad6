//! Remote completion client
//!
//! Features:
//! - Gemini `generateContent` backend behind the [`CompletionBackend`] trait
//! - Model selection by query complexity
//! - Localized, intent-scoped prompt templates
//! - Bounded retry with exponential backoff and jitter

pub mod backend;
pub mod client;
pub mod model;
pub mod prompt;
pub mod retry;

pub use backend::{
    CompletionBackend, CompletionRequest, GeminiBackend, GeminiConfig, FALLBACK_TEXT,
};
pub use client::CompletionClient;
pub use model::ModelSelector;
pub use prompt::PromptBuilder;
pub use retry::RetryPolicy;

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl LlmError {
    /// Whether another attempt could succeed
    pub fn is_retryable(&self) -> bool {
        !matches!(self, LlmError::Configuration(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for calorisensei_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Configuration(msg) => calorisensei_core::Error::Configuration(msg),
            other => calorisensei_core::Error::Llm(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(LlmError::Timeout.is_retryable());
        assert!(LlmError::Network("reset".into()).is_retryable());
        assert!(LlmError::Api {
            status: 400,
            message: "bad".into()
        }
        .is_retryable());
        assert!(!LlmError::Configuration("no key".into()).is_retryable());
    }

    #[test]
    fn test_core_error_conversion() {
        let err: calorisensei_core::Error = LlmError::Timeout.into();
        assert!(err.is_recoverable());
        let err: calorisensei_core::Error = LlmError::Configuration("x".into()).into();
        assert!(!err.is_recoverable());
    }
}
