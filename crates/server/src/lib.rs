//! CaloriSensei HTTP server
//!
//! Exposes chat sessions and the health summary to a browser client.

pub mod http;
pub mod state;

pub use http::create_router;
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Unavailable: {0}")]
    Unavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<calorisensei_llm::LlmError> for ServerError {
    fn from(err: calorisensei_llm::LlmError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<calorisensei_persistence::PersistenceError> for ServerError {
    fn from(err: calorisensei_persistence::PersistenceError) -> Self {
        ServerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let cases = [
            (ServerError::SessionNotFound("x".into()), StatusCode::NOT_FOUND),
            (ServerError::Unavailable("x".into()), StatusCode::SERVICE_UNAVAILABLE),
            (ServerError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(StatusCode::from(&err), status);
        }

        let from_llm = ServerError::from(calorisensei_llm::LlmError::Timeout);
        assert_eq!(StatusCode::from(&from_llm), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
