//! HTTP Endpoints
//!
//! REST API for the chat client.

use axum::{
    extract::{Json, Path, State},
    http::{HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use calorisensei_agent::SessionStatus;
use calorisensei_core::ChatMessage;
use calorisensei_persistence::HealthRecord;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:id", delete(delete_session))
        .route(
            "/api/sessions/:id/messages",
            post(send_message).get(list_messages),
        )
        .route("/api/sessions/:id/reset", post(reset_session))
        .route("/api/sessions/:id/status", get(session_status))
        .route("/api/connectivity/:id", post(connectivity))
        .route("/api/health-data", get(health_data))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Configured origins only; none configured means any origin
fn build_cors_layer(origins: &[String]) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, allowing any origin");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any);
    }

    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!(origin = %origin, "Invalid CORS origin");
                None
            })
        })
        .collect();

    tracing::info!(count = parsed.len(), "CORS configured");
    CorsLayer::new()
        .allow_origin(parsed)
        .allow_methods(methods)
        .allow_headers(Any)
}

#[derive(Debug, Serialize)]
struct SessionCreated {
    session_id: String,
    messages: Vec<ChatMessage>,
}

async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionCreated>), ServerError> {
    let session = state.create_session()?;
    Ok((
        StatusCode::CREATED,
        Json(SessionCreated {
            session_id: session.id().to_string(),
            messages: session.messages(),
        }),
    ))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    state.remove_session(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
struct MessageRequest {
    message: String,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    /// `None` when the message was empty after sanitizing
    reply: Option<ChatMessage>,
    status: SessionStatus,
}

async fn send_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ServerError> {
    let session = state.session(&id)?;
    let reply = session.submit(&request.message).await;
    Ok(Json(MessageResponse {
        reply,
        status: session.status(),
    }))
}

async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ServerError> {
    let session = state.session(&id)?;
    Ok(Json(serde_json::json!({ "messages": session.messages() })))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatus>, ServerError> {
    let session = state.session(&id)?;
    session.reset();
    Ok(Json(session.status()))
}

async fn session_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionStatus>, ServerError> {
    Ok(Json(state.session(&id)?.status()))
}

#[derive(Debug, Deserialize)]
struct ConnectivityRequest {
    online: bool,
}

/// Browser online/offline events
async fn connectivity(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<ConnectivityRequest>,
) -> Result<Json<SessionStatus>, ServerError> {
    let session = state.session(&id)?;
    if request.online {
        session.on_online();
    } else {
        session.on_offline();
    }
    Ok(Json(session.status()))
}

/// Mirrored health summary, refreshed from the backend when reachable
async fn health_data(State(state): State<AppState>) -> Result<Json<HealthRecord>, ServerError> {
    state
        .mirror
        .load(|_| {})
        .await
        .map(Json)
        .ok_or_else(|| ServerError::Unavailable("health data".to_string()))
}

async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.session_count(),
        "cached_responses": state.pipeline.cache().len(),
    }))
}
