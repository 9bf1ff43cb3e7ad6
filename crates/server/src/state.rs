//! Application State
//!
//! Shared state across all handlers. The response pipeline, and with it the
//! response cache, is shared by every session. Sessions are capped in number
//! and swept once idle for longer than `server.session_timeout_secs`.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::time::Instant;

use calorisensei_agent::{ChatSession, ResponsePipeline};
use calorisensei_config::Settings;
use calorisensei_llm::{CompletionBackend, CompletionClient, GeminiBackend, GeminiConfig};
use calorisensei_persistence::{HealthMirror, HttpHealthSource, JsonFileStore};

use crate::ServerError;

/// A live session and when a request last touched it
struct SessionEntry {
    session: Arc<ChatSession>,
    last_activity: Mutex<Instant>,
}

impl SessionEntry {
    fn new(session: Arc<ChatSession>) -> Self {
        Self {
            session,
            last_activity: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.lock().elapsed() > timeout
    }
}

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Settings>,
    pub pipeline: Arc<ResponsePipeline>,
    pub mirror: Arc<HealthMirror>,
    sessions: Arc<RwLock<HashMap<String, SessionEntry>>>,
}

impl AppState {
    pub fn new(config: Settings, backend: Arc<dyn CompletionBackend>, mirror: HealthMirror) -> Self {
        let client = CompletionClient::from_settings(backend, &config);
        let pipeline = ResponsePipeline::from_settings(client, &config);
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            mirror: Arc::new(mirror),
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// State wired to the Gemini backend, the mirror file and the health endpoint
    pub fn from_settings(config: Settings) -> Result<Self, ServerError> {
        let backend = GeminiBackend::new(GeminiConfig::from(&config.completion))?;
        let store = JsonFileStore::new(&config.health.mirror_path);
        let source = HttpHealthSource::from_config(&config.health)?;
        let mirror = HealthMirror::new(Arc::new(store), Arc::new(source));
        Ok(Self::new(config, Arc::new(backend), mirror))
    }

    fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.config.server.session_timeout_secs)
    }

    /// Start a new chat session
    ///
    /// At the session limit, expired sessions are swept first; if none
    /// were expired the request is refused.
    pub fn create_session(&self) -> Result<Arc<ChatSession>, ServerError> {
        let max_sessions = self.config.server.max_sessions;
        let mut sessions = self.sessions.write();

        if sessions.len() >= max_sessions {
            Self::remove_expired(&mut sessions, self.session_timeout());
            if sessions.len() >= max_sessions {
                tracing::warn!(max_sessions, "Session limit reached");
                return Err(ServerError::Unavailable("session limit reached".to_string()));
            }
        }

        let restored = Duration::from_secs(self.config.voice.restored_banner_secs);
        let session = Arc::new(
            ChatSession::new(Arc::clone(&self.pipeline)).with_restored_banner(restored),
        );
        sessions.insert(
            session.id().to_string(),
            SessionEntry::new(Arc::clone(&session)),
        );
        tracing::info!(session_id = %session.id(), "Session created");
        Ok(session)
    }

    /// Look up a session and mark it active
    pub fn session(&self, id: &str) -> Result<Arc<ChatSession>, ServerError> {
        let sessions = self.sessions.read();
        let entry = sessions
            .get(id)
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))?;
        entry.touch();
        Ok(Arc::clone(&entry.session))
    }

    pub fn remove_session(&self, id: &str) -> Result<(), ServerError> {
        match self.sessions.write().remove(id) {
            Some(_) => {
                tracing::info!(session_id = %id, "Session removed");
                Ok(())
            }
            None => Err(ServerError::SessionNotFound(id.to_string())),
        }
    }

    pub fn session_count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Drop sessions idle for longer than the configured timeout
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        Self::remove_expired(&mut sessions, self.session_timeout())
    }

    fn remove_expired(sessions: &mut HashMap<String, SessionEntry>, timeout: Duration) -> usize {
        let before = sessions.len();
        sessions.retain(|id, entry| {
            let expired = entry.is_expired(timeout);
            if expired {
                tracing::info!(session_id = %id, "Expired session");
            }
            !expired
        });
        before - sessions.len()
    }

    /// Periodically sweep expired sessions until `true` is sent
    pub fn start_cleanup_task(&self) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let state = self.clone();
        let period = Duration::from_secs(self.config.server.cleanup_interval_secs);

        tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let removed = state.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = state.session_count(),
                                "Session cleanup"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::debug!("Session cleanup task stopping");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calorisensei_llm::{CompletionRequest, LlmError};
    use calorisensei_persistence::{
        HealthRecord, HealthSource, InMemoryStore, PersistenceError,
    };

    struct EchoBackend;

    #[async_trait]
    impl CompletionBackend for EchoBackend {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            Ok(request.input.clone())
        }

        fn name(&self) -> &str {
            "echo"
        }
    }

    struct NoHealth;

    #[async_trait]
    impl HealthSource for NoHealth {
        async fn fetch(&self) -> Result<HealthRecord, PersistenceError> {
            Err(PersistenceError::Status(503))
        }
    }

    fn state(max_sessions: usize, timeout_secs: u64) -> AppState {
        let mut config = Settings::default();
        config.server.max_sessions = max_sessions;
        config.server.session_timeout_secs = timeout_secs;
        config.server.cleanup_interval_secs = 10;
        let mirror = HealthMirror::new(Arc::new(InMemoryStore::new()), Arc::new(NoHealth));
        AppState::new(config, Arc::new(EchoBackend), mirror)
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_limit() {
        let state = state(2, 60);
        state.create_session().unwrap();
        state.create_session().unwrap();

        assert!(matches!(
            state.create_session(),
            Err(ServerError::Unavailable(_))
        ));
        assert_eq!(state.session_count(), 2);

        // Idle sessions make room for new ones
        tokio::time::advance(Duration::from_secs(61)).await;
        state.create_session().unwrap();
        assert_eq!(state.session_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_activity_keeps_session_alive() {
        let state = state(10, 60);
        let active = state.create_session().unwrap();
        let idle = state.create_session().unwrap();

        tokio::time::advance(Duration::from_secs(30)).await;
        state.session(active.id()).unwrap();
        tokio::time::advance(Duration::from_secs(40)).await;

        assert_eq!(state.cleanup_expired(), 1);
        assert!(state.session(active.id()).is_ok());
        assert!(matches!(
            state.session(idle.id()),
            Err(ServerError::SessionNotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove_session() {
        let state = state(10, 60);
        let session = state.create_session().unwrap();

        state.remove_session(session.id()).unwrap();
        assert_eq!(state.session_count(), 0);
        assert!(matches!(
            state.remove_session(session.id()),
            Err(ServerError::SessionNotFound(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_sweeps_idle_sessions() {
        let state = state(10, 5);
        state.create_session().unwrap();
        let shutdown = state.start_cleanup_task();

        tokio::time::sleep(Duration::from_secs(15)).await;
        assert_eq!(state.session_count(), 0);

        shutdown.send(true).unwrap();
    }
}
