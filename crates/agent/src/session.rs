//! Chat session
//!
//! Owns one conversation: the message log, the typing flag, the status
//! banner and the connectivity state. Submissions run through the shared
//! [`ResponsePipeline`]; replies are optionally spoken through the
//! [`VoiceAdapter`].

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::Instant;

use calorisensei_config::constants::connectivity::RESTORED_BANNER_SECS;
use calorisensei_core::{ChatMessage, ConversationLog, Language};
use calorisensei_text_processing::localization::{
    service_unavailable, OFFLINE_BANNER, ONLINE_BANNER, RECOGNITION_FAILED_BANNER,
    SERVICE_UNAVAILABLE_BANNER, VOICE_UNSUPPORTED_BANNER,
};
use calorisensei_text_processing::sanitize_input;

use crate::pipeline::ResponsePipeline;
use crate::voice::{SpeakOutcome, VoiceAdapter, VoiceError};
use crate::AgentError;

/// Status line shown above the conversation, separate from the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Banner {
    pub text: String,
    #[serde(skip)]
    expires_at: Option<Instant>,
}

impl Banner {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            expires_at: None,
        }
    }

    /// Banner that disappears after `ttl`
    pub fn expiring(text: impl Into<String>, ttl: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Some(Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.map_or(false, |at| Instant::now() >= at)
    }
}

/// Session events for subscribers
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A message was appended to the log
    Message(ChatMessage),
    /// The typing indicator changed
    Typing(bool),
    /// The banner was set or cleared
    Banner(Option<String>),
    /// The log went back to the welcome message
    Reset,
}

/// Snapshot of a session for display
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub session_id: String,
    pub typing: bool,
    pub online: bool,
    pub listening: bool,
    pub speaking: bool,
    pub voice_output: bool,
    pub language: Language,
    pub banner: Option<String>,
    pub message_count: usize,
}

#[derive(Debug)]
struct SessionState {
    log: ConversationLog,
    typing: bool,
    online: bool,
    banner: Option<Banner>,
    /// Language of the latest submission; used for listening
    language: Language,
    /// Bumped by every reset; replies started before it are dropped
    generation: u64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            log: ConversationLog::new(),
            typing: false,
            online: true,
            banner: None,
            language: Language::default(),
            generation: 0,
        }
    }
}

/// One user's conversation with the assistant
pub struct ChatSession {
    id: String,
    pipeline: Arc<ResponsePipeline>,
    voice: Option<Arc<VoiceAdapter>>,
    state: RwLock<SessionState>,
    restored_banner: Duration,
    event_tx: broadcast::Sender<SessionEvent>,
}

impl ChatSession {
    pub fn new(pipeline: Arc<ResponsePipeline>) -> Self {
        Self::with_id(uuid::Uuid::new_v4().to_string(), pipeline)
    }

    pub fn with_id(id: impl Into<String>, pipeline: Arc<ResponsePipeline>) -> Self {
        let (event_tx, _) = broadcast::channel(100);
        Self {
            id: id.into(),
            pipeline,
            voice: None,
            state: RwLock::new(SessionState::default()),
            restored_banner: Duration::from_secs(RESTORED_BANNER_SECS),
            event_tx,
        }
    }

    pub fn with_voice(mut self, voice: Arc<VoiceAdapter>) -> Self {
        self.voice = Some(voice);
        self
    }

    /// How long the "connection restored" banner stays up
    pub fn with_restored_banner(mut self, ttl: Duration) -> Self {
        self.restored_banner = ttl;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn voice(&self) -> Option<&Arc<VoiceAdapter>> {
        self.voice.as_ref()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn messages(&self) -> Vec<ChatMessage> {
        self.state.read().log.messages().to_vec()
    }

    pub fn is_typing(&self) -> bool {
        self.state.read().typing
    }

    /// Current banner text; expired banners read as none
    pub fn banner(&self) -> Option<String> {
        let mut state = self.state.write();
        if state.banner.as_ref().map_or(false, Banner::is_expired) {
            state.banner = None;
        }
        state.banner.as_ref().map(|b| b.text.clone())
    }

    pub fn status(&self) -> SessionStatus {
        let banner = self.banner();
        let state = self.state.read();
        SessionStatus {
            session_id: self.id.clone(),
            typing: state.typing,
            online: state.online,
            listening: self.voice.as_ref().map_or(false, |v| v.is_listening()),
            speaking: self.voice.as_ref().map_or(false, |v| v.is_speaking()),
            voice_output: self.voice.as_ref().map_or(false, |v| v.output_enabled()),
            language: state.language,
            banner,
            message_count: state.log.len(),
        }
    }

    /// Submit typed or transcribed text
    ///
    /// Input that sanitizes to nothing is ignored and returns `None`.
    /// Otherwise the AI reply appended to the log is returned; a completion
    /// failure becomes a localized "service unavailable" reply plus banner.
    /// A reply that arrives after a [`reset`](Self::reset) is discarded and
    /// also returns `None`.
    pub async fn submit(&self, raw: &str) -> Option<ChatMessage> {
        let clean = sanitize_input(raw);
        if clean.is_empty() {
            tracing::debug!(session_id = %self.id, "Ignoring empty submission");
            return None;
        }

        let user = ChatMessage::user(clean.clone());
        let generation = {
            let mut state = self.state.write();
            state.log.push(user.clone());
            state.typing = true;
            state.banner = None;
            state.generation
        };
        self.emit(SessionEvent::Message(user));
        self.emit(SessionEvent::Typing(true));
        self.emit(SessionEvent::Banner(None));

        let (text, language, failed) = match self.pipeline.respond(&clean).await {
            Ok(reply) => {
                tracing::debug!(
                    session_id = %self.id,
                    source = ?reply.source,
                    language = %reply.language,
                    "Reply ready"
                );
                (reply.text, reply.language, false)
            }
            Err(e) => {
                tracing::error!(session_id = %self.id, error = %e, "Submission failed");
                let language = self.pipeline.detect_language(&clean);
                (service_unavailable(language).to_string(), language, true)
            }
        };

        let reply = ChatMessage::ai(text);
        {
            let mut state = self.state.write();
            if state.generation != generation {
                tracing::debug!(session_id = %self.id, "Dropping reply to a reset conversation");
                return None;
            }
            state.log.push(reply.clone());
            state.typing = false;
            state.language = language;
            if failed {
                state.banner = Some(Banner::new(SERVICE_UNAVAILABLE_BANNER));
            }
        }
        self.emit(SessionEvent::Message(reply.clone()));
        self.emit(SessionEvent::Typing(false));
        if failed {
            self.emit(SessionEvent::Banner(Some(SERVICE_UNAVAILABLE_BANNER.to_string())));
        }

        self.speak_in_background(&reply.text, language);
        Some(reply)
    }

    /// Listen for one utterance and submit the transcript
    ///
    /// `Ok(None)` means nothing was submitted: either a newer listening
    /// session took over or the transcript sanitized to nothing. Voice
    /// failures set a banner and leave the session usable for text.
    pub async fn submit_voice(&self) -> Result<Option<ChatMessage>, AgentError> {
        let voice = match &self.voice {
            Some(voice) => Arc::clone(voice),
            None => {
                self.set_banner(Some(Banner::new(VOICE_UNSUPPORTED_BANNER)));
                return Err(VoiceError::Unsupported("Speech recognition").into());
            }
        };

        let language = self.state.read().language;
        match voice.listen(language).await {
            Ok(Some(transcript)) => Ok(self.submit(&transcript).await),
            Ok(None) => Ok(None),
            Err(e) => {
                let text = match e {
                    VoiceError::Unsupported(_) => VOICE_UNSUPPORTED_BANNER,
                    _ => RECOGNITION_FAILED_BANNER,
                };
                tracing::warn!(session_id = %self.id, error = %e, "Voice input failed");
                self.set_banner(Some(Banner::new(text)));
                Err(e.into())
            }
        }
    }

    /// Back to the welcome message; the response cache is kept
    pub fn reset(&self) {
        {
            let mut state = self.state.write();
            state.log.reset();
            state.typing = false;
            state.banner = None;
            state.generation += 1;
        }
        if let Some(voice) = &self.voice {
            voice.stop_speaking();
            voice.stop_listening();
        }
        tracing::info!(session_id = %self.id, "Conversation reset");
        self.emit(SessionEvent::Reset);
        self.emit(SessionEvent::Banner(None));
    }

    pub fn on_offline(&self) {
        tracing::warn!(session_id = %self.id, "Network connection lost");
        self.state.write().online = false;
        self.set_banner(Some(Banner::new(OFFLINE_BANNER)));
    }

    pub fn on_online(&self) {
        tracing::info!(session_id = %self.id, "Network connection restored");
        self.state.write().online = true;
        self.set_banner(Some(Banner::expiring(ONLINE_BANNER, self.restored_banner)));
    }

    pub fn is_online(&self) -> bool {
        self.state.read().online
    }

    fn set_banner(&self, banner: Option<Banner>) {
        let text = banner.as_ref().map(|b| b.text.clone());
        self.state.write().banner = banner;
        self.emit(SessionEvent::Banner(text));
    }

    fn emit(&self, event: SessionEvent) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn speak_in_background(&self, text: &str, language: Language) {
        let voice = match &self.voice {
            Some(voice) if voice.output_enabled() => Arc::clone(voice),
            _ => return,
        };
        let text = text.to_string();
        let session_id = self.id.clone();

        tokio::spawn(async move {
            match voice.speak(&text, language).await {
                Ok(SpeakOutcome::Cancelled) => {
                    tracing::debug!(session_id = %session_id, "Reply speech cancelled")
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(session_id = %session_id, error = %e, "Reply speech failed"),
            }
        });
    }
}
