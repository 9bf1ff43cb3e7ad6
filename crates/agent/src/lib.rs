//! Chat pipeline for the CaloriSensei assistant
//!
//! Features:
//! - Response pipeline: emergency screening, language detection, cache,
//!   query classification and the remote completion call
//! - Expiring response cache keyed by normalized input
//! - Chat sessions with conversation log, typing flag and status banners
//! - Voice I/O adapter over pluggable speech engines

pub mod cache;
pub mod pipeline;
pub mod session;
pub mod voice;

pub use cache::ResponseCache;
pub use pipeline::{PipelineReply, ReplySource, ResponsePipeline};
pub use session::{Banner, ChatSession, SessionEvent, SessionStatus};
pub use voice::{strip_for_speech, SpeakOutcome, VoiceAdapter, VoiceError};

use calorisensei_llm::LlmError;
use thiserror::Error;

/// Agent errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    #[error("Completion failed: {0}")]
    Completion(#[from] LlmError),

    #[error("Voice error: {0}")]
    Voice(#[from] VoiceError),
}

impl From<AgentError> for calorisensei_core::Error {
    fn from(err: AgentError) -> Self {
        match err {
            AgentError::Completion(e) => e.into(),
            AgentError::Voice(e) => e.into(),
        }
    }
}
