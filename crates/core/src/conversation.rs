//! Conversation log types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Seed message shown at the start of every conversation
pub const WELCOME_MESSAGE: &str = "👋 Welcome to CaloriSensei! I'm your fitness and nutrition assistant. Ask me about:\n\n💪 Exercises\n🍽️ Fat loss diets\n🏋️ Athlete training\n📝 Recipes from any cuisine\n\nHow can I help you today?";

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

/// A single chat message. Immutable once appended to a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::User,
            created_at: Utc::now(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sender: Sender::Ai,
            created_at: Utc::now(),
        }
    }

    pub fn is_ai(&self) -> bool {
        self.sender == Sender::Ai
    }
}

/// Ordered, append-only conversation log
///
/// The only mutation besides `push` is `reset`, which drops everything and
/// re-seeds the welcome message.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationLog {
    messages: Vec<ChatMessage>,
}

impl Default for ConversationLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationLog {
    /// Create a log seeded with the welcome message
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::ai(WELCOME_MESSAGE)],
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::ai(WELCOME_MESSAGE));
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
