//! Core traits and types for the CaloriSensei assistant
//!
//! This crate provides foundational types used across all other crates:
//! - Language tags and script ranges
//! - Chat message and conversation log types
//! - Query type categories
//! - Speech traits for pluggable recognition/synthesis engines
//! - Error types

pub mod conversation;
pub mod error;
pub mod language;
pub mod query;
pub mod traits;
pub mod voice_config;

pub use conversation::{ChatMessage, ConversationLog, Sender, WELCOME_MESSAGE};
pub use error::{Error, Result};
pub use language::{Language, Script};
pub use query::QueryType;
pub use voice_config::{VoiceInfo, VoiceSelection};

pub use traits::{SpeechRecognizer, SpeechSynthesizer};
