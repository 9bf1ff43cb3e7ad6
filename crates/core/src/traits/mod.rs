//! Core traits for the assistant
//!
//! Speech engines are platform-provided, so they sit behind traits:
//!
//! ```text
//! Speech Processing:
//!   - SpeechRecognizer: single-utterance speech → text
//!   - SpeechSynthesizer: text → spoken audio
//! ```
//!
//! The completion backend trait lives in the llm crate next to its
//! implementations.

mod speech;

pub use speech::{SpeechRecognizer, SpeechSynthesizer};
