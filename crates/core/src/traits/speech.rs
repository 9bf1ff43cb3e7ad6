//! Speech processing traits

use crate::{Result, VoiceInfo};
use async_trait::async_trait;

/// Speech-to-text engine
///
/// Sessions are single-utterance and non-continuous: one call to
/// `recognize_once` yields at most one transcript.
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechRecognizer> = Arc::new(PlatformRecognizer::new());
/// if let Some(text) = stt.recognize_once("hi-IN").await? {
///     println!("Heard: {}", text);
/// }
/// ```
#[async_trait]
pub trait SpeechRecognizer: Send + Sync + 'static {
    /// Listen for one utterance in `locale`
    ///
    /// Returns `Ok(None)` when the session ends without a result.
    async fn recognize_once(&self, locale: &str) -> Result<Option<String>>;

    /// Abort the session in progress, if any
    fn abort(&self);

    /// Get engine name for logging
    fn engine_name(&self) -> &str;
}

/// Text-to-speech engine
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync + 'static {
    /// Speak `text`, resolving once the utterance finishes
    ///
    /// `voice` is `None` when no installed voice matched; the engine then
    /// uses its own default.
    async fn speak(&self, text: &str, locale: &str, voice: Option<&VoiceInfo>) -> Result<()>;

    /// Stop the utterance in progress, if any
    fn cancel(&self);

    /// Installed voices
    fn voices(&self) -> Vec<VoiceInfo>;

    /// Get engine name for logging
    fn engine_name(&self) -> &str;
}
