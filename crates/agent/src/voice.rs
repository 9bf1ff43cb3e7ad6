//! Voice I/O adapter
//!
//! Wraps optional speech engines. Recognition and synthesis are each a
//! latest-wins singleton: starting a new session or utterance cancels the one
//! in progress through a oneshot handle swapped in on every start.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use regex::Regex;
use thiserror::Error;
use tokio::sync::oneshot;

use calorisensei_config::constants::voice::AUTO_SUBMIT_DELAY_MS;
use calorisensei_config::VoiceConfig;
use calorisensei_core::{Language, SpeechRecognizer, SpeechSynthesizer, VoiceSelection};
use calorisensei_text_processing::localization::strip_disclaimer;

/// Emoji, pictographs and markdown markers that should not be read aloud
static NON_SPEECH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\p{So}\p{Sk}\x{FE00}-\x{FE0F}\x{200D}\x{20E3}*#_`~|>]").unwrap()
});

static BLANKS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Voice errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VoiceError {
    #[error("{0} is not supported on this device")]
    Unsupported(&'static str),

    #[error("Speech recognition failed: {0}")]
    Recognition(String),

    #[error("No speech was recognized")]
    NoSpeech,

    #[error("Speech synthesis failed: {0}")]
    Synthesis(String),
}

impl From<VoiceError> for calorisensei_core::Error {
    fn from(err: VoiceError) -> Self {
        match err {
            VoiceError::Unsupported(what) => calorisensei_core::Error::Unsupported(what.to_string()),
            VoiceError::Synthesis(msg) => calorisensei_core::Error::Synthesis(msg),
            other => calorisensei_core::Error::Recognition(other.to_string()),
        }
    }
}

/// How a speak request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeakOutcome {
    /// The utterance played to the end
    Finished,
    /// A newer utterance or an explicit stop cut it short
    Cancelled,
    /// Voice output is disabled, or nothing speakable was left
    Suppressed,
}

/// Cancel handle of the session or utterance in flight
struct ActiveHandle {
    id: u64,
    cancel: oneshot::Sender<()>,
}

/// Remove `text`'s trailing disclaimer and everything that should not be spoken
pub fn strip_for_speech(text: &str) -> String {
    let body = strip_disclaimer(text);
    let cleaned = NON_SPEECH.replace_all(body, "");
    cleaned
        .lines()
        .map(|line| BLANKS.replace_all(line.trim(), " ").into_owned())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Capability-gated speech input and output
pub struct VoiceAdapter {
    recognizer: Option<Arc<dyn SpeechRecognizer>>,
    synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    input_enabled: bool,
    output_enabled: AtomicBool,
    auto_submit_delay: Duration,
    next_id: AtomicU64,
    listening: Mutex<Option<ActiveHandle>>,
    speaking: Mutex<Option<ActiveHandle>>,
}

impl VoiceAdapter {
    pub fn new(
        recognizer: Option<Arc<dyn SpeechRecognizer>>,
        synthesizer: Option<Arc<dyn SpeechSynthesizer>>,
    ) -> Self {
        Self {
            recognizer,
            synthesizer,
            input_enabled: true,
            output_enabled: AtomicBool::new(false),
            auto_submit_delay: Duration::from_millis(AUTO_SUBMIT_DELAY_MS),
            next_id: AtomicU64::new(0),
            listening: Mutex::new(None),
            speaking: Mutex::new(None),
        }
    }

    /// Adapter with the toggles and delay from settings
    pub fn with_config(mut self, config: &VoiceConfig) -> Self {
        self.input_enabled = config.input_enabled;
        self.output_enabled = AtomicBool::new(config.output_enabled);
        self.auto_submit_delay = Duration::from_millis(config.auto_submit_delay_ms);
        self
    }

    pub fn supports_input(&self) -> bool {
        self.input_enabled && self.recognizer.is_some()
    }

    pub fn supports_output(&self) -> bool {
        self.synthesizer.is_some()
    }

    pub fn output_enabled(&self) -> bool {
        self.output_enabled.load(Ordering::SeqCst)
    }

    /// Toggle spoken replies; disabling also stops the current utterance
    pub fn set_output_enabled(&self, enabled: bool) {
        self.output_enabled.store(enabled, Ordering::SeqCst);
        if !enabled {
            self.stop_speaking();
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.lock().is_some()
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.lock().is_some()
    }

    /// Recognize one utterance in `language`'s voice locale
    ///
    /// A transcript is returned after the auto-submit delay. `Ok(None)`
    /// means a newer session superseded this one.
    pub async fn listen(&self, language: Language) -> Result<Option<String>, VoiceError> {
        let recognizer = match (&self.recognizer, self.input_enabled) {
            (Some(recognizer), true) => Arc::clone(recognizer),
            _ => return Err(VoiceError::Unsupported("Speech recognition")),
        };

        let (id, cancelled, superseded) = self.begin(&self.listening);
        if superseded {
            tracing::debug!("Aborting previous recognition session");
            recognizer.abort();
        }

        let locale = language.voice_locale();
        tracing::debug!(engine = recognizer.engine_name(), locale, "Listening");

        let result = tokio::select! {
            result = recognizer.recognize_once(locale) => Some(result),
            _ = cancelled => None,
        };
        self.finish(&self.listening, id);

        let transcript = match result {
            None => return Ok(None),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Speech recognition failed");
                return Err(VoiceError::Recognition(e.to_string()));
            }
            Some(Ok(None)) => return Err(VoiceError::NoSpeech),
            Some(Ok(Some(text))) if text.trim().is_empty() => return Err(VoiceError::NoSpeech),
            Some(Ok(Some(text))) => text.trim().to_string(),
        };

        tokio::time::sleep(self.auto_submit_delay).await;
        Ok(Some(transcript))
    }

    /// Abort the recognition session in progress, if any
    pub fn stop_listening(&self) {
        if let Some(active) = self.listening.lock().take() {
            let _ = active.cancel.send(());
            if let Some(recognizer) = &self.recognizer {
                recognizer.abort();
            }
        }
    }

    /// Speak `text` in `language`, cancelling any utterance in progress
    ///
    /// The disclaimer and non-speech symbols are removed first. Resolves when
    /// the utterance finishes or is cancelled.
    pub async fn speak(&self, text: &str, language: Language) -> Result<SpeakOutcome, VoiceError> {
        if !self.output_enabled() {
            return Ok(SpeakOutcome::Suppressed);
        }
        let synthesizer = match &self.synthesizer {
            Some(synthesizer) => Arc::clone(synthesizer),
            None => return Err(VoiceError::Unsupported("Speech synthesis")),
        };

        let spoken = strip_for_speech(text);
        if spoken.is_empty() {
            return Ok(SpeakOutcome::Suppressed);
        }

        let (id, cancelled, superseded) = self.begin(&self.speaking);
        if superseded {
            synthesizer.cancel();
        }

        let locale = language.voice_locale();
        let selection = VoiceSelection::pick(&synthesizer.voices(), locale);
        tracing::debug!(
            engine = synthesizer.engine_name(),
            locale,
            voice = selection.voice().map(|v| v.id.as_str()).unwrap_or("engine default"),
            "Speaking"
        );

        let result = tokio::select! {
            result = synthesizer.speak(&spoken, locale, selection.voice()) => Some(result),
            _ = cancelled => None,
        };
        self.finish(&self.speaking, id);

        match result {
            None => Ok(SpeakOutcome::Cancelled),
            Some(Ok(())) => Ok(SpeakOutcome::Finished),
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Speech synthesis failed");
                Err(VoiceError::Synthesis(e.to_string()))
            }
        }
    }

    /// Stop the utterance in progress, if any
    pub fn stop_speaking(&self) {
        if let Some(active) = self.speaking.lock().take() {
            let _ = active.cancel.send(());
            if let Some(synthesizer) = &self.synthesizer {
                synthesizer.cancel();
            }
        }
    }

    /// Register a new session in `slot`, cancelling the previous one
    ///
    /// Returns the session id, its cancel signal, and whether a previous
    /// session was still in flight.
    fn begin(&self, slot: &Mutex<Option<ActiveHandle>>) -> (u64, oneshot::Receiver<()>, bool) {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = oneshot::channel();
        let previous = slot.lock().replace(ActiveHandle { id, cancel: tx });
        let superseded = previous.is_some();
        if let Some(previous) = previous {
            let _ = previous.cancel.send(());
        }
        (id, rx, superseded)
    }

    /// Clear `slot` if it still holds session `id`
    fn finish(&self, slot: &Mutex<Option<ActiveHandle>>, id: u64) {
        let mut active = slot.lock();
        if active.as_ref().map(|a| a.id) == Some(id) {
            *active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use calorisensei_core::{Result as CoreResult, VoiceInfo};
    use calorisensei_text_processing::localization::disclaimer;
    use std::sync::atomic::AtomicUsize;

    /// Recognizer that hears `reply` after `delay`
    struct ScriptedRecognizer {
        reply: CoreResult<Option<String>>,
        delay: Duration,
        locales: Mutex<Vec<String>>,
        aborts: AtomicUsize,
    }

    impl ScriptedRecognizer {
        fn new(reply: CoreResult<Option<String>>, delay: Duration) -> Self {
            Self {
                reply,
                delay,
                locales: Mutex::new(Vec::new()),
                aborts: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl SpeechRecognizer for ScriptedRecognizer {
        async fn recognize_once(&self, locale: &str) -> CoreResult<Option<String>> {
            self.locales.lock().push(locale.to_string());
            tokio::time::sleep(self.delay).await;
            self.reply.clone()
        }

        fn abort(&self) {
            self.aborts.fetch_add(1, Ordering::SeqCst);
        }

        fn engine_name(&self) -> &str {
            "scripted"
        }
    }

    /// Synthesizer whose utterances take one second each
    struct RecordingSynthesizer {
        spoken: Mutex<Vec<(String, String, Option<String>)>>,
        cancels: AtomicUsize,
        installed: Vec<VoiceInfo>,
    }

    impl RecordingSynthesizer {
        fn new() -> Self {
            Self {
                spoken: Mutex::new(Vec::new()),
                cancels: AtomicUsize::new(0),
                installed: vec![
                    VoiceInfo::new("samantha", "en-US").as_default(),
                    VoiceInfo::new("lekha", "hi-IN"),
                    VoiceInfo::new("thomas", "fr-CA"),
                ],
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for RecordingSynthesizer {
        async fn speak(&self, text: &str, locale: &str, voice: Option<&VoiceInfo>) -> CoreResult<()> {
            self.spoken.lock().push((
                text.to_string(),
                locale.to_string(),
                voice.map(|v| v.id.clone()),
            ));
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        }

        fn cancel(&self) {
            self.cancels.fetch_add(1, Ordering::SeqCst);
        }

        fn voices(&self) -> Vec<VoiceInfo> {
            self.installed.clone()
        }

        fn engine_name(&self) -> &str {
            "recording"
        }
    }

    fn speaking_adapter() -> (Arc<VoiceAdapter>, Arc<RecordingSynthesizer>) {
        let synth = Arc::new(RecordingSynthesizer::new());
        let adapter = VoiceAdapter::new(None, Some(synth.clone()));
        adapter.set_output_enabled(true);
        (Arc::new(adapter), synth)
    }

    #[test]
    fn test_strip_for_speech() {
        let reply = format!(
            "💪 **Exercise:** Push-ups, 3 sets\n\n📊 Macronutrients: 20g protein{}",
            disclaimer(Language::English)
        );
        assert_eq!(
            strip_for_speech(&reply),
            "Exercise: Push-ups, 3 sets\nMacronutrients: 20g protein"
        );
        assert_eq!(strip_for_speech("🔥🔥"), "");
    }

    #[tokio::test]
    async fn test_missing_capabilities() {
        let adapter = VoiceAdapter::new(None, None);
        adapter.set_output_enabled(true);
        assert!(!adapter.supports_input());
        assert_eq!(
            adapter.listen(Language::English).await,
            Err(VoiceError::Unsupported("Speech recognition"))
        );
        assert_eq!(
            adapter.speak("hello", Language::English).await,
            Err(VoiceError::Unsupported("Speech synthesis"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_output_toggle_checked_on_every_call() {
        let (adapter, synth) = speaking_adapter();
        adapter.set_output_enabled(false);
        assert_eq!(
            adapter.speak("Drink water.", Language::English).await,
            Ok(SpeakOutcome::Suppressed)
        );
        assert!(synth.spoken.lock().is_empty());

        adapter.set_output_enabled(true);
        assert_eq!(
            adapter.speak("Drink water.", Language::English).await,
            Ok(SpeakOutcome::Finished)
        );
        assert_eq!(synth.spoken.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_voice_selection_by_locale() {
        let (adapter, synth) = speaking_adapter();
        adapter.speak("नमस्ते", Language::Hindi).await.unwrap();
        adapter.speak("Bonjour", Language::French).await.unwrap();
        adapter.speak("કેમ છો", Language::Gujarati).await.unwrap();

        let spoken = synth.spoken.lock();
        assert_eq!(spoken[0].1, "hi-IN");
        assert_eq!(spoken[0].2.as_deref(), Some("lekha"));
        assert_eq!(spoken[1].2.as_deref(), Some("thomas"));
        assert_eq!(spoken[2].1, "gu-IN");
        assert_eq!(spoken[2].2.as_deref(), Some("samantha"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_utterance_cancels_previous() {
        let (adapter, synth) = speaking_adapter();

        let first = {
            let adapter = adapter.clone();
            tokio::spawn(async move { adapter.speak("First answer", Language::English).await })
        };
        tokio::task::yield_now().await;
        assert!(adapter.is_speaking());

        let second = adapter.speak("Second answer", Language::English).await;
        assert_eq!(second, Ok(SpeakOutcome::Finished));
        assert_eq!(first.await.unwrap(), Ok(SpeakOutcome::Cancelled));
        assert_eq!(synth.cancels.load(Ordering::SeqCst), 1);
        assert!(!adapter.is_speaking());
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_waits_auto_submit_delay() {
        let recognizer = Arc::new(ScriptedRecognizer::new(
            Ok(Some(" hola, necesito una dieta ".to_string())),
            Duration::from_secs(2),
        ));
        let adapter = VoiceAdapter::new(Some(recognizer.clone()), None);
        let start = tokio::time::Instant::now();

        let transcript = adapter.listen(Language::Spanish).await;

        assert_eq!(transcript, Ok(Some("hola, necesito una dieta".to_string())));
        assert_eq!(start.elapsed(), Duration::from_millis(2500));
        assert_eq!(recognizer.locales.lock().as_slice(), ["es-ES".to_string()]);
        assert!(!adapter.is_listening());
    }

    #[tokio::test(start_paused = true)]
    async fn test_listen_errors_clear_listening_flag() {
        let failing = Arc::new(ScriptedRecognizer::new(
            Err(calorisensei_core::Error::Recognition("network".into())),
            Duration::from_millis(100),
        ));
        let adapter = VoiceAdapter::new(Some(failing), None);
        assert!(matches!(
            adapter.listen(Language::English).await,
            Err(VoiceError::Recognition(_))
        ));
        assert!(!adapter.is_listening());

        let silent = Arc::new(ScriptedRecognizer::new(Ok(None), Duration::from_millis(100)));
        let adapter = VoiceAdapter::new(Some(silent), None);
        assert_eq!(adapter.listen(Language::English).await, Err(VoiceError::NoSpeech));
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_listen_supersedes_previous() {
        let recognizer = Arc::new(ScriptedRecognizer::new(
            Ok(Some("best chest exercises".to_string())),
            Duration::from_secs(5),
        ));
        let adapter = Arc::new(VoiceAdapter::new(Some(recognizer.clone()), None));

        let first = {
            let adapter = adapter.clone();
            tokio::spawn(async move { adapter.listen(Language::English).await })
        };
        tokio::task::yield_now().await;
        assert!(adapter.is_listening());

        let second = adapter.listen(Language::English).await;
        assert_eq!(second, Ok(Some("best chest exercises".to_string())));
        assert_eq!(first.await.unwrap(), Ok(None));
        assert_eq!(recognizer.aborts.load(Ordering::SeqCst), 1);
    }
}
