//! Voice metadata and selection

use serde::{Deserialize, Serialize};

/// A voice installed in a speech synthesis engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoiceInfo {
    /// Engine-specific identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// BCP 47 locale, e.g. `hi-IN`
    pub locale: String,
    /// Engine default voice
    #[serde(default)]
    pub is_default: bool,
}

impl VoiceInfo {
    pub fn new(id: impl Into<String>, locale: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            locale: locale.into(),
            is_default: false,
        }
    }

    pub fn as_default(mut self) -> Self {
        self.is_default = true;
        self
    }

    fn language_prefix(&self) -> &str {
        self.locale.split(|c: char| c == '-' || c == '_').next().unwrap_or("")
    }
}

/// Outcome of picking a voice for a locale
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VoiceSelection {
    /// Voice installed for the exact locale
    Exact(VoiceInfo),
    /// Same language, different region
    SameLanguage(VoiceInfo),
    /// Nothing matched; use this engine default
    Default(VoiceInfo),
    /// Nothing matched and the engine flagged no default
    EngineDefault,
}

impl VoiceSelection {
    /// Pick the best voice for `locale` from the installed set
    pub fn pick(voices: &[VoiceInfo], locale: &str) -> Self {
        if let Some(v) = voices.iter().find(|v| v.locale.eq_ignore_ascii_case(locale)) {
            return Self::Exact(v.clone());
        }

        let prefix = locale.split(|c: char| c == '-' || c == '_').next().unwrap_or(locale);
        if let Some(v) = voices
            .iter()
            .find(|v| v.language_prefix().eq_ignore_ascii_case(prefix))
        {
            return Self::SameLanguage(v.clone());
        }

        match voices.iter().find(|v| v.is_default) {
            Some(v) => Self::Default(v.clone()),
            None => Self::EngineDefault,
        }
    }

    /// Voice to hand to the engine (`None` = let the engine decide)
    pub fn voice(&self) -> Option<&VoiceInfo> {
        match self {
            Self::Exact(v) | Self::SameLanguage(v) | Self::Default(v) => Some(v),
            Self::EngineDefault => None,
        }
    }
}
