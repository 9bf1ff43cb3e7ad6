//! Language tags understood by the assistant
//!
//! The tag set is closed: prompt templates, disclaimers, error texts and
//! voice locales are all keyed by it.

use serde::{Deserialize, Serialize};

/// Supported languages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
    French,
    Arabic,
    Hindi,
    Gujarati,
}

impl Language {
    /// Get ISO 639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
            Self::French => "fr",
            Self::Arabic => "ar",
            Self::Hindi => "hi",
            Self::Gujarati => "gu",
        }
    }

    /// Get human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
            Self::French => "French",
            Self::Arabic => "Arabic",
            Self::Hindi => "Hindi",
            Self::Gujarati => "Gujarati",
        }
    }

    /// BCP 47 locale used when picking speech voices
    pub fn voice_locale(&self) -> &'static str {
        match self {
            Self::English => "en-US",
            Self::Spanish => "es-ES",
            Self::French => "fr-FR",
            Self::Arabic => "ar-SA",
            Self::Hindi => "hi-IN",
            Self::Gujarati => "gu-IN",
        }
    }

    /// Get script used by this language
    pub fn script(&self) -> Script {
        match self {
            Self::English | Self::Spanish | Self::French => Script::Latin,
            Self::Arabic => Script::Arabic,
            Self::Hindi => Script::Devanagari,
            Self::Gujarati => Script::Gujarati,
        }
    }

    /// Check if this language uses right-to-left script
    pub fn is_rtl(&self) -> bool {
        matches!(self.script(), Script::Arabic)
    }

    /// Parse from string (case-insensitive)
    pub fn from_str_loose(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        match s.as_str() {
            "en" | "eng" | "english" => Some(Self::English),
            "es" | "spa" | "spanish" | "español" | "espanol" => Some(Self::Spanish),
            "fr" | "fra" | "fre" | "french" | "français" | "francais" => Some(Self::French),
            "ar" | "ara" | "arabic" => Some(Self::Arabic),
            "hi" | "hin" | "hindi" => Some(Self::Hindi),
            "gu" | "guj" | "gujarati" => Some(Self::Gujarati),
            _ => None,
        }
    }

    /// Get all supported languages
    pub fn all() -> &'static [Language] {
        &[
            Self::English,
            Self::Spanish,
            Self::French,
            Self::Arabic,
            Self::Hindi,
            Self::Gujarati,
        ]
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Script systems the detector distinguishes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Script {
    Latin,
    Arabic,
    Devanagari,
    Gujarati,
}

impl Script {
    /// Get Unicode range for this script (first block only)
    pub fn unicode_range(&self) -> (u32, u32) {
        match self {
            Self::Latin => (0x0000, 0x007F),
            Self::Arabic => (0x0600, 0x06FF),
            Self::Devanagari => (0x0900, 0x097F),
            Self::Gujarati => (0x0A80, 0x0AFF),
        }
    }

    /// Check if a character belongs to this script
    pub fn contains_char(&self, c: char) -> bool {
        let code = c as u32;
        let (start, end) = self.unicode_range();
        code >= start && code <= end
    }

    /// Count characters of this script in `text`
    pub fn count_in(&self, text: &str) -> usize {
        text.chars().filter(|c| self.contains_char(*c)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_code() {
        assert_eq!(Language::Gujarati.code(), "gu");
        assert_eq!(Language::French.code(), "fr");
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::default(), Language::English);
    }

    #[test]
    fn test_language_script() {
        assert_eq!(Language::Hindi.script(), Script::Devanagari);
        assert_eq!(Language::Gujarati.script(), Script::Gujarati);
        assert_eq!(Language::Spanish.script(), Script::Latin);
        assert!(Language::Arabic.is_rtl());
        assert!(!Language::Hindi.is_rtl());
    }

    #[test]
    fn test_language_from_str() {
        assert_eq!(Language::from_str_loose("gu"), Some(Language::Gujarati));
        assert_eq!(Language::from_str_loose(" French "), Some(Language::French));
        assert_eq!(Language::from_str_loose("ES"), Some(Language::Spanish));
        assert_eq!(Language::from_str_loose("klingon"), None);
    }

    #[test]
    fn test_script_count() {
        assert_eq!(Script::Gujarati.count_in("કેમ છો"), 5);
        assert_eq!(Script::Devanagari.count_in("hello"), 0);
        assert_eq!(Script::Arabic.count_in("مرحبا"), 5);
    }

    #[test]
    fn test_voice_locales_are_distinct() {
        let mut locales: Vec<_> = Language::all().iter().map(|l| l.voice_locale()).collect();
        locales.sort();
        locales.dedup();
        assert_eq!(locales.len(), Language::all().len());
    }
}
