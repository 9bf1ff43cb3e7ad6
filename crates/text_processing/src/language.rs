//! Heuristic language detection
//!
//! An ordered rule chain, first match wins: script-block counts, then
//! common-word lists, then English. False negatives on short or mixed
//! input are expected.

use calorisensei_core::{Language, Script};
use regex::Regex;

/// Minimum characters from a script block before it decides the language
pub const SCRIPT_THRESHOLD: usize = 3;

const SPANISH_WORDS: &[&str] = &["hola", "como", "cómo", "gracias", "buenos", "días"];
const FRENCH_WORDS: &[&str] = &["bonjour", "merci", "comment", "salut"];

enum Rule {
    /// At least `min` characters of the script, counted anywhere in the text
    Script { script: Script, min: usize },
    /// Any listed word as a whole word, case-insensitive
    Words(Regex),
}

impl Rule {
    fn words(words: &[&str]) -> Option<Self> {
        let alternation = words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b(?:{})\b", alternation))
            .ok()
            .map(Rule::Words)
    }

    fn matches(&self, text: &str) -> bool {
        match self {
            Rule::Script { script, min } => script.count_in(text) >= *min,
            Rule::Words(pattern) => pattern.is_match(text),
        }
    }
}

/// Rule-chain language detector
pub struct LanguageDetector {
    rules: Vec<(Rule, Language)>,
}

impl Default for LanguageDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl LanguageDetector {
    pub fn new() -> Self {
        let script = |script: Script| Rule::Script {
            script,
            min: SCRIPT_THRESHOLD,
        };

        let mut rules = vec![
            (script(Script::Arabic), Language::Arabic),
            (script(Script::Devanagari), Language::Hindi),
            (script(Script::Gujarati), Language::Gujarati),
        ];
        if let Some(rule) = Rule::words(SPANISH_WORDS) {
            rules.push((rule, Language::Spanish));
        }
        if let Some(rule) = Rule::words(FRENCH_WORDS) {
            rules.push((rule, Language::French));
        }

        Self { rules }
    }

    /// Detect the language of `text`, defaulting to English
    pub fn detect(&self, text: &str) -> Language {
        let language = self
            .rules
            .iter()
            .find(|(rule, _)| rule.matches(text))
            .map(|(_, language)| *language)
            .unwrap_or_default();

        tracing::trace!(language = %language, "Detected language");
        language
    }
}
