//! Input sanitizing and cache-key normalization
//!
//! Static patterns are compiled once using `once_cell::sync::Lazy`.

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximum sanitized length, in code points
pub const MAX_INPUT_CHARS: usize = 800;

/// Everything outside letters, combining marks, digits, whitespace and `. , ? ! - : ; ( ) '`.
/// Variation selectors are marks too but only ever decorate emoji.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[^\p{L}\p{M}\p{N}\s.,?!\-:;()']|[\x{FE00}-\x{FE0F}]").unwrap()
});

static NON_KEY_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\p{L}\p{M}\p{N}\s]|[\x{FE00}-\x{FE0F}]").unwrap());

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Clean raw user text before it enters the pipeline
///
/// An empty result means there is nothing to send. Idempotent, and the
/// output never exceeds [`MAX_INPUT_CHARS`] code points.
pub fn sanitize_input(raw: &str) -> String {
    let kept = DISALLOWED.replace_all(raw, "");
    let truncated: String = kept.trim().chars().take(MAX_INPUT_CHARS).collect();
    truncated.trim().to_string()
}

/// Normalize text into a response-cache key
///
/// Lower-cases, drops punctuation, collapses whitespace. Inputs that differ
/// only in case or punctuation share a key.
pub fn cache_key(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    let stripped = NON_KEY_CHARS.replace_all(&lowered, "");
    WHITESPACE_RUN.replace_all(&stripped, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_disallowed_symbols() {
        assert_eq!(sanitize_input("  hi <script>@#$ there!  "), "hi script there!");
        assert_eq!(sanitize_input("I can't breathe"), "I can't breathe");
        assert_eq!(sanitize_input("10 kg (approx.); ok?"), "10 kg (approx.); ok?");
    }

    #[test]
    fn test_keeps_unicode_letters_and_marks() {
        assert_eq!(sanitize_input("કેમ છો?"), "કેમ છો?");
        assert_eq!(sanitize_input("मुझे वजन कम करना है"), "मुझे वजन कम करना है");
        assert_eq!(sanitize_input("¿Cómo estás? 💪"), "Cómo estás?");
    }

    #[test]
    fn test_empty_after_sanitizing() {
        assert_eq!(sanitize_input("   "), "");
        assert_eq!(sanitize_input("💪🍽️🔥"), "");
        assert_eq!(sanitize_input(""), "");
    }

    #[test]
    fn test_truncates_to_max_code_points() {
        let long = "é".repeat(MAX_INPUT_CHARS + 50);
        let out = sanitize_input(&long);
        assert_eq!(out.chars().count(), MAX_INPUT_CHARS);

        // Truncation can expose trailing whitespace; it must be trimmed too
        let padded = format!("{} tail", "a".repeat(MAX_INPUT_CHARS - 1));
        let out = sanitize_input(&padded);
        assert_eq!(out.chars().count(), MAX_INPUT_CHARS - 1);
        assert!(!out.ends_with(' '));
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let samples = [
            "  Best chest exercises?? 💪💪 ",
            "protein shake recipe, <b>please</b>",
            &format!("{} x", "word ".repeat(300)),
            "મારે વજન ઘટાડવું છે!!",
            "\t\nhola ¿qué tal?\n",
        ];
        for raw in samples {
            let once = sanitize_input(raw);
            assert_eq!(sanitize_input(&once), once, "not idempotent for {:?}", raw);
            assert!(once.chars().count() <= MAX_INPUT_CHARS);
        }
    }

    #[test]
    fn test_cache_key_normalization() {
        assert_eq!(cache_key("Protein shake recipe!"), "protein shake recipe");
        assert_eq!(cache_key("  PROTEIN   shake, recipe "), "protein shake recipe");
        assert_eq!(cache_key("protein shake recipe"), cache_key("Protein Shake Recipe?!"));
        assert_ne!(cache_key("protein shake"), cache_key("protein shakes"));
    }
}
