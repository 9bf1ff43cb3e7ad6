//! Text processing for the CaloriSensei assistant
//!
//! Everything here is rule-based and synchronous:
//! - **Sanitizing**: strip unsupported characters, cap length, derive cache keys
//! - **Emergency screening**: fixed clinical phrase list that short-circuits the pipeline
//! - **Language detection**: script-block counts, then common words
//! - **Intent classification**: ordered keyword sets per query type
//! - **Localization**: disclaimers, emergency notices, error and status texts
//!
//! # Example
//!
//! ```
//! use calorisensei_core::{Language, QueryType};
//! use calorisensei_text_processing::{sanitize_input, LanguageDetector, QueryClassifier};
//!
//! let clean = sanitize_input("  Bonjour! Une recette de crêpes protéinées? 🥞 ");
//! assert_eq!(LanguageDetector::new().detect(&clean), Language::French);
//! assert_eq!(QueryClassifier::new().classify("protein shake recipe"), QueryType::Recipe);
//! ```

pub mod emergency;
pub mod intent;
pub mod language;
pub mod localization;
pub mod sanitize;

pub use emergency::{EmergencyClassifier, EMERGENCY_KEYWORDS};
pub use intent::QueryClassifier;
pub use language::LanguageDetector;
pub use sanitize::{cache_key, sanitize_input, MAX_INPUT_CHARS};
