//! Model selection by query complexity

use calorisensei_config::constants::completion::COMPLEX_QUERY_WORDS;
use calorisensei_config::CompletionConfig;

/// Picks the fast or the capable model for an input
#[derive(Debug, Clone)]
pub struct ModelSelector {
    fast_model: String,
    capable_model: String,
    word_threshold: usize,
}

impl Default for ModelSelector {
    fn default() -> Self {
        Self::from(&CompletionConfig::default())
    }
}

impl From<&CompletionConfig> for ModelSelector {
    fn from(config: &CompletionConfig) -> Self {
        Self::new(config.fast_model.clone(), config.capable_model.clone())
    }
}

impl ModelSelector {
    pub fn new(fast_model: impl Into<String>, capable_model: impl Into<String>) -> Self {
        Self {
            fast_model: fast_model.into(),
            capable_model: capable_model.into(),
            word_threshold: COMPLEX_QUERY_WORDS,
        }
    }

    /// Capable model when the input has more than 15 space-separated words
    /// or contains a comma, fast model otherwise
    pub fn select(&self, input: &str) -> &str {
        if Self::is_complex(input, self.word_threshold) {
            &self.capable_model
        } else {
            &self.fast_model
        }
    }

    // Splits on single spaces, so runs of spaces count as extra words
    fn is_complex(input: &str, word_threshold: usize) -> bool {
        input.split(' ').count() > word_threshold || input.contains(',')
    }
}
