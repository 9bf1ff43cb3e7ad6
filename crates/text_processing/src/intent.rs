//! Query intent classification
//!
//! Categories are checked in a fixed order and the first one with a keyword
//! present in the lower-cased text wins. A text matching several keyword
//! sets gets the earliest category.

use calorisensei_core::QueryType;

/// Ordered (category, keywords) chain
pub const QUERY_RULES: &[(QueryType, &[&str])] = &[
    (
        QueryType::Exercise,
        &[
            "exercise",
            "workout",
            "cardio",
            "strength",
            "training program",
            "routine",
        ],
    ),
    (
        QueryType::Recipe,
        &["recipe", "cook", "meal prep", "dish", "food preparation"],
    ),
    (
        QueryType::Nutrition,
        &["food", "eat", "diet", "nutrition", "meal", "macros"],
    ),
    (
        QueryType::Training,
        &[
            "athlete",
            "training",
            "performance",
            "sport",
            "competition",
            "bulking",
        ],
    ),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct QueryClassifier;

impl QueryClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, text: &str) -> QueryType {
        let lowered = text.to_lowercase();
        QUERY_RULES
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
            .map(|(query_type, _)| *query_type)
            .unwrap_or_default()
    }
}
