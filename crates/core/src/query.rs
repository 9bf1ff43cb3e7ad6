//! Coarse intent categories

use serde::{Deserialize, Serialize};

/// Intent category used to scope which answer sections are requested
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Exercise,
    Nutrition,
    Recipe,
    Training,
    #[default]
    General,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exercise => "exercise",
            Self::Nutrition => "nutrition",
            Self::Recipe => "recipe",
            Self::Training => "training",
            Self::General => "general",
        }
    }

    /// Whether the answer may contain an exercise section
    pub fn wants_exercise(&self) -> bool {
        matches!(self, Self::Exercise | Self::General)
    }

    /// Whether the answer may contain a nutrition section
    pub fn wants_nutrition(&self) -> bool {
        matches!(self, Self::Nutrition | Self::General)
    }

    /// Whether the answer may contain a macronutrient breakdown
    pub fn wants_macros(&self) -> bool {
        matches!(self, Self::Nutrition | Self::Recipe | Self::General)
    }

    /// Whether the answer may contain a recipe section
    pub fn wants_recipe(&self) -> bool {
        matches!(self, Self::Recipe | Self::General)
    }
}

impl std::fmt::Display for QueryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
