//! Emergency keyword screening
//!
//! A match means the pipeline must answer with the emergency notice and
//! never reach the cache or the completion endpoint.

/// Clinical and safety phrases that trigger the short-circuit
///
/// Matched as lower-case substrings, so "stroke" also covers "heat stroke".
pub const EMERGENCY_KEYWORDS: &[&str] = &[
    // Cardiac
    "chest pain",
    "heart attack",
    "irregular heartbeat",
    "heart palpitations",
    // Respiratory
    "difficulty breathing",
    "shortness of breath",
    "can't breathe",
    "cant breathe",
    "cannot breathe",
    "choking",
    "airway blocked",
    // Bleeding and trauma
    "severe bleeding",
    "uncontrollable bleeding",
    "severe burn",
    "chemical burn",
    // Neurological
    "paralysis",
    "sudden weakness",
    "facial drooping",
    "slurred speech",
    "seizure",
    "convulsion",
    "stroke",
    "severe headache",
    "worst headache",
    "confusion",
    "disorientation",
    "unconscious",
    "unresponsive",
    "fainted",
    // Psychiatric
    "suicidal",
    "homicidal",
    "self harm",
    // Toxic and allergic
    "poisoning",
    "overdose",
    "ingested",
    "anaphylaxis",
    "allergic reaction",
    // Abdominal
    "severe abdominal pain",
    "appendicitis",
    // Exercise and nutrition specific
    "rhabdomyolysis",
    "heat exhaustion",
    "severe dehydration",
    "collapsed during",
    "passed out",
    "dark urine after workout",
    "hypoglycemia",
];

/// Case-insensitive substring screen over a fixed phrase list
#[derive(Debug, Clone)]
pub struct EmergencyClassifier {
    keywords: Vec<String>,
}

impl Default for EmergencyClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl EmergencyClassifier {
    /// Classifier over [`EMERGENCY_KEYWORDS`]
    pub fn new() -> Self {
        Self::with_keywords(EMERGENCY_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    /// First listed phrase found in `text`
    pub fn first_match(&self, text: &str) -> Option<&str> {
        let lowered = text.to_lowercase();
        self.keywords
            .iter()
            .find(|k| lowered.contains(k.as_str()))
            .map(String::as_str)
    }

    pub fn is_emergency(&self, text: &str) -> bool {
        self.first_match(text).is_some()
    }
}
