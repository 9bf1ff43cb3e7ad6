//! Centralized constants for the assistant
//!
//! Single source of truth for the fixed values of the chat pipeline. The
//! settings structs use these as their defaults.

/// Response cache
pub mod cache {
    /// Entries older than this are treated as misses (1 hour)
    pub const EXPIRY_SECS: u64 = 60 * 60;
}

/// Retry policy around the completion call
pub mod retry {
    /// Total attempts, including the first
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Base delay; the n-th retry waits `BASE_DELAY_MS * 2^n` plus jitter
    pub const BASE_DELAY_MS: u64 = 1_000;

    /// Upper bound of the random jitter added to each delay
    pub const MAX_JITTER_MS: u64 = 1_000;

    /// Ceiling for a single delay
    pub const MAX_DELAY_MS: u64 = 10_000;
}

/// Completion endpoint and generation parameters
pub mod completion {
    /// Generative-language API base
    pub const ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

    /// Faster, cheaper model for short queries
    pub const FAST_MODEL: &str = "gemini-1.5-flash";

    /// Higher-capacity model for long or compound queries
    pub const CAPABLE_MODEL: &str = "gemini-1.5-pro";

    /// Queries with more words than this go to the capable model
    pub const COMPLEX_QUERY_WORDS: usize = 15;

    pub const TEMPERATURE: f32 = 0.2;
    pub const TOP_P: f32 = 0.7;
    pub const MAX_OUTPUT_TOKENS: u32 = 800;

    /// Per-request HTTP timeout
    pub const TIMEOUT_SECS: u64 = 30;
}

/// Voice I/O
pub mod voice {
    /// Pause between a recognized transcript and its auto-submission
    pub const AUTO_SUBMIT_DELAY_MS: u64 = 500;
}

/// Connectivity banners
pub mod connectivity {
    /// How long the "connection restored" banner stays up
    pub const RESTORED_BANNER_SECS: u64 = 3;
}

/// Local persisted mirror
pub mod mirror {
    /// Key holding the last fetched health summary
    pub const HEALTH_DATA_KEY: &str = "healthData";
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Backend serving the user's health summary
    pub const HEALTH_DATA_DEFAULT: &str = "http://localhost:5000/api/health-data";

    /// Timeout for one health summary fetch
    pub const HEALTH_DATA_TIMEOUT_SECS: u64 = 10;
}

/// HTTP chat sessions
pub mod sessions {
    /// Upper bound on live sessions
    pub const MAX_SESSIONS: usize = 1_000;

    /// Sessions idle longer than this are swept (1 hour)
    pub const IDLE_TIMEOUT_SECS: u64 = 60 * 60;

    /// How often the sweep runs (5 minutes)
    pub const CLEANUP_INTERVAL_SECS: u64 = 5 * 60;
}
