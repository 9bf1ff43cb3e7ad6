//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::{cache, completion, connectivity, endpoints, retry, sessions, voice};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion endpoint configuration
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Retry policy for completion calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response cache configuration
    #[serde(default)]
    pub cache: CacheConfig,

    /// Voice I/O configuration
    #[serde(default)]
    pub voice: VoiceConfig,

    /// Health summary mirror configuration
    #[serde(default)]
    pub health: HealthConfig,

    /// Observability configuration
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

impl Settings {
    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.validate_completion()?;
        self.validate_retry()?;
        self.validate_cache()?;
        self.validate_health()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port cannot be 0".to_string(),
            });
        }
        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "At least one session must be allowed".to_string(),
            });
        }
        if self.server.session_timeout_secs == 0 || self.server.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.session_timeout_secs".to_string(),
                message: "Session timeout and cleanup interval cannot be 0".to_string(),
            });
        }
        Ok(())
    }

    fn validate_completion(&self) -> Result<(), ConfigError> {
        let c = &self.completion;

        if c.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingField("completion.endpoint".to_string()));
        }

        if c.fast_model.trim().is_empty() || c.capable_model.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "completion.fast_model/capable_model".to_string(),
                message: "Model names cannot be empty".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(ConfigError::InvalidValue {
                field: "completion.temperature".to_string(),
                message: format!("Temperature {} outside 0.0-2.0", c.temperature),
            });
        }

        if !(0.0..=1.0).contains(&c.top_p) || c.top_p == 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.top_p".to_string(),
                message: format!("top_p {} outside (0.0, 1.0]", c.top_p),
            });
        }

        if c.max_output_tokens == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.max_output_tokens".to_string(),
                message: "Must be positive".to_string(),
            });
        }

        if c.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "completion.timeout_secs".to_string(),
                message: "Timeout cannot be 0".to_string(),
            });
        }

        Ok(())
    }

    fn validate_retry(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                message: "At least one attempt is required".to_string(),
            });
        }

        if self.retry.max_delay_ms < self.retry.base_delay_ms {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_delay_ms".to_string(),
                message: format!(
                    "Ceiling {}ms is below the base delay {}ms",
                    self.retry.max_delay_ms, self.retry.base_delay_ms
                ),
            });
        }

        Ok(())
    }

    fn validate_cache(&self) -> Result<(), ConfigError> {
        if self.cache.expiry_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "cache.expiry_secs".to_string(),
                message: "Expiry cannot be 0".to_string(),
            });
        }
        Ok(())
    }

    fn validate_health(&self) -> Result<(), ConfigError> {
        if self.health.timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "health.timeout_secs".to_string(),
                message: "Timeout cannot be 0".to_string(),
            });
        }
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server host
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins (empty = permissive)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum live chat sessions
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time after which a session is removed
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    /// Interval of the expired-session sweep
    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_max_sessions() -> usize {
    sessions::MAX_SESSIONS
}

fn default_session_timeout() -> u64 {
    sessions::IDLE_TIMEOUT_SECS
}

fn default_cleanup_interval() -> u64 {
    sessions::CLEANUP_INTERVAL_SECS
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
        }
    }
}

/// Completion endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// API base, without trailing `/models/...`
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// API key (falls back to `GEMINI_API_KEY`)
    #[serde(default = "default_api_key")]
    pub api_key: String,

    /// Model for short, simple queries
    #[serde(default = "default_fast_model")]
    pub fast_model: String,

    /// Model for long or compound queries
    #[serde(default = "default_capable_model")]
    pub capable_model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_top_p")]
    pub top_p: f32,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_completion_timeout")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    completion::ENDPOINT.to_string()
}

fn default_api_key() -> String {
    std::env::var("GEMINI_API_KEY").unwrap_or_default()
}

fn default_fast_model() -> String {
    completion::FAST_MODEL.to_string()
}

fn default_capable_model() -> String {
    completion::CAPABLE_MODEL.to_string()
}

fn default_temperature() -> f32 {
    completion::TEMPERATURE
}

fn default_top_p() -> f32 {
    completion::TOP_P
}

fn default_max_output_tokens() -> u32 {
    completion::MAX_OUTPUT_TOKENS
}

fn default_completion_timeout() -> u64 {
    completion::TIMEOUT_SECS
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            api_key: default_api_key(),
            fast_model: default_fast_model(),
            capable_model: default_capable_model(),
            temperature: default_temperature(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: default_completion_timeout(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_base_delay_ms")]
    pub base_delay_ms: u64,

    #[serde(default = "default_max_jitter_ms")]
    pub max_jitter_ms: u64,

    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,
}

fn default_max_attempts() -> u32 {
    retry::MAX_ATTEMPTS
}

fn default_base_delay_ms() -> u64 {
    retry::BASE_DELAY_MS
}

fn default_max_jitter_ms() -> u64 {
    retry::MAX_JITTER_MS
}

fn default_max_delay_ms() -> u64 {
    retry::MAX_DELAY_MS
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            base_delay_ms: default_base_delay_ms(),
            max_jitter_ms: default_max_jitter_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

/// Response cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "default_expiry_secs")]
    pub expiry_secs: u64,
}

fn default_expiry_secs() -> u64 {
    cache::EXPIRY_SECS
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            expiry_secs: default_expiry_secs(),
        }
    }
}

/// Voice I/O configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoiceConfig {
    /// Accept speech input when a recognizer is available
    #[serde(default = "default_true")]
    pub input_enabled: bool,

    /// Speak AI replies aloud
    #[serde(default)]
    pub output_enabled: bool,

    /// Delay before a recognized transcript is submitted
    #[serde(default = "default_auto_submit_delay_ms")]
    pub auto_submit_delay_ms: u64,

    /// How long the "connection restored" banner stays up
    #[serde(default = "default_restored_banner_secs")]
    pub restored_banner_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_auto_submit_delay_ms() -> u64 {
    voice::AUTO_SUBMIT_DELAY_MS
}

fn default_restored_banner_secs() -> u64 {
    connectivity::RESTORED_BANNER_SECS
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            input_enabled: true,
            output_enabled: false,
            auto_submit_delay_ms: default_auto_submit_delay_ms(),
            restored_banner_secs: default_restored_banner_secs(),
        }
    }
}

/// Health summary mirror configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Endpoint returning the user's health summary
    #[serde(default = "default_health_url")]
    pub url: String,

    /// JSON file backing the local mirror
    #[serde(default = "default_mirror_path")]
    pub mirror_path: String,

    /// Timeout for one fetch of the summary
    #[serde(default = "default_health_timeout")]
    pub timeout_secs: u64,
}

fn default_health_url() -> String {
    endpoints::HEALTH_DATA_DEFAULT.to_string()
}

fn default_mirror_path() -> String {
    "data/local_storage.json".to_string()
}

fn default_health_timeout() -> u64 {
    endpoints::HEALTH_DATA_TIMEOUT_SECS
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            url: default_health_url(),
            mirror_path: default_mirror_path(),
            timeout_secs: default_health_timeout(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Load settings from files and environment
///
/// Priority (highest to lowest):
/// 1. Environment variables (CALORISENSEI_ prefix, `__` separator)
/// 2. config/{env}.yaml (if env specified)
/// 3. config/default.yaml
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same as [`load_settings`] with an explicit config directory
pub fn load_settings_from(dir: &str, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name(&format!("{}/default", dir)).required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("{}/{}", dir, env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("CALORISENSEI")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    tracing::debug!(
        fast_model = %settings.completion.fast_model,
        capable_model = %settings.completion.capable_model,
        "Settings loaded"
    );

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.cache.expiry_secs, 3600);
        assert_eq!(settings.completion.max_output_tokens, 800);
        assert_eq!(settings.completion.temperature, 0.2);
        assert!(!settings.voice.output_enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_retry_validation() {
        let mut settings = Settings::default();
        settings.retry.max_attempts = 0;
        assert!(settings.validate().is_err());

        settings.retry.max_attempts = 3;
        settings.retry.max_delay_ms = 10;
        assert!(settings.validate_retry().is_err());
    }

    #[test]
    fn test_completion_validation() {
        let mut settings = Settings::default();

        settings.completion.temperature = 3.5;
        assert!(settings.validate_completion().is_err());
        settings.completion.temperature = 0.2;

        settings.completion.top_p = 0.0;
        assert!(settings.validate_completion().is_err());
        settings.completion.top_p = 0.7;

        settings.completion.fast_model = "  ".to_string();
        assert!(settings.validate_completion().is_err());
        settings.completion.fast_model = "gemini-1.5-flash".to_string();

        assert!(settings.validate_completion().is_ok());
    }

    #[test]
    fn test_server_and_cache_validation() {
        let mut settings = Settings::default();
        settings.server.port = 0;
        assert!(settings.validate().is_err());
        settings.server.port = 8080;

        settings.cache.expiry_secs = 0;
        assert!(settings.validate().is_err());
        settings.cache.expiry_secs = 3600;

        settings.server.max_sessions = 0;
        assert!(settings.validate_server().is_err());
        settings.server.max_sessions = 10;

        settings.server.session_timeout_secs = 0;
        assert!(settings.validate_server().is_err());
        settings.server.session_timeout_secs = 60;

        settings.health.timeout_secs = 0;
        assert!(settings.validate_health().is_err());
        settings.health.timeout_secs = 10;

        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_session_and_health_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.max_sessions, 1_000);
        assert_eq!(settings.server.session_timeout_secs, 3600);
        assert_eq!(settings.server.cleanup_interval_secs, 300);
        assert_eq!(settings.health.timeout_secs, 10);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.yaml"),
            "server:\n  port: 9000\n  max_sessions: 50\nretry:\n  max_attempts: 5\ncompletion:\n  fast_model: test-flash\nhealth:\n  timeout_secs: 4\n",
        )
        .unwrap();
        std::fs::write(dir.path().join("staging.yaml"), "server:\n  port: 9100\n").unwrap();

        let path = dir.path().to_string_lossy().to_string();
        let settings = load_settings_from(&path, None).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(settings.server.max_sessions, 50);
        assert_eq!(settings.health.timeout_secs, 4);
        assert_eq!(settings.completion.fast_model, "test-flash");
        assert_eq!(settings.completion.capable_model, "gemini-1.5-pro");

        let staging = load_settings_from(&path, Some("staging")).unwrap();
        assert_eq!(staging.server.port, 9100);
        assert_eq!(staging.retry.max_attempts, 5);
    }

    #[test]
    fn test_missing_files_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().to_string();
        let settings = load_settings_from(&path, Some("production")).unwrap();
        assert_eq!(settings.server.port, 8080);
    }
}
