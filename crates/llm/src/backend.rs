//! Completion backend implementations
//!
//! [`GeminiBackend`] speaks the generative-language `generateContent` API.
//! One call to [`CompletionBackend::complete`] is exactly one HTTP request;
//! retries live in [`crate::retry`].

use std::time::Duration;

use async_trait::async_trait;
use calorisensei_config::CompletionConfig;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::LlmError;

/// Substitute for a successful response that carries no text
pub const FALLBACK_TEXT: &str = "I'm unable to provide information right now. Please try again.";

/// Content categories blocked at medium probability and above
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// A single completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Model id, e.g. `gemini-1.5-flash`
    pub model: String,
    /// Instruction prompt
    pub prompt: String,
    /// Sanitized user input
    pub input: String,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        prompt: impl Into<String>,
        input: impl Into<String>,
    ) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            input: input.into(),
        }
    }

    /// Prompt and input joined into the single text part sent upstream
    pub fn text(&self) -> String {
        format!("{}\n\nUser input: {}", self.prompt, self.input)
    }
}

/// Completion backend trait
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Perform one completion call
    ///
    /// A response without usable text yields [`FALLBACK_TEXT`], not an error.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;

    /// Backend name for logs
    fn name(&self) -> &str;
}

/// Gemini backend configuration
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API base, e.g. `https://generativelanguage.googleapis.com/v1beta`
    pub endpoint: String,
    pub api_key: String,
    pub temperature: f32,
    pub top_p: f32,
    pub max_output_tokens: u32,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self::from(&CompletionConfig::default())
    }
}

impl From<&CompletionConfig> for GeminiConfig {
    fn from(config: &CompletionConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_output_tokens: config.max_output_tokens,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }
}

/// Gemini `generateContent` backend
pub struct GeminiBackend {
    client: Client,
    config: GeminiConfig,
}

impl GeminiBackend {
    /// Create a new Gemini backend
    pub fn new(config: GeminiConfig) -> Result<Self, LlmError> {
        let is_local = config.endpoint.starts_with("http://localhost")
            || config.endpoint.starts_with("http://127.0.0.1");
        if config.api_key.trim().is_empty() && !is_local {
            return Err(LlmError::Configuration(
                "API key required for remote endpoints".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// `{endpoint}/models/{model}:generateContent`, without the key
    fn generate_url(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.endpoint.trim_end_matches('/'),
            model
        )
    }

    fn build_request<'a>(&self, text: &'a str) -> GenerateContentRequest<'a> {
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text }],
            }],
            safety_settings: SAFETY_CATEGORIES
                .iter()
                .map(|&category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                top_p: self.config.top_p,
                max_output_tokens: self.config.max_output_tokens,
            },
        }
    }
}

#[async_trait]
impl CompletionBackend for GeminiBackend {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let text = request.text();
        let body = self.build_request(&text);

        let response = self
            .client
            .post(self.generate_url(&request.model))
            .query(&[("key", self.config.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = api_error_message(&raw);
            tracing::debug!(status = status.as_u16(), %message, "Completion request rejected");
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        match serde_json::from_str::<GenerateContentResponse>(&raw) {
            Ok(parsed) => Ok(parsed
                .first_text()
                .map(str::to_string)
                .unwrap_or_else(|| FALLBACK_TEXT.to_string())),
            Err(e) => {
                tracing::warn!(error = %e, "Unexpected completion response shape");
                Ok(FALLBACK_TEXT.to_string())
            }
        }
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// `error.message` from an error body, or "Unknown error"
fn api_error_message(raw: &str) -> String {
    serde_json::from_str::<ApiErrorEnvelope>(raw)
        .ok()
        .and_then(|envelope| envelope.error)
        .and_then(|error| error.message)
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| "Unknown error".to_string())
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    safety_settings: Vec<SafetySetting>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, when present and non-empty
    fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}
