//! Response pipeline
//!
//! One sanitized message goes through, in order:
//!
//! ```text
//! detect language → emergency screen ─(match)→ localized emergency notice
//!                         │
//!                   cache lookup ─(hit)→ cached reply
//!                         │
//!                 classify query → remote completion (retried)
//!                         │
//!              append disclaimer → cache → reply
//! ```
//!
//! The emergency and cache paths return before the retry loop is entered.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use calorisensei_config::Settings;
use calorisensei_core::{Language, QueryType};
use calorisensei_llm::CompletionClient;
use calorisensei_text_processing::localization::{disclaimer, emergency_response};
use calorisensei_text_processing::{cache_key, EmergencyClassifier, LanguageDetector, QueryClassifier};

use crate::cache::ResponseCache;
use crate::AgentError;

/// Where a reply came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Emergency,
    Cache,
    Remote,
}

/// Pipeline output for one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReply {
    pub text: String,
    pub language: Language,
    /// Not classified on the emergency and cache paths
    pub query_type: Option<QueryType>,
    pub source: ReplySource,
}

/// Stateless classifiers plus the shared response cache and completion client
pub struct ResponsePipeline {
    detector: LanguageDetector,
    emergency: EmergencyClassifier,
    classifier: QueryClassifier,
    cache: Arc<ResponseCache>,
    client: CompletionClient,
}

impl ResponsePipeline {
    pub fn new(client: CompletionClient) -> Self {
        Self::with_cache(client, Arc::new(ResponseCache::default()))
    }

    /// Pipeline sharing an existing cache
    pub fn with_cache(client: CompletionClient, cache: Arc<ResponseCache>) -> Self {
        Self {
            detector: LanguageDetector::new(),
            emergency: EmergencyClassifier::new(),
            classifier: QueryClassifier::new(),
            cache,
            client,
        }
    }

    pub fn from_settings(client: CompletionClient, settings: &Settings) -> Self {
        let expiry = Duration::from_secs(settings.cache.expiry_secs);
        Self::with_cache(client, Arc::new(ResponseCache::new(expiry)))
    }

    pub fn cache(&self) -> &Arc<ResponseCache> {
        &self.cache
    }

    pub fn detect_language(&self, text: &str) -> Language {
        self.detector.detect(text)
    }

    /// Produce the reply for already-sanitized, non-empty input
    pub async fn respond(&self, clean: &str) -> Result<PipelineReply, AgentError> {
        let language = self.detector.detect(clean);

        if let Some(keyword) = self.emergency.first_match(clean) {
            tracing::warn!(keyword, language = %language, "Emergency keyword detected, skipping completion");
            return Ok(PipelineReply {
                text: emergency_response(language),
                language,
                query_type: None,
                source: ReplySource::Emergency,
            });
        }

        let key = cache_key(clean);
        if let Some(text) = self.cache.get(&key) {
            tracing::debug!(key = %key, "Cache hit");
            return Ok(PipelineReply {
                text,
                language,
                query_type: None,
                source: ReplySource::Cache,
            });
        }
        tracing::debug!(key = %key, "Cache miss");

        let query_type = self.classifier.classify(clean);
        let answer = self.client.answer(clean, language, query_type).await?;

        let mut text = answer;
        text.push_str(disclaimer(language));
        self.cache.put(key, text.clone());

        tracing::info!(
            language = %language,
            query_type = %query_type,
            chars = text.chars().count(),
            "Completion answered"
        );

        Ok(PipelineReply {
            text,
            language,
            query_type: Some(query_type),
            source: ReplySource::Remote,
        })
    }
}
