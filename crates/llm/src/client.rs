//! Completion client: model choice, prompt, retried backend call

use std::sync::Arc;

use calorisensei_config::Settings;
use calorisensei_core::{Language, QueryType};

use crate::backend::{CompletionBackend, CompletionRequest};
use crate::model::ModelSelector;
use crate::prompt::PromptBuilder;
use crate::retry::RetryPolicy;
use crate::LlmError;

/// Remote completion client
///
/// Each call to [`CompletionClient::answer`] selects a model, builds the
/// prompt, and runs the backend under the retry policy. It returns the raw
/// model text; disclaimers and caching are the caller's concern.
#[derive(Clone)]
pub struct CompletionClient {
    backend: Arc<dyn CompletionBackend>,
    models: ModelSelector,
    prompts: PromptBuilder,
    retry: RetryPolicy,
}

impl CompletionClient {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self {
            backend,
            models: ModelSelector::default(),
            prompts: PromptBuilder::new(),
            retry: RetryPolicy::default(),
        }
    }

    /// Client configured from settings
    pub fn from_settings(backend: Arc<dyn CompletionBackend>, settings: &Settings) -> Self {
        Self {
            backend,
            models: ModelSelector::from(&settings.completion),
            prompts: PromptBuilder::new(),
            retry: RetryPolicy::from(&settings.retry),
        }
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_models(mut self, models: ModelSelector) -> Self {
        self.models = models;
        self
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Build the request that [`answer`](Self::answer) would send
    pub fn request_for(
        &self,
        input: &str,
        language: Language,
        query_type: QueryType,
    ) -> CompletionRequest {
        CompletionRequest::new(
            self.models.select(input),
            self.prompts.build(language, query_type),
            input,
        )
    }

    /// Ask the backend, retrying failed attempts
    pub async fn answer(
        &self,
        input: &str,
        language: Language,
        query_type: QueryType,
    ) -> Result<String, LlmError> {
        let request = self.request_for(input, language, query_type);

        tracing::debug!(
            backend = self.backend.name(),
            model = %request.model,
            language = %language,
            query_type = %query_type,
            "Requesting completion"
        );

        let backend = &self.backend;
        let request = &request;
        self.retry
            .run(move |attempt| async move {
                tracing::trace!(attempt, "Completion attempt");
                backend.complete(request).await
            })
            .await
    }
}
