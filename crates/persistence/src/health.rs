//! Health summary mirror
//!
//! The dashboard shows the last known summary straight from the local store,
//! then refreshes it from the backend. A failed refresh keeps the cached
//! value on screen.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use calorisensei_config::constants::mirror::HEALTH_DATA_KEY;
use calorisensei_config::HealthConfig;

use crate::{LocalStore, PersistenceError};

/// Daily targets and body metrics
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthSummary {
    #[serde(default)]
    pub daily_calories: f64,
    #[serde(default)]
    pub daily_protein: f64,
    #[serde(default)]
    pub bmi: f64,
}

/// Payload served by the health endpoint and kept in the mirror
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecord {
    pub health_data: HealthSummary,
}

/// Where fresh health summaries come from
#[async_trait]
pub trait HealthSource: Send + Sync {
    async fn fetch(&self) -> Result<HealthRecord, PersistenceError>;
}

/// Fetches the summary with a plain GET
pub struct HttpHealthSource {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl HttpHealthSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, PersistenceError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }

    pub fn from_config(config: &HealthConfig) -> Result<Self, PersistenceError> {
        Self::new(config.url.clone(), Duration::from_secs(config.timeout_secs))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl HealthSource for HttpHealthSource {
    async fn fetch(&self) -> Result<HealthRecord, PersistenceError> {
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(PersistenceError::Status(status.as_u16()));
        }
        Ok(response.json::<HealthRecord>().await?)
    }
}

/// Local mirror of the health summary
pub struct HealthMirror {
    store: Arc<dyn LocalStore>,
    source: Arc<dyn HealthSource>,
}

impl HealthMirror {
    pub fn new(store: Arc<dyn LocalStore>, source: Arc<dyn HealthSource>) -> Self {
        Self { store, source }
    }

    /// Last mirrored record, if present and readable
    pub async fn cached(&self) -> Option<HealthRecord> {
        let value = match self.store.get(HEALTH_DATA_KEY).await {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read mirrored health data");
                return None;
            }
        };

        match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed mirrored health data");
                None
            }
        }
    }

    /// Apply the cached record, then refresh from the source
    ///
    /// `apply` runs once for the cached record and once more for a fresh
    /// one. Fetch and store failures are logged; the newest record seen is
    /// returned.
    pub async fn load<F>(&self, mut apply: F) -> Option<HealthRecord>
    where
        F: FnMut(&HealthRecord) + Send,
    {
        let cached = self.cached().await;
        if let Some(record) = &cached {
            tracing::debug!("Applying mirrored health data");
            apply(record);
        }

        let fresh = match self.source.fetch().await {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, cached = cached.is_some(), "Failed to fetch health data");
                return cached;
            }
        };

        apply(&fresh);
        match serde_json::to_value(&fresh) {
            Ok(value) => {
                if let Err(e) = self.store.set(HEALTH_DATA_KEY, value).await {
                    tracing::warn!(error = %e, "Failed to mirror health data");
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to encode health data"),
        }

        Some(fresh)
    }
}
