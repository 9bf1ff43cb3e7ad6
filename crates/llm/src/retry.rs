//! Bounded retry with exponential backoff
//!
//! After the n-th failed attempt the loop sleeps
//! `min(base * 2^n + jitter, max_delay)`, with jitter drawn from
//! `[0, max_jitter)`. The last failure is returned as-is.

use std::future::Future;
use std::time::Duration;

use calorisensei_config::constants::retry;
use calorisensei_config::RetryConfig;
use rand::Rng;

use crate::LlmError;

/// Retry policy for completion calls
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_jitter: Duration,
    /// Ceiling for a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry::MAX_ATTEMPTS,
            base_delay: Duration::from_millis(retry::BASE_DELAY_MS),
            max_jitter: Duration::from_millis(retry::MAX_JITTER_MS),
            max_delay: Duration::from_millis(retry::MAX_DELAY_MS),
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.base_delay_ms),
            max_jitter: Duration::from_millis(config.max_jitter_ms),
            max_delay: Duration::from_millis(config.max_delay_ms),
        }
    }
}

impl RetryPolicy {
    /// Delay after the `failures`-th failed attempt, for a given jitter
    pub fn delay_for(&self, failures: u32, jitter: Duration) -> Duration {
        let factor = 2u32.saturating_pow(failures);
        self.base_delay
            .saturating_mul(factor)
            .saturating_add(jitter)
            .min(self.max_delay)
    }

    fn jitter(&self) -> Duration {
        let max_ms = self.max_jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..max_ms))
    }

    /// Run `operation` until it succeeds, fails with a non-retryable error,
    /// or runs out of attempts
    ///
    /// `operation` receives the 1-based attempt number.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> Result<T, LlmError>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, LlmError>>,
    {
        let max_attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_retryable() => return Err(e),
                Err(e) if attempt >= max_attempts => {
                    tracing::error!(
                        attempts = attempt,
                        error = %e,
                        "Completion failed after all retries"
                    );
                    return Err(e);
                }
                Err(e) => {
                    let delay = self.delay_for(attempt, self.jitter());
                    tracing::warn!(
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Completion request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
