//! Page fetcher with bounded retry
//!
//! This module performs the GET for a crawl and turns the body into a link
//! fragment, including:
//! - Retrying transport failures and extraction failures alike
//! - Backoff scaled down by a caller-supplied speed multiplier
//! - A single terminal error once the retry budget is spent

use crate::config::FetcherConfig;
use crate::crawler::extractor::{extract, ExtractError};
use crate::crawler::transport::{Transport, TransportError};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors produced while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("failed to extract links: {0}")]
    Extract(#[from] ExtractError),

    #[error("max retries exceeded for {url} after {attempts} attempts")]
    MaxRetriesExceeded { url: String, attempts: u32 },
}

impl FetchError {
    /// Whether another attempt may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Extract(_))
    }
}

/// How many times to retry and how long to wait in between
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Attempts made after the first one fails
    pub max_retries: u32,
    /// Wait before each retry at speed multiplier 1.0
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }

    /// Total attempts including the first
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before a retry: the base delay divided by `speed_multiplier`
    ///
    /// A multiplier that is not a positive finite number is treated as 1.0.
    pub fn backoff(&self, speed_multiplier: f64) -> Duration {
        if !speed_multiplier.is_finite() || speed_multiplier <= 0.0 {
            tracing::warn!(
                "Ignoring invalid speed multiplier {}, using 1.0",
                speed_multiplier
            );
            return self.base_delay;
        }
        self.base_delay.div_f64(speed_multiplier)
    }
}

/// Fetches a page and extracts its links, retrying transient failures
#[derive(Clone)]
pub struct Fetcher {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
}

impl Fetcher {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Fetches `url` and returns its rendered link fragment
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | GET fails (DNS, connect, TLS, ...) | Retry after backoff |
    /// | Body stream breaks off | Retry after backoff |
    /// | HTML rewriter error | Retry after backoff |
    /// | Any HTTP status | Parsed like a success |
    ///
    /// After `1 + max_retries` failed attempts the last underlying error is
    /// logged and `FetchError::MaxRetriesExceeded` is returned. Partial link
    /// fragments from failed attempts are discarded.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `speed_multiplier` - Divides the backoff delay; never changes the attempt count
    pub async fn fetch(&self, url: &str, speed_multiplier: f64) -> Result<String, FetchError> {
        let max_attempts = self.policy.max_attempts();
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            match self.attempt(url).await {
                Ok(content) => {
                    if attempt > 1 {
                        tracing::info!("Fetched {} on attempt {}", url, attempt);
                    }
                    return Ok(content);
                }
                Err(e) => {
                    if attempt < max_attempts {
                        let delay = self.policy.backoff(speed_multiplier);
                        tracing::warn!(
                            "Error: {}, retrying {} in {:?} (attempt {}/{})",
                            e,
                            url,
                            delay,
                            attempt,
                            max_attempts
                        );
                        tokio::time::sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        if let Some(e) = last_error {
            tracing::error!(
                "Giving up on {} after {} attempts, last error: {}",
                url,
                max_attempts,
                e
            );
        }

        Err(FetchError::MaxRetriesExceeded {
            url: url.to_string(),
            attempts: max_attempts,
        })
    }

    /// One GET plus extraction, without retry
    async fn attempt(&self, url: &str) -> Result<String, FetchError> {
        let body = self.transport.get(url).await?;
        if body.is_interrupted() {
            tracing::debug!("Body of {} was cut short, extracting what arrived", url);
        }
        let content = extract(body.into_chunks()).into_result()?;
        Ok(content)
    }
}
