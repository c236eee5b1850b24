//! Crawl coordinator - cache-first crawl orchestration
//!
//! This module decides, per request, whether the network is needed at all:
//! - Consult the page cache first and return a hit immediately
//! - Otherwise fetch with a speed multiplier derived from the paying flag
//! - Write fresh results through to the cache
//!
//! Requests for the same URL are not coordinated with each other; two
//! concurrent misses both fetch and the last write wins.

use crate::cache::PageCache;
use crate::config::{Config, FetcherConfig};
use crate::crawler::fetcher::{Fetcher, RetryPolicy};
use crate::crawler::transport::{build_http_client, HttpTransport};
use std::sync::Arc;
use std::time::Instant;

/// Speed multipliers for the two request tiers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedTiers {
    pub paying: f64,
    pub standard: f64,
}

impl Default for SpeedTiers {
    fn default() -> Self {
        Self {
            paying: 5.0,
            standard: 1.0,
        }
    }
}

impl SpeedTiers {
    pub fn from_config(config: &FetcherConfig) -> Self {
        Self {
            paying: config.paying_speed_multiplier,
            standard: config.standard_speed_multiplier,
        }
    }

    pub fn multiplier(&self, paying: bool) -> f64 {
        if paying {
            self.paying
        } else {
            self.standard
        }
    }
}

/// A successfully answered crawl request
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlResult {
    /// Rendered link fragment
    pub content: String,
    /// Seconds spent fetching; zero for cache hits
    pub elapsed_seconds: f64,
    /// Whether the content came from the cache
    pub from_cache: bool,
}

/// A crawl request whose fetch ran out of retries
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlFailure {
    /// Seconds spent before giving up
    pub elapsed_seconds: f64,
    /// Human-readable cause, for logs and reports
    pub reason: String,
}

/// Outcome of a crawl request
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlOutcome {
    Completed(CrawlResult),
    Failed(CrawlFailure),
}

impl CrawlOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Completed(_))
    }

    pub fn elapsed_seconds(&self) -> f64 {
        match self {
            Self::Completed(result) => result.elapsed_seconds,
            Self::Failed(failure) => failure.elapsed_seconds,
        }
    }
}

/// Main crawl coordinator structure
///
/// Cheap to clone; clones share the cache backend and HTTP client.
#[derive(Clone)]
pub struct Coordinator {
    cache: PageCache,
    fetcher: Fetcher,
    speeds: SpeedTiers,
}

impl Coordinator {
    pub fn new(cache: PageCache, fetcher: Fetcher, speeds: SpeedTiers) -> Self {
        Self {
            cache,
            fetcher,
            speeds,
        }
    }

    /// Creates a coordinator with the configured cache backend and a real HTTP transport
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Cache opened and HTTP client built
    /// * `Err(LinkCacheError)` - Failed to open the cache or build the client
    pub fn from_config(config: &Config) -> crate::Result<Self> {
        let cache = PageCache::from_config(&config.cache)?;
        let transport = Arc::new(HttpTransport::new(build_http_client()?));
        let fetcher = Fetcher::new(transport, RetryPolicy::from_config(&config.fetcher));

        Ok(Self::new(
            cache,
            fetcher,
            SpeedTiers::from_config(&config.fetcher),
        ))
    }

    pub fn cache(&self) -> &PageCache {
        &self.cache
    }

    /// Answers a crawl request for `url`
    ///
    /// # Request Flow
    ///
    /// 1. Read the cache
    ///    - Hit → return it with zero elapsed time; the timestamp is not checked
    ///    - Miss → continue
    ///    - Read error → logged, then treated as a miss
    /// 2. Fetch with the multiplier for the caller's tier
    ///    - Failure → `CrawlOutcome::Failed` with the time spent
    /// 3. Write the fragment to the cache (failures are logged and ignored)
    /// 4. Return the fresh fragment with the measured fetch time
    pub async fn handle_crawl(&self, url: &str, paying: bool) -> CrawlOutcome {
        let speed_multiplier = self.speeds.multiplier(paying);

        match self.cache.get(url) {
            Ok(Some(page)) => {
                tracing::info!(
                    "Cache hit for {} (captured {}s ago)",
                    url,
                    page.age().num_seconds()
                );
                return CrawlOutcome::Completed(CrawlResult {
                    content: page.into_content(),
                    elapsed_seconds: 0.0,
                    from_cache: true,
                });
            }
            Ok(None) => {
                tracing::debug!("Cache miss for {}", url);
            }
            Err(e) => {
                tracing::warn!("Cache read failed for {}, fetching instead: {}", url, e);
            }
        }

        let started = Instant::now();

        let content = match self.fetcher.fetch(url, speed_multiplier).await {
            Ok(content) => content,
            Err(e) => {
                tracing::error!("Crawl of {} failed: {}", url, e);
                return CrawlOutcome::Failed(CrawlFailure {
                    elapsed_seconds: started.elapsed().as_secs_f64(),
                    reason: e.to_string(),
                });
            }
        };

        if let Err(e) = self.cache.put(url, &content) {
            tracing::warn!("Failed to cache {}: {}", url, e);
        }

        let elapsed_seconds = started.elapsed().as_secs_f64();
        tracing::info!("Crawled {} in {:.3}s", url, elapsed_seconds);

        CrawlOutcome::Completed(CrawlResult {
            content,
            elapsed_seconds,
            from_cache: false,
        })
    }
}
