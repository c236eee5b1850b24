//! Page cache for crawled link fragments
//!
//! This module maps a crawled URL to the rendered link fragment and the time
//! it was captured. It includes:
//! - The `KeyValueStore` contract the cache needs from its backend
//! - SQLite and in-memory backends
//! - Two-key encoding of a page (content plus companion timestamp)
//!
//! Entries never expire; a later `put` for the same URL replaces the earlier one.

mod memory;
mod schema;
mod sqlite;
mod traits;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{CacheError, CacheResult, KeyValueStore};

use crate::config::{CacheBackend, CacheConfig};
use chrono::{DateTime, Duration, Utc};
use std::path::Path;
use std::sync::Arc;

/// Suffix of the companion key holding a page's capture time
const TIMESTAMP_SUFFIX: &str = ":timestamp";

/// A crawled page as stored in the cache
///
/// The URL is the cache key and is not part of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    content: String,
    timestamp: DateTime<Utc>,
}

impl CrawledPage {
    pub fn new(content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            content: content.into(),
            timestamp,
        }
    }

    /// The rendered link fragment (empty when the page had no links)
    pub fn content(&self) -> &str {
        &self.content
    }

    /// When the page was captured
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn into_content(self) -> String {
        self.content
    }

    /// Time elapsed since the page was captured
    pub fn age(&self) -> Duration {
        Utc::now() - self.timestamp
    }
}

/// URL-keyed page cache over any key-value backend
#[derive(Clone)]
pub struct PageCache {
    store: Arc<dyn KeyValueStore>,
    key_prefix: String,
}

impl PageCache {
    pub fn new(store: Arc<dyn KeyValueStore>, key_prefix: impl Into<String>) -> Self {
        Self {
            store,
            key_prefix: key_prefix.into(),
        }
    }

    /// Builds the cache and its backend from configuration
    pub fn from_config(config: &CacheConfig) -> CacheResult<Self> {
        let store: Arc<dyn KeyValueStore> = match config.backend {
            CacheBackend::Sqlite => Arc::new(SqliteStore::new(Path::new(&config.database_path))?),
            CacheBackend::Memory => Arc::new(MemoryStore::new()),
        };
        Ok(Self::new(store, config.key_prefix.clone()))
    }

    /// Key under which a URL's content is stored
    pub fn content_key(&self, url: &str) -> String {
        format!("{}{}", self.key_prefix, url)
    }

    /// Key under which a URL's capture time is stored
    pub fn timestamp_key(&self, url: &str) -> String {
        format!("{}{}{}", self.key_prefix, url, TIMESTAMP_SUFFIX)
    }

    /// Looks up the cached page for `url`
    ///
    /// # Returns
    ///
    /// * `Ok(Some(page))` - Both halves of the entry are present and valid
    /// * `Ok(None)` - No content is cached for this URL
    /// * `Err(CacheError)` - The backend failed, or the content exists but its
    ///   timestamp is missing or unparsable
    pub fn get(&self, url: &str) -> CacheResult<Option<CrawledPage>> {
        let content = match self.store.get(&self.content_key(url))? {
            Some(content) => content,
            None => return Ok(None),
        };

        let raw = self
            .store
            .get(&self.timestamp_key(url))?
            .ok_or_else(|| CacheError::MissingTimestamp {
                url: url.to_string(),
            })?;

        let timestamp = DateTime::parse_from_rfc3339(&raw)
            .map_err(|source| CacheError::InvalidTimestamp {
                url: url.to_string(),
                value: raw.clone(),
                source,
            })?
            .with_timezone(&Utc);

        Ok(Some(CrawledPage::new(content, timestamp)))
    }

    /// Stores `content` for `url`, stamped with the current time
    ///
    /// Content is written before the timestamp, so a reader racing this call
    /// sees either the old entry, a missing-timestamp error, or the new entry.
    pub fn put(&self, url: &str, content: &str) -> CacheResult<CrawledPage> {
        let page = CrawledPage::new(content, Utc::now());
        self.store.set(&self.content_key(url), page.content())?;
        self.store
            .set(&self.timestamp_key(url), &page.timestamp().to_rfc3339())?;
        Ok(page)
    }
}
