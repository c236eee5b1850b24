//! Key-value store trait and error types
//!
//! The page cache only needs `GET key` and `SET key value` from its backend.
//! Anything that can provide those two operations can back the cache.

use thiserror::Error;

/// Errors that can occur while reading or writing the page cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Cache lock poisoned")]
    LockPoisoned,

    #[error("Cached page for {url} has no timestamp")]
    MissingTimestamp { url: String },

    #[error("Cached page for {url} has an unparsable timestamp '{value}': {source}")]
    InvalidTimestamp {
        url: String,
        value: String,
        source: chrono::ParseError,
    },
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Trait for key-value backends behind the page cache
///
/// Implementations are shared between concurrent requests, so they must be
/// usable through `&self`. No expiry is ever requested from the backend.
pub trait KeyValueStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if there is no entry
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;
}
