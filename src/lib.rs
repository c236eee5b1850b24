//! Linkcache: a cache-first page link harvester
//!
//! This crate fetches a single web page, extracts the targets of its anchors,
//! and keeps the rendered result in a key-value cache so repeat requests for
//! the same URL never touch the network.

pub mod cache;
pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Linkcache operations
#[derive(Debug, Error)]
pub enum LinkCacheError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] crawler::FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for Linkcache operations
pub type Result<T> = std::result::Result<T, LinkCacheError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use cache::{CrawledPage, PageCache};
pub use config::Config;
pub use crawler::{CrawlOutcome, CrawlResult, Coordinator};
