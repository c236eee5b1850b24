//! Configuration module for Linkcache
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use linkcache::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("linkcache.toml")).unwrap();
//! println!("Retries per fetch: {}", config.fetcher.max_retries);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{CacheBackend, CacheConfig, Config, FetcherConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
