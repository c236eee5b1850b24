use serde::Deserialize;

/// Main configuration structure for Linkcache
///
/// Every section and field is optional in the TOML file; missing values fall
/// back to the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub fetcher: FetcherConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Fetch and retry behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Additional attempts after the first failed one
    #[serde(rename = "max-retries")]
    pub max_retries: u32,

    /// Base delay before each retry (milliseconds), divided by the speed multiplier
    #[serde(rename = "retry-delay-ms")]
    pub retry_delay_ms: u64,

    /// Speed multiplier applied to paying requests
    #[serde(rename = "paying-speed-multiplier")]
    pub paying_speed_multiplier: f64,

    /// Speed multiplier applied to everyone else
    #[serde(rename = "standard-speed-multiplier")]
    pub standard_speed_multiplier: f64,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            retry_delay_ms: 5_000,
            paying_speed_multiplier: 5.0,
            standard_speed_multiplier: 1.0,
        }
    }
}

/// Which key-value store backs the page cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheBackend {
    #[default]
    Sqlite,
    Memory,
}

/// Page cache configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: CacheBackend,

    /// Path to the SQLite database file (sqlite backend only)
    #[serde(rename = "database-path")]
    pub database_path: String,

    /// Prefix prepended to every URL to form its cache key
    #[serde(rename = "key-prefix")]
    pub key_prefix: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Sqlite,
            database_path: "linkcache.db".to_string(),
            key_prefix: "page:".to_string(),
        }
    }
}
