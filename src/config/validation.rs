use crate::config::types::{CacheBackend, CacheConfig, Config, FetcherConfig};
use crate::{ConfigError, ConfigResult};

/// Upper bound on configured retries; beyond this a dead upstream pins a task for minutes
const MAX_RETRIES_LIMIT: u32 = 20;

/// Validates the entire configuration
pub fn validate(config: &Config) -> ConfigResult<()> {
    validate_fetcher_config(&config.fetcher)?;
    validate_cache_config(&config.cache)?;
    Ok(())
}

/// Validates fetcher configuration
fn validate_fetcher_config(config: &FetcherConfig) -> ConfigResult<()> {
    if config.max_retries > MAX_RETRIES_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max_retries must be <= {}, got {}",
            MAX_RETRIES_LIMIT, config.max_retries
        )));
    }

    validate_speed_multiplier("paying_speed_multiplier", config.paying_speed_multiplier)?;
    validate_speed_multiplier(
        "standard_speed_multiplier",
        config.standard_speed_multiplier,
    )?;

    Ok(())
}

/// A multiplier divides the retry delay, so it must be a positive finite number
fn validate_speed_multiplier(name: &str, value: f64) -> ConfigResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::Validation(format!(
            "{} must be a positive number, got {}",
            name, value
        )));
    }
    Ok(())
}

/// Validates cache configuration
fn validate_cache_config(config: &CacheConfig) -> ConfigResult<()> {
    if config.key_prefix.is_empty() {
        return Err(ConfigError::Validation(
            "key_prefix cannot be empty".to_string(),
        ));
    }

    if config.backend == CacheBackend::Sqlite && config.database_path.is_empty() {
        return Err(ConfigError::Validation(
            "database_path cannot be empty when using the sqlite backend".to_string(),
        ));
    }

    Ok(())
}
