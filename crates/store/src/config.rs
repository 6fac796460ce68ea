//! Store configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `REDIS_ADDR` - Backing store address (`host:port`). When unset, the
//!   in-process cart store is used instead.
//! - `CART_CONNECT_RETRIES` - Connection attempts before giving up
//!   (default: 30)
//! - `CART_CONNECT_BACKOFF_MS` - Base backoff between attempts in
//!   milliseconds (default: 1000)

use std::time::Duration;

use thiserror::Error;

use crate::connection::RetryPolicy;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Cart store configuration.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    /// Backing store address; `None` selects the in-process store.
    pub redis_addr: Option<String>,
    /// Retry schedule for (re)connection.
    pub retry: RetryPolicy,
}

impl StoreConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a retry knob is present but not a valid
    /// number.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let redis_addr = get_optional_env("REDIS_ADDR");

        let max_attempts = get_env_or_default("CART_CONNECT_RETRIES", "30")
            .parse::<u32>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_CONNECT_RETRIES".to_string(), e.to_string())
            })?;
        let backoff_ms = get_env_or_default("CART_CONNECT_BACKOFF_MS", "1000")
            .parse::<u64>()
            .map_err(|e| {
                ConfigError::InvalidEnvVar("CART_CONNECT_BACKOFF_MS".to_string(), e.to_string())
            })?;

        Ok(Self {
            redis_addr,
            retry: RetryPolicy::new(max_attempts, Duration::from_millis(backoff_ms)),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_selects_the_in_process_store() {
        let config = StoreConfig::default();
        assert!(config.redis_addr.is_none());
        assert_eq!(config.retry.max_attempts, 30);
        assert_eq!(config.retry.base_delay, Duration::from_secs(1));
    }

    #[test]
    fn env_helpers_fall_back_when_unset() {
        assert_eq!(get_optional_env("BOUTIQUE_CART_UNSET_VAR"), None);
        assert_eq!(get_env_or_default("BOUTIQUE_CART_UNSET_VAR", "30"), "30");
    }
}
