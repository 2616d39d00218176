//! Configuration for the cart client.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Default cart service base URL
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Cart client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Cart service base URL; endpoints are resolved below it
    pub api_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_secs: u64,
    /// Capacity of the outcome broadcast channel
    pub broadcast_capacity: usize,
    /// Install the Prometheus recorder
    pub metrics_enabled: bool,
}

/// Invalid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The base URL is empty, unparsable, or not http(s)
    #[error("Invalid cart API URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending value
        url: String,
        /// What is wrong with it
        reason: String,
    },

    /// A zero request timeout fails every call immediately
    #[error("Request timeout must be at least 1 second")]
    ZeroTimeout,

    /// The broadcast channel needs room for at least one action
    #[error("Broadcast capacity must be at least 1")]
    ZeroCapacity,

    /// The HTTP client could not be built
    #[error("HTTP client setup failed: {0}")]
    HttpClient(String),
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_token: None,
            request_timeout_secs: 10,
            shutdown_timeout_secs: 5,
            broadcast_capacity: tixcart_runtime::DEFAULT_BROADCAST_CAPACITY,
            metrics_enabled: false,
        }
    }
}

impl CartConfig {
    /// Load configuration from the process environment.
    ///
    /// Unset or unparsable values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_url: lookup("CART_API_URL").unwrap_or(defaults.api_url),
            api_token: lookup("CART_API_TOKEN").filter(|token| !token.trim().is_empty()),
            request_timeout_secs: lookup("CART_API_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.request_timeout_secs),
            shutdown_timeout_secs: lookup("CART_SHUTDOWN_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.shutdown_timeout_secs),
            broadcast_capacity: lookup("CART_BROADCAST_CAPACITY")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.broadcast_capacity),
            metrics_enabled: lookup("CART_METRICS").map_or(defaults.metrics_enabled, |s| {
                matches!(s.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
            }),
        }
    }

    /// Check the values the store and client cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable URL, a zero request timeout, or
    /// a zero broadcast capacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.base_url()?;
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.broadcast_capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        Ok(())
    }

    /// Parsed base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the URL is empty, unparsable, or
    /// not http(s).
    pub fn base_url(&self) -> Result<reqwest::Url, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidUrl {
            url: self.api_url.clone(),
            reason: reason.to_string(),
        };

        if self.api_url.trim().is_empty() {
            return Err(invalid("empty"));
        }
        let url = reqwest::Url::parse(self.api_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        Ok(url)
    }

    /// Per-request timeout
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Graceful shutdown timeout
    #[must_use]
    pub const fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = CartConfig::from_lookup(lookup(&[]));
        assert_eq!(config, CartConfig::default());
        assert_eq!(config.api_url, DEFAULT_API_URL);
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reads_every_variable() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_API_URL", "https://shop.example/api"),
            ("CART_API_TOKEN", "secret"),
            ("CART_API_TIMEOUT_SECS", "3"),
            ("CART_SHUTDOWN_TIMEOUT_SECS", "1"),
            ("CART_BROADCAST_CAPACITY", "8"),
            ("CART_METRICS", "true"),
        ]));
        assert_eq!(config.api_url, "https://shop.example/api");
        assert_eq!(config.api_token.as_deref(), Some("secret"));
        assert_eq!(config.request_timeout_secs, 3);
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(1));
        assert_eq!(config.broadcast_capacity, 8);
        assert!(config.metrics_enabled);
    }

    #[test]
    fn test_unparsable_numbers_fall_back() {
        let config = CartConfig::from_lookup(lookup(&[
            ("CART_API_TIMEOUT_SECS", "soon"),
            ("CART_API_TOKEN", "  "),
        ]));
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.api_token, None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = CartConfig {
            api_url: String::new(),
            ..CartConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        config.api_url = "ftp://files.example".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

        config.api_url = DEFAULT_API_URL.to_string();
        config.broadcast_capacity = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroCapacity));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = CartConfig::from_lookup(lookup(&[("CART_API_TIMEOUT_SECS", "0")]));
        assert_eq!(config.request_timeout_secs, 0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroTimeout));
    }
}
