//! Configuration Module
//!
//! Handles loading cache and remote-API settings from environment variables.

use std::env;
use std::time::Duration;

/// Which cache backend a client should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheBackend {
    Memory,
    Redis,
}

impl CacheBackend {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "memory" => Some(CacheBackend::Memory),
            "redis" => Some(CacheBackend::Redis),
            _ => None,
        }
    }
}

/// Client configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Cache backend selection
    pub cache_backend: CacheBackend,
    /// Redis connection string, passed through to the redis client
    pub redis_url: String,
    /// Expiry sweep interval in milliseconds
    pub sweep_interval_ms: u64,
    /// Base URL of the remote REST API
    pub api_base_url: String,
    /// Bot token sent as `Authorization: Bot <token>`
    pub bot_token: String,
    /// Remote request timeout in milliseconds
    pub rest_timeout_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory` or `redis` (default: memory)
    /// - `REDIS_URL` - Redis URL (default: redis://127.0.0.1:6379)
    /// - `SWEEP_INTERVAL_MS` - Expiry sweep frequency (default: 5000)
    /// - `API_BASE_URL` - Remote API base (default: https://discord.com/api/v10)
    /// - `BOT_TOKEN` - Bot token (default: empty, no auth header)
    /// - `REST_TIMEOUT_MS` - Remote request timeout (default: 15000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_backend: env::var("CACHE_BACKEND")
                .ok()
                .and_then(|v| CacheBackend::parse(&v))
                .unwrap_or(defaults.cache_backend),
            redis_url: env::var("REDIS_URL").unwrap_or(defaults.redis_url),
            sweep_interval_ms: env::var("SWEEP_INTERVAL_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_interval_ms),
            api_base_url: env::var("API_BASE_URL").unwrap_or(defaults.api_base_url),
            bot_token: env::var("BOT_TOKEN").unwrap_or(defaults.bot_token),
            rest_timeout_ms: env::var("REST_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.rest_timeout_ms),
        }
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_millis(self.sweep_interval_ms)
    }

    pub fn rest_timeout(&self) -> Duration {
        Duration::from_millis(self.rest_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_backend: CacheBackend::Memory,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            sweep_interval_ms: 5000,
            api_base_url: "https://discord.com/api/v10".to_string(),
            bot_token: String::new(),
            rest_timeout_ms: 15_000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.cache_backend, CacheBackend::Memory);
        assert_eq!(config.sweep_interval_ms, 5000);
        assert_eq!(config.sweep_interval(), Duration::from_secs(5));
        assert!(config.bot_token.is_empty());
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!(CacheBackend::parse("Redis"), Some(CacheBackend::Redis));
        assert_eq!(CacheBackend::parse(" memory "), Some(CacheBackend::Memory));
        assert_eq!(CacheBackend::parse("disk"), None);
    }
}
