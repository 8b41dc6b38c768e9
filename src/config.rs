//! Configuration Module
//!
//! Handles loading panel configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::{DEFAULT_MAX_SIZE, DEFAULT_TTL_MS};

/// Panel configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Snapshot freshness window in milliseconds
    pub cache_ttl_ms: u64,
    /// Maximum number of cached snapshots
    pub cache_max_size: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL of the host bridge
    pub host_api_url: String,
    /// Background sweep interval in seconds, 0 disables it
    pub cleanup_interval: u64,
    /// Domain under which staging sites are published
    pub staging_domain_suffix: String,
    /// `utm_source` attached to staging links
    pub staging_utm_source: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL_MS` - Snapshot TTL in milliseconds (default: 60000)
    /// - `CACHE_MAX_SIZE` - Maximum cached snapshots (default: 3)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `HOST_API_URL` - Host bridge base URL (default: http://127.0.0.1:1337)
    /// - `CLEANUP_INTERVAL` - Sweep frequency in seconds (default: 0, disabled)
    /// - `STAGING_DOMAIN_SUFFIX` - Staging domain (default: webflow.io)
    /// - `STAGING_UTM_SOURCE` - Staging link utm_source (default: webflow-designer-extension)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_ttl_ms: parse_var("CACHE_TTL_MS").unwrap_or(defaults.cache_ttl_ms),
            cache_max_size: parse_var("CACHE_MAX_SIZE").unwrap_or(defaults.cache_max_size),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            host_api_url: env::var("HOST_API_URL").unwrap_or(defaults.host_api_url),
            cleanup_interval: parse_var("CLEANUP_INTERVAL").unwrap_or(defaults.cleanup_interval),
            staging_domain_suffix: env::var("STAGING_DOMAIN_SUFFIX")
                .unwrap_or(defaults.staging_domain_suffix),
            staging_utm_source: env::var("STAGING_UTM_SOURCE")
                .unwrap_or(defaults.staging_utm_source),
        }
    }

    /// Rejects settings the cache cannot honor.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.cache_max_size == 0 {
            return Some("CACHE_MAX_SIZE must be at least 1".to_string());
        }
        if self.cache_ttl_ms == 0 {
            return Some("CACHE_TTL_MS must be greater than 0".to_string());
        }
        if self.host_api_url.trim().is_empty() {
            return Some("HOST_API_URL cannot be empty".to_string());
        }
        None
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_ttl_ms: DEFAULT_TTL_MS,
            cache_max_size: DEFAULT_MAX_SIZE,
            server_port: 3000,
            host_api_url: "http://127.0.0.1:1337".to_string(),
            cleanup_interval: 0,
            staging_domain_suffix: "webflow.io".to_string(),
            staging_utm_source: "webflow-designer-extension".to_string(),
        }
    }
}
