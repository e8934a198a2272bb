//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Identity service endpoint queried with `username` and `password`
    pub identity_url: String,
    /// Timeout in seconds for identity service calls
    pub identity_timeout: u64,
    /// Memcached pool as `host:port` entries; empty selects the in-process cache
    pub cache_servers: Vec<String>,
    /// Timeout in seconds for each cache operation
    pub cache_timeout: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `IDENTITY_URL` - Identity endpoint (default: http://127.0.0.1:8080/auth)
    /// - `IDENTITY_TIMEOUT_SECS` - Identity call timeout (default: 5)
    /// - `CACHE_SERVERS` - Comma separated memcached servers (default: none)
    /// - `CACHE_TIMEOUT_SECS` - Cache operation timeout (default: 2)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            identity_url: env::var("IDENTITY_URL")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.identity_url),
            identity_timeout: env::var("IDENTITY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.identity_timeout),
            cache_servers: env::var("CACHE_SERVERS")
                .map(|v| parse_server_list(&v))
                .unwrap_or(defaults.cache_servers),
            cache_timeout: env::var("CACHE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cache_timeout),
        }
    }

    pub fn identity_timeout(&self) -> Duration {
        Duration::from_secs(self.identity_timeout)
    }

    pub fn cache_timeout(&self) -> Duration {
        Duration::from_secs(self.cache_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            identity_url: "http://127.0.0.1:8080/auth".to_string(),
            identity_timeout: 5,
            cache_servers: Vec::new(),
            cache_timeout: 2,
        }
    }
}

/// Splits a comma separated server list, dropping blank entries.
fn parse_server_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
