//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;

use crate::ring::DEFAULT_REPLICAS;

/// Path prefix under which groups are served.
pub const DEFAULT_BASE_PATH: &str = "/_ringcache/";

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Byte budget for each group's cache, 0 = unbounded
    pub cache_max_bytes: u64,
    /// Virtual nodes per peer on the hash ring
    pub ring_replicas: usize,
    /// This node's address as listed in `peers`
    pub self_addr: String,
    /// Every node in the cluster, including this one
    pub peers: Vec<String>,
    /// Path prefix for group lookups, with leading and trailing slash
    pub base_path: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 9999)
    /// - `CACHE_MAX_BYTES` - Per-group byte budget (default: 2048)
    /// - `RING_REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `SELF_ADDR` - This node's address (default: http://localhost:{port})
    /// - `PEERS` - Comma separated peer addresses (default: none)
    /// - `BASE_PATH` - Group path prefix (default: /_ringcache/)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let server_port = parse_var("SERVER_PORT").unwrap_or(defaults.server_port);

        Self {
            server_port,
            cache_max_bytes: parse_var("CACHE_MAX_BYTES").unwrap_or(defaults.cache_max_bytes),
            ring_replicas: parse_var::<usize>("RING_REPLICAS")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.ring_replicas),
            self_addr: env::var("SELF_ADDR")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| format!("http://localhost:{server_port}")),
            peers: env::var("PEERS")
                .map(|v| parse_peers(&v))
                .unwrap_or_default(),
            base_path: env::var("BASE_PATH")
                .map(|v| normalize_base_path(&v))
                .unwrap_or(defaults.base_path),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 9999,
            cache_max_bytes: 2 << 10,
            ring_replicas: DEFAULT_REPLICAS,
            self_addr: "http://localhost:9999".to_string(),
            peers: Vec::new(),
            base_path: DEFAULT_BASE_PATH.to_string(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma separated list, dropping blanks.
fn parse_peers(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Ensures the prefix starts and ends with `/`.
fn normalize_base_path(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('/');
    if trimmed.is_empty() {
        DEFAULT_BASE_PATH.to_string()
    } else {
        format!("/{trimmed}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 9999);
        assert_eq!(config.cache_max_bytes, 2048);
        assert_eq!(config.ring_replicas, 50);
        assert!(config.peers.is_empty());
        assert_eq!(config.base_path, "/_ringcache/");
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        env::remove_var("SERVER_PORT");
        env::remove_var("CACHE_MAX_BYTES");
        env::remove_var("RING_REPLICAS");
        env::remove_var("SELF_ADDR");
        env::remove_var("PEERS");
        env::remove_var("BASE_PATH");

        let config = Config::from_env();
        assert_eq!(config.server_port, 9999);
        assert_eq!(config.cache_max_bytes, 2048);
        assert_eq!(config.ring_replicas, 50);
        assert_eq!(config.self_addr, "http://localhost:9999");
        assert!(config.peers.is_empty());
        assert_eq!(config.base_path, "/_ringcache/");
    }

    #[test]
    fn test_parse_peers() {
        assert_eq!(
            parse_peers(" http://a:1, ,http://b:2,"),
            vec!["http://a:1", "http://b:2"]
        );
        assert!(parse_peers("").is_empty());
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("cache"), "/cache/");
        assert_eq!(normalize_base_path("/cache"), "/cache/");
        assert_eq!(normalize_base_path("/a/b/"), "/a/b/");
        assert_eq!(normalize_base_path("/"), "/_ringcache/");
    }
}
