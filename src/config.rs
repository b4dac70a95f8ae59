//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Byte budget of the demo group's main cache
    pub cache_bytes: usize,
    /// HTTP server port
    pub server_port: u16,
    /// Base URL other nodes use to reach this one
    pub self_url: String,
    /// Base URLs of every node in the pool, this one included
    pub peers: Vec<String>,
    /// Virtual nodes per peer on the hash ring
    pub ring_replicas: usize,
    /// Interval in seconds between statistics log lines
    pub stats_interval: u64,
}

const DEFAULT_CACHE_BYTES: usize = 2 << 10;
const DEFAULT_SERVER_PORT: u16 = 8001;
const DEFAULT_RING_REPLICAS: usize = 50;
const DEFAULT_STATS_INTERVAL: u64 = 60;

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BYTES` - Main cache byte budget (default: 2048)
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_URL` - This node's base URL (default: `http://127.0.0.1:<SERVER_PORT>`)
    /// - `PEERS` - Comma-separated base URLs of all nodes (default: `SELF_URL`)
    /// - `RING_REPLICAS` - Virtual nodes per peer (default: 50)
    /// - `STATS_INTERVAL` - Stats logging frequency in seconds (default: 60)
    pub fn from_env() -> Self {
        let server_port = parse_var("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT);
        let self_url = env::var("SELF_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://127.0.0.1:{server_port}"));
        let peers = env::var("PEERS")
            .ok()
            .map(|v| parse_peers(&v))
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| vec![self_url.clone()]);

        Self {
            cache_bytes: parse_var("CACHE_BYTES").unwrap_or(DEFAULT_CACHE_BYTES),
            server_port,
            self_url,
            peers,
            ring_replicas: parse_var("RING_REPLICAS").unwrap_or(DEFAULT_RING_REPLICAS),
            stats_interval: parse_var("STATS_INTERVAL").unwrap_or(DEFAULT_STATS_INTERVAL),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_url = format!("http://127.0.0.1:{DEFAULT_SERVER_PORT}");
        Self {
            cache_bytes: DEFAULT_CACHE_BYTES,
            server_port: DEFAULT_SERVER_PORT,
            peers: vec![self_url.clone()],
            self_url,
            ring_replicas: DEFAULT_RING_REPLICAS,
            stats_interval: DEFAULT_STATS_INTERVAL,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

/// Splits a comma-separated peer list, dropping blanks and trailing slashes.
fn parse_peers(list: &str) -> Vec<String> {
    list.split(',')
        .map(|p| p.trim().trim_end_matches('/'))
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
