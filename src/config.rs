//! Configuration module for statusboard.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Base URL of the monitoring backend (default: "http://localhost:8080")
    pub api_url: String,
    /// HTTP port for the dashboard server (default: 3000)
    pub http_port: u16,
    /// Time between automatic refreshes (default: 60s)
    pub poll_interval: Duration,
    /// Timeout for a single backend request (default: 10s)
    pub request_timeout: Duration,
    /// History requests in flight during a refresh (default: 5)
    pub fetch_concurrency: usize,
    /// Path to the preferences file (default: "statusboard-prefs.json")
    pub prefs_path: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:8080".to_string(),
            http_port: 3000,
            poll_interval: Duration::from_secs(60),
            request_timeout: Duration::from_secs(10),
            fetch_concurrency: 5,
            prefs_path: "statusboard-prefs.json".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STATUSBOARD_API_URL`: backend base URL
    /// - `STATUSBOARD_HTTP_PORT`: HTTP port
    /// - `STATUSBOARD_POLL_INTERVAL_SECS`: refresh interval in seconds
    /// - `STATUSBOARD_REQUEST_TIMEOUT_SECS`: backend request timeout in seconds
    /// - `STATUSBOARD_FETCH_CONCURRENCY`: concurrent history fetches
    /// - `STATUSBOARD_PREFS_PATH`: preferences file path
    ///
    /// Values that fail to parse keep their defaults.
    pub fn load() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(url) = lookup("STATUSBOARD_API_URL").filter(|s| !s.trim().is_empty()) {
            cfg.api_url = url;
        }

        if let Some(port) = parse(&lookup, "STATUSBOARD_HTTP_PORT") {
            cfg.http_port = port;
        }

        if let Some(secs) =
            parse::<u64, _>(&lookup, "STATUSBOARD_POLL_INTERVAL_SECS").filter(|&v| v > 0)
        {
            cfg.poll_interval = Duration::from_secs(secs);
        }

        if let Some(secs) =
            parse::<u64, _>(&lookup, "STATUSBOARD_REQUEST_TIMEOUT_SECS").filter(|&v| v > 0)
        {
            cfg.request_timeout = Duration::from_secs(secs);
        }

        if let Some(n) =
            parse::<usize, _>(&lookup, "STATUSBOARD_FETCH_CONCURRENCY").filter(|&v| v > 0)
        {
            cfg.fetch_concurrency = n;
        }

        if let Some(path) = lookup("STATUSBOARD_PREFS_PATH") {
            cfg.prefs_path = path;
        }

        cfg
    }
}

fn parse<T, F>(lookup: &F, key: &str) -> Option<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, raw);
            None
        }
    }
}
