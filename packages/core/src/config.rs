use std::env;
use std::time::Duration;

/// Base URL of the VNC Resolver scan API.
pub const DEFAULT_API_URL: &str = "https://computernewb.com/vncresolver/api/scans/vnc";

pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

pub const DEFAULT_SCREEN_DELAY_MS: u64 = 2000;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub http_timeout: Duration,
    pub screen_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
            screen_delay: Duration::from_millis(DEFAULT_SCREEN_DELAY_MS),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Every variable is
    /// optional; unset ones fall back to the defaults.
    pub fn from_vars<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("VNC_RESOLVER_API_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if api_url.is_empty() {
            return Err("VNC_RESOLVER_API_URL must not be empty".into());
        }

        let http_timeout_seconds = match lookup("HTTP_TIMEOUT_SECONDS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| "HTTP_TIMEOUT_SECONDS must be a valid number")?,
            None => DEFAULT_HTTP_TIMEOUT_SECONDS,
        };

        let screen_delay_ms = match lookup("SCREEN_DELAY_MS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|_| "SCREEN_DELAY_MS must be a valid number")?,
            None => DEFAULT_SCREEN_DELAY_MS,
        };

        Ok(Self {
            api_url,
            http_timeout: Duration::from_secs(http_timeout_seconds),
            screen_delay: Duration::from_millis(screen_delay_ms),
        })
    }
}
