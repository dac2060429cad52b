//! Configuration module for loading environment variables and settings.

use std::time::Duration;

use crate::error::ConfigError;

/// Public image host used when `PICSUM_BASE_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "https://picsum.photos";

/// Default per-request timeout for provider calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base for constructed image URLs (no trailing slash)
    pub base_url: String,
    /// Base for the provider JSON API (no trailing slash)
    pub api_url: String,
    /// Timeout applied to each provider request, in seconds
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

impl Config {
    /// Build a configuration whose API base is derived as `{base}/v2`.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = trim_url(&base_url.into());
        let api_url = format!("{}/v2", base_url);
        Self {
            base_url,
            api_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load configuration from environment variables and .env file.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` if a URL is not http(s) or the
    /// timeout is not a positive integer.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a closure over a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("PICSUM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = validate_url("PICSUM_BASE_URL", &base_url)?;

        let api_url = match lookup("PICSUM_API_URL") {
            Some(url) => validate_url("PICSUM_API_URL", &url)?,
            None => format!("{}/v2", base_url),
        };

        let timeout_secs = match lookup("PICSUM_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    ConfigError::invalid_value(
                        "PICSUM_TIMEOUT_SECS",
                        format!("expected a positive integer, got '{}'", raw),
                    )
                })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            base_url,
            api_url,
            timeout_secs,
        })
    }

    /// Per-request timeout as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn trim_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

fn validate_url(name: &str, url: &str) -> Result<String, ConfigError> {
    let url = trim_url(url);
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(ConfigError::invalid_value(
            name,
            format!("URL must start with http:// or https://, got '{}'", url),
        ));
    }
    Ok(url)
}
