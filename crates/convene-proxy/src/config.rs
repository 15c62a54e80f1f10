//! Proxy client configuration
//!
//! Connection settings for the proxied meeting system.

use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

use crate::error::{ProxyError, ProxyResult};
use crate::retry::{LogVerbosity, RetryConfig};

/// Header carrying the proxy API key.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Configuration for the proxy client.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Base URL of the proxy (e.g. `https://proxy.example.com/v2`).
    pub base_url: String,

    /// API key sent in [`API_KEY_HEADER`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Total request timeout in seconds (default: 10).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Connect timeout in seconds (default: 5).
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Retry behavior for transient failures.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Request/response logging verbosity.
    #[serde(default)]
    pub log_verbosity: LogVerbosity,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_connect_timeout_secs() -> u64 {
    5
}

impl std::fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout_secs", &self.timeout_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("retry", &self.retry)
            .field("log_verbosity", &self.log_verbosity)
            .finish()
    }
}

impl ProxyConfig {
    /// Create a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            retry: RetryConfig::default(),
            log_verbosity: LogVerbosity::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Required:
    /// - `PROXY_BASE_URL`: base URL of the proxy
    ///
    /// Optional:
    /// - `PROXY_API_KEY`: API key
    /// - `PROXY_TIMEOUT_SECS`: request timeout (default: 10)
    /// - `PROXY_CONNECT_TIMEOUT_SECS`: connect timeout (default: 5)
    /// - `PROXY_MAX_RETRIES`: retries for transient failures (default: 2)
    pub fn from_env() -> ProxyResult<Self> {
        let base_url = env::var("PROXY_BASE_URL").map_err(|_| ProxyError::InvalidConfiguration {
            message: "PROXY_BASE_URL is required".to_string(),
        })?;

        let mut config = Self::new(base_url);
        if let Ok(key) = env::var("PROXY_API_KEY") {
            if !key.is_empty() {
                config = config.with_api_key(key);
            }
        }
        if let Some(secs) = parse_u64_var("PROXY_TIMEOUT_SECS")? {
            config.timeout_secs = secs;
        }
        if let Some(secs) = parse_u64_var("PROXY_CONNECT_TIMEOUT_SECS")? {
            config.connect_timeout_secs = secs;
        }
        if let Some(retries) = parse_u64_var("PROXY_MAX_RETRIES")? {
            let retries = u32::try_from(retries).map_err(|_| ProxyError::InvalidConfiguration {
                message: format!("PROXY_MAX_RETRIES out of range: {retries}"),
            })?;
            config.retry.max_retries = retries;
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set retry configuration.
    #[must_use]
    pub fn with_retry(mut self, config: RetryConfig) -> Self {
        self.retry = config;
        self
    }

    /// Disable retries.
    #[must_use]
    pub fn without_retry(mut self) -> Self {
        self.retry = RetryConfig::disabled();
        self
    }

    /// Set logging verbosity.
    #[must_use]
    pub fn with_log_verbosity(mut self, verbosity: LogVerbosity) -> Self {
        self.log_verbosity = verbosity;
        self
    }

    /// Validate the configuration and return the parsed base URL.
    pub fn validate(&self) -> ProxyResult<Url> {
        if self.base_url.trim().is_empty() {
            return Err(ProxyError::InvalidConfiguration {
                message: "base_url is required".to_string(),
            });
        }

        let url = Url::parse(self.base_url.trim()).map_err(|e| ProxyError::InvalidConfiguration {
            message: format!("invalid base_url: {e}"),
        })?;

        if url.scheme() != "https" && url.scheme() != "http" {
            return Err(ProxyError::InvalidConfiguration {
                message: format!("unsupported scheme: {}", url.scheme()),
            });
        }
        if url.cannot_be_a_base() {
            return Err(ProxyError::InvalidConfiguration {
                message: format!("base_url cannot be a base: {}", self.base_url),
            });
        }
        if self.timeout_secs == 0 {
            return Err(ProxyError::InvalidConfiguration {
                message: "timeout_secs must be greater than zero".to_string(),
            });
        }

        Ok(url)
    }
}

fn parse_u64_var(var: &str) -> ProxyResult<Option<u64>> {
    match env::var(var) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ProxyError::InvalidConfiguration {
                message: format!("{var} must be a non-negative integer, got {raw}"),
            }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_https() {
        let config = ProxyConfig::new("https://proxy.example.com/v2");
        let url = config.validate().unwrap();
        assert_eq!(url.host_str(), Some("proxy.example.com"));
        assert_eq!(url.path(), "/v2");
    }

    #[test]
    fn test_validate_rejects_bad_urls() {
        assert!(ProxyConfig::new("").validate().is_err());
        assert!(ProxyConfig::new("not a url").validate().is_err());
        assert!(ProxyConfig::new("ftp://proxy.example.com").validate().is_err());
        assert!(ProxyConfig::new("mailto:ops@example.com").validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = ProxyConfig::new("https://proxy.example.com").with_timeout_secs(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = ProxyConfig::new("https://proxy.example.com").with_api_key("s3cret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("***"));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ProxyConfig =
            serde_json::from_str(r#"{"base_url": "https://proxy.example.com"}"#).unwrap();
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.connect_timeout_secs, 5);
        assert_eq!(config.retry.max_retries, 2);
        assert_eq!(config.log_verbosity, LogVerbosity::Normal);
    }
}
