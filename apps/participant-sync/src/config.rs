//! Application configuration loaded from environment variables.
//!
//! Loading is fail-fast: a missing or malformed variable stops the command
//! before any remote call is made.

use convene_core::AppEnvironment;
use convene_idmap::{IdMapConfig, IdMapError};
use convene_proxy::{ProxyConfig, ProxyError};
use thiserror::Error;

/// Configuration errors that can occur during environment loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Identifier mapping: {0}")]
    IdMap(#[from] IdMapError),

    #[error("Proxy: {0}")]
    Proxy(#[from] ProxyError),
}

/// Everything the reconciler needs to reach its two backends.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Application environment (from APP_ENV).
    pub app_env: AppEnvironment,

    /// Identifier bridge settings (`ID_MAPPING_*`, `NATS_URL`).
    pub idmap: IdMapConfig,

    /// Proxy API settings (`PROXY_*`).
    pub proxy: ProxyConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `APP_ENV` - `development` (default) or `production`
    /// - `ID_MAPPING_DISABLED`, `ID_MAPPING_ALLOW_NOOP`, `NATS_URL`,
    ///   `ID_MAPPING_SUBJECT_PREFIX`, `ID_MAPPING_TIMEOUT_MS`
    /// - `PROXY_BASE_URL` (required), `PROXY_API_KEY`, `PROXY_TIMEOUT_SECS`,
    ///   `PROXY_CONNECT_TIMEOUT_SECS`, `PROXY_MAX_RETRIES`
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            app_env: AppEnvironment::from_env(),
            idmap: IdMapConfig::from_env()?,
            proxy: ProxyConfig::from_env()?,
        })
    }

    /// Check for settings that are unsafe outside development.
    ///
    /// The pass-through identifier mapper is policed by
    /// [`convene_idmap::build_mapper`], not here.
    ///
    /// In production returns `Err(issues)`; otherwise `Ok(issues)` so the
    /// caller can log them as warnings.
    pub fn validate_security_config(&self) -> Result<Vec<String>, Vec<String>> {
        let mut issues = Vec::new();

        if self.proxy.base_url.trim_start().starts_with("http://") {
            issues.push("PROXY_BASE_URL uses plain http".to_string());
        }
        if self.proxy.api_key.is_none() {
            issues.push("PROXY_API_KEY is not set".to_string());
        }

        if issues.is_empty() {
            return Ok(issues);
        }

        if self.app_env.is_production() {
            Err(issues)
        } else {
            Ok(issues)
        }
    }
}
