//! Identifier bridge configuration.

use crate::error::IdMapError;
use std::env;
use std::time::Duration;

/// Default subject prefix for lookup requests.
pub const DEFAULT_SUBJECT_PREFIX: &str = "idmap.lookup";

/// Default bound on a single lookup round trip.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(3000);

/// Identifier bridge configuration.
#[derive(Debug, Clone)]
pub struct IdMapConfig {
    /// Use the pass-through mapper instead of the lookup service.
    pub disabled: bool,
    /// Messaging server URL (required unless `disabled`).
    pub nats_url: Option<String>,
    /// Prefix of the lookup subjects; the namespace is appended.
    pub subject_prefix: String,
    /// Bound on a single lookup round trip.
    pub timeout: Duration,
    /// Explicit opt-in for the pass-through mapper in production.
    pub allow_noop_in_production: bool,
}

impl IdMapConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional:
    /// - `ID_MAPPING_DISABLED`: `true` selects the pass-through mapper (default: false)
    /// - `NATS_URL`: messaging server URL (required unless disabled)
    /// - `ID_MAPPING_SUBJECT_PREFIX`: lookup subject prefix (default: "idmap.lookup")
    /// - `ID_MAPPING_TIMEOUT_MS`: lookup timeout in milliseconds (default: 3000)
    /// - `ID_MAPPING_ALLOW_NOOP`: allow the pass-through mapper in production (default: false)
    pub fn from_env() -> Result<Self, IdMapError> {
        let disabled = parse_bool_var("ID_MAPPING_DISABLED")?;
        let allow_noop_in_production = parse_bool_var("ID_MAPPING_ALLOW_NOOP")?;

        let mut builder = Self::builder()
            .disabled(disabled)
            .allow_noop_in_production(allow_noop_in_production);

        if let Ok(url) = env::var("NATS_URL") {
            builder = builder.nats_url(url);
        }
        if let Ok(prefix) = env::var("ID_MAPPING_SUBJECT_PREFIX") {
            builder = builder.subject_prefix(prefix);
        }
        if let Ok(raw) = env::var("ID_MAPPING_TIMEOUT_MS") {
            let ms: u64 = raw.trim().parse().map_err(|_| IdMapError::ConfigInvalid {
                var: "ID_MAPPING_TIMEOUT_MS".to_string(),
                reason: format!("not a number of milliseconds: {raw}"),
            })?;
            builder = builder.timeout(Duration::from_millis(ms));
        }

        builder.build()
    }

    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> IdMapConfigBuilder {
        IdMapConfigBuilder::new()
    }
}

fn parse_bool_var(var: &str) -> Result<bool, IdMapError> {
    match env::var(var) {
        Ok(v) => match v.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "" | "0" | "false" | "no" | "off" => Ok(false),
            other => Err(IdMapError::ConfigInvalid {
                var: var.to_string(),
                reason: format!("expected a boolean, got {other}"),
            }),
        },
        Err(_) => Ok(false),
    }
}

/// Builder for `IdMapConfig`.
#[derive(Debug, Default)]
pub struct IdMapConfigBuilder {
    disabled: bool,
    nats_url: Option<String>,
    subject_prefix: Option<String>,
    timeout: Option<Duration>,
    allow_noop_in_production: bool,
}

impl IdMapConfigBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the pass-through mapper.
    #[must_use]
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the messaging server URL.
    pub fn nats_url(mut self, url: impl Into<String>) -> Self {
        self.nats_url = Some(url.into());
        self
    }

    /// Set the lookup subject prefix.
    pub fn subject_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.subject_prefix = Some(prefix.into());
        self
    }

    /// Set the lookup timeout.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Allow the pass-through mapper in production.
    #[must_use]
    pub fn allow_noop_in_production(mut self, allow: bool) -> Self {
        self.allow_noop_in_production = allow;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<IdMapConfig, IdMapError> {
        if !self.disabled && self.nats_url.is_none() {
            return Err(IdMapError::ConfigMissing {
                var: "NATS_URL".to_string(),
            });
        }

        let timeout = self.timeout.unwrap_or(DEFAULT_TIMEOUT);
        if timeout.is_zero() {
            return Err(IdMapError::ConfigInvalid {
                var: "ID_MAPPING_TIMEOUT_MS".to_string(),
                reason: "timeout must be greater than zero".to_string(),
            });
        }

        let subject_prefix = self
            .subject_prefix
            .map(|p| p.trim_end_matches('.').to_string())
            .filter(|p| !p.is_empty())
            .unwrap_or_else(|| DEFAULT_SUBJECT_PREFIX.to_string());

        Ok(IdMapConfig {
            disabled: self.disabled,
            nats_url: self.nats_url,
            subject_prefix,
            timeout,
            allow_noop_in_production: self.allow_noop_in_production,
        })
    }
}
