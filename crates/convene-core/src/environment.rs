//! Deployment environment detection.

/// Application environment mode.
///
/// Controls how strictly unsafe configuration is treated:
/// - `Development`: escape hatches are allowed with WARN-level logging.
/// - `Production`: escape hatches require an explicit opt-in flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnvironment {
    #[default]
    Development,
    Production,
}

impl AppEnvironment {
    /// Parse from the `APP_ENV` environment variable value.
    /// Defaults to `Development` if unrecognized.
    pub fn from_env_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            "development" | "dev" => Self::Development,
            other => {
                tracing::warn!(
                    value = other,
                    "Unrecognized APP_ENV value, defaulting to Development"
                );
                Self::Development
            }
        }
    }

    /// Read `APP_ENV`, defaulting to `Development` when unset.
    pub fn from_env() -> Self {
        std::env::var("APP_ENV")
            .map(|v| Self::from_env_str(&v))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

impl std::fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Development => write!(f, "development"),
            Self::Production => write!(f, "production"),
        }
    }
}
