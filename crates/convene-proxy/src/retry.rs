//! Retry policy for proxy requests.
//!
//! Reads (`GET`) and replays of a known target (`PUT`, `DELETE`) may be sent
//! again after any transient failure. Creates (`POST`) are only sent again
//! when the proxy provably did not act on them: a 429 rejection or a failed
//! connect.

use rand::Rng;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Status the proxy uses to shed load before doing any work.
const TOO_MANY_REQUESTS: u16 = 429;

/// Backoff and retry limits for one proxy client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Retries after the first attempt (default: 2).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry, in milliseconds (default: 100).
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Upper bound on any single delay, in milliseconds (default: 2000).
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,

    /// Fraction of the delay added or removed at random (default: 0.25).
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,

    /// Statuses treated as transient.
    #[serde(default = "default_retry_status_codes")]
    pub retry_status_codes: Vec<u16>,
}

fn default_max_retries() -> u32 {
    2
}

fn default_initial_backoff_ms() -> u64 {
    100
}

fn default_max_backoff_ms() -> u64 {
    2000
}

fn default_jitter_factor() -> f64 {
    0.25
}

fn default_retry_status_codes() -> Vec<u16> {
    vec![TOO_MANY_REQUESTS, 502, 503, 504]
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
            jitter_factor: default_jitter_factor(),
            retry_status_codes: default_retry_status_codes(),
        }
    }
}

/// Whether sending a request twice can change the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestSafety {
    /// Resending converges on the same state.
    Idempotent,
    /// Resending may store a second record.
    NonIdempotent,
}

impl RequestSafety {
    #[must_use]
    pub fn of(method: &Method) -> Self {
        if *method == Method::POST || *method == Method::PATCH {
            Self::NonIdempotent
        } else {
            Self::Idempotent
        }
    }
}

impl RetryConfig {
    /// Retry config with a custom retry count.
    #[must_use]
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    /// Never retry.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(0)
    }

    #[must_use]
    pub fn with_initial_backoff(mut self, ms: u64) -> Self {
        self.initial_backoff_ms = ms;
        self
    }

    #[must_use]
    pub fn with_max_backoff(mut self, ms: u64) -> Self {
        self.max_backoff_ms = ms;
        self
    }

    /// Set the jitter fraction, clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_jitter(mut self, factor: f64) -> Self {
        self.jitter_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Delay before retry number `attempt` (1-based).
    ///
    /// Doubles from `initial_backoff_ms`, capped at `max_backoff_ms`, then
    /// moved by up to `jitter_factor` in either direction.
    #[must_use]
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let exponent = i32::try_from(attempt - 1).unwrap_or(i32::MAX);
        let capped = (self.initial_backoff_ms as f64 * 2_f64.powi(exponent))
            .min(self.max_backoff_ms as f64);

        let spread = capped * self.jitter_factor.clamp(0.0, 1.0);
        let delay_ms = if spread > 0.0 {
            capped + rand::thread_rng().gen_range(-spread..=spread)
        } else {
            capped
        };

        Duration::from_millis(delay_ms.max(0.0) as u64)
    }

    /// Whether `status` counts as transient at all.
    #[must_use]
    pub fn should_retry(&self, status_code: u16) -> bool {
        self.retry_status_codes.contains(&status_code)
    }

    /// Whether a response with `status` may be answered by resending.
    #[must_use]
    pub fn should_retry_status(&self, safety: RequestSafety, status_code: u16) -> bool {
        match safety {
            RequestSafety::Idempotent => self.should_retry(status_code),
            RequestSafety::NonIdempotent => {
                status_code == TOO_MANY_REQUESTS && self.should_retry(status_code)
            }
        }
    }
}

/// Request/response logging level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogVerbosity {
    Quiet,
    /// URL, method and status.
    #[default]
    Normal,
    /// Bodies too.
    Debug,
}

impl LogVerbosity {
    #[must_use]
    pub fn log_bodies(&self) -> bool {
        matches!(self, LogVerbosity::Debug)
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LogVerbosity::Quiet)
    }
}
