//! CLI error types and exit codes

use convene_idmap::IdMapError;
use convene_participants::ReconcileError;
use convene_proxy::ProxyError;
use thiserror::Error;

use crate::config::ConfigError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error (configuration, output)
/// - 2: Participant not found
/// - 3: Network error (identifier lookup or proxy unreachable)
/// - 4: Validation error
/// - 5: Reconciliation failed on one or both sides
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Config(_) | CliError::Output(_) => 1,
            CliError::Network(_) => 3,
            CliError::Validation(_) => 4,
            CliError::Reconcile(e) => match e {
                ReconcileError::Validation { .. } => 4,
                ReconcileError::NotFound { .. } => 2,
                _ if e.is_transient() => 3,
                _ => 5,
            },
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {self}");
        } else {
            eprintln!("Error: {self}");
        }

        if let CliError::Reconcile(e) = self {
            let failed = e.failed_kinds();
            if !failed.is_empty() {
                let sides: Vec<&str> = failed.iter().map(|k| k.as_str()).collect();
                eprintln!("Failed side(s): {} [{}]", sides.join(", "), e.error_code());
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<IdMapError> for CliError {
    fn from(e: IdMapError) -> Self {
        if e.is_config_error() {
            CliError::Config(e.to_string())
        } else {
            CliError::Network(e.to_string())
        }
    }
}

impl From<ProxyError> for CliError {
    fn from(e: ProxyError) -> Self {
        match e {
            ProxyError::InvalidConfiguration { .. } => CliError::Config(e.to_string()),
            _ => CliError::Network(e.to_string()),
        }
    }
}
