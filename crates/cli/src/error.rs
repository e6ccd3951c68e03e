//! Error type for the `cad` binary.

use cadence_core::ApiError;
use thiserror::Error;

/// Errors a CLI command can end with
#[derive(Error, Debug)]
pub enum CliError {
    /// Anything coming from the task service or local validation
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Encoding `--json` output failed
    #[error("Failed to encode JSON output")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Message with every nested cause, for the final `error: ...` line.
    pub fn full_message(&self) -> String {
        match self {
            CliError::Api(err) => err.full_message(),
            CliError::Json(err) => format!("{}: {}", self, err),
        }
    }
}

/// Result type alias for CLI commands
pub type CliResult<T> = Result<T, CliError>;
