//! Error types for the TUI module.

use std::io;
use std::path::PathBuf;

use cadence_core::ApiError;
use thiserror::Error;

/// Result type for TUI operations.
pub type TuiResult<T> = Result<T, TuiError>;

/// Error type for TUI operations.
#[derive(Debug, Error)]
pub enum TuiError {
    /// Failed to initialize or restore the terminal.
    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),

    /// Configuration or client construction failed before the UI started.
    #[error("Task API error: {0}")]
    Api(#[from] ApiError),

    /// The file named by `CADENCE_LOG` could not be opened.
    #[error("Failed to open log file {path}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
