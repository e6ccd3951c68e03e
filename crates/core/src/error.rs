use std::error::Error as _;
use std::path::PathBuf;
use thiserror::Error;

/// Error types for Task API access and local validation
#[derive(Error, Debug)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, ...)
    #[error("Request to {url} failed")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status code
    #[error("Request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The server answered 404 for a single task
    #[error("Task {task_id} not found")]
    NotFound { task_id: u64 },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from {url}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// A task identifier supplied by the user was not a positive integer
    #[error("Invalid task id '{raw}'")]
    InvalidTaskId { raw: String },

    /// Error for invalid input rejected before any request is sent
    #[error("{message}")]
    Validation { message: String },

    /// Error reading or parsing the configuration file
    #[error("Invalid config file {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// The HTTP client could not be constructed
    #[error("Failed to build HTTP client")]
    Client(#[source] reqwest::Error),
}

impl ApiError {
    /// Get the full error message including every nested source.
    ///
    /// The CLI prints this so transport details (DNS, TLS, refused
    /// connections) reach the user.
    pub fn full_message(&self) -> String {
        let mut message = self.to_string();
        let mut source = self.source();
        while let Some(err) = source {
            message.push_str(": ");
            message.push_str(&err.to_string());
            source = err.source();
        }
        message
    }

    /// Whether the failure happened on the network side rather than locally.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Transport { .. }
                | ApiError::Status { .. }
                | ApiError::NotFound { .. }
                | ApiError::Decode { .. }
        )
    }
}

/// Result type alias for Task API operations
pub type ApiResult<T> = Result<T, ApiError>;
