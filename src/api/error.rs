//! Error types for remote API calls.

use thiserror::Error;

/// Errors that can occur while talking to the remote API.
///
/// Stores only distinguish success from failure; the variants exist for
/// logging and for callers of the fallible read paths.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Failed to reach the server or read its response
    #[error("Request to '{path}' failed: {source}")]
    Transport {
        path: String,
        #[source]
        source: reqwest::Error,
    },

    /// Request exceeded the configured timeout
    #[error("Request to '{path}' timed out")]
    Timeout { path: String },

    /// Missing or rejected access token
    #[error("Unauthorized request to '{path}'")]
    Unauthorized { path: String },

    /// Server answered with a non-success status
    #[error("Server error: {status} - {message}")]
    Status { status: u16, message: String },

    /// Response body did not match the expected shape
    #[error("Failed to decode response from '{path}': {message}")]
    Decode { path: String, message: String },

    /// Request URL could not be built
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// Short machine-readable name, logged next to the message.
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Transport { .. } => "transport_error",
            ApiError::Timeout { .. } => "timeout",
            ApiError::Unauthorized { .. } => "unauthorized",
            ApiError::Status { .. } => "status_error",
            ApiError::Decode { .. } => "decode_error",
            ApiError::InvalidUrl(_) => "invalid_url",
        }
    }

    /// Map a non-success HTTP status to an error.
    pub fn from_status(path: &str, status: u16, message: String) -> Self {
        match status {
            401 | 403 => ApiError::Unauthorized {
                path: path.to_string(),
            },
            _ => ApiError::Status { status, message },
        }
    }
}
