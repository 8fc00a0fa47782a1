//! Error types for marketplace-client.

use chat_core::BackendError;
use thiserror::Error;

/// Errors that can occur when talking to the marketplace backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl From<ClientError> for BackendError {
    fn from(err: ClientError) -> Self {
        match err {
            ClientError::Http(e) if e.is_decode() => BackendError::Decode(e.to_string()),
            ClientError::Http(e) => BackendError::Transport(e.to_string()),
            ClientError::Json(e) => BackendError::Decode(e.to_string()),
            ClientError::Status { status, body } => BackendError::Status { status, body },
            ClientError::Config(msg) => BackendError::Unavailable(msg),
        }
    }
}
