//! Error types for the story client.

use tale_core::CoreError;
use thiserror::Error;

/// Errors that can occur when talking to the story backend.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned an error response
    #[error("Server error ({status}): {message}")]
    ServerError { status: u16, message: String },

    /// Server rejected the API token
    #[error("Authentication required")]
    AuthRequired,

    /// No story with this id
    #[error("Story not found: {0}")]
    NotFound(String),

    /// Invalid server URL
    #[error("Invalid server URL: {0}")]
    InvalidUrl(String),

    /// Request rejected before sending
    #[error("Invalid request: {0}")]
    InvalidRequest(#[from] CoreError),

    /// Failed to parse server response
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Server is offline or unreachable
    #[error("Server unreachable: {0}")]
    ServerUnreachable(String),

    /// The pipeline stopped with an error
    #[error("Story {id} failed: {message}")]
    GenerationFailed { id: String, message: String },

    /// Story did not finish in time
    #[error("Story {id} still not finished after {waited_secs} seconds")]
    WaitTimeout { id: String, waited_secs: u64 },
}

/// Result type for story client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
