//! Core error types for Code Tales
use thiserror::Error;

use crate::types::StoryStatus;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error type for Code Tales
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Status change the generation pipeline never makes
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition {
        /// Status before the update
        from: StoryStatus,
        /// Rejected status
        to: StoryStatus,
    },

    /// Progress moved backwards within one stage
    #[error("Progress regressed from {from}% to {to}% while {status}")]
    ProgressRegression {
        /// Stage the story is in
        status: StoryStatus,
        /// Previous progress
        from: u8,
        /// Rejected progress
        to: u8,
    },

    /// Progress outside 0-100
    #[error("Progress out of range: {0}")]
    ProgressOutOfRange(u8),

    /// Repository URL that does not name `owner/repo`
    #[error("Invalid repository URL: {0}")]
    InvalidRepoUrl(String),

    /// Requested duration outside the supported range
    #[error("Duration must be between {min} and {max} minutes, got {got}")]
    InvalidDuration {
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
        /// Requested value
        got: u32,
    },

    /// Unknown enum value
    #[error("Unknown {kind}: {value}")]
    UnknownValue {
        /// What was being parsed
        kind: &'static str,
        /// Rejected input
        value: String,
    },
}

impl CoreError {
    /// Create an unknown value error
    pub fn unknown(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }
}
