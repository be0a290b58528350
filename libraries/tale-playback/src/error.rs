//! Error types for playback management

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback errors
///
/// Only returned at the enqueue boundary. Everything that goes wrong after an
/// item is accepted is turned into state (see [`PlaybackFailure`]).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlaybackError {
    /// Item has neither an audio URL nor any audio chunks
    #[error("Item {id} has no playable audio source")]
    Unplayable { id: String },
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// A load or playback failure reported by the media element
///
/// Kept in the snapshot so the UI can offer a retry for the item that failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaybackFailure {
    /// Item that was loaded when the failure happened
    pub item_id: Option<String>,

    /// Source URL handed to the media element
    pub url: String,

    /// Native error code, if the platform provides one
    pub code: Option<u16>,

    /// Human-readable detail
    pub message: String,
}

impl std::fmt::Display for PlaybackFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.code {
            Some(code) => write!(f, "{} (code {}) while playing {}", self.message, code, self.url),
            None => write!(f, "{} while playing {}", self.message, self.url),
        }
    }
}
