//! Media session adapter
//!
//! Best-effort bridge to OS-level transport controls (media keys, lock
//! screen, system "now playing" widgets). Failures never affect playback.

use crate::types::QueueItem;
use thiserror::Error;

/// Playback state published to the OS
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionPlayback {
    Playing { position: f64 },
    Paused { position: f64 },
    Stopped,
}

/// Transport commands coming from the OS
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaCommand {
    Play,
    Pause,
    Toggle,
    Stop,
    Next,
    Previous,
    SeekForward,
    SeekBackward,
    /// Absolute position in seconds
    SetPosition(f64),
}

#[derive(Debug, Error)]
#[error("Media session update failed: {0}")]
pub struct MediaSessionError(pub String);

/// OS media session
pub trait MediaSession {
    /// Publish what is loaded (`None` clears the "now playing" entry)
    fn set_metadata(&mut self, item: Option<&QueueItem>) -> Result<(), MediaSessionError>;

    /// Publish transport state
    fn set_playback(&mut self, playback: SessionPlayback) -> Result<(), MediaSessionError>;

    /// Drain commands received since the last call
    fn take_commands(&mut self) -> Vec<MediaCommand> {
        Vec::new()
    }
}

/// Session adapter for platforms without OS integration
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopMediaSession;

impl MediaSession for NoopMediaSession {
    fn set_metadata(&mut self, _item: Option<&QueueItem>) -> Result<(), MediaSessionError> {
        Ok(())
    }

    fn set_playback(&mut self, _playback: SessionPlayback) -> Result<(), MediaSessionError> {
        Ok(())
    }
}
