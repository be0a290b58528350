//! Playback Events
//!
//! Event-based communication for UI synchronization.
//! The snapshot is always authoritative; events only tell a UI that
//! something worth re-rendering happened:
//! - Status changes (loading/playing/paused/...)
//! - Item changes (new item loaded, or nothing loaded)
//! - Queue edits
//! - Position updates
//! - Output setting changes
//! - Playback failures

use crate::error::PlaybackFailure;
use crate::types::PlaybackStatus;
use serde::Serialize;

/// Events emitted by the playback controller
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PlaybackEvent {
    /// Playback status changed
    StatusChanged {
        status: PlaybackStatus,
    },

    /// A different item is now loaded (`None` when playback was cleared)
    ItemChanged {
        item_id: Option<String>,
        previous_item_id: Option<String>,
    },

    /// Current item played to its end (all chunks)
    ItemFinished {
        item_id: String,
    },

    /// Queue contents changed
    QueueChanged {
        length: usize,
        index: Option<usize>,
    },

    /// Position within the loaded source
    Position {
        current_time: f64,
        duration: f64,
    },

    /// Volume, mute or rate changed
    OutputChanged {
        volume: f32,
        is_muted: bool,
        playback_rate: f32,
    },

    /// Loading or playback failed
    Error {
        failure: PlaybackFailure,
    },
}
