//! Platform-agnostic media element trait
//!
//! Abstracts the one native audio output handle a session owns
//! (an HTML audio element, a rodio sink, a mock in tests).

use std::fmt;

/// Identifies one `load` call on a media element
///
/// Every load gets a fresh, strictly increasing id. Events carry the id of the
/// load they belong to, so events from a superseded load can be told apart
/// from events for the source that is currently wanted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct LoadId(u64);

impl LoadId {
    /// Create a load id from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id following this one
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for LoadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "load#{}", self.0)
    }
}

/// Outcome of asking the element to start playing
///
/// Platforms may refuse playback without a prior user gesture (autoplay
/// policy). That is an expected outcome, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayResult {
    /// Playback started (or will start as soon as data is available)
    Started,

    /// Playback was refused; the user has to press play again
    Blocked,
}

/// Something the media element reports back
#[derive(Debug, Clone, PartialEq)]
pub struct MediaEvent {
    /// Load the event belongs to
    pub load: LoadId,

    /// What happened
    pub kind: MediaEventKind,
}

impl MediaEvent {
    pub fn new(load: LoadId, kind: MediaEventKind) -> Self {
        Self { load, kind }
    }
}

/// Kinds of media element events
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEventKind {
    /// Playback position changed (seconds)
    TimeUpdate(f64),

    /// Source metadata resolved; carries the source duration in seconds
    LoadedMetadata(f64),

    /// Element is waiting for data
    Waiting,

    /// Enough data is buffered to play
    CanPlay,

    /// Element stopped playing on its own (interruption, late autoplay refusal)
    Paused,

    /// Source played to its end
    Ended,

    /// Loading or decoding failed
    Error {
        /// Native error code, if any
        code: Option<u16>,
        /// Human-readable detail
        message: String,
    },
}

/// Native audio output handle
///
/// Implementors own the actual decoding and output. They know nothing about
/// queues or chunks; they play one source at a time and report events.
///
/// Every method is called from the single thread that owns the controller.
pub trait MediaElement {
    /// Replace the current source
    ///
    /// Must stop any current output first so two sources never overlap.
    /// The element should not start playing until [`MediaElement::play`] is called.
    fn load(&mut self, load: LoadId, url: &str);

    /// Stop output and drop the current source
    fn unload(&mut self);

    /// Start or resume playback of the loaded source
    fn play(&mut self) -> PlayResult;

    /// Pause playback
    fn pause(&mut self);

    /// Jump to a position in seconds (already clamped by the caller)
    fn seek(&mut self, position: f64);

    /// Apply output volume (0.0-1.0, already accounts for mute)
    fn set_volume(&mut self, volume: f32);

    /// Apply playback speed multiplier
    fn set_playback_rate(&mut self, rate: f32);

    /// Drain events produced since the last call
    ///
    /// Elements that deliver events through callbacks can leave this empty and
    /// feed [`crate::PlaybackController::handle_media_event`] directly.
    fn take_events(&mut self) -> Vec<MediaEvent> {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_ids_increase() {
        let first = LoadId::default();
        let second = first.next();

        assert!(second > first);
        assert_eq!(second.get(), 1);
        assert_eq!(second.to_string(), "load#1");
    }
}
