//! Code Tales - Playback Management
//!
//! Platform-agnostic audio playback and queueing for generated stories.
//!
//! This crate provides:
//! - A single-track player driven by media element events
//! - Chunked stories played as one continuous track
//! - A linear queue, deduplicated by story id
//! - Volume, mute and playback rate carried across items
//! - Floating player visibility state
//! - OS media session integration through a trait
//!
//! # Architecture
//!
//! `tale-playback` never touches an audio device. The platform supplies a
//! [`MediaElement`] (decoder plus output) and optionally a [`MediaSession`];
//! the [`PlaybackController`] turns user commands and element events into
//! state. Everything is synchronous and single-threaded: the platform feeds
//! events in through [`PlaybackController::handle_media_event`] (or
//! [`PlaybackController::tick`] for polling platforms) and reads state back
//! through [`PlaybackController::snapshot`].
//!
//! # Example
//!
//! ```rust
//! use tale_playback::{mock::MockMediaElement, PlaybackConfig, PlaybackController, QueueItem};
//!
//! let mut player = PlaybackController::new(MockMediaElement::new(), PlaybackConfig::default());
//!
//! let story = QueueItem::new("story-1", "How the parser works")
//!     .with_audio_chunks(["https://cdn.example/1-0.mp3", "https://cdn.example/1-1.mp3"]);
//! player.play(Some(story)).unwrap();
//!
//! // The platform reports what the element did
//! player.element_mut().resolve(42.0);
//! player.tick();
//!
//! let state = player.snapshot();
//! assert!(state.is_playing);
//! assert_eq!(state.duration, 42.0);
//! ```

mod chunks;
mod controller;
mod element;
mod error;
mod events;
pub mod mock;
mod queue;
mod session;
mod track;
pub mod types;
mod volume;

// Public exports
pub use chunks::{ChunkSequencer, ChunkStep};
pub use controller::PlaybackController;
pub use element::{LoadId, MediaElement, MediaEvent, MediaEventKind, PlayResult};
pub use error::{PlaybackError, PlaybackFailure, Result};
pub use events::PlaybackEvent;
pub use queue::{Queue, Removal};
pub use session::{MediaCommand, MediaSession, MediaSessionError, NoopMediaSession, SessionPlayback};
pub use track::{TrackPlayer, TrackSignal};
pub use types::{AudioSource, PlaybackConfig, PlaybackSnapshot, PlaybackStatus, QueueItem};
pub use volume::{OutputSettings, MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE};
