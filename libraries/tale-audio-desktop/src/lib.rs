//! Desktop audio for Code Tales
//!
//! This crate provides the platform pieces `tale-playback` leaves open:
//!
//! - [`RodioElement`]: a [`tale_playback::MediaElement`] that fetches
//!   narration chunks on a background thread and plays them through rodio
//! - [`OsMediaSession`]: a [`tale_playback::MediaSession`] bridging to the
//!   OS transport controls (behind the `media-controls` feature)
//!
//! # Example
//!
//! ```no_run
//! use tale_audio_desktop::RodioElement;
//! use tale_playback::{PlaybackConfig, PlaybackController, QueueItem};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let element = RodioElement::new()?;
//! let mut controller = PlaybackController::new(element, PlaybackConfig::default());
//!
//! let item = QueueItem::new("story-1", "tokio-rs/tokio")
//!     .with_audio_chunks(["https://cdn.example.com/0.mp3", "https://cdn.example.com/1.mp3"]);
//! controller.play(Some(item))?;
//!
//! loop {
//!     controller.tick();
//!     std::thread::sleep(std::time::Duration::from_millis(250));
//! }
//! # }
//! ```

mod element;
mod error;
pub mod loader;
#[cfg(feature = "media-controls")]
mod session;

pub use element::RodioElement;
pub use error::{AudioError, Result};
pub use loader::{LoadResult, LoadedSource, SourceLoader};
#[cfg(feature = "media-controls")]
pub use session::{command_for, OsMediaSession};
