//! Core types for playback management

use crate::error::PlaybackFailure;
use serde::{Deserialize, Serialize};

/// A playable unit: one narrated story, with display metadata and its audio
///
/// Audio is either one file (`audio_url`) or an ordered list of chunks that
/// play back-to-back as one logical track (`audio_chunks`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueItem {
    /// Stable identity, unique within a queue
    pub id: String,

    /// Display name
    pub title: String,

    /// Secondary line (usually the narrative style)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,

    /// `owner/repo` the story was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repo_name: Option<String>,

    /// Artwork
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    /// Single-file source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// Ordered chunk sources
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_chunks: Vec<String>,

    /// Known total length in seconds (display hint only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl QueueItem {
    /// Create an item with no audio yet
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            subtitle: None,
            repo_name: None,
            cover_url: None,
            audio_url: None,
            audio_chunks: Vec::new(),
            duration: None,
        }
    }

    /// Set the single-file source
    #[must_use]
    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.audio_url = Some(url.into());
        self
    }

    /// Set the chunk sources
    #[must_use]
    pub fn with_audio_chunks<I, S>(mut self, chunks: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.audio_chunks = chunks.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[must_use]
    pub fn with_repo_name(mut self, repo_name: impl Into<String>) -> Self {
        self.repo_name = Some(repo_name.into());
        self
    }

    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Resolve what should actually be loaded
    ///
    /// Non-empty chunks win over the single URL. Blank URLs count as absent.
    pub fn source(&self) -> Option<AudioSource> {
        let chunks: Vec<String> = self
            .audio_chunks
            .iter()
            .filter(|c| !c.trim().is_empty())
            .cloned()
            .collect();

        if !chunks.is_empty() {
            return Some(AudioSource::Chunked(chunks));
        }

        self.audio_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| AudioSource::Single(url.to_string()))
    }

    /// Whether the item has at least one audio source
    pub fn is_playable(&self) -> bool {
        self.source().is_some()
    }
}

/// Resolved audio for a [`QueueItem`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioSource {
    /// One file
    Single(String),

    /// Ordered chunks forming one logical track (never empty)
    Chunked(Vec<String>),
}

impl AudioSource {
    /// URLs in playback order
    pub fn urls(&self) -> &[String] {
        match self {
            AudioSource::Single(url) => std::slice::from_ref(url),
            AudioSource::Chunked(chunks) => chunks,
        }
    }
}

/// Playback state of the current item
///
/// ```text
/// Idle -> Loading -> Playing <-> Paused -> Ended -> Loading (next) | Idle
///            \          \
///             +-------> Error
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaybackStatus {
    /// Nothing loaded, or the queue ran out
    #[default]
    Idle,

    /// Source handed to the media element, metadata not resolved yet
    Loading,

    /// Audio is playing
    Playing,

    /// Loaded but not playing (includes blocked autoplay)
    Paused,

    /// Last chunk of the current item finished
    Ended,

    /// Media element reported a failure
    Error,
}

/// Configuration for the playback controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f32,

    /// Initial playback rate (default: 1.0)
    pub playback_rate: f32,

    /// Default jump for skip forward/backward in seconds (default: 15)
    pub skip_interval_secs: f64,

    /// Elapsed time after which "previous" restarts the current item (default: 3)
    pub restart_threshold_secs: f64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            playback_rate: 1.0,
            skip_interval_secs: 15.0,
            restart_threshold_secs: 3.0,
        }
    }
}

/// Read-only view of the whole playback state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub current_item: Option<QueueItem>,
    pub queue: Vec<QueueItem>,
    pub queue_index: Option<usize>,
    pub current_chunk_index: usize,
    pub status: PlaybackStatus,
    pub is_playing: bool,
    pub is_buffering: bool,
    pub current_time: f64,
    pub duration: f64,
    /// Time since the start of the logical track, across finished chunks
    pub track_elapsed: f64,
    pub volume: f32,
    pub is_muted: bool,
    pub playback_rate: f32,
    pub is_player_visible: bool,
    pub is_player_expanded: bool,
    pub last_error: Option<PlaybackFailure>,
}
