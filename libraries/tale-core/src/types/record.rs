//! Story records as returned by the backend
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::status::{StoryProgress, StoryStatus};
use super::style::{NarrativeStyle, TechnicalDepth, VoiceName};

/// Section of a story's narration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chapter {
    pub title: String,

    /// Script text of the chapter
    #[serde(default)]
    pub content: String,

    /// Length in seconds
    #[serde(default)]
    pub duration_seconds: f64,

    /// Offset of the chapter within the whole story, in seconds
    #[serde(default)]
    pub timestamp_start: f64,
}

/// A generated (or generating) story
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryRecord {
    pub id: String,
    pub repo_url: String,

    /// `owner/repo`
    pub repo_name: String,

    pub status: StoryStatus,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Detail for the current stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress_message: Option<String>,

    #[serde(default)]
    pub style: NarrativeStyle,

    /// Requested length
    #[serde(default)]
    pub duration_minutes: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice: Option<VoiceName>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,

    #[serde(default)]
    pub technical_depth: TechnicalDepth,

    /// Single-file audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,

    /// Chunked audio, in playback order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub audio_chunks: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<Chapter>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,

    /// Actual length of the synthesized audio
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl StoryRecord {
    /// Status, percentage and message of the pipeline
    pub fn progress(&self) -> StoryProgress {
        StoryProgress {
            status: self.status,
            progress: self.progress,
            message: self.progress_message.clone(),
        }
    }

    /// Whether the story has any audio to play
    pub fn has_audio(&self) -> bool {
        self.audio_chunks.iter().any(|c| !c.trim().is_empty())
            || self
                .audio_url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }

    /// Length of the story in seconds
    ///
    /// Falls back to the chapter total when the backend did not report one.
    pub fn total_duration(&self) -> Option<f64> {
        if let Some(seconds) = self.duration_seconds {
            return Some(seconds);
        }

        let chapters: f64 = self.chapters.iter().map(|c| c.duration_seconds).sum();
        (chapters > 0.0).then_some(chapters)
    }

    /// Chapter playing at `position` seconds into the story
    pub fn chapter_at(&self, position: f64) -> Option<&Chapter> {
        self.chapters
            .iter()
            .rev()
            .find(|chapter| chapter.timestamp_start <= position)
    }
}
