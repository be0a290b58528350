//! Story generation request

use serde::{Deserialize, Serialize};

use super::style::{NarrativeStyle, TechnicalDepth, VoiceName};
use crate::error::{CoreError, Result};

/// Shortest story that can be requested, in minutes
pub const MIN_DURATION_MINUTES: u32 = 5;

/// Longest story that can be requested, in minutes
pub const MAX_DURATION_MINUTES: u32 = 20;

/// Duration used when none is given
pub const DEFAULT_DURATION_MINUTES: u32 = 10;

/// Request body for `POST /api/stories/generate`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    /// Repository to narrate
    pub repo_url: String,

    #[serde(default)]
    pub style: NarrativeStyle,

    /// Target length in minutes
    #[serde(rename = "duration", default = "default_duration")]
    pub duration_minutes: u32,

    #[serde(default)]
    pub voice: VoiceName,

    /// Directories, features or concepts to emphasize
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub focus_areas: Vec<String>,

    #[serde(default)]
    pub technical_depth: TechnicalDepth,
}

fn default_duration() -> u32 {
    DEFAULT_DURATION_MINUTES
}

impl GenerationRequest {
    /// Create a request with default options
    pub fn new(repo_url: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            style: NarrativeStyle::default(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            voice: VoiceName::default(),
            focus_areas: Vec::new(),
            technical_depth: TechnicalDepth::default(),
        }
    }

    #[must_use]
    pub fn with_style(mut self, style: NarrativeStyle) -> Self {
        self.style = style;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, minutes: u32) -> Self {
        self.duration_minutes = minutes;
        self
    }

    #[must_use]
    pub fn with_voice(mut self, voice: VoiceName) -> Self {
        self.voice = voice;
        self
    }

    #[must_use]
    pub fn with_focus_areas(mut self, areas: Vec<String>) -> Self {
        self.focus_areas = areas;
        self
    }

    #[must_use]
    pub fn with_technical_depth(mut self, depth: TechnicalDepth) -> Self {
        self.technical_depth = depth;
        self
    }

    /// Check the request before sending it
    ///
    /// The repository URL must be http(s) and name an `owner/repo` path;
    /// the duration must be within 5-20 minutes.
    pub fn validate(&self) -> Result<()> {
        let url = self.repo_url.trim();
        let Some(path) = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
        else {
            return Err(CoreError::InvalidRepoUrl(self.repo_url.clone()));
        };

        // host/owner/repo
        let segments = path
            .trim_end_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .count();
        if segments < 3 {
            return Err(CoreError::InvalidRepoUrl(self.repo_url.clone()));
        }

        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&self.duration_minutes) {
            return Err(CoreError::InvalidDuration {
                min: MIN_DURATION_MINUTES,
                max: MAX_DURATION_MINUTES,
                got: self.duration_minutes,
            });
        }

        Ok(())
    }

    /// `owner/repo` of the requested repository
    pub fn repo_name(&self) -> String {
        extract_repo_name(&self.repo_url)
    }
}

/// Extract `owner/repo` from a repository URL
///
/// Handles trailing slashes and a `.git` suffix:
/// `https://github.com/owner/repo.git/` -> `owner/repo`.
pub fn extract_repo_name(repo_url: &str) -> String {
    let url = repo_url.trim().trim_end_matches('/');
    let url = url.strip_suffix(".git").unwrap_or(url);

    let parts: Vec<&str> = url.split('/').collect();
    match parts.as_slice() {
        [.., owner, repo] => format!("{owner}/{repo}"),
        [single] if !single.is_empty() => (*single).to_string(),
        _ => "unknown".to_string(),
    }
}
