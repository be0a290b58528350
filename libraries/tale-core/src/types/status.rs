//! Story generation status
//!
//! A story moves through the generation pipeline in one direction:
//!
//! ```text
//! pending -> analyzing -> generating -> synthesizing -> completed
//!     \          \             \              \
//!      +----------+-------------+--------------+--> failed -> pending (restart)
//! ```
//!
//! Stages may be skipped (a pipeline that writes the script during analysis
//! goes straight to `synthesizing`), but never revisited.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Pipeline stage of a story
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoryStatus {
    /// Accepted, waiting for a worker
    #[default]
    Pending,
    /// Repository is being analyzed
    Analyzing,
    /// Script is being written
    Generating,
    /// Audio is being synthesized
    Synthesizing,
    /// Audio is available
    Completed,
    /// Generation stopped with an error
    Failed,
}

impl StoryStatus {
    /// All statuses in pipeline order (`Failed` last)
    pub const ALL: [StoryStatus; 6] = [
        Self::Pending,
        Self::Analyzing,
        Self::Generating,
        Self::Synthesizing,
        Self::Completed,
        Self::Failed,
    ];

    /// Convert to the wire/database string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Analyzing => "analyzing",
            Self::Generating => "generating",
            Self::Synthesizing => "synthesizing",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "analyzing" => Some(Self::Analyzing),
            "generating" => Some(Self::Generating),
            "synthesizing" => Some(Self::Synthesizing),
            "completed" => Some(Self::Completed),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Whether the pipeline has stopped for this story
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Position in the pipeline (`None` for `Failed`)
    pub fn stage_index(&self) -> Option<usize> {
        match self {
            Self::Pending => Some(0),
            Self::Analyzing => Some(1),
            Self::Generating => Some(2),
            Self::Synthesizing => Some(3),
            Self::Completed => Some(4),
            Self::Failed => None,
        }
    }

    /// Whether the pipeline may move from `self` to `next`
    ///
    /// Repeating the current status is always allowed (progress updates).
    pub fn can_transition_to(&self, next: StoryStatus) -> bool {
        if *self == next {
            return true;
        }

        match (self, next) {
            (Self::Failed, Self::Pending) => true,
            (Self::Completed | Self::Failed, _) => false,
            (_, Self::Failed) => true,
            (current, next) => match (current.stage_index(), next.stage_index()) {
                (Some(from), Some(to)) => to > from,
                _ => false,
            },
        }
    }
}

impl std::fmt::Display for StoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for StoryStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        StoryStatus::from_str(s).ok_or_else(|| CoreError::unknown("story status", s))
    }
}

/// Status, percentage and message as reported by the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StoryProgress {
    /// Current stage
    pub status: StoryStatus,

    /// Completion percentage (0-100)
    #[serde(default)]
    pub progress: u8,

    /// Human readable detail for the current stage
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl StoryProgress {
    /// Create a progress report
    pub fn new(status: StoryStatus, progress: u8) -> Self {
        Self {
            status,
            progress,
            message: None,
        }
    }

    /// Attach a message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Apply a newer report on top of this one
    ///
    /// Rejects transitions the pipeline never makes and progress that moves
    /// backwards within the same stage. On error `self` is left unchanged.
    pub fn apply(&mut self, update: StoryProgress) -> Result<()> {
        if update.progress > 100 {
            return Err(CoreError::ProgressOutOfRange(update.progress));
        }

        if !self.status.can_transition_to(update.status) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: update.status,
            });
        }

        if update.status == self.status && update.progress < self.progress {
            return Err(CoreError::ProgressRegression {
                status: self.status,
                from: self.progress,
                to: update.progress,
            });
        }

        *self = update;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_roundtrip() {
        for status in StoryStatus::ALL {
            assert_eq!(StoryStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(StoryStatus::from_str("complete"), None);
        assert!("bogus".parse::<StoryStatus>().is_err());
    }

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(StoryStatus::Pending.can_transition_to(StoryStatus::Analyzing));
        assert!(StoryStatus::Analyzing.can_transition_to(StoryStatus::Synthesizing));
        assert!(StoryStatus::Synthesizing.can_transition_to(StoryStatus::Completed));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        assert!(!StoryStatus::Synthesizing.can_transition_to(StoryStatus::Analyzing));
        assert!(!StoryStatus::Completed.can_transition_to(StoryStatus::Pending));
        assert!(!StoryStatus::Completed.can_transition_to(StoryStatus::Failed));
    }

    #[test]
    fn test_failure_and_restart() {
        assert!(StoryStatus::Generating.can_transition_to(StoryStatus::Failed));
        assert!(StoryStatus::Failed.can_transition_to(StoryStatus::Pending));
        assert!(!StoryStatus::Failed.can_transition_to(StoryStatus::Analyzing));
    }

    #[test]
    fn test_terminal_states() {
        assert!(StoryStatus::Completed.is_terminal());
        assert!(StoryStatus::Failed.is_terminal());
        assert!(!StoryStatus::Synthesizing.is_terminal());
    }

    #[test]
    fn test_apply_progress_updates() {
        let mut progress = StoryProgress::default();

        progress
            .apply(StoryProgress::new(StoryStatus::Analyzing, 5).with_message("Cloning"))
            .unwrap();
        progress
            .apply(StoryProgress::new(StoryStatus::Analyzing, 20))
            .unwrap();
        progress
            .apply(StoryProgress::new(StoryStatus::Synthesizing, 75))
            .unwrap();

        assert_eq!(progress.status, StoryStatus::Synthesizing);
        assert_eq!(progress.progress, 75);
        assert_eq!(progress.message, None);
    }

    #[test]
    fn test_apply_rejects_regression() {
        let mut progress = StoryProgress::new(StoryStatus::Generating, 50);

        let err = progress
            .apply(StoryProgress::new(StoryStatus::Generating, 40))
            .unwrap_err();

        assert!(matches!(err, CoreError::ProgressRegression { from: 50, to: 40, .. }));
        assert_eq!(progress.progress, 50);
    }

    #[test]
    fn test_apply_rejects_illegal_transition() {
        let mut progress = StoryProgress::new(StoryStatus::Completed, 100);

        let err = progress
            .apply(StoryProgress::new(StoryStatus::Analyzing, 5))
            .unwrap_err();

        assert_eq!(
            err,
            CoreError::InvalidTransition {
                from: StoryStatus::Completed,
                to: StoryStatus::Analyzing
            }
        );
    }

    #[test]
    fn test_restart_resets_progress() {
        let mut progress = StoryProgress::new(StoryStatus::Failed, 40);

        progress.apply(StoryProgress::new(StoryStatus::Pending, 0)).unwrap();

        assert_eq!(progress.status, StoryStatus::Pending);
        assert_eq!(progress.progress, 0);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&StoryStatus::Synthesizing).unwrap();
        assert_eq!(json, "\"synthesizing\"");
    }
}
