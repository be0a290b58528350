//! Narration options chosen when requesting a story

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// How the story is told
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NarrativeStyle {
    /// Code as characters in a narrative
    Fiction,
    /// Factual walkthrough of the codebase
    #[default]
    Documentary,
    /// Step-by-step teaching
    Tutorial,
    /// Host and guest conversation
    Podcast,
    /// Deep technical analysis
    Technical,
}

impl NarrativeStyle {
    /// All styles
    pub const ALL: [NarrativeStyle; 5] = [
        Self::Fiction,
        Self::Documentary,
        Self::Tutorial,
        Self::Podcast,
        Self::Technical,
    ];

    /// Convert to the wire string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fiction => "fiction",
            Self::Documentary => "documentary",
            Self::Tutorial => "tutorial",
            Self::Podcast => "podcast",
            Self::Technical => "technical",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "fiction" => Some(Self::Fiction),
            "documentary" => Some(Self::Documentary),
            "tutorial" => Some(Self::Tutorial),
            "podcast" => Some(Self::Podcast),
            "technical" => Some(Self::Technical),
            _ => None,
        }
    }

    /// Capitalized name for display
    pub fn label(&self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::Documentary => "Documentary",
            Self::Tutorial => "Tutorial",
            Self::Podcast => "Podcast",
            Self::Technical => "Technical",
        }
    }
}

impl std::fmt::Display for NarrativeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for NarrativeStyle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NarrativeStyle::from_str(s).ok_or_else(|| CoreError::unknown("narrative style", s))
    }
}

/// Synthesis voice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum VoiceName {
    #[default]
    Rachel,
    Drew,
    Bella,
    Antoni,
}

impl VoiceName {
    /// All voices
    pub const ALL: [VoiceName; 4] = [Self::Rachel, Self::Drew, Self::Bella, Self::Antoni];

    /// Convert to the wire string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Rachel => "Rachel",
            Self::Drew => "Drew",
            Self::Bella => "Bella",
            Self::Antoni => "Antoni",
        }
    }

    /// Parse from string (case-insensitive)
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|voice| voice.as_str().eq_ignore_ascii_case(s))
    }
}

impl std::fmt::Display for VoiceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for VoiceName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceName::from_str(s).ok_or_else(|| CoreError::unknown("voice", s))
    }
}

/// How much prior knowledge the narration assumes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TechnicalDepth {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl TechnicalDepth {
    /// Convert to the wire string
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

impl std::fmt::Display for TechnicalDepth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for TechnicalDepth {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TechnicalDepth::from_str(s).ok_or_else(|| CoreError::unknown("technical depth", s))
    }
}
