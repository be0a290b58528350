//! Generation modes and presets
//!
//! A story is produced either by the hybrid pipeline (an LLM writes the
//! script, a TTS service reads it) or by the studio pipeline, which
//! produces a finished multi-voice production in one step. Each narrative
//! style has a default configuration and a voice preset.

use serde::{Deserialize, Serialize};

use crate::types::NarrativeStyle;

/// Average narration speed used for length estimates
pub const WORDS_PER_MINUTE: u32 = 150;

/// Allowed deviation from the target word count, in percent
pub const LENGTH_TOLERANCE_PERCENT: u32 = 15;

const DEFAULT_SCRIPT_MODEL: &str = "anthropic/claude-sonnet-4-20250514";
const TUTORIAL_SCRIPT_MODEL: &str = "openai/gpt-4o";
const DEFAULT_VOICE_SYNTHESIS: &str = "elevenlabs-tts";

// ===== Modes =====

/// Pipeline used to produce the audio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum GenerationMode {
    /// Script model plus text-to-speech
    #[default]
    #[serde(rename = "hybrid")]
    Hybrid,
    /// End-to-end studio production
    #[serde(rename = "elevenlabs_studio")]
    ElevenLabsStudio,
}

/// Production format in studio mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioFormat {
    Podcast,
    Audiobook,
    Documentary,
}

/// Length preset in studio mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudioDuration {
    Short,
    Default,
    Long,
}

impl StudioDuration {
    /// Approximate length in minutes
    pub fn minutes(&self) -> u32 {
        match self {
            Self::Short => 5,
            Self::Default => 15,
            Self::Long => 30,
        }
    }
}

/// Speaker a voice is picked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VoiceRole {
    Host,
    Guest,
    #[default]
    Narrator,
}

/// Complete generation settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationModeConfig {
    pub mode: GenerationMode,

    // Hybrid mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voice_synthesis: Option<String>,

    // Studio mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_format: Option<StudioFormat>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub studio_duration: Option<StudioDuration>,

    #[serde(default)]
    pub enable_sound_effects: bool,
    #[serde(default)]
    pub enable_background_music: bool,
}

/// User choices layered over a style's defaults (`None` keeps the default)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerationOverrides {
    pub mode: Option<GenerationMode>,
    pub script_model: Option<String>,
    pub voice_synthesis: Option<String>,
    pub studio_format: Option<StudioFormat>,
    pub studio_duration: Option<StudioDuration>,
    pub enable_sound_effects: Option<bool>,
    pub enable_background_music: Option<bool>,
}

/// Default configuration for a narrative style
pub fn default_config(style: NarrativeStyle) -> GenerationModeConfig {
    match style {
        NarrativeStyle::Podcast => GenerationModeConfig {
            mode: GenerationMode::ElevenLabsStudio,
            script_model: None,
            voice_synthesis: None,
            studio_format: Some(StudioFormat::Podcast),
            studio_duration: Some(StudioDuration::Default),
            enable_sound_effects: false,
            enable_background_music: true,
        },
        NarrativeStyle::Tutorial => hybrid(TUTORIAL_SCRIPT_MODEL),
        NarrativeStyle::Documentary | NarrativeStyle::Fiction | NarrativeStyle::Technical => {
            hybrid(DEFAULT_SCRIPT_MODEL)
        }
    }
}

fn hybrid(script_model: &str) -> GenerationModeConfig {
    GenerationModeConfig {
        mode: GenerationMode::Hybrid,
        script_model: Some(script_model.to_string()),
        voice_synthesis: Some(DEFAULT_VOICE_SYNTHESIS.to_string()),
        studio_format: None,
        studio_duration: None,
        enable_sound_effects: false,
        enable_background_music: false,
    }
}

/// Mode that suits a style best
pub fn recommended_mode(style: NarrativeStyle) -> GenerationMode {
    match style {
        NarrativeStyle::Podcast => GenerationMode::ElevenLabsStudio,
        _ => GenerationMode::Hybrid,
    }
}

/// Merge user overrides into the style's defaults
pub fn build_generation_config(
    style: NarrativeStyle,
    overrides: &GenerationOverrides,
) -> GenerationModeConfig {
    let base = default_config(style);

    GenerationModeConfig {
        mode: overrides.mode.unwrap_or(base.mode),
        script_model: overrides.script_model.clone().or(base.script_model),
        voice_synthesis: overrides.voice_synthesis.clone().or(base.voice_synthesis),
        studio_format: overrides.studio_format.or(base.studio_format),
        studio_duration: overrides.studio_duration.or(base.studio_duration),
        enable_sound_effects: overrides
            .enable_sound_effects
            .unwrap_or(base.enable_sound_effects),
        enable_background_music: overrides
            .enable_background_music
            .unwrap_or(base.enable_background_music),
    }
}

// ===== Voices =====

const PODCAST_HOST_VOICE: &str = "21m00Tcm4TlvDq8ikWAM";
const PODCAST_GUEST_VOICE: &str = "AZnzlk1XvdvUeBnXmlld";
const DOCUMENTARY_NARRATOR_VOICE: &str = "ErXwobaYiN019PkySvjV";
const FICTION_NARRATOR_VOICE: &str = "EXAVITQu4vr4xnSDxMaL";
const TUTORIAL_NARRATOR_VOICE: &str = "pNInz6obpgDQGcFmaJgB";
const TECHNICAL_NARRATOR_VOICE: &str = "yoZ06aMxZJJ28mfd3POQ";

/// Synthesis voice id for a style and speaker
///
/// Podcasts have a host and a guest; every other style has one narrator.
/// Roles a style has no voice for get the documentary narrator.
pub fn voice_for_style(style: NarrativeStyle, role: VoiceRole) -> &'static str {
    match (style, role) {
        (NarrativeStyle::Podcast, VoiceRole::Host) => PODCAST_HOST_VOICE,
        (NarrativeStyle::Podcast, VoiceRole::Guest) => PODCAST_GUEST_VOICE,
        (NarrativeStyle::Fiction, VoiceRole::Narrator) => FICTION_NARRATOR_VOICE,
        (NarrativeStyle::Tutorial, VoiceRole::Narrator) => TUTORIAL_NARRATOR_VOICE,
        (NarrativeStyle::Technical, VoiceRole::Narrator) => TECHNICAL_NARRATOR_VOICE,
        _ => DOCUMENTARY_NARRATOR_VOICE,
    }
}

// ===== Script Length =====

/// Outcome of a script length check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLengthCheck {
    /// `false` only when the script is too short
    pub is_valid: bool,
    pub message: String,

    /// Words missing to reach the minimum (0 when long enough)
    pub words_needed: u32,
}

/// Check a word count against the target duration
///
/// Scripts may be up to 15% shorter than `minutes * 150` words. Longer
/// scripts are accepted with a note.
pub fn validate_script_length(word_count: u32, target_minutes: u32) -> ScriptLengthCheck {
    let target = target_minutes * WORDS_PER_MINUTE;
    let min_words = target * (100 - LENGTH_TOLERANCE_PERCENT) / 100;
    let max_words = (target * (100 + LENGTH_TOLERANCE_PERCENT)).div_ceil(100);

    if word_count < min_words {
        let needed = min_words - word_count;
        return ScriptLengthCheck {
            is_valid: false,
            message: format!(
                "Script is too short. Need {needed} more words for {target_minutes} minute target."
            ),
            words_needed: needed,
        };
    }

    if word_count > max_words {
        return ScriptLengthCheck {
            is_valid: true,
            message: format!(
                "Script is {} words over target, but will still work.",
                word_count - max_words
            ),
            words_needed: 0,
        };
    }

    ScriptLengthCheck {
        is_valid: true,
        message: format!("Script length is optimal for {target_minutes} minute duration."),
        words_needed: 0,
    }
}

/// Number of whitespace-separated words in a script
pub fn count_words(script: &str) -> u32 {
    script.split_whitespace().count() as u32
}
