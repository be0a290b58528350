//! Code Tales Core
//!
//! Platform-agnostic domain types for Code Tales.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Story records**: `StoryRecord`, `Chapter`, as stored by the backend
//! - **Pipeline status**: `StoryStatus` state machine and `StoryProgress`
//! - **Requests**: `GenerationRequest` with narrative style, voice and depth
//! - **Generation presets**: modes, per-style defaults, voices, script length
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tale_core::{GenerationRequest, NarrativeStyle, StoryStatus};
//!
//! let request = GenerationRequest::new("https://github.com/tokio-rs/tokio")
//!     .with_style(NarrativeStyle::Podcast)
//!     .with_duration(15);
//! request.validate().unwrap();
//! assert_eq!(request.repo_name(), "tokio-rs/tokio");
//!
//! assert!(StoryStatus::Analyzing.can_transition_to(StoryStatus::Failed));
//! assert!(!StoryStatus::Completed.can_transition_to(StoryStatus::Pending));
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod generation;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, Result};
pub use generation::{
    build_generation_config, default_config, recommended_mode, validate_script_length,
    voice_for_style, GenerationMode, GenerationModeConfig, GenerationOverrides, StudioDuration,
    StudioFormat, VoiceRole,
};
pub use types::{
    extract_repo_name, Chapter, GenerationRequest, NarrativeStyle, StoryProgress, StoryRecord,
    StoryStatus, TechnicalDepth, VoiceName, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};
