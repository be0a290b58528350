mod record;
mod request;
mod status;
mod style;

pub use record::{Chapter, StoryRecord};
pub use request::{
    extract_repo_name, GenerationRequest, DEFAULT_DURATION_MINUTES, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};
pub use status::{StoryProgress, StoryStatus};
pub use style::{NarrativeStyle, TechnicalDepth, VoiceName};
