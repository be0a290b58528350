/// Desktop audio errors
use thiserror::Error;

/// Result type for desktop audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Desktop audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// No usable output device
    #[error("Failed to open audio output: {0}")]
    OutputStream(String),

    /// Failed to create a sink on the output
    #[error("Failed to create sink: {0}")]
    Sink(String),

    /// Source could not be downloaded or read
    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// Source bytes are not decodable audio
    #[error("Failed to decode {url}: {reason}")]
    Decode { url: String, reason: String },

    /// Loader thread is gone
    #[error("Source loader stopped")]
    LoaderStopped,

    /// OS media controls could not be set up
    #[error("Media controls error: {0}")]
    MediaControls(String),
}

impl AudioError {
    /// Numeric code reported with media element errors
    ///
    /// Same numbering as browser media errors: 2 network, 3 decode,
    /// 4 unsupported source.
    pub fn code(&self) -> Option<u16> {
        match self {
            Self::Fetch { .. } => Some(2),
            Self::Decode { .. } => Some(3),
            Self::Sink(_) | Self::OutputStream(_) => Some(4),
            Self::LoaderStopped | Self::MediaControls(_) => None,
        }
    }
}

impl From<rodio::StreamError> for AudioError {
    fn from(err: rodio::StreamError) -> Self {
        AudioError::OutputStream(err.to_string())
    }
}

impl From<rodio::PlayError> for AudioError {
    fn from(err: rodio::PlayError) -> Self {
        AudioError::Sink(err.to_string())
    }
}
