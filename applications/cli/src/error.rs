/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("None of the requested stories has audio yet")]
    NothingToPlay,

    #[error("Playback stopped: {0}")]
    Playback(String),

    #[error(transparent)]
    Client(#[from] tale_server_client::ClientError),

    #[error(transparent)]
    Audio(#[from] tale_audio_desktop::AudioError),

    #[error(transparent)]
    Queue(#[from] tale_playback::PlaybackError),
}

impl From<config::ConfigError> for CliError {
    fn from(err: config::ConfigError) -> Self {
        CliError::Config(err.to_string())
    }
}
