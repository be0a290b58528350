/// CLI configuration
use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tale_playback::{PlaybackConfig, MAX_PLAYBACK_RATE, MIN_PLAYBACK_RATE};
use tale_server_client::ClientConfig;

/// Default config file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "tale.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct TaleConfig {
    #[serde(default)]
    pub server: ClientConfig,

    #[serde(default)]
    pub playback: PlaybackConfig,

    #[serde(default)]
    pub output: OutputSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputSettings {
    /// Register with the OS media controls while playing
    #[serde(default = "default_media_controls")]
    pub media_controls: bool,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            media_controls: default_media_controls(),
        }
    }
}

impl TaleConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist; otherwise `tale.toml` is used when
    /// present. Variables like `TALE_SERVER__BASE_URL` override both.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// Same as [`TaleConfig::load`] with an explicit environment map
    pub fn load_with_env(
        path: Option<&Path>,
        env: Option<config::Map<String, String>>,
    ) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("TALE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base_url = self.server.base_url.trim();
        if base_url.is_empty() {
            return Err(CliError::Config(
                "Server URL is required (set TALE_SERVER__BASE_URL)".to_string(),
            ));
        }
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CliError::Config(format!(
                "Server URL must start with http:// or https://, got {}",
                base_url
            )));
        }

        if self.server.poll_interval_ms == 0 {
            return Err(CliError::Config(
                "Poll interval must be greater than zero".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.playback.volume) {
            return Err(CliError::Config(format!(
                "Volume must be between 0.0 and 1.0, got {}",
                self.playback.volume
            )));
        }

        if !(MIN_PLAYBACK_RATE..=MAX_PLAYBACK_RATE).contains(&self.playback.playback_rate) {
            return Err(CliError::Config(format!(
                "Playback rate must be between {} and {}, got {}",
                MIN_PLAYBACK_RATE, MAX_PLAYBACK_RATE, self.playback.playback_rate
            )));
        }

        if self.playback.skip_interval_secs <= 0.0 {
            return Err(CliError::Config(
                "Skip interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

fn default_media_controls() -> bool {
    true
}
