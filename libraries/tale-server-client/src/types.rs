//! Request and response types for the story API.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tale_core::StoryStatus;

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for the story backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend (e.g., "https://tales.example.com")
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_token: Option<String>,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Delay between status polls in milliseconds
    pub poll_interval_ms: u64,
    /// Give up waiting for a story after this many seconds
    pub max_wait_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_token: None,
            timeout_secs: 30,
            poll_interval_ms: 2000,
            max_wait_secs: 30 * 60,
        }
    }
}

impl ClientConfig {
    /// Create a config with just the URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Attach an API token.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    /// Override the poll interval.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = interval.as_millis() as u64;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn max_wait(&self) -> Duration {
        Duration::from_secs(self.max_wait_secs)
    }
}

/// Response to starting or restarting a story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryAccepted {
    pub id: String,
    pub status: StoryStatus,
    pub message: String,
}

/// Error body returned by the backend.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub detail: String,
}
