//! Story backend client.

use crate::error::{ClientError, Result};
use crate::types::{ClientConfig, ErrorBody, StoryAccepted};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Instant;
use tale_core::{GenerationRequest, StoryRecord, StoryStatus};
use tracing::{debug, info, warn};

/// Client for the story generation API.
///
/// # Example
///
/// ```ignore
/// use tale_core::GenerationRequest;
/// use tale_server_client::{ClientConfig, StoryClient};
///
/// let client = StoryClient::new(ClientConfig::new("https://tales.example.com"))?;
///
/// let accepted = client
///     .generate(&GenerationRequest::new("https://github.com/tokio-rs/tokio"))
///     .await?;
/// let story = client
///     .wait_for_completion(&accepted.id, |s| println!("{} {}%", s.status, s.progress))
///     .await?;
/// ```
pub struct StoryClient {
    http: Client,
    config: ClientConfig,
}

impl StoryClient {
    /// Create a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::InvalidUrl("URL cannot be empty".into()));
        }

        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(ClientError::InvalidUrl(
                "URL must start with http:// or https://".into(),
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout())
            .connect_timeout(config.timeout().min(std::time::Duration::from_secs(10)))
            .user_agent(format!("CodeTales/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config: ClientConfig { base_url, ..config },
        })
    }

    /// Normalized base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start generating a story.
    ///
    /// The request is validated locally first.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<StoryAccepted> {
        request.validate()?;

        debug!(repo = %request.repo_name(), style = %request.style, "Requesting story");

        let response = self
            .send(self.request(Method::POST, "/api/stories/generate").json(request))
            .await?;
        let accepted: StoryAccepted = parse(response, "generate response").await?;

        info!(id = %accepted.id, status = %accepted.status, "Story accepted");
        Ok(accepted)
    }

    /// Fetch a story record.
    pub async fn story(&self, id: &str) -> Result<StoryRecord> {
        let response = self
            .send(self.request(Method::GET, &format!("/api/stories/{id}")))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }

        parse(response, "story").await
    }

    /// Restart a failed story.
    ///
    /// The backend only restarts stories in the `failed` state and answers
    /// anything else with a server error.
    pub async fn restart(&self, id: &str) -> Result<StoryAccepted> {
        let response = self
            .send(self.request(Method::POST, &format!("/api/stories/{id}/restart")))
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(id.to_string()));
        }

        let accepted: StoryAccepted = parse(response, "restart response").await?;
        info!(id = %accepted.id, "Story restarted");
        Ok(accepted)
    }

    /// Poll a story until the pipeline stops.
    ///
    /// `on_progress` is called with every record whose status or progress
    /// differs from the previous poll. Returns the completed record, or
    /// `GenerationFailed` with the backend's error message.
    pub async fn wait_for_completion<F>(&self, id: &str, mut on_progress: F) -> Result<StoryRecord>
    where
        F: FnMut(&StoryRecord),
    {
        let started = Instant::now();
        let mut last_seen: Option<(StoryStatus, u8)> = None;

        loop {
            let record = self.story(id).await?;

            let seen = (record.status, record.progress);
            if last_seen != Some(seen) {
                debug!(id, status = %record.status, progress = record.progress, "Story progress");
                on_progress(&record);
                last_seen = Some(seen);
            }

            match record.status {
                StoryStatus::Completed => return Ok(record),
                StoryStatus::Failed => {
                    let message = record
                        .error_message
                        .unwrap_or_else(|| "unknown error".to_string());
                    warn!(id, message = %message, "Story generation failed");
                    return Err(ClientError::GenerationFailed {
                        id: id.to_string(),
                        message,
                    });
                }
                _ => {}
            }

            if started.elapsed() >= self.config.max_wait() {
                return Err(ClientError::WaitTimeout {
                    id: id.to_string(),
                    waited_secs: started.elapsed().as_secs(),
                });
            }

            tokio::time::sleep(self.config.poll_interval()).await;
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.config.base_url, path);
        let builder = self.http.request(method, url);

        match &self.config.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        request.send().await.map_err(|e| {
            if e.is_connect() || e.is_timeout() {
                ClientError::ServerUnreachable(e.to_string())
            } else {
                ClientError::Request(e)
            }
        })
    }
}

/// Decode a success body or turn the response into an error
async fn parse<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    let status = response.status();

    if status.is_success() {
        return response
            .json()
            .await
            .map_err(|e| ClientError::ParseError(format!("Failed to parse {}: {}", what, e)));
    }

    if status == StatusCode::UNAUTHORIZED {
        return Err(ClientError::AuthRequired);
    }

    let text = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .map(|body| body.detail)
        .unwrap_or(text);

    Err(ClientError::ServerError {
        status: status.as_u16(),
        message,
    })
}
