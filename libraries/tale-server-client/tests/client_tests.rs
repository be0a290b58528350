//! Tests for the story client library.
//!
//! These tests use mock servers to verify client behavior without
//! requiring a real backend.

use std::time::Duration;
use tale_core::{GenerationRequest, NarrativeStyle, StoryStatus};
use tale_server_client::{queue_item, ClientConfig, ClientError, StoryClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn story_json(id: &str, status: &str, progress: u8) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "repo_url": "https://github.com/tokio-rs/tokio",
        "repo_name": "tokio-rs/tokio",
        "status": status,
        "progress": progress,
        "style": "documentary",
        "duration_minutes": 10,
        "voice": "Rachel",
        "focus_areas": [],
        "technical_depth": "intermediate",
        "audio_url": null,
        "audio_chunks": if status == "completed" {
            serde_json::json!(["https://cdn.test/0.mp3", "https://cdn.test/1.mp3"])
        } else {
            serde_json::json!([])
        },
        "chapters": [],
        "cover_url": null,
        "duration_seconds": null,
        "error_message": if status == "failed" { serde_json::json!("Repository not found") } else { serde_json::Value::Null },
        "created_at": "2024-05-01T12:00:00Z",
        "updated_at": "2024-05-01T12:01:00Z"
    })
}

async fn client_for(server: &MockServer) -> StoryClient {
    let config = ClientConfig::new(server.uri()).with_poll_interval(Duration::from_millis(10));
    StoryClient::new(config).unwrap()
}

// =============================================================================
// Client Creation Tests
// =============================================================================

mod client_creation {
    use super::*;

    #[test]
    fn test_valid_urls() {
        assert!(StoryClient::new(ClientConfig::new("https://tales.example.com")).is_ok());
        assert!(StoryClient::new(ClientConfig::new("http://localhost:8000")).is_ok());
    }

    #[test]
    fn test_empty_url_rejected() {
        match StoryClient::new(ClientConfig::new("  ")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("empty")),
            other => panic!("Expected InvalidUrl error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_url_without_scheme_rejected() {
        match StoryClient::new(ClientConfig::new("tales.example.com")) {
            Err(ClientError::InvalidUrl(msg)) => assert!(msg.contains("http://")),
            other => panic!("Expected InvalidUrl error, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_trailing_slashes_removed() {
        let client = StoryClient::new(ClientConfig::new("https://tales.example.com///")).unwrap();
        assert_eq!(client.base_url(), "https://tales.example.com");
    }

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:8000");
        assert_eq!(config.poll_interval(), Duration::from_secs(2));
        assert!(config.api_token.is_none());
    }
}

// =============================================================================
// Generate Tests
// =============================================================================

mod generate {
    use super::*;

    #[tokio::test]
    async fn test_generate_sends_camel_case_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/stories/generate"))
            .and(body_partial_json(serde_json::json!({
                "repoUrl": "https://github.com/tokio-rs/tokio",
                "style": "podcast",
                "duration": 15,
                "voice": "Rachel",
                "technicalDepth": "intermediate"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "story-1",
                "status": "pending",
                "message": "Story generation started"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = GenerationRequest::new("https://github.com/tokio-rs/tokio")
            .with_style(NarrativeStyle::Podcast)
            .with_duration(15);

        let accepted = client.generate(&request).await.unwrap();

        assert_eq!(accepted.id, "story-1");
        assert_eq!(accepted.status, StoryStatus::Pending);
    }

    #[tokio::test]
    async fn test_invalid_request_not_sent() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let request = GenerationRequest::new("https://github.com/a/b").with_duration(45);

        let result = client.generate(&request).await;

        assert!(matches!(result, Err(ClientError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_api_token_sent_as_bearer() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/stories/generate"))
            .and(header("Authorization", "Bearer secret-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "story-2",
                "status": "pending",
                "message": "Story generation started"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let config = ClientConfig::new(server.uri()).with_token("secret-token");
        let client = StoryClient::new(config).unwrap();

        let accepted = client
            .generate(&GenerationRequest::new("https://github.com/a/b"))
            .await
            .unwrap();

        assert_eq!(accepted.id, "story-2");
    }

    #[tokio::test]
    async fn test_service_unavailable_detail_reported() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/stories/generate"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "detail": "Database service unavailable: timeout"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let result = client
            .generate(&GenerationRequest::new("https://github.com/a/b"))
            .await;

        match result {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message, "Database service unavailable: timeout");
            }
            other => panic!("Expected ServerError, got {:?}", other),
        }
    }
}

// =============================================================================
// Story Status Tests
// =============================================================================

mod story_status {
    use super::*;

    #[tokio::test]
    async fn test_fetch_story() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/stories/story-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(story_json("story-1", "synthesizing", 75)),
            )
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let story = client.story("story-1").await.unwrap();

        assert_eq!(story.status, StoryStatus::Synthesizing);
        assert_eq!(story.progress, 75);
        assert_eq!(story.repo_name, "tokio-rs/tokio");
        assert!(!story.has_audio());
    }

    #[tokio::test]
    async fn test_missing_story_is_not_found() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/stories/nope"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "detail": "Story not found"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        match client.story("nope").await {
            Err(ClientError::NotFound(id)) => assert_eq!(id, "nope"),
            other => panic!("Expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_unauthorized() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        assert!(matches!(
            client.story("story-1").await,
            Err(ClientError::AuthRequired)
        ));
    }

    #[tokio::test]
    async fn test_malformed_body_is_parse_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        assert!(matches!(
            client.story("story-1").await,
            Err(ClientError::ParseError(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_server() {
        let client = StoryClient::new(ClientConfig::new("http://127.0.0.1:1")).unwrap();

        match client.story("story-1").await {
            Err(ClientError::ServerUnreachable(_) | ClientError::Request(_)) => {}
            other => panic!("Expected ServerUnreachable or Request error, got {:?}", other),
        }
    }
}

// =============================================================================
// Restart Tests
// =============================================================================

mod restart {
    use super::*;

    #[tokio::test]
    async fn test_restart_failed_story() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/stories/story-1/restart"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "story-1",
                "status": "pending",
                "message": "Story generation restarted"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let accepted = client.restart("story-1").await.unwrap();

        assert_eq!(accepted.status, StoryStatus::Pending);
        assert_eq!(accepted.message, "Story generation restarted");
    }

    #[tokio::test]
    async fn test_restart_rejected_for_running_story() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/stories/story-1/restart"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "detail": "Can only restart failed stories"
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;

        match client.restart("story-1").await {
            Err(ClientError::ServerError { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Can only restart failed stories");
            }
            other => panic!("Expected ServerError, got {:?}", other),
        }
    }
}

// =============================================================================
// Polling Tests
// =============================================================================

mod polling {
    use super::*;

    async fn mount_once(server: &MockServer, body: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/stories/story-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .up_to_n_times(1)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_wait_until_completed() {
        let server = MockServer::start().await;
        mount_once(&server, story_json("story-1", "analyzing", 5)).await;
        mount_once(&server, story_json("story-1", "analyzing", 5)).await;
        mount_once(&server, story_json("story-1", "synthesizing", 75)).await;
        mount_once(&server, story_json("story-1", "completed", 100)).await;

        let client = client_for(&server).await;
        let mut seen = Vec::new();

        let story = client
            .wait_for_completion("story-1", |s| seen.push((s.status, s.progress)))
            .await
            .unwrap();

        assert_eq!(story.status, StoryStatus::Completed);
        // Repeated reports are collapsed
        assert_eq!(
            seen,
            vec![
                (StoryStatus::Analyzing, 5),
                (StoryStatus::Synthesizing, 75),
                (StoryStatus::Completed, 100)
            ]
        );

        let item = queue_item(&story).unwrap();
        assert_eq!(item.audio_chunks.len(), 2);
        assert_eq!(item.subtitle.as_deref(), Some("Documentary"));
    }

    #[tokio::test]
    async fn test_wait_reports_failure() {
        let server = MockServer::start().await;
        mount_once(&server, story_json("story-1", "generating", 40)).await;
        mount_once(&server, story_json("story-1", "failed", 40)).await;

        let client = client_for(&server).await;

        match client.wait_for_completion("story-1", |_| {}).await {
            Err(ClientError::GenerationFailed { id, message }) => {
                assert_eq!(id, "story-1");
                assert_eq!(message, "Repository not found");
            }
            other => panic!("Expected GenerationFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_wait_gives_up_after_max_wait() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/stories/story-1"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(story_json("story-1", "pending", 0)),
            )
            .mount(&server)
            .await;

        let config = ClientConfig {
            max_wait_secs: 0,
            ..ClientConfig::new(server.uri())
        };
        let client = StoryClient::new(config).unwrap();

        assert!(matches!(
            client.wait_for_completion("story-1", |_| {}).await,
            Err(ClientError::WaitTimeout { .. })
        ));
    }
}
