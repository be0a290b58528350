//! Code Tales Server Client
//!
//! HTTP client library for the story generation backend.
//!
//! # Features
//!
//! - **Generate**: start a story for a repository
//! - **Status**: fetch a story and its pipeline progress
//! - **Restart**: re-run a failed story
//! - **Wait**: poll until a story completes or fails
//! - **Playback**: turn a finished story into a `QueueItem`
//!
//! # Example
//!
//! ```ignore
//! use tale_core::GenerationRequest;
//! use tale_server_client::{queue_item, ClientConfig, StoryClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = StoryClient::new(ClientConfig::new("https://tales.example.com"))?;
//!
//!     let accepted = client
//!         .generate(&GenerationRequest::new("https://github.com/tokio-rs/tokio"))
//!         .await?;
//!     let story = client.wait_for_completion(&accepted.id, |_| {}).await?;
//!
//!     if let Some(item) = queue_item(&story) {
//!         println!("Ready to play {}", item.title);
//!     }
//!     Ok(())
//! }
//! ```

mod client;
mod error;
mod queue;
mod types;

// Re-export main types
pub use client::StoryClient;
pub use error::{ClientError, Result};
pub use queue::queue_item;
pub use types::{ClientConfig, StoryAccepted, DEFAULT_BASE_URL};
