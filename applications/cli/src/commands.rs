//! Subcommand implementations

use crate::config::TaleConfig;
use crate::error::{CliError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tale_audio_desktop::RodioElement;
use tale_core::{GenerationRequest, StoryRecord};
use tale_playback::{
    MediaElement, MediaSession, NoopMediaSession, PlaybackConfig, PlaybackController,
    PlaybackEvent, PlaybackStatus, QueueItem,
};
use tale_server_client::{queue_item, StoryClient};
use tracing::{debug, info, warn};

/// How often the playback loop pumps the controller
pub const TICK_INTERVAL: Duration = Duration::from_millis(250);

pub async fn generate(client: &StoryClient, request: GenerationRequest, wait: bool) -> Result<()> {
    let accepted = client.generate(&request).await?;
    println!("Story {} accepted ({})", accepted.id, accepted.status);

    if wait {
        let story = client
            .wait_for_completion(&accepted.id, print_progress)
            .await?;
        print_story(&story);
    }

    Ok(())
}

pub async fn status(client: &StoryClient, id: &str, watch: bool) -> Result<()> {
    let story = if watch {
        client.wait_for_completion(id, print_progress).await?
    } else {
        client.story(id).await?
    };

    print_story(&story);
    Ok(())
}

pub async fn restart(client: &StoryClient, id: &str) -> Result<()> {
    let accepted = client.restart(id).await?;
    println!("Story {} restarted ({})", accepted.id, accepted.status);
    Ok(())
}

/// Fetch stories and play them back-to-back
pub async fn play(client: &StoryClient, ids: &[String], config: &TaleConfig) -> Result<()> {
    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        let story = client.story(id).await?;
        match queue_item(&story) {
            Some(item) => items.push(item),
            None => warn!(id = %id, status = %story.status, "Story has no audio yet, skipping"),
        }
    }

    if items.is_empty() {
        return Err(CliError::NothingToPlay);
    }

    let stop = Arc::new(AtomicBool::new(false));
    let ctrl_c = Arc::clone(&stop);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.store(true, Ordering::SeqCst);
        }
    });

    let playback = config.playback.clone();
    let media_controls = config.output.media_controls;

    // The output stream is bound to the thread that opened it
    tokio::task::spawn_blocking(move || play_blocking(items, playback, media_controls, &stop))
        .await
        .map_err(|e| CliError::Playback(e.to_string()))?
}

fn play_blocking(
    items: Vec<QueueItem>,
    playback: PlaybackConfig,
    media_controls: bool,
    stop: &AtomicBool,
) -> Result<()> {
    let element = RodioElement::new()?;

    if media_controls {
        if let Some(session) = os_session() {
            let controller = PlaybackController::with_session(element, session, playback);
            return run_queue(controller, items, stop);
        }
    }

    let controller = PlaybackController::with_session(element, NoopMediaSession, playback);
    run_queue(controller, items, stop)
}

#[cfg(feature = "media-controls")]
fn os_session() -> Option<tale_audio_desktop::OsMediaSession> {
    tale_audio_desktop::OsMediaSession::new()
        .map_err(|e| warn!(error = %e, "Media controls unavailable"))
        .ok()
}

#[cfg(not(feature = "media-controls"))]
fn os_session() -> Option<NoopMediaSession> {
    None
}

/// Whether the playback loop should keep going
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Finished,
}

/// Queue the items and drive the controller until the queue runs out
pub fn run_queue<E: MediaElement, S: MediaSession>(
    mut controller: PlaybackController<E, S>,
    items: Vec<QueueItem>,
    stop: &AtomicBool,
) -> Result<()> {
    start_queue(&mut controller, items)?;

    loop {
        if stop.load(Ordering::SeqCst) {
            controller.hide_player();
            info!("Playback interrupted");
            return Ok(());
        }

        std::thread::sleep(TICK_INTERVAL);
        if pump(&mut controller)? == Flow::Finished {
            info!("Queue finished");
            return Ok(());
        }
    }
}

/// Enqueue everything; the first item added to an empty queue starts on its own
pub fn start_queue<E: MediaElement, S: MediaSession>(
    controller: &mut PlaybackController<E, S>,
    items: Vec<QueueItem>,
) -> Result<()> {
    if items.is_empty() {
        return Err(CliError::NothingToPlay);
    }

    for item in items {
        controller.add_to_queue(item)?;
    }
    Ok(())
}

/// One step of the playback loop
///
/// A failed item is skipped when something follows it in the queue; a
/// failure on the last item ends playback with an error.
pub fn pump<E: MediaElement, S: MediaSession>(
    controller: &mut PlaybackController<E, S>,
) -> Result<Flow> {
    controller.tick();

    for event in controller.drain_events() {
        match event {
            PlaybackEvent::ItemChanged {
                item_id: Some(_), ..
            } => {
                if let Some(item) = controller.current_item() {
                    println!("Now playing: {}", item.title);
                }
            }
            PlaybackEvent::ItemFinished { item_id } => {
                debug!(item_id = %item_id, "Item finished");
            }
            PlaybackEvent::Error { failure } => {
                eprintln!("Playback failed: {}", failure);
                let has_next = controller
                    .queue_index()
                    .is_some_and(|index| index + 1 < controller.queue().len());
                if !has_next {
                    return Err(CliError::Playback(failure.to_string()));
                }
                controller.skip_next();
            }
            _ => {}
        }
    }

    if controller.status() == PlaybackStatus::Idle || !controller.is_player_visible() {
        Ok(Flow::Finished)
    } else {
        Ok(Flow::Continue)
    }
}

fn print_progress(story: &StoryRecord) {
    match &story.progress_message {
        Some(message) => println!("[{:>3}%] {} - {}", story.progress, story.status, message),
        None => println!("[{:>3}%] {}", story.progress, story.status),
    }
}

fn print_story(story: &StoryRecord) {
    println!("{} ({})", story.repo_name, story.id);
    println!("  status:   {} ({}%)", story.status, story.progress);
    println!("  style:    {}", story.style.label());

    if let Some(seconds) = story.total_duration() {
        println!("  length:   {}", format_duration(seconds));
    }
    if !story.audio_chunks.is_empty() {
        println!("  chunks:   {}", story.audio_chunks.len());
    }
    for chapter in &story.chapters {
        println!(
            "  {:>8}  {}",
            format_duration(chapter.timestamp_start),
            chapter.title
        );
    }
    if let Some(error) = &story.error_message {
        println!("  error:    {}", error);
    }
}

/// `m:ss` for positive values, `h:mm:ss` past an hour
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.floor() as u64
    } else {
        0
    };
    let (hours, minutes, secs) = (total / 3600, (total % 3600) / 60, total % 60);

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, secs)
    } else {
        format!("{}:{:02}", minutes, secs)
    }
}
