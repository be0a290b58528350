//! Turning finished stories into playable queue items.

use tale_core::StoryRecord;
use tale_playback::QueueItem;

/// Build a queue item for a story
///
/// Returns `None` while the story has no audio. The title is the repository
/// name and the subtitle the narrative style.
pub fn queue_item(record: &StoryRecord) -> Option<QueueItem> {
    if !record.has_audio() {
        return None;
    }

    let mut item = QueueItem::new(&record.id, &record.repo_name)
        .with_subtitle(record.style.label())
        .with_repo_name(&record.repo_name)
        .with_audio_chunks(record.audio_chunks.iter().cloned());

    if let Some(url) = &record.audio_url {
        item = item.with_audio_url(url);
    }
    if let Some(seconds) = record.total_duration() {
        item = item.with_duration(seconds);
    }
    item.cover_url.clone_from(&record.cover_url);

    Some(item)
}
