//! Chunk sequencer
//!
//! Presents an item whose audio is split into several files as one
//! continuous track. Intermediate chunk ends are consumed here; only the
//! end of the last chunk is reported upward.

use crate::element::{LoadId, MediaElement};
use crate::track::TrackPlayer;
use crate::types::AudioSource;
use tracing::debug;

/// Result of a chunk reaching its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkStep {
    /// Next chunk loaded and resumed
    Advanced { index: usize },

    /// Last chunk finished; the logical track is over
    Finished,
}

/// Walks the chunk list of the current item
#[derive(Debug, Clone, Default)]
pub struct ChunkSequencer {
    urls: Vec<String>,
    index: usize,

    /// Summed durations of the chunks before `index`
    elapsed_before: f64,
}

impl ChunkSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new item at its first chunk
    ///
    /// Returns `None` and loads nothing when the source has no URLs.
    pub fn start<E: MediaElement>(
        &mut self,
        source: &AudioSource,
        track: &mut TrackPlayer<E>,
    ) -> Option<LoadId> {
        let Some(first) = source.urls().first() else {
            self.clear();
            return None;
        };

        let load = track.load(first);
        self.urls = source.urls().to_vec();
        self.index = 0;
        self.elapsed_before = 0.0;

        Some(load)
    }

    /// Handle the end of the loaded chunk
    pub fn on_ended<E: MediaElement>(&mut self, track: &mut TrackPlayer<E>) -> ChunkStep {
        if self.index + 1 >= self.urls.len() {
            return ChunkStep::Finished;
        }

        self.elapsed_before += track.known_duration().unwrap_or(track.current_time());
        self.index += 1;

        debug!(index = self.index, total = self.urls.len(), "Advancing to next chunk");
        track.load(&self.urls[self.index]);
        track.play();

        ChunkStep::Advanced { index: self.index }
    }

    /// Go back to the start of the logical track
    ///
    /// Stays on the loaded source when already at the first chunk; otherwise
    /// reloads chunk 0 and resumes if `resume` is set.
    pub fn restart<E: MediaElement>(&mut self, track: &mut TrackPlayer<E>, resume: bool) {
        if self.urls.is_empty() {
            return;
        }

        if self.index == 0 {
            track.seek(0.0);
            return;
        }

        self.index = 0;
        self.elapsed_before = 0.0;
        track.load(&self.urls[0]);
        if resume {
            track.play();
        }
    }

    /// Forget the current item
    pub fn clear(&mut self) {
        self.urls.clear();
        self.index = 0;
        self.elapsed_before = 0.0;
    }

    /// Index of the loaded chunk
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of chunks of the current item (1 for single-file items)
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Time since the start of the logical track
    pub fn track_elapsed<E: MediaElement>(&self, track: &TrackPlayer<E>) -> f64 {
        self.elapsed_before + track.current_time()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{MediaEvent, MediaEventKind};
    use crate::mock::MockMediaElement;
    use crate::track::TrackSignal;
    use crate::volume::OutputSettings;

    fn chunked(urls: &[&str]) -> AudioSource {
        AudioSource::Chunked(urls.iter().map(|u| (*u).to_string()).collect())
    }

    fn finish_current(track: &mut TrackPlayer<MockMediaElement>, duration: f64) {
        let load = track.active_load().unwrap();
        track.handle_event(MediaEvent::new(load, MediaEventKind::LoadedMetadata(duration)));
        let signal = track.handle_event(MediaEvent::new(load, MediaEventKind::Ended));
        assert_eq!(signal, Some(TrackSignal::Ended));
    }

    #[test]
    fn walks_chunks_in_order_and_finishes_after_last() {
        let mut track = TrackPlayer::new(MockMediaElement::new(), OutputSettings::default());
        let mut chunks = ChunkSequencer::new();

        chunks.start(&chunked(&["a", "b", "c"]), &mut track);
        track.play();
        assert_eq!(track.url(), Some("a"));

        finish_current(&mut track, 10.0);
        assert_eq!(chunks.on_ended(&mut track), ChunkStep::Advanced { index: 1 });
        assert_eq!(track.url(), Some("b"));
        assert!(track.is_playing());

        finish_current(&mut track, 20.0);
        assert_eq!(chunks.on_ended(&mut track), ChunkStep::Advanced { index: 2 });
        assert_eq!(track.url(), Some("c"));

        finish_current(&mut track, 5.0);
        assert_eq!(chunks.on_ended(&mut track), ChunkStep::Finished);
        assert_eq!(track.element().loads(), &["a", "b", "c"]);
    }

    #[test]
    fn elapsed_spans_finished_chunks() {
        let mut track = TrackPlayer::new(MockMediaElement::new(), OutputSettings::default());
        let mut chunks = ChunkSequencer::new();

        chunks.start(&chunked(&["a", "b"]), &mut track);
        track.play();
        finish_current(&mut track, 10.0);
        chunks.on_ended(&mut track);

        let load = track.active_load().unwrap();
        track.handle_event(MediaEvent::new(load, MediaEventKind::TimeUpdate(2.5)));

        assert_eq!(chunks.track_elapsed(&track), 12.5);
    }

    #[test]
    fn restart_returns_to_first_chunk() {
        let mut track = TrackPlayer::new(MockMediaElement::new(), OutputSettings::default());
        let mut chunks = ChunkSequencer::new();

        chunks.start(&chunked(&["a", "b"]), &mut track);
        track.play();
        finish_current(&mut track, 10.0);
        chunks.on_ended(&mut track);

        chunks.restart(&mut track, true);

        assert_eq!(chunks.index(), 0);
        assert_eq!(track.url(), Some("a"));
        assert!(track.is_playing());
        assert_eq!(chunks.track_elapsed(&track), 0.0);
    }

    #[test]
    fn single_source_finishes_on_first_end() {
        let mut track = TrackPlayer::new(MockMediaElement::new(), OutputSettings::default());
        let mut chunks = ChunkSequencer::new();

        chunks.start(&AudioSource::Single("full.mp3".to_string()), &mut track);
        finish_current(&mut track, 10.0);

        assert_eq!(chunks.on_ended(&mut track), ChunkStep::Finished);
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn empty_chunk_list_loads_nothing() {
        let mut track = TrackPlayer::new(MockMediaElement::new(), OutputSettings::default());
        let mut chunks = ChunkSequencer::new();

        assert_eq!(chunks.start(&AudioSource::Chunked(Vec::new()), &mut track), None);
        assert!(chunks.is_empty());
        assert!(track.url().is_none());
        assert!(track.element().loads().is_empty());
        assert_eq!(chunks.on_ended(&mut track), ChunkStep::Finished);
    }

    #[test]
    fn unknown_chunk_length_counts_played_time() {
        let mut track = TrackPlayer::new(MockMediaElement::new(), OutputSettings::default());
        let mut chunks = ChunkSequencer::new();

        chunks.start(&chunked(&["a", "b"]), &mut track);
        track.play();
        let load = track.active_load().unwrap();
        track.handle_event(MediaEvent::new(load, MediaEventKind::LoadedMetadata(f64::INFINITY)));
        track.handle_event(MediaEvent::new(load, MediaEventKind::TimeUpdate(7.0)));
        track.handle_event(MediaEvent::new(load, MediaEventKind::Ended));
        chunks.on_ended(&mut track);

        assert_eq!(track.url(), Some("b"));
        assert_eq!(chunks.track_elapsed(&track), 7.0);
    }
}
