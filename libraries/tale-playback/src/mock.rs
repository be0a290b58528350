//! Scriptable media element and session for tests
//!
//! `MockMediaElement` records every command it receives and lets a test
//! decide what the "platform" reports back: metadata, time updates, the end
//! of a source, failures, and whether autoplay is allowed.

use crate::element::{LoadId, MediaElement, MediaEvent, MediaEventKind, PlayResult};
use crate::session::{MediaCommand, MediaSession, MediaSessionError, SessionPlayback};
use crate::types::QueueItem;

/// In-memory media element
#[derive(Debug, Clone)]
pub struct MockMediaElement {
    block_autoplay: bool,
    loaded: Option<(LoadId, String)>,
    loads: Vec<String>,
    playing: bool,
    volume: f32,
    rate: f32,
    seeks: Vec<f64>,
    play_calls: usize,
    pending: Vec<MediaEvent>,
}

impl Default for MockMediaElement {
    fn default() -> Self {
        Self::new()
    }
}

impl MockMediaElement {
    pub fn new() -> Self {
        Self {
            block_autoplay: false,
            loaded: None,
            loads: Vec::new(),
            playing: false,
            volume: 1.0,
            rate: 1.0,
            seeks: Vec::new(),
            play_calls: 0,
            pending: Vec::new(),
        }
    }

    /// Refuse every `play` call, like a browser without a user gesture
    #[must_use]
    pub fn blocking_autoplay(mut self) -> Self {
        self.block_autoplay = true;
        self
    }

    pub fn set_block_autoplay(&mut self, block: bool) {
        self.block_autoplay = block;
    }

    // ===== Scripting =====

    /// Queue an event for the current load
    ///
    /// Does nothing when no source is loaded.
    pub fn emit(&mut self, kind: MediaEventKind) {
        if let Some((load, _)) = &self.loaded {
            self.pending.push(MediaEvent::new(*load, kind));
        }
    }

    /// Queue an event for an arbitrary load (e.g. a superseded one)
    pub fn emit_for(&mut self, load: LoadId, kind: MediaEventKind) {
        self.pending.push(MediaEvent::new(load, kind));
    }

    /// Metadata resolved and data buffered
    pub fn resolve(&mut self, duration: f64) {
        self.emit(MediaEventKind::LoadedMetadata(duration));
        self.emit(MediaEventKind::CanPlay);
    }

    /// Playback position moved
    pub fn advance_to(&mut self, time: f64) {
        self.emit(MediaEventKind::TimeUpdate(time));
    }

    /// Source played to its end
    pub fn finish(&mut self) {
        self.playing = false;
        self.emit(MediaEventKind::Ended);
    }

    /// Source failed to load or decode
    pub fn fail(&mut self, code: Option<u16>, message: &str) {
        self.playing = false;
        self.emit(MediaEventKind::Error {
            code,
            message: message.to_string(),
        });
    }

    // ===== Inspection =====

    pub fn current_load(&self) -> Option<LoadId> {
        self.loaded.as_ref().map(|(load, _)| *load)
    }

    pub fn current_url(&self) -> Option<&str> {
        self.loaded.as_ref().map(|(_, url)| url.as_str())
    }

    /// Every URL ever loaded, in order
    pub fn loads(&self) -> &[String] {
        &self.loads
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn playback_rate(&self) -> f32 {
        self.rate
    }

    pub fn seeks(&self) -> &[f64] {
        &self.seeks
    }

    pub fn play_calls(&self) -> usize {
        self.play_calls
    }
}

impl MediaElement for MockMediaElement {
    fn load(&mut self, load: LoadId, url: &str) {
        self.playing = false;
        self.loaded = Some((load, url.to_string()));
        self.loads.push(url.to_string());
    }

    fn unload(&mut self) {
        self.playing = false;
        self.loaded = None;
    }

    fn play(&mut self) -> PlayResult {
        self.play_calls += 1;
        if self.block_autoplay {
            PlayResult::Blocked
        } else {
            self.playing = true;
            PlayResult::Started
        }
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn seek(&mut self, position: f64) {
        self.seeks.push(position);
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        std::mem::take(&mut self.pending)
    }
}

/// Media session that records what it was told
#[derive(Debug, Clone, Default)]
pub struct RecordingMediaSession {
    /// Title of the published item, `None` once cleared
    pub title: Option<String>,

    /// Last published playback state
    pub playback: Option<SessionPlayback>,

    /// Commands to hand out on the next `take_commands`
    pub incoming: Vec<MediaCommand>,

    /// Make every update fail
    pub failing: bool,
}

impl MediaSession for RecordingMediaSession {
    fn set_metadata(&mut self, item: Option<&QueueItem>) -> Result<(), MediaSessionError> {
        if self.failing {
            return Err(MediaSessionError("session unavailable".to_string()));
        }
        self.title = item.map(|i| i.title.clone());
        Ok(())
    }

    fn set_playback(&mut self, playback: SessionPlayback) -> Result<(), MediaSessionError> {
        if self.failing {
            return Err(MediaSessionError("session unavailable".to_string()));
        }
        self.playback = Some(playback);
        Ok(())
    }

    fn take_commands(&mut self) -> Vec<MediaCommand> {
        std::mem::take(&mut self.incoming)
    }
}
