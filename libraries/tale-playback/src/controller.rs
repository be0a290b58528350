//! Playback controller - the public surface
//!
//! Combines the track player, chunk sequencer, queue and media session
//! into the one object UI code talks to. One controller is created per
//! session and passed around explicitly.
//!
//! All mutation goes through `&mut self`, so a track advance triggered by
//! an `Ended` event always completes before the next command is handled.

use crate::{
    chunks::{ChunkSequencer, ChunkStep},
    element::{MediaElement, MediaEvent, MediaEventKind, PlayResult},
    error::{PlaybackError, PlaybackFailure, Result},
    events::PlaybackEvent,
    queue::{Queue, Removal},
    session::{MediaCommand, MediaSession, NoopMediaSession, SessionPlayback},
    track::{TrackPlayer, TrackSignal},
    types::{PlaybackConfig, PlaybackSnapshot, PlaybackStatus, QueueItem},
    volume::OutputSettings,
};
use tracing::{debug, info, warn};

/// Central playback management
///
/// Orchestrates:
/// - Queue management (linear, deduplicated by id)
/// - Chunked items played as one continuous track
/// - Output settings (volume, mute, rate) carried across items
/// - Floating player visibility and expansion
/// - OS media session updates
pub struct PlaybackController<E: MediaElement, S: MediaSession = NoopMediaSession> {
    config: PlaybackConfig,

    // Playback layers
    track: TrackPlayer<E>,
    chunks: ChunkSequencer,
    queue: Queue,
    session: S,

    // UI flags
    is_player_visible: bool,
    is_player_expanded: bool,

    last_error: Option<PlaybackFailure>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
    reported_status: PlaybackStatus,
}

impl<E: MediaElement> PlaybackController<E, NoopMediaSession> {
    /// Create a controller without OS media session integration
    pub fn new(element: E, config: PlaybackConfig) -> Self {
        Self::with_session(element, NoopMediaSession, config)
    }
}

impl<E: MediaElement, S: MediaSession> PlaybackController<E, S> {
    /// Create a controller publishing to the given media session
    pub fn with_session(element: E, session: S, config: PlaybackConfig) -> Self {
        let output = OutputSettings::new(config.volume, config.playback_rate);

        Self {
            config,
            track: TrackPlayer::new(element, output),
            chunks: ChunkSequencer::new(),
            queue: Queue::new(),
            session,
            is_player_visible: false,
            is_player_expanded: false,
            last_error: None,
            pending_events: Vec::new(),
            reported_status: PlaybackStatus::Idle,
        }
    }

    // ===== Playback Control =====

    /// Play an item, or resume the current one
    ///
    /// A queued item (matched by id) is jumped to; a new item is appended
    /// first. Items without audio are rejected and never enter the queue.
    pub fn play(&mut self, item: Option<QueueItem>) -> Result<()> {
        let Some(item) = item else {
            self.resume();
            return Ok(());
        };

        ensure_playable(&item)?;

        match self.queue.position_of(&item.id) {
            Some(position) if self.queue.index() == Some(position) && self.is_resumable() => {
                self.resume();
            }
            Some(position) => self.load_index(position, true),
            None => {
                let position = self.queue.push(item).unwrap_or_default();
                self.emit_queue_changed();
                self.load_index(position, true);
            }
        }

        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        self.track.pause();
        self.sync_status();
    }

    /// Pause when playing, resume otherwise
    pub fn toggle(&mut self) {
        if self.track.is_playing() {
            self.pause();
        } else {
            self.resume();
        }
    }

    /// Seek within the loaded source (clamped to `[0, duration]` once the length is known)
    pub fn seek(&mut self, position: f64) {
        self.track.seek(position);
        self.emit_position();
        self.publish_playback();
    }

    /// Jump forward, 15 seconds unless configured otherwise
    ///
    /// Non-finite steps are ignored.
    pub fn skip_forward(&mut self, seconds: Option<f64>) {
        let step = seconds.unwrap_or(self.config.skip_interval_secs);
        if !step.is_finite() {
            return;
        }
        self.seek(self.track.current_time() + step);
    }

    /// Jump backward, 15 seconds unless configured otherwise
    pub fn skip_backward(&mut self, seconds: Option<f64>) {
        let step = seconds.unwrap_or(self.config.skip_interval_secs);
        if !step.is_finite() {
            return;
        }
        self.seek(self.track.current_time() - step);
    }

    /// Go to the next queue entry
    pub fn skip_next(&mut self) {
        if let Some(next) = self.queue.next_index() {
            self.load_index(next, true);
        }
    }

    /// Restart the current item, or go to the previous entry
    ///
    /// If more than the restart threshold (3 s) of the item has played, the
    /// item restarts from zero. Otherwise the previous entry is loaded; on
    /// the first entry the item restarts.
    pub fn skip_previous(&mut self) {
        if self.queue.current().is_none() {
            return;
        }

        let elapsed = self.chunks.track_elapsed(&self.track);
        if elapsed > self.config.restart_threshold_secs {
            self.restart_current();
            return;
        }

        match self.queue.previous_index() {
            Some(previous) => self.load_index(previous, true),
            None => self.restart_current(),
        }
    }

    // ===== Output =====

    /// Set volume (0.0-1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.track.set_volume(volume);
        self.emit_output_changed();
    }

    /// Toggle mute state
    pub fn toggle_mute(&mut self) {
        let muted = !self.track.output().is_muted();
        self.set_muted(muted);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.track.set_muted(muted);
        self.emit_output_changed();
    }

    /// Set playback speed multiplier
    pub fn set_playback_rate(&mut self, rate: f32) {
        self.track.set_playback_rate(rate);
        self.emit_output_changed();
    }

    // ===== Queue Management =====

    /// Append an item to the queue
    ///
    /// Adding an id that is already queued is a no-op. When nothing is
    /// loaded yet, the new item starts playing right away.
    pub fn add_to_queue(&mut self, item: QueueItem) -> Result<()> {
        ensure_playable(&item)?;

        let id = item.id.clone();
        let Some(position) = self.queue.push(item) else {
            debug!(item_id = %id, "Item already queued");
            return Ok(());
        };
        self.emit_queue_changed();

        if self.queue.current().is_none() {
            self.load_index(position, true);
        }

        Ok(())
    }

    /// Remove an item by id
    ///
    /// Removing the current item loads the entry that takes its place,
    /// keeping the playing/paused intent. If it was the last entry,
    /// playback stops and nothing is current afterwards.
    pub fn remove_from_queue(&mut self, id: &str) {
        let was_playing = self.track.is_playing();
        let Some((removed, removal)) = self.queue.remove(id) else {
            return;
        };
        self.emit_queue_changed();

        if removal != Removal::Current {
            return;
        }

        match self.queue.index() {
            Some(index) => self.load_entry(index, was_playing, Some(removed.id)),
            None => {
                self.stop_output();
                self.emit(PlaybackEvent::ItemChanged {
                    item_id: None,
                    previous_item_id: Some(removed.id),
                });
                self.sync_status();
            }
        }
    }

    /// Empty the queue, stop playback and hide the player
    pub fn clear_queue(&mut self) {
        let previous = self.queue.current().map(|item| item.id.clone());

        self.queue.clear();
        self.stop_output();
        self.is_player_visible = false;

        self.emit_queue_changed();
        if previous.is_some() {
            self.emit(PlaybackEvent::ItemChanged {
                item_id: None,
                previous_item_id: previous,
            });
        }
        self.sync_status();
    }

    /// Jump to a queue position (out-of-range is ignored)
    pub fn play_from_queue(&mut self, index: usize) {
        if index < self.queue.len() {
            self.load_index(index, true);
        }
    }

    // ===== Player UI =====

    pub fn show_player(&mut self) {
        self.is_player_visible = true;
    }

    /// Hide the floating player; hiding also pauses
    pub fn hide_player(&mut self) {
        self.is_player_visible = false;
        self.pause();
    }

    pub fn set_player_expanded(&mut self, expanded: bool) {
        self.is_player_expanded = expanded;
    }

    // ===== Platform Integration =====

    /// Apply one event from the media element
    pub fn handle_media_event(&mut self, event: MediaEvent) {
        let is_time_update = matches!(event.kind, MediaEventKind::TimeUpdate(_));

        match self.track.handle_event(event) {
            Some(TrackSignal::Ended) => self.on_source_ended(),
            Some(TrackSignal::Failed { url, code, message }) => {
                let failure = PlaybackFailure {
                    item_id: self.queue.current().map(|item| item.id.clone()),
                    url,
                    code,
                    message,
                };
                self.last_error = Some(failure.clone());
                self.emit(PlaybackEvent::Error { failure });
            }
            Some(TrackSignal::MetadataLoaded(_)) => self.emit_position(),
            None if is_time_update => self.emit_position(),
            None => {}
        }

        self.sync_status();
    }

    /// Apply a transport command from the OS media session
    pub fn handle_media_command(&mut self, command: MediaCommand) {
        debug!(?command, "Media session command");
        match command {
            MediaCommand::Play => self.resume(),
            MediaCommand::Pause => self.pause(),
            MediaCommand::Toggle => self.toggle(),
            MediaCommand::Stop => self.hide_player(),
            MediaCommand::Next => self.skip_next(),
            MediaCommand::Previous => self.skip_previous(),
            MediaCommand::SeekForward => self.skip_forward(None),
            MediaCommand::SeekBackward => self.skip_backward(None),
            MediaCommand::SetPosition(position) => self.seek(position),
        }
    }

    /// Pump pending element events and session commands
    ///
    /// Platforms that poll call this from their event loop.
    pub fn tick(&mut self) {
        for event in self.track.element_mut().take_events() {
            self.handle_media_event(event);
        }

        for command in self.session.take_commands() {
            self.handle_media_command(command);
        }
    }

    /// Drain events queued since the last call
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== State =====

    /// Copy of the whole playback state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        let output = self.track.output();

        PlaybackSnapshot {
            current_item: self.queue.current().cloned(),
            queue: self.queue.items().to_vec(),
            queue_index: self.queue.index(),
            current_chunk_index: self.chunks.index(),
            status: self.track.status(),
            is_playing: self.track.is_playing(),
            is_buffering: self.track.is_buffering(),
            current_time: self.track.current_time(),
            duration: self.track.duration(),
            track_elapsed: self.chunks.track_elapsed(&self.track),
            volume: output.volume(),
            is_muted: output.is_muted(),
            playback_rate: output.rate(),
            is_player_visible: self.is_player_visible,
            is_player_expanded: self.is_player_expanded,
            last_error: self.last_error.clone(),
        }
    }

    pub fn current_item(&self) -> Option<&QueueItem> {
        self.queue.current()
    }

    pub fn queue(&self) -> &[QueueItem] {
        self.queue.items()
    }

    pub fn queue_index(&self) -> Option<usize> {
        self.queue.index()
    }

    pub fn status(&self) -> PlaybackStatus {
        self.track.status()
    }

    pub fn is_playing(&self) -> bool {
        self.track.is_playing()
    }

    pub fn current_time(&self) -> f64 {
        self.track.current_time()
    }

    pub fn duration(&self) -> f64 {
        self.track.duration()
    }

    pub fn is_player_visible(&self) -> bool {
        self.is_player_visible
    }

    pub fn last_error(&self) -> Option<&PlaybackFailure> {
        self.last_error.as_ref()
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn element(&self) -> &E {
        self.track.element()
    }

    pub fn element_mut(&mut self) -> &mut E {
        self.track.element_mut()
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    // ===== Internal =====

    /// Load the entry at `index` and optionally start it
    fn load_index(&mut self, index: usize, autoplay: bool) {
        let previous = self.queue.current().map(|item| item.id.clone());
        self.load_entry(index, autoplay, previous);
    }

    fn load_entry(&mut self, index: usize, autoplay: bool, previous: Option<String>) {
        let Some(item) = self.queue.select(index).cloned() else {
            return;
        };
        let Some(source) = item.source() else {
            // Unreachable for items accepted through the public API
            warn!(item_id = %item.id, "Queued item has no audio source");
            return;
        };

        info!(item_id = %item.id, index, chunks = source.urls().len(), "Loading item");

        self.last_error = None;
        if self.chunks.start(&source, &mut self.track).is_none() {
            warn!(item_id = %item.id, "Queued item has an empty chunk list");
            self.stop_output();
            self.sync_status();
            return;
        }
        self.is_player_visible = true;

        if let Err(e) = self.session.set_metadata(Some(&item)) {
            debug!(error = %e, "Media session metadata update failed");
        }

        self.emit(PlaybackEvent::ItemChanged {
            item_id: Some(item.id),
            previous_item_id: previous,
        });

        if autoplay && self.track.play() == Some(PlayResult::Blocked) {
            info!("Autoplay blocked; waiting for user to press play");
        }

        self.sync_status();
    }

    /// Resume the current item, reloading it if it ended, halted or failed
    fn resume(&mut self) {
        let Some(index) = self.queue.index() else {
            return;
        };

        if self.is_resumable() {
            self.track.play();
            self.sync_status();
        } else {
            self.load_index(index, true);
        }
    }

    fn is_resumable(&self) -> bool {
        matches!(
            self.track.status(),
            PlaybackStatus::Loading | PlaybackStatus::Playing | PlaybackStatus::Paused
        )
    }

    fn restart_current(&mut self) {
        if self.is_resumable() {
            let resume = self.track.is_playing();
            self.chunks.restart(&mut self.track, resume);
            self.emit_position();
            self.sync_status();
        } else if let Some(index) = self.queue.index() {
            self.load_index(index, false);
        }
    }

    /// Last chunk of the current item finished
    fn on_source_ended(&mut self) {
        match self.chunks.on_ended(&mut self.track) {
            ChunkStep::Advanced { index } => {
                debug!(chunk = index, "Continuing with next chunk");
            }
            ChunkStep::Finished => {
                if let Some(item) = self.queue.current() {
                    let item_id = item.id.clone();
                    self.emit(PlaybackEvent::ItemFinished { item_id });
                }

                match self.queue.next_index() {
                    Some(next) => self.load_index(next, true),
                    None => {
                        debug!("Reached end of queue");
                        self.track.halt();
                    }
                }
            }
        }
    }

    fn stop_output(&mut self) {
        self.track.unload();
        self.chunks.clear();
        self.last_error = None;

        if let Err(e) = self.session.set_metadata(None) {
            debug!(error = %e, "Media session metadata update failed");
        }
    }

    fn sync_status(&mut self) {
        let status = self.track.status();
        if status != self.reported_status {
            self.reported_status = status;
            self.emit(PlaybackEvent::StatusChanged { status });
            self.publish_playback();
        }
    }

    fn publish_playback(&mut self) {
        let position = self.chunks.track_elapsed(&self.track);
        let playback = match self.track.status() {
            PlaybackStatus::Playing => SessionPlayback::Playing { position },
            PlaybackStatus::Loading if self.track.is_playing() => {
                SessionPlayback::Playing { position }
            }
            PlaybackStatus::Loading | PlaybackStatus::Paused | PlaybackStatus::Error => {
                SessionPlayback::Paused { position }
            }
            PlaybackStatus::Idle | PlaybackStatus::Ended => SessionPlayback::Stopped,
        };

        if let Err(e) = self.session.set_playback(playback) {
            debug!(error = %e, "Media session playback update failed");
        }
    }

    /// Queue an event for `drain_events`
    ///
    /// Back-to-back position updates collapse into the latest one.
    fn emit(&mut self, event: PlaybackEvent) {
        if matches!(event, PlaybackEvent::Position { .. }) {
            if let Some(last @ PlaybackEvent::Position { .. }) = self.pending_events.last_mut() {
                *last = event;
                return;
            }
        }
        self.pending_events.push(event);
    }

    fn emit_queue_changed(&mut self) {
        self.emit(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
            index: self.queue.index(),
        });
    }

    fn emit_position(&mut self) {
        self.emit(PlaybackEvent::Position {
            current_time: self.track.current_time(),
            duration: self.track.duration(),
        });
    }

    fn emit_output_changed(&mut self) {
        let output = *self.track.output();
        self.emit(PlaybackEvent::OutputChanged {
            volume: output.volume(),
            is_muted: output.is_muted(),
            playback_rate: output.rate(),
        });
    }
}

fn ensure_playable(item: &QueueItem) -> Result<()> {
    if item.is_playable() {
        Ok(())
    } else {
        warn!(item_id = %item.id, "Rejecting item without audio source");
        Err(PlaybackError::Unplayable {
            id: item.id.clone(),
        })
    }
}
