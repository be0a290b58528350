//! Single-track player
//!
//! Owns the media element and turns its raw events into player state.
//! Knows nothing about queues or chunks.

use crate::element::{LoadId, MediaElement, MediaEvent, MediaEventKind, PlayResult};
use crate::types::PlaybackStatus;
use crate::volume::OutputSettings;
use tracing::{debug, trace, warn};

/// Signals the track player passes up to the layer above
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSignal {
    /// Duration of the loaded source resolved
    MetadataLoaded(f64),

    /// Loaded source played to its end
    Ended,

    /// Loading or playback failed
    Failed {
        url: String,
        code: Option<u16>,
        message: String,
    },
}

/// One media element plus the state derived from it
pub struct TrackPlayer<E: MediaElement> {
    element: E,

    // Load bookkeeping
    last_load: LoadId,
    active_load: Option<LoadId>,
    url: Option<String>,

    // Transport state
    status: PlaybackStatus,
    is_playing: bool,
    is_buffering: bool,
    current_time: f64,
    /// `None` until metadata arrives, and for sources of unknown length
    duration: Option<f64>,

    // Carried across loads
    output: OutputSettings,
}

impl<E: MediaElement> TrackPlayer<E> {
    /// Wrap a media element, applying the initial output settings
    pub fn new(mut element: E, output: OutputSettings) -> Self {
        element.set_volume(output.effective_volume());
        element.set_playback_rate(output.rate());

        Self {
            element,
            last_load: LoadId::default(),
            active_load: None,
            url: None,
            status: PlaybackStatus::Idle,
            is_playing: false,
            is_buffering: false,
            current_time: 0.0,
            duration: None,
            output,
        }
    }

    // ===== Source =====

    /// Replace the current source
    ///
    /// Stops whatever was playing, resets time and duration until the new
    /// metadata arrives, and re-applies volume, mute and rate.
    pub fn load(&mut self, url: &str) -> LoadId {
        if self.is_playing {
            self.element.pause();
        }

        let load = self.last_load.next();
        self.last_load = load;
        self.active_load = Some(load);
        self.url = Some(url.to_string());

        debug!(%load, url, "Loading source");
        self.element.load(load, url);
        self.apply_output();

        self.status = PlaybackStatus::Loading;
        self.is_playing = false;
        self.is_buffering = true;
        self.current_time = 0.0;
        self.duration = None;

        load
    }

    /// Stop output and forget the source
    pub fn unload(&mut self) {
        if self.url.is_some() {
            self.element.unload();
        }

        self.active_load = None;
        self.url = None;
        self.status = PlaybackStatus::Idle;
        self.is_playing = false;
        self.is_buffering = false;
        self.current_time = 0.0;
        self.duration = None;
    }

    // ===== Transport =====

    /// Start or resume playback
    ///
    /// Returns `None` when there is nothing playable loaded (no source, or the
    /// source failed). A blocked start leaves the player not playing.
    pub fn play(&mut self) -> Option<PlayResult> {
        if self.url.is_none() || self.status == PlaybackStatus::Error {
            return None;
        }

        let result = self.element.play();
        match result {
            PlayResult::Started => {
                self.is_playing = true;
                if self.status != PlaybackStatus::Loading {
                    self.status = PlaybackStatus::Playing;
                }
            }
            PlayResult::Blocked => {
                debug!(url = ?self.url, "Playback blocked by autoplay policy");
                self.is_playing = false;
                if self.status != PlaybackStatus::Loading {
                    self.status = PlaybackStatus::Paused;
                }
            }
        }

        Some(result)
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.url.is_none() {
            return;
        }

        self.element.pause();
        self.is_playing = false;
        if self.status == PlaybackStatus::Playing {
            self.status = PlaybackStatus::Paused;
        }
    }

    /// Seek within the loaded source
    ///
    /// Clamped to `[0, duration]`, or only at zero while the length is unknown.
    pub fn seek(&mut self, position: f64) {
        if self.url.is_none() || !position.is_finite() {
            return;
        }

        let target = match self.duration {
            Some(duration) => position.clamp(0.0, duration),
            None => position.max(0.0),
        };
        self.element.seek(target);
        self.current_time = target;
    }

    /// Mark the player as done after the last item ended
    ///
    /// The source stays loaded so a later `play` can restart it.
    pub fn halt(&mut self) {
        self.is_playing = false;
        self.is_buffering = false;
        self.status = PlaybackStatus::Idle;
    }

    // ===== Output =====

    pub fn set_volume(&mut self, volume: f32) {
        self.output.set_volume(volume);
        self.element.set_volume(self.output.effective_volume());
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.output.set_muted(muted);
        self.element.set_volume(self.output.effective_volume());
    }

    pub fn set_playback_rate(&mut self, rate: f32) {
        self.output.set_rate(rate);
        self.element.set_playback_rate(self.output.rate());
    }

    fn apply_output(&mut self) {
        self.element.set_volume(self.output.effective_volume());
        self.element.set_playback_rate(self.output.rate());
    }

    // ===== Events =====

    /// Apply one media element event
    ///
    /// Events that belong to a superseded load are dropped.
    pub fn handle_event(&mut self, event: MediaEvent) -> Option<TrackSignal> {
        if self.active_load != Some(event.load) {
            trace!(load = %event.load, active = ?self.active_load, "Ignoring stale media event");
            return None;
        }

        match event.kind {
            MediaEventKind::TimeUpdate(time) => {
                if time.is_finite() {
                    self.current_time = time.max(0.0);
                }
                None
            }
            MediaEventKind::LoadedMetadata(duration) => {
                // Streamed sources report an infinite length
                self.duration = duration.is_finite().then(|| duration.max(0.0));
                if let Some(duration) = self.duration {
                    self.current_time = self.current_time.min(duration);
                }
                self.is_buffering = false;
                if self.status == PlaybackStatus::Loading {
                    self.status = if self.is_playing {
                        PlaybackStatus::Playing
                    } else {
                        PlaybackStatus::Paused
                    };
                }
                Some(TrackSignal::MetadataLoaded(self.duration()))
            }
            MediaEventKind::Waiting => {
                self.is_buffering = true;
                None
            }
            MediaEventKind::CanPlay => {
                self.is_buffering = false;
                None
            }
            MediaEventKind::Paused => {
                self.is_playing = false;
                if self.status == PlaybackStatus::Playing {
                    self.status = PlaybackStatus::Paused;
                }
                None
            }
            MediaEventKind::Ended => {
                self.is_playing = false;
                self.is_buffering = false;
                if let Some(duration) = self.duration {
                    self.current_time = duration;
                }
                self.status = PlaybackStatus::Ended;
                Some(TrackSignal::Ended)
            }
            MediaEventKind::Error { code, message } => {
                let url = self.url.clone().unwrap_or_default();
                warn!(url = %url, code = ?code, message = %message, "Media element error");

                self.is_playing = false;
                self.is_buffering = false;
                self.status = PlaybackStatus::Error;
                Some(TrackSignal::Failed { url, code, message })
            }
        }
    }

    // ===== Accessors =====

    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    pub fn status(&self) -> PlaybackStatus {
        self.status
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_buffering(&self) -> bool {
        self.is_buffering
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Length of the loaded source in seconds, 0 when unknown
    pub fn duration(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }

    /// Length of the loaded source, if the element reported a finite one
    pub fn known_duration(&self) -> Option<f64> {
        self.duration
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn active_load(&self) -> Option<LoadId> {
        self.active_load
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockMediaElement;

    fn player() -> TrackPlayer<MockMediaElement> {
        TrackPlayer::new(MockMediaElement::new(), OutputSettings::default())
    }

    fn event(player: &TrackPlayer<MockMediaElement>, kind: MediaEventKind) -> MediaEvent {
        MediaEvent::new(player.active_load().unwrap(), kind)
    }

    #[test]
    fn play_without_source_is_noop() {
        let mut player = player();
        assert_eq!(player.play(), None);
        assert!(!player.is_playing());
        assert_eq!(player.element().play_calls(), 0);
    }

    #[test]
    fn load_resets_time_and_starts_buffering() {
        let mut player = player();
        player.load("a.mp3");
        let ev = event(&player, MediaEventKind::LoadedMetadata(30.0));
        player.handle_event(ev);
        let ev = event(&player, MediaEventKind::TimeUpdate(12.0));
        player.handle_event(ev);
        assert_eq!(player.current_time(), 12.0);

        player.load("b.mp3");
        assert_eq!(player.current_time(), 0.0);
        assert_eq!(player.duration(), 0.0);
        assert!(player.is_buffering());
        assert_eq!(player.status(), PlaybackStatus::Loading);
    }

    #[test]
    fn blocked_play_leaves_player_paused() {
        let mut player = TrackPlayer::new(
            MockMediaElement::new().blocking_autoplay(),
            OutputSettings::default(),
        );
        player.load("a.mp3");
        let ev = event(&player, MediaEventKind::LoadedMetadata(30.0));
        player.handle_event(ev);

        assert_eq!(player.play(), Some(PlayResult::Blocked));
        assert!(!player.is_playing());
        assert_eq!(player.status(), PlaybackStatus::Paused);
    }

    #[test]
    fn metadata_moves_loading_to_playing_when_started() {
        let mut player = player();
        player.load("a.mp3");
        player.play();
        assert_eq!(player.status(), PlaybackStatus::Loading);

        let ev = event(&player, MediaEventKind::LoadedMetadata(42.0));
        let signal = player.handle_event(ev);

        assert_eq!(signal, Some(TrackSignal::MetadataLoaded(42.0)));
        assert_eq!(player.status(), PlaybackStatus::Playing);
        assert!(!player.is_buffering());
    }

    #[test]
    fn seek_is_clamped_to_duration() {
        let mut player = player();
        player.load("a.mp3");
        let ev = event(&player, MediaEventKind::LoadedMetadata(60.0));
        player.handle_event(ev);

        player.seek(-5.0);
        assert_eq!(player.current_time(), 0.0);

        player.seek(160.0);
        assert_eq!(player.current_time(), 60.0);
        assert_eq!(player.element().seeks(), &[0.0, 60.0]);
    }

    #[test]
    fn unknown_length_only_clamps_at_zero() {
        let mut player = player();
        player.load("live.mp3");
        let ev = event(&player, MediaEventKind::LoadedMetadata(f64::INFINITY));
        player.handle_event(ev);

        assert_eq!(player.known_duration(), None);
        assert_eq!(player.duration(), 0.0);

        player.seek(45.0);
        assert_eq!(player.current_time(), 45.0);

        player.seek(-3.0);
        assert_eq!(player.current_time(), 0.0);
    }

    #[test]
    fn early_seek_is_clamped_once_length_resolves() {
        let mut player = player();
        player.load("a.mp3");
        player.seek(150.0);

        let ev = event(&player, MediaEventKind::LoadedMetadata(60.0));
        player.handle_event(ev);

        assert_eq!(player.current_time(), 60.0);
    }

    #[test]
    fn stale_events_are_ignored() {
        let mut player = player();
        let first = player.load("a.mp3");
        player.load("b.mp3");

        let signal = player.handle_event(MediaEvent::new(first, MediaEventKind::Ended));

        assert_eq!(signal, None);
        assert_eq!(player.status(), PlaybackStatus::Loading);
    }

    #[test]
    fn error_stops_playback_and_buffering() {
        let mut player = player();
        player.load("a.mp3");
        player.play();

        let ev = event(
            &player,
            MediaEventKind::Error {
                code: Some(4),
                message: "unsupported".to_string(),
            },
        );
        let signal = player.handle_event(ev);

        assert!(matches!(signal, Some(TrackSignal::Failed { code: Some(4), .. })));
        assert!(!player.is_playing());
        assert!(!player.is_buffering());
        assert_eq!(player.status(), PlaybackStatus::Error);
        assert_eq!(player.play(), None);
    }

    #[test]
    fn output_settings_survive_load() {
        let mut player = player();
        player.set_volume(0.3);
        player.set_playback_rate(1.5);

        player.load("a.mp3");

        assert_eq!(player.element().volume(), 0.3);
        assert_eq!(player.element().playback_rate(), 1.5);
    }

    #[test]
    fn mute_sends_zero_volume_to_element() {
        let mut player = player();
        player.set_volume(0.6);
        player.set_muted(true);
        assert_eq!(player.element().volume(), 0.0);

        player.set_muted(false);
        assert_eq!(player.element().volume(), 0.6);
    }
}
