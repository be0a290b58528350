//! Rodio-backed media element

use crate::error::{AudioError, Result};
use crate::loader::{LoadResult, LoadedSource, SourceLoader};
use rodio::{OutputStream, OutputStreamHandle, Sink};
use std::time::Duration;
use tale_playback::{LoadId, MediaElement, MediaEvent, MediaEventKind, PlayResult};
use tracing::{debug, warn};

/// Media element playing through the default output device
///
/// Sources are fetched and probed on a loader thread; [`MediaElement::take_events`]
/// picks up finished loads, builds the sink and reports position and end of
/// stream. Call it regularly (the controller's `tick` does).
///
/// Desktop output has no autoplay policy, so `play` never reports
/// [`PlayResult::Blocked`].
pub struct RodioElement {
    _stream: OutputStream,
    handle: OutputStreamHandle,
    loader: SourceLoader,
    sink: Option<Sink>,
    source: Option<LoadedSource>,
    current: Option<LoadId>,
    want_playing: bool,
    pending_seek: Option<f64>,
    ended: bool,
    volume: f32,
    rate: f32,
    events: Vec<MediaEvent>,
}

impl RodioElement {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            handle,
            loader: SourceLoader::new()?,
            sink: None,
            source: None,
            current: None,
            want_playing: false,
            pending_seek: None,
            ended: false,
            volume: 1.0,
            rate: 1.0,
            events: Vec::new(),
        })
    }

    /// Whether a decoded source is attached to the output
    pub fn is_ready(&self) -> bool {
        self.sink.is_some()
    }

    fn emit(&mut self, kind: MediaEventKind) {
        if let Some(load) = self.current {
            self.events.push(MediaEvent::new(load, kind));
        }
    }

    fn emit_error(&mut self, error: &AudioError) {
        self.emit(MediaEventKind::Error {
            code: error.code(),
            message: error.to_string(),
        });
    }

    fn stop_sink(&mut self) {
        if let Some(sink) = self.sink.take() {
            sink.stop();
        }
    }

    /// Build a paused sink over the loaded bytes
    fn build_sink(&self, source: &LoadedSource) -> Result<Sink> {
        let sink = Sink::try_new(&self.handle)?;
        sink.pause();
        sink.set_volume(self.volume);
        sink.set_speed(self.rate);
        sink.append(source.decoder()?);
        Ok(sink)
    }

    /// Attach a finished load to the output
    fn attach(&mut self, source: LoadedSource) -> Result<()> {
        let sink = self.build_sink(&source)?;

        if let Some(position) = self.pending_seek.take() {
            seek_sink(&sink, position);
        }
        if self.want_playing {
            sink.play();
        }

        let duration = source.duration.map_or(0.0, |d| d.as_secs_f64());
        self.sink = Some(sink);
        self.source = Some(source);

        self.emit(MediaEventKind::LoadedMetadata(duration));
        self.emit(MediaEventKind::CanPlay);
        Ok(())
    }

    /// Rebuild the sink after the source ran dry
    fn rewind_if_drained(&mut self) {
        let drained = self.sink.as_ref().is_some_and(Sink::empty);
        if !drained {
            return;
        }

        let Some(source) = self.source.clone() else {
            return;
        };
        match self.build_sink(&source) {
            Ok(sink) => {
                self.stop_sink();
                self.sink = Some(sink);
                self.ended = false;
            }
            Err(e) => self.emit_error(&e),
        }
    }

    fn handle_result(&mut self, result: LoadResult) {
        if Some(result.load) != self.current {
            debug!(load = %result.load, current = ?self.current, "Dropping stale load result");
            return;
        }

        let attached = result.outcome.and_then(|source| self.attach(source));
        if let Err(e) = attached {
            self.emit_error(&e);
        }
    }
}

impl MediaElement for RodioElement {
    fn load(&mut self, load: LoadId, url: &str) {
        self.stop_sink();
        self.source = None;
        self.current = Some(load);
        self.want_playing = false;
        self.pending_seek = None;
        self.ended = false;

        match self.loader.request(load, url) {
            Ok(()) => self.emit(MediaEventKind::Waiting),
            Err(e) => self.emit_error(&e),
        }
    }

    fn unload(&mut self) {
        self.stop_sink();
        self.source = None;
        self.current = None;
        self.want_playing = false;
        self.pending_seek = None;
    }

    fn play(&mut self) -> PlayResult {
        self.want_playing = true;
        self.rewind_if_drained();

        if let Some(sink) = &self.sink {
            sink.play();
        }
        PlayResult::Started
    }

    fn pause(&mut self) {
        self.want_playing = false;
        if let Some(sink) = &self.sink {
            sink.pause();
        }
    }

    fn seek(&mut self, position: f64) {
        if self.sink.is_none() {
            self.pending_seek = Some(position);
            return;
        }

        self.rewind_if_drained();
        if let Some(sink) = &self.sink {
            seek_sink(sink, position);
            if self.want_playing {
                sink.play();
            }
        }
        self.emit(MediaEventKind::TimeUpdate(position));
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
        if let Some(sink) = &self.sink {
            sink.set_volume(volume);
        }
    }

    fn set_playback_rate(&mut self, rate: f32) {
        self.rate = rate;
        if let Some(sink) = &self.sink {
            sink.set_speed(rate);
        }
    }

    fn take_events(&mut self) -> Vec<MediaEvent> {
        for result in self.loader.poll() {
            self.handle_result(result);
        }

        if self.want_playing && !self.ended {
            let progress = self
                .sink
                .as_ref()
                .map(|sink| (sink.empty(), sink.get_pos().as_secs_f64()));

            match progress {
                Some((true, _)) => {
                    self.ended = true;
                    self.emit(MediaEventKind::Ended);
                }
                Some((false, position)) => self.emit(MediaEventKind::TimeUpdate(position)),
                None => {}
            }
        }

        std::mem::take(&mut self.events)
    }
}

fn seek_sink(sink: &Sink, position: f64) {
    let Ok(target) = Duration::try_from_secs_f64(position.max(0.0)) else {
        return;
    };
    if let Err(e) = sink.try_seek(target) {
        warn!(position, error = %e, "Seek failed");
    }
}
