//! OS media session via souvlaki (MPRIS, SMTC, macOS Now Playing)

use crate::error::{AudioError, Result};
use crossbeam_channel::{unbounded, Receiver, Sender};
use souvlaki::{
    MediaControlEvent, MediaControls, MediaMetadata, MediaPlayback, MediaPosition,
    PlatformConfig, SeekDirection,
};
use std::time::Duration;
use tale_playback::{MediaCommand, MediaSession, MediaSessionError, QueueItem, SessionPlayback};

/// Media session backed by the platform's transport controls
pub struct OsMediaSession {
    controls: MediaControls,
    commands: Receiver<MediaCommand>,
}

impl OsMediaSession {
    pub fn new() -> Result<Self> {
        let config = PlatformConfig {
            dbus_name: "code_tales",
            display_name: "Code Tales",
            hwnd: None,
        };

        let mut controls = MediaControls::new(config)
            .map_err(|e| AudioError::MediaControls(format!("{:?}", e)))?;

        let (sender, commands) = unbounded::<MediaCommand>();
        Self::attach_handler(&mut controls, sender)?;

        Ok(Self { controls, commands })
    }

    fn attach_handler(controls: &mut MediaControls, sender: Sender<MediaCommand>) -> Result<()> {
        controls
            .attach(move |event: MediaControlEvent| {
                if let Some(command) = command_for(event) {
                    let _ = sender.send(command);
                }
            })
            .map_err(|e| AudioError::MediaControls(format!("{:?}", e)))
    }
}

impl MediaSession for OsMediaSession {
    fn set_metadata(&mut self, item: Option<&QueueItem>) -> std::result::Result<(), MediaSessionError> {
        let metadata = match item {
            Some(item) => MediaMetadata {
                title: Some(&item.title),
                artist: item.subtitle.as_deref(),
                album: item.repo_name.as_deref(),
                cover_url: item.cover_url.as_deref(),
                duration: item.duration.and_then(to_duration),
            },
            None => MediaMetadata::default(),
        };

        self.controls
            .set_metadata(metadata)
            .map_err(|e| MediaSessionError(format!("{:?}", e)))
    }

    fn set_playback(&mut self, playback: SessionPlayback) -> std::result::Result<(), MediaSessionError> {
        let playback = match playback {
            SessionPlayback::Playing { position } => MediaPlayback::Playing {
                progress: to_duration(position).map(MediaPosition),
            },
            SessionPlayback::Paused { position } => MediaPlayback::Paused {
                progress: to_duration(position).map(MediaPosition),
            },
            SessionPlayback::Stopped => MediaPlayback::Stopped,
        };

        self.controls
            .set_playback(playback)
            .map_err(|e| MediaSessionError(format!("{:?}", e)))
    }

    fn take_commands(&mut self) -> Vec<MediaCommand> {
        self.commands.try_iter().collect()
    }
}

/// Translate a platform event into a transport command
pub fn command_for(event: MediaControlEvent) -> Option<MediaCommand> {
    match event {
        MediaControlEvent::Play => Some(MediaCommand::Play),
        MediaControlEvent::Pause => Some(MediaCommand::Pause),
        MediaControlEvent::Toggle => Some(MediaCommand::Toggle),
        MediaControlEvent::Next => Some(MediaCommand::Next),
        MediaControlEvent::Previous => Some(MediaCommand::Previous),
        MediaControlEvent::Stop | MediaControlEvent::Quit => Some(MediaCommand::Stop),
        MediaControlEvent::Seek(SeekDirection::Forward)
        | MediaControlEvent::SeekBy(SeekDirection::Forward, _) => Some(MediaCommand::SeekForward),
        MediaControlEvent::Seek(SeekDirection::Backward)
        | MediaControlEvent::SeekBy(SeekDirection::Backward, _) => {
            Some(MediaCommand::SeekBackward)
        }
        MediaControlEvent::SetPosition(MediaPosition(position)) => {
            Some(MediaCommand::SetPosition(position.as_secs_f64()))
        }
        _ => None,
    }
}

fn to_duration(seconds: f64) -> Option<Duration> {
    if seconds.is_finite() && seconds >= 0.0 {
        Duration::try_from_secs_f64(seconds).ok()
    } else {
        None
    }
}
