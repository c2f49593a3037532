//! Audio source abstraction used by the playback controller.
//!
//! Every playback is started under a [`SessionId`]. The natural end (or late
//! failure) of a playback is delivered as a [`PlaybackEvent`] tagged with that
//! id, so the owner of the event loop can tell current sessions from stale
//! ones.

use std::path::PathBuf;

use soundboard_audio::{
    PlayerError,
    player::{ClipHandle, ClipPlayer},
};
use soundboard_bridge::config::Config;
use soundboard_speech::{SpeechError, Synthesizer, Utterance, command::CommandSynthesizer};
use tokio::sync::mpsc::UnboundedSender;

/// Identity of a single playback session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "#{}", self.0)
    }
}

/// How a session ended without being stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackEventKind {
    Ended,
    Failed(String),
}

/// Completion notification delivered by an [`AudioSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackEvent {
    pub session: SessionId,
    pub kind: PlaybackEventKind,
}

/// What a session should play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayRequest {
    Clip { source: String, label: String },
    Speech { text: String },
}

/// Errors that prevent a session from starting.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error(transparent)]
    Player(#[from] PlayerError),
    #[error(transparent)]
    Speech(#[from] SpeechError),
    #[error("no audio output device is available")]
    NoOutputDevice,
}

/// Starts and stops clips and utterances.
///
/// Implementations must:
/// - Deliver exactly one [`PlaybackEvent`] for every started session that is
///   not stopped.
/// - Deliver nothing for a session after [`AudioSource::stop`] was called.
/// - Treat stopping an unknown or finished session as a no-op.
pub trait AudioSource {
    fn play_clip(&mut self, session: SessionId, source: &str, label: &str)
    -> Result<(), OutputError>;

    fn speak(&mut self, session: SessionId, text: &str) -> Result<(), OutputError>;

    fn stop(&mut self, session: SessionId);

    fn supports_speech(&self) -> bool;
}

enum ActiveHandle {
    Clip(ClipHandle),
    Utterance(Box<dyn Utterance>),
}

impl ActiveHandle {
    fn stop(&self) {
        match self {
            ActiveHandle::Clip(handle) => handle.stop(),
            ActiveHandle::Utterance(handle) => handle.stop(),
        }
    }
}

/// [`AudioSource`] backed by the system output device and an external
/// speech synthesizer.
pub struct SystemOutput {
    clips: Option<ClipPlayer>,
    synthesizer: Box<dyn Synthesizer>,
    events: UnboundedSender<PlaybackEvent>,
    active: Option<(SessionId, ActiveHandle)>,
}

impl SystemOutput {
    /// Opens the configured output device. A missing device is logged and
    /// makes every clip request fail instead of aborting the backend.
    pub fn new(config: &Config, events: UnboundedSender<PlaybackEvent>) -> Self {
        let sounds_dir = config
            .playback
            .sounds_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let clips = match ClipPlayer::new(
            config.audio_device_config.selected_device_name.as_deref(),
            sounds_dir,
            config.playback.volume,
        ) {
            Ok(player) => Some(player),
            Err(e) => {
                log::error!("Could not open the audio output: {e}");
                None
            }
        };

        let synthesizer = CommandSynthesizer::new(
            config.speech.program.clone(),
            config.speech.args.clone(),
        );
        if !synthesizer.is_supported() {
            log::warn!("Speech synthesizer {:?} is not available", config.speech.program);
        }

        Self {
            clips,
            synthesizer: Box::new(synthesizer),
            events,
            active: None,
        }
    }

    fn release(&mut self, session: SessionId) {
        if let Some((_, handle)) = self.active.take_if(|(active, _)| *active == session) {
            handle.stop();
        }
    }
}

impl AudioSource for SystemOutput {
    fn play_clip(
        &mut self,
        session: SessionId,
        source: &str,
        _label: &str,
    ) -> Result<(), OutputError> {
        let player = self.clips.as_ref().ok_or(OutputError::NoOutputDevice)?;
        let events = self.events.clone();
        let handle = player.play(source, move || {
            let _ = events.send(PlaybackEvent {
                session,
                kind: PlaybackEventKind::Ended,
            });
        })?;
        self.active = Some((session, ActiveHandle::Clip(handle)));
        Ok(())
    }

    fn speak(&mut self, session: SessionId, text: &str) -> Result<(), OutputError> {
        let events = self.events.clone();
        let handle = self.synthesizer.speak(
            text,
            Box::new(move |result| {
                let kind = match result {
                    Ok(()) => PlaybackEventKind::Ended,
                    Err(e) => PlaybackEventKind::Failed(e.to_string()),
                };
                let _ = events.send(PlaybackEvent { session, kind });
            }),
        )?;
        self.active = Some((session, ActiveHandle::Utterance(handle)));
        Ok(())
    }

    fn stop(&mut self, session: SessionId) {
        self.release(session);
    }

    fn supports_speech(&self) -> bool {
        self.synthesizer.is_supported()
    }
}
