//! Test doubles shared by the backend's unit tests.

use std::collections::{BTreeSet, HashSet};

use soundboard_audio::PlayerError;
use soundboard_bridge::MessageFromBackend;
use tokio::sync::mpsc::{self, Receiver};

use crate::output::{AudioSource, OutputError, PlaybackEvent, PlaybackEventKind, SessionId};
use crate::status::StatusReporter;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Clip { session: SessionId, source: String },
    Speak { session: SessionId, text: String },
    Stop(SessionId),
}

/// [`AudioSource`] that records every call and tracks which sessions would
/// be audible.
#[derive(Debug)]
pub struct RecordingOutput {
    pub calls: Vec<Call>,
    pub playing: BTreeSet<SessionId>,
    pub max_concurrent: usize,
    pub speech_supported: bool,
    pub rejected_sources: HashSet<String>,
}

impl RecordingOutput {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            playing: BTreeSet::new(),
            max_concurrent: 0,
            speech_supported: true,
            rejected_sources: HashSet::new(),
        }
    }

    /// Lets `session` play to its end and returns the event the real output
    /// would deliver.
    pub fn finish(&mut self, session: SessionId) -> PlaybackEvent {
        self.playing.remove(&session);
        PlaybackEvent {
            session,
            kind: PlaybackEventKind::Ended,
        }
    }

    /// Sources of every clip started so far, in order.
    pub fn played_sources(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Clip { source, .. } => Some(source.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Source or text of every clip and utterance started so far, in order.
    pub fn played_items(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Clip { source, .. } => Some(source.as_str()),
                Call::Speak { text, .. } => Some(text.as_str()),
                Call::Stop(_) => None,
            })
            .collect()
    }

    fn start(&mut self, session: SessionId, call: Call) {
        self.calls.push(call);
        self.playing.insert(session);
        self.max_concurrent = self.max_concurrent.max(self.playing.len());
    }
}

impl AudioSource for RecordingOutput {
    fn play_clip(
        &mut self,
        session: SessionId,
        source: &str,
        _label: &str,
    ) -> Result<(), OutputError> {
        if self.rejected_sources.contains(source) {
            return Err(PlayerError::UnsupportedSource(source.to_string()).into());
        }
        self.start(
            session,
            Call::Clip {
                session,
                source: source.to_string(),
            },
        );
        Ok(())
    }

    fn speak(&mut self, session: SessionId, text: &str) -> Result<(), OutputError> {
        self.start(
            session,
            Call::Speak {
                session,
                text: text.to_string(),
            },
        );
        Ok(())
    }

    fn stop(&mut self, session: SessionId) {
        self.calls.push(Call::Stop(session));
        self.playing.remove(&session);
    }

    fn supports_speech(&self) -> bool {
        self.speech_supported
    }
}

/// A status reporter whose notifications can be inspected.
pub fn status_channel() -> (StatusReporter, Receiver<MessageFromBackend>) {
    let (tx, rx) = mpsc::channel(4096);
    (StatusReporter::new(tx), rx)
}

/// Collects the text of every notification received so far.
pub fn drain_statuses(rx: &mut Receiver<MessageFromBackend>) -> Vec<String> {
    let mut statuses = Vec::new();
    while let Ok(message) = rx.try_recv() {
        if let MessageFromBackend::NotificationMessage(notification) = message {
            statuses.push(notification.message);
        }
    }
    statuses
}
