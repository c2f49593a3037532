//! Single-slot playback arbitration.
//!
//! The [`PlaybackController`] owns the only playback session that may be
//! active at any time. Every mode routes its plays and stops through it.
//! Starting a new session hard-cancels the current one: the cancelled session
//! never produces a completion, and its owner is recorded as interrupted so
//! the backend can tell the owning mode.

use soundboard_speech::utterance_text;

use crate::output::{
    AudioSource, OutputError, PlayRequest, PlaybackEvent, PlaybackEventKind, SessionId,
};
use crate::status::StatusReporter;

/// Component on whose behalf a session plays.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SessionOwner {
    Manual,
    Random,
    /// The sequence of the category with the given identifier.
    Sequence(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    Ended,
    Failed,
}

/// A session of the given owner ended on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub session: SessionId,
    pub owner: SessionOwner,
    pub outcome: SessionOutcome,
}

/// A session of the given owner was cancelled before it could end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interruption {
    pub session: SessionId,
    pub owner: SessionOwner,
}

#[derive(Debug)]
struct ActiveSession {
    id: SessionId,
    owner: SessionOwner,
}

pub struct PlaybackController<S> {
    output: S,
    status: StatusReporter,
    default_phrase: String,
    next_session: u64,
    current: Option<ActiveSession>,
    interrupted: Vec<Interruption>,
}

impl<S: AudioSource> PlaybackController<S> {
    pub fn new(output: S, status: StatusReporter, default_phrase: impl Into<String>) -> Self {
        Self {
            output,
            status,
            default_phrase: default_phrase.into(),
            next_session: 1,
            current: None,
            interrupted: Vec::new(),
        }
    }

    /// Stops the current session and starts `request` on behalf of `owner`.
    ///
    /// Failures are reported as statuses and returned; the slot stays empty.
    pub fn request(
        &mut self,
        owner: SessionOwner,
        request: PlayRequest,
    ) -> Result<SessionId, OutputError> {
        if matches!(request, PlayRequest::Speech { .. }) && !self.output.supports_speech() {
            self.status.warning("Speech synthesis is not supported");
            return Err(soundboard_speech::SpeechError::Unsupported.into());
        }

        self.stop_current();

        let session = SessionId(self.next_session);
        self.next_session += 1;

        let started = match &request {
            PlayRequest::Clip { source, label } => self
                .output
                .play_clip(session, source, label)
                .map(|_| format!("Playing audio file ({label})")),
            PlayRequest::Speech { text } => {
                let text = utterance_text(text, &self.default_phrase);
                self.output
                    .speak(session, text)
                    .map(|_| format!("Speaking \"{text}\""))
            }
        };

        match started {
            Ok(message) => {
                log::debug!("Session {session} started for {owner:?}");
                self.current = Some(ActiveSession { id: session, owner });
                self.status.info(message);
                Ok(session)
            }
            Err(e) => {
                self.status.error(format!("Playback failed: {e}"));
                Err(e)
            }
        }
    }

    /// Accepts a completion event from the audio source.
    ///
    /// Returns the completion when the event belongs to the current session.
    /// Events of any other session are stale and dropped.
    pub fn on_event(&mut self, event: PlaybackEvent) -> Option<Completion> {
        let Some(current) = self.current.take_if(|current| current.id == event.session) else {
            log::debug!("Dropping stale event of session {}", event.session);
            return None;
        };

        let outcome = match event.kind {
            PlaybackEventKind::Ended => {
                self.status.success("Playback finished");
                SessionOutcome::Ended
            }
            PlaybackEventKind::Failed(reason) => {
                self.status.error(format!("Playback failed: {reason}"));
                SessionOutcome::Failed
            }
        };

        Some(Completion {
            session: current.id,
            owner: current.owner,
            outcome,
        })
    }

    /// Stops `session` if it is the current one. Returns whether anything
    /// was stopped.
    pub fn stop_session(&mut self, session: SessionId) -> bool {
        if self.current_session() == Some(session) {
            self.stop_current().is_some()
        } else {
            false
        }
    }

    /// Stops whatever is currently playing.
    pub fn stop_current(&mut self) -> Option<SessionId> {
        let current = self.current.take()?;
        self.output.stop(current.id);
        self.status.info("Stopped");
        self.interrupted.push(Interruption {
            session: current.id,
            owner: current.owner,
        });
        Some(current.id)
    }

    /// Force-stops the current session. Mode flags are cleared by the
    /// backend's panic stop, which calls this.
    pub fn stop_all(&mut self) {
        self.stop_current();
    }

    /// Sessions hard-cancelled since the last call.
    pub fn take_interruptions(&mut self) -> Vec<Interruption> {
        std::mem::take(&mut self.interrupted)
    }

    pub fn status(&self) -> &StatusReporter {
        &self.status
    }

    pub fn current_session(&self) -> Option<SessionId> {
        self.current.as_ref().map(|current| current.id)
    }

    #[cfg(test)]
    pub fn current_owner(&self) -> Option<&SessionOwner> {
        self.current.as_ref().map(|current| &current.owner)
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    #[cfg(test)]
    pub fn output(&self) -> &S {
        &self.output
    }

    #[cfg(test)]
    pub fn output_mut(&mut self) -> &mut S {
        &mut self.output
    }
}
