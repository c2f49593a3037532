//! Speech synthesis primitives for the soundboard.
//!
//! This crate provides a trait used to speak text asynchronously and report
//! when the utterance is over, plus an implementation that delegates the
//! actual synthesis to an external program such as `espeak-ng`.

pub mod command;

use std::time::Duration;

/// Interval at which utterance watchers poll the synthesizer process.
pub(crate) const WATCH_INTERVAL: Duration = Duration::from_millis(25);

/// Errors that can occur while speaking an utterance.
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    /// No synthesizer is available in this environment.
    #[error("speech synthesis is not supported")]
    Unsupported,
    /// The synthesizer process could not be started.
    #[error("failed to start synthesizer: {0}")]
    Spawn(#[source] std::io::Error),
    /// The synthesizer process could not be observed.
    #[error("failed to wait for synthesizer: {0}")]
    Wait(#[source] std::io::Error),
    /// The synthesizer exited unsuccessfully.
    #[error("synthesizer exited with {0}")]
    Exited(std::process::ExitStatus),
}

/// Callback invoked once when an utterance ends on its own.
pub type SpeechCallback = Box<dyn FnOnce(Result<(), SpeechError>) + Send + 'static>;

/// An utterance in progress.
pub trait Utterance: Send {
    /// Silences the utterance. Stopping twice is a no-op.
    fn stop(&self);

    fn is_stopped(&self) -> bool;
}

/// Trait for speech synthesizers that speak text without blocking the caller.
///
/// Implementations are expected to:
/// - Report unsupported environments through [`Synthesizer::is_supported`].
/// - Invoke the callback exactly once when the utterance ends or fails, and
///   never after the returned handle was stopped.
pub trait Synthesizer: Send {
    /// Whether speech can be produced at all.
    fn is_supported(&self) -> bool;

    /// Starts speaking `text`.
    fn speak(
        &self,
        text: &str,
        on_finished: SpeechCallback,
    ) -> Result<Box<dyn Utterance>, SpeechError>;
}

/// Returns the text that should actually be spoken: `text` trimmed, or
/// `default_phrase` when nothing remains.
pub fn utterance_text<'a>(text: &'a str, default_phrase: &'a str) -> &'a str {
    match text.trim() {
        "" => default_phrase,
        trimmed => trimmed,
    }
}
