//! Audio output utilities for the soundboard.
//!
//! This crate wraps `rodio` (and the `cpal` host it is built on) into a small
//! set of helpers oriented toward one-shot clip playback:
//! - Enumerating output devices and opening an output stream.
//! - Resolving clip sources to files on disk.
//! - Playing a clip and reporting its natural end through a callback.
//!
//! # Threading
//! Completion callbacks run on a watcher thread owned by the player. They
//! should only forward a message to the owning event loop.

pub mod device;
pub mod player;
pub mod source;

/// Interval at which watcher threads poll a sink for completion.
pub const WATCH_INTERVAL_MILLISECONDS: u64 = 25;

/// Errors that can occur while starting the playback of a clip.
#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    /// The clip source is empty.
    #[error("clip source is empty")]
    EmptySource,
    /// The clip source uses a scheme that cannot be played locally (e.g. an
    /// `http://` URL).
    #[error("unsupported clip source: {0}")]
    UnsupportedSource(String),
    /// The clip file could not be opened.
    #[error("failed to open clip {path:?}: {source}")]
    Open {
        path: std::path::PathBuf,
        source: std::io::Error,
    },
    /// The clip file is not in a format the decoder understands.
    #[error("failed to decode clip: {0}")]
    Decode(#[from] rodio::decoder::DecoderError),
    /// The output device refused a new sink.
    #[error("failed to create output sink: {0}")]
    Sink(#[from] rodio::PlayError),
    /// No output stream could be opened on the device.
    #[error("failed to open output stream: {0}")]
    Stream(#[from] rodio::StreamError),
    /// Output devices could not be enumerated.
    #[error("failed to read output devices: {0}")]
    Devices(#[from] rodio::cpal::DevicesError),
}
