//! Playback modes. Each mode decides what to play next and routes every play
//! and stop through the [`crate::controller::PlaybackController`].

pub mod manual;
pub mod random;
pub mod sequential;
