//! Backend runtime entry point and public API surface.
//!
//! This crate owns the board, arbitrates playback between the manual,
//! randomized and sequential modes, and routes bridge messages to services.

mod app;
mod board;
mod config;
mod controller;
mod label;
mod modes;
mod output;
mod runtime;
mod services;
mod status;

#[cfg(test)]
mod testing;

pub use crate::runtime::run;
