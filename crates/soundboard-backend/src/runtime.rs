//! Backend runtime setup and orchestration.
//!
//! This module wires together configuration, the audio output, the board and
//! the event loop that listens to frontend bridge requests.

use std::{thread, time::Duration};

use soundboard_bridge::{MessageFromBackend, MessageToBackend, config::Config};
use tokio::sync::mpsc::{Receiver, Sender};

use crate::app::AppContext;
use crate::board::Board;
use crate::controller::PlaybackController;
use crate::output::SystemOutput;
use crate::status::StatusReporter;

/// Initialize backend state and start processing frontend messages.
async fn setup_backend(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) {
    let status = StatusReporter::new(tx.clone());

    let config = match crate::config::load_config().await {
        Ok(config) => config,
        Err(e) => {
            status.error(format!("Could not load configuration: {e}"));
            Config::default()
        }
    };

    let board = match Board::from_config(&config.board) {
        Ok(board) => board,
        Err(e) => {
            status.error(format!("Invalid board configuration: {e}"));
            Board::from_config(&Default::default()).unwrap_or_default()
        }
    };

    let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();
    let output = SystemOutput::new(&config, events_tx);
    let controller = PlaybackController::new(output, status, config.speech.default_phrase.clone());

    let context = AppContext::new(
        board,
        controller,
        Duration::from_millis(config.playback.random_delay_ms),
        tx,
    );
    context.run(rx, events_rx).await;
}

/// Spawn the backend runtime and begin processing bridge messages.
///
/// The audio output stream cannot move between threads, so the whole backend
/// runs on a single-threaded runtime inside its own thread.
pub fn run(rx: Receiver<MessageToBackend>, tx: Sender<MessageFromBackend>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                log::error!("Failed to build the backend runtime: {e}");
                return;
            }
        };
        runtime.block_on(setup_backend(rx, tx));
    })
}
