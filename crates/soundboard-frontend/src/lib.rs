//! Console frontend: reads commands from standard input, forwards them to the
//! backend over the bridge and prints whatever the backend reports.

use std::io::{BufRead, Write};
use std::thread;

use anyhow::Context;
use soundboard_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc;

use crate::commands::{Command, HELP, parse_command};

pub mod commands;
pub mod formatting;
pub mod mime;

#[derive(Clone)]
pub struct BackendBridge {
    pub to_backend: mpsc::Sender<MessageToBackend>,
}

impl BackendBridge {
    pub fn send(&self, message: MessageToBackend) -> anyhow::Result<()> {
        self.to_backend
            .blocking_send(message)
            .context("backend is no longer running")
    }
}

fn print_prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Runs the console until `quit` or end of input.
pub fn run(
    mut rx: mpsc::Receiver<MessageFromBackend>,
    tx: mpsc::Sender<MessageToBackend>,
) -> anyhow::Result<()> {
    let printer = thread::Builder::new()
        .name("frontend-printer".to_string())
        .spawn(move || {
            while let Some(message) = rx.blocking_recv() {
                log::debug!("Got a message from backend: {message:?}");
                println!("{}", formatting::format_message(&message));
            }
        })
        .context("failed to spawn the printer thread")?;

    let bridge = BackendBridge { to_backend: tx };
    bridge.send(MessageToBackend::BoardRequest)?;
    println!("{HELP}");

    let stdin = std::io::stdin();
    print_prompt();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read from standard input")?;
        match parse_command(&line) {
            Ok(Some(Command::Quit)) => break,
            Ok(Some(Command::Help)) => println!("{HELP}"),
            Ok(Some(command)) => {
                if let Some(message) = command.into_message() {
                    bridge.send(message)?;
                }
            }
            Ok(None) => {}
            Err(e) => println!("[ERROR] {e}"),
        }
        print_prompt();
    }

    // closing the bridge stops the backend, which then closes ours
    drop(bridge);
    if printer.join().is_err() {
        log::error!("Printer thread panicked");
    }
    Ok(())
}
