//! Communication bridge between the soundboard frontend and backend.
//!
//! This crate defines the types used to connect a user-facing frontend with
//! the backend that owns the board, the playback modes and the audio output.
//!
//! The flow is deliberately lightweight and unidirectional:
//! - The frontend sends commands (e.g., press a trigger, drop a file, start
//!   the randomized mode).
//! - The backend pushes events (status notifications, board layout, device
//!   lists).
//!
//! Communication happens over bounded [`tokio::sync::mpsc`] channels wrapped
//! in [`BridgeChannels`], providing back-pressure and a clean separation of
//! concerns.

pub mod board;
pub mod config;
pub mod notification;

use tokio::sync::mpsc::{self, Receiver, Sender};

/// A file dropped onto a trigger by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedFile {
    /// File name as shown to the user.
    pub name: String,
    /// MIME type reported for the file, e.g. `audio/mpeg`.
    pub mime_type: String,
    /// Location of the file on disk.
    pub path: std::path::PathBuf,
}

impl DroppedFile {
    /// Whether the file is an audio file according to its MIME type.
    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio")
    }
}

/// Messages emitted by the backend to inform the frontend of state updates.
#[derive(Debug, Clone)]
pub enum MessageFromBackend {
    /// Human-readable status line for every playback transition.
    NotificationMessage(notification::NotificationMessage),
    /// Response to the board layout request from the frontend.
    BoardResponse(board::BoardView),
    /// Names of the output devices available on the default host.
    OutputDevicesListResponse(Vec<String>),
}

/// Commands issued by the frontend to control or query the backend.
#[derive(Debug, Clone)]
pub enum MessageToBackend {
    /// Request for the current board layout.
    BoardRequest,
    /// Request for the list of output devices.
    OutputDevicesListRequest,
    /// A single press on a trigger.
    PressTrigger(String),
    /// Files dropped onto a trigger. Only the first file is considered.
    DropFiles {
        trigger_id: String,
        files: Vec<DroppedFile>,
    },
    StartRandom,
    StopRandom,
    /// Start the sequence of the category with the given identifier.
    StartSequence(String),
    /// Stop the sequence of the category with the given identifier.
    StopSequence(String),
    /// Stop every playback and every mode.
    StopAll,
    /// Append a trigger to a category (or to the ungrouped triggers if `None`).
    AddTrigger {
        category_id: Option<String>,
        trigger: config::TriggerConfig,
    },
    RemoveTrigger(String),
}

/// Paired `tokio::mpsc` channels for bidirectional communication between
/// frontend and backend.
pub struct BridgeChannels {
    /// Receiver used by the frontend to get messages from the backend.
    pub frontend_rx: Receiver<MessageFromBackend>,
    /// Sender used by the frontend to send commands to the backend.
    pub frontend_tx: Sender<MessageToBackend>,

    /// Receiver used by the backend to get commands from the frontend.
    pub backend_rx: Receiver<MessageToBackend>,
    /// Sender used by the backend to send events/responses to the frontend.
    pub backend_tx: Sender<MessageFromBackend>,
}

impl BridgeChannels {
    /// Creates a new pair of bridged channels with the given buffer capacity.
    pub fn new(buffer: usize) -> Self {
        let (to_backend_tx, to_backend_rx) = mpsc::channel(buffer);
        let (to_frontend_tx, to_frontend_rx) = mpsc::channel(buffer);
        Self {
            frontend_tx: to_backend_tx,
            frontend_rx: to_frontend_rx,
            backend_rx: to_backend_rx,
            backend_tx: to_frontend_tx,
        }
    }
}

impl Default for BridgeChannels {
    fn default() -> Self {
        Self::new(64)
    }
}
