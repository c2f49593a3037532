//! Parsing of the console commands typed by the user.

use std::path::PathBuf;

use soundboard_bridge::{DroppedFile, MessageToBackend, config::TriggerConfig};

/// Category placeholder meaning "no category" in `add`.
const UNGROUPED: &str = "-";

pub const HELP: &str = "\
Commands:
  play <trigger>                   press a trigger
  drop <trigger> <path> [mime]     assign an audio file to a trigger
  random start|stop                randomized continuous playback
  seq start|stop <category>        play a category in order
  stop                             stop everything
  board                            show the board
  devices                          list output devices
  add <category|-> <id> <src>      add a trigger
  remove <trigger>                 remove a trigger
  help                             show this help
  quit                             exit";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CommandParseError {
    #[error("unknown command {0:?}, type `help` for the list of commands")]
    UnknownCommand(String),
    #[error("usage: {0}")]
    Usage(&'static str),
}

/// A parsed console command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(String),
    Drop(String, DroppedFile),
    StartRandom,
    StopRandom,
    StartSequence(String),
    StopSequence(String),
    StopAll,
    Board,
    Devices,
    Add {
        category_id: Option<String>,
        id: String,
        src: String,
    },
    Remove(String),
    Help,
    Quit,
}

impl Command {
    /// The bridge message carrying this command, if it concerns the backend.
    pub fn into_message(self) -> Option<MessageToBackend> {
        let message = match self {
            Command::Play(id) => MessageToBackend::PressTrigger(id),
            Command::Drop(trigger_id, file) => MessageToBackend::DropFiles {
                trigger_id,
                files: vec![file],
            },
            Command::StartRandom => MessageToBackend::StartRandom,
            Command::StopRandom => MessageToBackend::StopRandom,
            Command::StartSequence(id) => MessageToBackend::StartSequence(id),
            Command::StopSequence(id) => MessageToBackend::StopSequence(id),
            Command::StopAll => MessageToBackend::StopAll,
            Command::Board => MessageToBackend::BoardRequest,
            Command::Devices => MessageToBackend::OutputDevicesListRequest,
            Command::Add {
                category_id,
                id,
                src,
            } => {
                let title = src.rsplit(['/', '\\']).next().unwrap_or(&src).to_string();
                MessageToBackend::AddTrigger {
                    category_id,
                    trigger: TriggerConfig {
                        id,
                        title,
                        src: Some(src),
                        ..Default::default()
                    },
                }
            }
            Command::Remove(id) => MessageToBackend::RemoveTrigger(id),
            Command::Help | Command::Quit => return None,
        };
        Some(message)
    }
}

fn dropped_file(path: &str, mime_type: Option<&str>) -> DroppedFile {
    let path = PathBuf::from(path);
    let name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned());
    let mime_type = mime_type
        .unwrap_or_else(|| crate::mime::guess_mime_type(&path))
        .to_string();
    DroppedFile {
        name,
        mime_type,
        path,
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, CommandParseError> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((&name, args)) = words.split_first() else {
        return Ok(None);
    };

    let command = match (name, args) {
        ("play", [id]) => Command::Play(id.to_string()),
        ("play", _) => return Err(CommandParseError::Usage("play <trigger>")),
        ("drop", [id, path]) => Command::Drop(id.to_string(), dropped_file(path, None)),
        ("drop", [id, path, mime_type]) => {
            Command::Drop(id.to_string(), dropped_file(path, Some(*mime_type)))
        }
        ("drop", _) => return Err(CommandParseError::Usage("drop <trigger> <path> [mime]")),
        ("random", ["start"]) => Command::StartRandom,
        ("random", ["stop"]) => Command::StopRandom,
        ("random", _) => return Err(CommandParseError::Usage("random start|stop")),
        ("seq", ["start", id]) => Command::StartSequence(id.to_string()),
        ("seq", ["stop", id]) => Command::StopSequence(id.to_string()),
        ("seq", _) => return Err(CommandParseError::Usage("seq start|stop <category>")),
        ("stop", []) => Command::StopAll,
        ("board", []) => Command::Board,
        ("devices", []) => Command::Devices,
        ("add", [category, id, src]) => Command::Add {
            category_id: (*category != UNGROUPED).then(|| category.to_string()),
            id: id.to_string(),
            src: src.to_string(),
        },
        ("add", _) => return Err(CommandParseError::Usage("add <category|-> <id> <src>")),
        ("remove", [id]) => Command::Remove(id.to_string()),
        ("remove", _) => return Err(CommandParseError::Usage("remove <trigger>")),
        ("help" | "?", _) => Command::Help,
        ("quit" | "exit", _) => Command::Quit,
        _ => return Err(CommandParseError::UnknownCommand(line.trim().to_string())),
    };
    Ok(Some(command))
}
