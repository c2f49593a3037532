use soundboard_bridge::{DroppedFile, MessageFromBackend, config::TriggerConfig};

use crate::app::AppContext;
use crate::board::AssignError;
use crate::output::AudioSource;

/// Handles an incoming board request (see
/// [`soundboard_bridge::MessageToBackend::BoardRequest`]).
pub async fn handle_board_request<S: AudioSource>(context: &mut AppContext<S>) {
    let view = context.board.view(context.random.is_active(), |category_id| {
        context.is_sequence_playing(category_id)
    });
    context.send(MessageFromBackend::BoardResponse(view)).await;
}

/// Assigns the first dropped file to the trigger. Any further files are
/// ignored.
pub fn handle_drop_files<S: AudioSource>(
    context: &mut AppContext<S>,
    trigger_id: &str,
    files: &[DroppedFile],
) {
    let Some(file) = files.first() else {
        log::debug!("Empty drop on {trigger_id} ignored");
        return;
    };
    if files.len() > 1 {
        log::debug!("Only {} of {} dropped files is used", file.name, files.len());
    }

    match context.board.assign(trigger_id, file) {
        Ok(previous) => {
            if let Some(previous) = previous {
                log::debug!("Released {} from {trigger_id}", previous.file_name);
            }
            context
                .status()
                .success(format!("File assigned to trigger: {}", file.name));
        }
        Err(e @ AssignError::NotAudio { .. }) => context
            .status()
            .warning(format!("Please drop an audio file: {e}")),
        Err(e) => context.status().warning(e.to_string()),
    }
}

pub fn handle_add_trigger<S: AudioSource>(
    context: &mut AppContext<S>,
    category_id: Option<&str>,
    trigger: &TriggerConfig,
) {
    match context.board.add_trigger(category_id, trigger) {
        Ok(()) => context
            .status()
            .success(format!("Trigger {} added", trigger.id.trim())),
        Err(e) => context
            .status()
            .error(format!("Could not add trigger: {e}")),
    }
}

/// Removes a trigger from the board. A running sequence keeps the list it
/// captured when it started.
pub fn handle_remove_trigger<S: AudioSource>(context: &mut AppContext<S>, id: &str) {
    match context.board.remove_trigger(id) {
        Some(trigger) => context
            .status()
            .info(format!("Trigger {} removed", trigger.id)),
        None => context.status().warning(format!("Unknown trigger {id}")),
    }
}
