use std::fmt::Write;

use soundboard_bridge::{
    MessageFromBackend,
    board::{BoardView, TriggerView},
    notification::{NotificationMessage, NotificationType},
};

fn notification_tag(notification_type: NotificationType) -> &'static str {
    match notification_type {
        NotificationType::Info => "INFO",
        NotificationType::Success => "OK",
        NotificationType::Warning => "WARN",
        NotificationType::Error => "ERROR",
    }
}

/// Formats a status notification as a single `[TAG] message` line.
pub fn format_notification(notification: &NotificationMessage) -> String {
    format!(
        "[{}] {}",
        notification_tag(notification.notification_type),
        notification.message
    )
}

fn write_trigger(out: &mut String, trigger: &TriggerView) {
    let marker = if trigger.assigned { " *" } else { "" };
    // writing into a String cannot fail
    let _ = writeln!(out, "    {:<16} {}{marker}", trigger.id, trigger.label);
}

/// Formats the board as an indented listing, one trigger per line. Triggers
/// with an assigned file are marked with `*`.
pub fn format_board(board: &BoardView) -> String {
    let mut out = String::new();
    let random = if board.random_active { "running" } else { "stopped" };
    let _ = writeln!(out, "Board (random playback {random})");

    for category in &board.categories {
        let playing = if category.sequence_playing {
            ", playing"
        } else {
            ""
        };
        let _ = writeln!(out, "  {} [{}{playing}]", category.title, category.id);
        if category.triggers.is_empty() {
            let _ = writeln!(out, "    (empty)");
        }
        for trigger in &category.triggers {
            write_trigger(&mut out, trigger);
        }
    }

    if !board.ungrouped.is_empty() {
        let _ = writeln!(out, "  Other");
        for trigger in &board.ungrouped {
            write_trigger(&mut out, trigger);
        }
    }

    out.trim_end().to_string()
}

pub fn format_devices(names: &[String]) -> String {
    if names.is_empty() {
        return "No output devices found".to_string();
    }
    names
        .iter()
        .enumerate()
        .map(|(index, name)| format!("[SELECT] {}. Output device: {name}", index + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn format_message(message: &MessageFromBackend) -> String {
    match message {
        MessageFromBackend::NotificationMessage(notification) => format_notification(notification),
        MessageFromBackend::BoardResponse(board) => format_board(board),
        MessageFromBackend::OutputDevicesListResponse(names) => format_devices(names),
    }
}
