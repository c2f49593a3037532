use soundboard_bridge::{
    MessageFromBackend,
    notification::{NotificationMessage, NotificationType},
};
use tokio::sync::mpsc::{Sender, error::TrySendError};

/// Emits human-readable status lines for playback transitions.
///
/// Every status is logged and forwarded to the frontend as a
/// [`MessageFromBackend::NotificationMessage`]. Forwarding never blocks the
/// event loop: when the frontend falls behind, the line is only logged.
#[derive(Debug, Clone)]
pub struct StatusReporter {
    tx: Sender<MessageFromBackend>,
}

impl StatusReporter {
    pub fn new(tx: Sender<MessageFromBackend>) -> Self {
        Self { tx }
    }

    pub fn report(&self, notification_type: NotificationType, message: impl Into<String>) {
        let message = message.into();
        match notification_type {
            NotificationType::Error => log::error!("[status] {message}"),
            NotificationType::Warning => log::warn!("[status] {message}"),
            _ => log::info!("[status] {message}"),
        }

        let notification = MessageFromBackend::NotificationMessage(NotificationMessage {
            notification_type,
            message,
        });
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => log::warn!("Frontend is lagging, status dropped"),
            Err(TrySendError::Closed(_)) => log::debug!("Frontend is gone, status dropped"),
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.report(NotificationType::Info, message);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.report(NotificationType::Success, message);
    }

    pub fn warning(&self, message: impl Into<String>) {
        self.report(NotificationType::Warning, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.report(NotificationType::Error, message);
    }
}
