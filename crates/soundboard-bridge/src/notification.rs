/// How a status line reads on the console.
///
/// The backend picks the kind for every playback transition; the console
/// turns it into the tag in front of the line (`[INFO]`, `[OK]`, `[WARN]`,
/// `[ERROR]`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationType {
    /// A transition such as a clip starting or a mode being stopped.
    Info,
    /// Something the user asked for has completed: a clip ended, a file was
    /// assigned, a sequence ran to its end.
    Success,
    /// A request was ignored or degraded, e.g. nothing to play or a non-audio
    /// drop.
    Warning,
    /// Playback or configuration failed.
    Error,
}

/// One status line sent from the backend to the console.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationMessage {
    pub notification_type: NotificationType,
    /// Human-readable text, e.g. `Playing audio file (Yakuza Anger)`.
    pub message: String,
}
