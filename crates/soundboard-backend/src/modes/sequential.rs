use crate::board::Board;
use crate::controller::{PlaybackController, SessionOwner};
use crate::output::{AudioSource, PlayRequest, SessionId};
use crate::status::StatusReporter;

/// One element of a captured sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SequenceItem {
    trigger_id: String,
    label: String,
    source: Option<String>,
}

/// Plays the triggers of one category in order, one after another.
#[derive(Debug)]
pub struct SequentialMode {
    category_id: String,
    items: Vec<SequenceItem>,
    cursor: usize,
    playing: bool,
    session: Option<SessionId>,
}

impl SequentialMode {
    pub fn new(category_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
            items: Vec::new(),
            cursor: 0,
            playing: false,
            session: None,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    #[cfg(test)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn owner(&self) -> SessionOwner {
        SessionOwner::Sequence(self.category_id.clone())
    }

    /// Captures the category's triggers and plays the first playable one.
    pub fn start<S: AudioSource>(&mut self, controller: &mut PlaybackController<S>, board: &Board) {
        if self.playing {
            controller
                .status()
                .info(format!("Sequence {} is already playing", self.category_id));
            return;
        }

        let Some(category) = board.category(&self.category_id) else {
            controller
                .status()
                .warning(format!("Unknown category {}", self.category_id));
            return;
        };

        self.items = category
            .triggers
            .iter()
            .map(|trigger| SequenceItem {
                trigger_id: trigger.id.clone(),
                label: trigger.title.clone(),
                source: trigger.sequence_source(),
            })
            .collect();
        self.cursor = 0;
        self.playing = true;
        controller.status().info(format!(
            "Sequence {} started ({} items)",
            self.category_id,
            self.items.len()
        ));
        self.play_from_cursor(controller);
    }

    /// Plays the element at the cursor, skipping elements without a source or
    /// whose playback is rejected, until one plays or the list runs out.
    fn play_from_cursor<S: AudioSource>(&mut self, controller: &mut PlaybackController<S>) {
        while self.playing {
            let Some(item) = self.items.get(self.cursor) else {
                self.playing = false;
                self.session = None;
                controller
                    .status()
                    .success(format!("Sequence {} finished", self.category_id));
                return;
            };

            let Some(source) = item.source.clone() else {
                log::debug!("Skipping {} without a source", item.trigger_id);
                self.cursor += 1;
                continue;
            };

            let request = PlayRequest::Clip {
                source,
                label: item.label.clone(),
            };
            match controller.request(self.owner(), request) {
                Ok(session) => {
                    self.session = Some(session);
                    return;
                }
                Err(e) => {
                    log::debug!("Skipping {}: {e}", item.trigger_id);
                    self.cursor += 1;
                }
            }
        }
    }

    /// Advances after the mode's session ended (or failed) on its own.
    pub fn on_completion<S: AudioSource>(
        &mut self,
        session: SessionId,
        controller: &mut PlaybackController<S>,
    ) {
        if self.session != Some(session) {
            return;
        }
        self.session = None;
        self.cursor += 1;
        self.play_from_cursor(controller);
    }

    /// The mode's session was cancelled by someone else.
    pub fn interrupted(&mut self, session: SessionId, status: &StatusReporter) {
        if self.session != Some(session) {
            return;
        }
        self.session = None;
        self.playing = false;
        status.warning(format!("Sequence {} interrupted", self.category_id));
    }

    /// Stops the sequence. The cursor is kept; [`SequentialMode::start`]
    /// always begins from the first element again.
    pub fn stop<S: AudioSource>(&mut self, controller: &mut PlaybackController<S>) {
        self.playing = false;
        if let Some(session) = self.session.take() {
            controller.stop_session(session);
        }
        controller
            .status()
            .info(format!("Sequence {} stopped", self.category_id));
    }
}
