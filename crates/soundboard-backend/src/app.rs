//! Application context and the backend event loop.
//!
//! The context owns the board, the playback controller and every mode. A
//! single loop serially handles frontend messages, playback completion events
//! and the randomized mode's timer, so no state is ever shared between
//! threads.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use rand::{SeedableRng, rngs::SmallRng};
use soundboard_bridge::{MessageFromBackend, MessageToBackend};
use tokio::sync::mpsc::{Receiver, Sender, UnboundedReceiver};

use crate::board::Board;
use crate::controller::{PlaybackController, SessionOwner};
use crate::modes::{
    random::{PendingCycle, RandomMode},
    sequential::SequentialMode,
};
use crate::output::{AudioSource, PlaybackEvent};
use crate::services;
use crate::status::StatusReporter;

/// State owned by the backend event loop.
pub(crate) struct AppContext<S> {
    pub board: Board,
    pub controller: PlaybackController<S>,
    pub random: RandomMode,
    /// Sequential modes keyed by category id, created on first start.
    pub sequences: HashMap<String, SequentialMode>,
    pub rng: SmallRng,
    /// Outbound channel to the frontend bridge.
    pub tx: Sender<MessageFromBackend>,
}

/// Resolves once the pending cycle is due, yielding its token. Never
/// resolves when nothing is pending.
async fn wait_for_cycle(pending: Option<PendingCycle>) -> u64 {
    match pending {
        Some(cycle) => {
            tokio::time::sleep_until(tokio::time::Instant::from_std(cycle.deadline)).await;
            cycle.token
        }
        None => std::future::pending().await,
    }
}

impl<S: AudioSource> AppContext<S> {
    pub fn new(
        board: Board,
        controller: PlaybackController<S>,
        random_delay: Duration,
        tx: Sender<MessageFromBackend>,
    ) -> Self {
        Self {
            board,
            controller,
            random: RandomMode::new(random_delay),
            sequences: HashMap::new(),
            rng: SmallRng::from_entropy(),
            tx,
        }
    }

    pub fn status(&self) -> &StatusReporter {
        self.controller.status()
    }

    /// Handles messages, playback events and timers until the frontend
    /// bridge closes.
    pub async fn run(
        mut self,
        mut rx: Receiver<MessageToBackend>,
        mut events: UnboundedReceiver<PlaybackEvent>,
    ) {
        self.status().success("Ready");
        loop {
            let pending = self.random.pending_cycle();
            tokio::select! {
                message = rx.recv() => match message {
                    Some(message) => {
                        log::debug!("Got a frontend message: {message:?}");
                        self.dispatch_message(message).await;
                    }
                    None => break,
                },
                Some(event) = events.recv() => self.handle_playback_event(event),
                token = wait_for_cycle(pending) => self.fire_random_cycle(token),
            }
            self.route_interruptions();
        }

        log::info!("Frontend bridge closed, stopping playback");
        self.panic_stop();
    }

    /// Dispatches the received message from frontend down to individual
    /// service handlers.
    async fn dispatch_message(&mut self, message: MessageToBackend) {
        match message {
            MessageToBackend::BoardRequest => {
                services::board_service::handle_board_request(self).await;
            }
            MessageToBackend::OutputDevicesListRequest => {
                services::device_service::handle_output_devices_list_request(self).await;
            }
            MessageToBackend::PressTrigger(id) => {
                services::playback_service::handle_press_trigger(self, &id);
            }
            MessageToBackend::DropFiles { trigger_id, files } => {
                services::board_service::handle_drop_files(self, &trigger_id, &files);
            }
            MessageToBackend::StartRandom => services::playback_service::handle_start_random(self),
            MessageToBackend::StopRandom => services::playback_service::handle_stop_random(self),
            MessageToBackend::StartSequence(id) => {
                services::playback_service::handle_start_sequence(self, &id);
            }
            MessageToBackend::StopSequence(id) => {
                services::playback_service::handle_stop_sequence(self, &id);
            }
            MessageToBackend::StopAll => self.panic_stop(),
            MessageToBackend::AddTrigger {
                category_id,
                trigger,
            } => {
                services::board_service::handle_add_trigger(self, category_id.as_deref(), &trigger);
            }
            MessageToBackend::RemoveTrigger(id) => {
                services::board_service::handle_remove_trigger(self, &id);
            }
        }
    }

    /// Hands a completion to the mode that owns the session.
    pub fn handle_playback_event(&mut self, event: PlaybackEvent) {
        let Some(completion) = self.controller.on_event(event) else {
            return;
        };
        log::debug!(
            "Session {} of {:?} completed: {:?}",
            completion.session,
            completion.owner,
            completion.outcome
        );

        match completion.owner {
            SessionOwner::Manual => {}
            SessionOwner::Random => self.random.on_completion(completion.session, Instant::now()),
            SessionOwner::Sequence(category_id) => {
                if let Some(sequence) = self.sequences.get_mut(&category_id) {
                    sequence.on_completion(completion.session, &mut self.controller);
                }
            }
        }
    }

    fn fire_random_cycle(&mut self, token: u64) {
        self.random.fire(
            token,
            Instant::now(),
            &mut self.controller,
            &self.board,
            &mut self.rng,
        );
    }

    /// Tells modes whose sessions were cancelled by someone else.
    pub fn route_interruptions(&mut self) {
        for interruption in self.controller.take_interruptions() {
            match interruption.owner {
                SessionOwner::Manual => {}
                SessionOwner::Random => self
                    .random
                    .interrupted(interruption.session, self.controller.status()),
                SessionOwner::Sequence(category_id) => {
                    if let Some(sequence) = self.sequences.get_mut(&category_id) {
                        sequence.interrupted(interruption.session, self.controller.status());
                    }
                }
            }
        }
    }

    /// Stops every playback and every mode.
    pub fn panic_stop(&mut self) {
        if self.random.is_active() || self.random.pending_cycle().is_some() {
            self.random.stop(&mut self.controller);
        }
        for sequence in self.sequences.values_mut() {
            if sequence.is_playing() {
                sequence.stop(&mut self.controller);
            }
        }
        self.controller.stop_all();
        // anything cancelled above belonged to a mode that is already stopped
        self.controller.take_interruptions();
        self.status().info("All playback stopped");
    }

    pub fn is_sequence_playing(&self, category_id: &str) -> bool {
        self.sequences
            .get(category_id)
            .is_some_and(SequentialMode::is_playing)
    }

    /// Send a message to the frontend bridge.
    pub async fn send(&self, message: MessageFromBackend) {
        if self.tx.send(message).await.is_err() {
            log::debug!("Frontend is gone, message dropped");
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::path::PathBuf;

    use soundboard_bridge::{BridgeChannels, DroppedFile};

    use super::*;
    use crate::board::tests::outrage_board;
    use crate::output::{PlaybackEventKind, SessionId};
    use crate::testing::{RecordingOutput, drain_statuses};

    pub(crate) fn context(
        delay: Duration,
    ) -> (
        AppContext<RecordingOutput>,
        tokio::sync::mpsc::Receiver<MessageFromBackend>,
    ) {
        let (tx, rx) = tokio::sync::mpsc::channel(4096);
        let controller =
            PlaybackController::new(RecordingOutput::new(), StatusReporter::new(tx.clone()), "");
        let mut context = AppContext::new(outrage_board(), controller, delay, tx);
        context.rng = SmallRng::seed_from_u64(3);
        (context, rx)
    }

    #[tokio::test]
    async fn manual_press_interrupts_running_sequence() {
        let (mut context, mut rx) = context(Duration::from_millis(500));
        context
            .dispatch_message(MessageToBackend::StartSequence("outrage-category".into()))
            .await;
        assert!(context.is_sequence_playing("outrage-category"));

        context
            .dispatch_message(MessageToBackend::PressTrigger("hello".into()))
            .await;
        context.route_interruptions();

        assert!(!context.is_sequence_playing("outrage-category"));
        assert_eq!(context.controller.current_owner(), Some(&SessionOwner::Manual));
        assert!(
            drain_statuses(&mut rx)
                .iter()
                .any(|status| status == "Sequence outrage-category interrupted")
        );
    }

    #[tokio::test]
    async fn random_start_interrupts_running_sequence() {
        let (mut context, _rx) = context(Duration::from_millis(500));
        // every remaining trigger is playable
        context.board.remove_trigger("B");
        context
            .dispatch_message(MessageToBackend::StartSequence("outrage-category".into()))
            .await;
        context.dispatch_message(MessageToBackend::StartRandom).await;
        context.route_interruptions();

        assert!(!context.is_sequence_playing("outrage-category"));
        assert!(context.random.is_active());
        assert_eq!(context.controller.current_owner(), Some(&SessionOwner::Random));
        assert_eq!(context.controller.output().max_concurrent, 1);
    }

    #[tokio::test]
    async fn stop_all_clears_every_mode() {
        let (mut context, _rx) = context(Duration::from_millis(500));
        context.board.remove_trigger("B");
        context.dispatch_message(MessageToBackend::StartRandom).await;
        let session = context.controller.current_session().unwrap();
        let event = context.controller.output_mut().finish(session);
        context.handle_playback_event(event);
        assert!(context.random.pending_cycle().is_some());

        context.dispatch_message(MessageToBackend::StopAll).await;
        assert!(!context.random.is_active());
        assert!(context.random.pending_cycle().is_none());
        assert!(!context.controller.is_active());
        assert!(context.controller.output().playing.is_empty());
    }

    #[tokio::test]
    async fn non_audio_drop_is_rejected() {
        let (mut context, mut rx) = context(Duration::from_millis(500));
        let drop = |name: &str, mime_type: &str| MessageToBackend::DropFiles {
            trigger_id: "A".into(),
            files: vec![DroppedFile {
                name: name.into(),
                mime_type: mime_type.into(),
                path: PathBuf::from("/drops").join(name),
            }],
        };

        context.dispatch_message(drop("mine.mp3", "audio/mpeg")).await;
        drain_statuses(&mut rx);
        context.dispatch_message(drop("photo.png", "image/png")).await;

        let assigned = context.board.trigger("A").unwrap().assigned().unwrap();
        assert_eq!(assigned.file_name, "mine.mp3");
        let statuses = drain_statuses(&mut rx);
        assert_eq!(statuses.len(), 1);
        assert!(statuses[0].contains("Please drop an audio file"));
    }

    /// Waits for a notification starting with any of `prefixes`.
    async fn wait_for_any(rx: &mut Receiver<MessageFromBackend>, prefixes: &[&str]) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while let Some(message) = rx.recv().await {
                if let MessageFromBackend::NotificationMessage(notification) = message
                    && prefixes
                        .iter()
                        .any(|prefix| notification.message.starts_with(prefix))
                {
                    return;
                }
            }
            panic!("bridge closed before {prefixes:?}");
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {prefixes:?}"));
    }

    async fn wait_for_status(rx: &mut Receiver<MessageFromBackend>, prefix: &str) {
        wait_for_any(rx, &[prefix]).await;
    }

    const STARTED: &[&str] = &["Playing audio file", "Speaking"];

    fn ended(session: u64) -> PlaybackEvent {
        PlaybackEvent {
            session: SessionId(session),
            kind: PlaybackEventKind::Ended,
        }
    }

    #[tokio::test]
    async fn event_loop_drives_a_sequence_to_the_end() {
        let channels = BridgeChannels::new(256);
        let (to_backend, mut from_backend) = (channels.frontend_tx, channels.frontend_rx);
        let controller = PlaybackController::new(
            RecordingOutput::new(),
            StatusReporter::new(channels.backend_tx.clone()),
            "",
        );
        let context = AppContext::new(
            outrage_board(),
            controller,
            Duration::from_millis(500),
            channels.backend_tx,
        );
        let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();

        let driver = async move {
            to_backend
                .send(MessageToBackend::StartSequence("outrage-category".into()))
                .await
                .unwrap();
            wait_for_status(&mut from_backend, "Playing audio file (A.mp3)").await;
            // a stale event for a session that never existed
            events_tx.send(ended(99)).unwrap();
            events_tx.send(ended(1)).unwrap();
            wait_for_status(&mut from_backend, "Playing audio file (C.mp3)").await;
            events_tx.send(ended(2)).unwrap();
            wait_for_status(&mut from_backend, "Sequence outrage-category finished").await;
            drop(to_backend);
        };

        tokio::join!(context.run(channels.backend_rx, events_rx), driver);
    }

    #[tokio::test]
    async fn event_loop_runs_random_cycles_on_a_timer() {
        let channels = BridgeChannels::new(256);
        let (to_backend, mut from_backend) = (channels.frontend_tx, channels.frontend_rx);
        let controller = PlaybackController::new(
            RecordingOutput::new(),
            StatusReporter::new(channels.backend_tx.clone()),
            "",
        );
        let context = AppContext::new(
            outrage_board(),
            controller,
            Duration::from_millis(10),
            channels.backend_tx,
        );
        let (events_tx, events_rx) = tokio::sync::mpsc::unbounded_channel();

        let driver = async move {
            to_backend.send(MessageToBackend::StartRandom).await.unwrap();
            wait_for_status(&mut from_backend, "Random playback started").await;
            wait_for_any(&mut from_backend, STARTED).await;
            events_tx.send(ended(1)).unwrap();
            wait_for_status(&mut from_backend, "Playback finished").await;
            // the second cycle starts on its own once the delay elapses
            wait_for_any(&mut from_backend, STARTED).await;
            events_tx.send(ended(2)).unwrap();
            wait_for_status(&mut from_backend, "Playback finished").await;
            to_backend.send(MessageToBackend::StopRandom).await.unwrap();
            wait_for_status(&mut from_backend, "Random playback stopped").await;
            drop(to_backend);
        };

        tokio::join!(context.run(channels.backend_rx, events_rx), driver);
    }
}
