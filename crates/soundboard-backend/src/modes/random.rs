use std::time::{Duration, Instant};

use rand::Rng;

use crate::board::Board;
use crate::controller::{PlaybackController, SessionOwner};
use crate::output::{AudioSource, SessionId};

/// A delayed play cycle waiting for its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCycle {
    pub token: u64,
    pub deadline: Instant,
}

/// Randomized continuous playback: pick a random trigger, play it, wait,
/// repeat until stopped.
#[derive(Debug)]
pub struct RandomMode {
    active: bool,
    delay: Duration,
    pending: Option<PendingCycle>,
    next_token: u64,
    session: Option<SessionId>,
}

impl RandomMode {
    pub fn new(delay: Duration) -> Self {
        Self {
            active: false,
            delay,
            pending: None,
            next_token: 0,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The cycle the event loop should wake up for, if any.
    pub fn pending_cycle(&self) -> Option<PendingCycle> {
        self.pending
    }

    pub fn start<S: AudioSource>(
        &mut self,
        now: Instant,
        controller: &mut PlaybackController<S>,
        board: &Board,
        rng: &mut impl Rng,
    ) {
        if self.active {
            controller.status().info("Random playback is already running");
            return;
        }
        self.active = true;
        controller.status().info("Random playback started");
        self.play_cycle(now, controller, board, rng);
    }

    /// Picks one trigger from the whole board and plays it.
    ///
    /// The board is enumerated again on every cycle. An empty board ends the
    /// cycle without scheduling another; an unplayable trigger schedules the
    /// next cycle as if it had played.
    fn play_cycle<S: AudioSource>(
        &mut self,
        now: Instant,
        controller: &mut PlaybackController<S>,
        board: &Board,
        rng: &mut impl Rng,
    ) {
        if !self.active {
            return;
        }

        let triggers: Vec<_> = board.triggers().collect();
        if triggers.is_empty() {
            controller.status().warning("No triggers to pick from");
            return;
        }

        let trigger = triggers[rng.gen_range(0..triggers.len())];
        log::debug!("Random pick: {}", trigger.id);
        match super::manual::resolve_and_play(controller, trigger, SessionOwner::Random, rng) {
            Ok(session) => self.session = Some(session),
            Err(e) => {
                log::debug!("Random pick {} not played: {e}", trigger.id);
                self.schedule(now);
            }
        }
    }

    fn schedule(&mut self, now: Instant) {
        self.next_token += 1;
        self.pending = Some(PendingCycle {
            token: self.next_token,
            deadline: now + self.delay,
        });
    }

    /// Continues after the mode's session ended (or failed) on its own.
    pub fn on_completion(&mut self, session: SessionId, now: Instant) {
        if self.session != Some(session) {
            return;
        }
        self.session = None;
        if self.active {
            self.schedule(now);
        }
    }

    /// Runs the pending cycle identified by `token`. Stale tokens (a cycle
    /// cancelled by [`RandomMode::stop`] or replaced by a newer one) do
    /// nothing.
    pub fn fire<S: AudioSource>(
        &mut self,
        token: u64,
        now: Instant,
        controller: &mut PlaybackController<S>,
        board: &Board,
        rng: &mut impl Rng,
    ) {
        match self.pending {
            Some(pending) if pending.token == token => {
                self.pending = None;
                self.play_cycle(now, controller, board, rng);
            }
            _ => log::debug!("Ignoring stale random cycle {token}"),
        }
    }

    /// The mode's session was cancelled by someone else.
    pub fn interrupted(&mut self, session: SessionId, status: &crate::status::StatusReporter) {
        if self.session != Some(session) {
            return;
        }
        self.session = None;
        self.active = false;
        self.pending = None;
        status.warning("Random playback interrupted");
    }

    /// Stops the mode and whatever is currently playing. On an already
    /// stopped mode only the status is reported.
    pub fn stop<S: AudioSource>(&mut self, controller: &mut PlaybackController<S>) {
        let running = self.active || self.pending.is_some() || self.session.is_some();
        self.active = false;
        self.pending = None;
        self.session = None;
        if running {
            controller.stop_current();
        }
        controller.status().info("Random playback stopped");
    }
}
