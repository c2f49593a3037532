use std::time::Instant;

use crate::app::AppContext;
use crate::controller::SessionOwner;
use crate::modes::{manual, sequential::SequentialMode};
use crate::output::AudioSource;

/// Handles a manual trigger press (see
/// [`soundboard_bridge::MessageToBackend::PressTrigger`]).
pub fn handle_press_trigger<S: AudioSource>(context: &mut AppContext<S>, id: &str) {
    let Some(trigger) = context.board.trigger(id) else {
        context.status().warning(format!("Unknown trigger {id}"));
        return;
    };

    if let Err(e) = manual::resolve_and_play(
        &mut context.controller,
        trigger,
        SessionOwner::Manual,
        &mut context.rng,
    ) {
        log::debug!("Trigger {id} not played: {e}");
    }
}

pub fn handle_start_random<S: AudioSource>(context: &mut AppContext<S>) {
    context.random.start(
        Instant::now(),
        &mut context.controller,
        &context.board,
        &mut context.rng,
    );
}

pub fn handle_stop_random<S: AudioSource>(context: &mut AppContext<S>) {
    context.random.stop(&mut context.controller);
}

/// Starts the sequence of a category. Sequence state is created the first
/// time a category is started and kept afterwards.
pub fn handle_start_sequence<S: AudioSource>(context: &mut AppContext<S>, category_id: &str) {
    if context.board.category(category_id).is_none() {
        context
            .status()
            .warning(format!("Unknown category {category_id}"));
        return;
    }

    context
        .sequences
        .entry(category_id.to_string())
        .or_insert_with(|| SequentialMode::new(category_id))
        .start(&mut context.controller, &context.board);
}

pub fn handle_stop_sequence<S: AudioSource>(context: &mut AppContext<S>, category_id: &str) {
    match context.sequences.get_mut(category_id) {
        Some(sequence) => sequence.stop(&mut context.controller),
        None => context
            .status()
            .info(format!("Sequence {category_id} stopped")),
    }
}
