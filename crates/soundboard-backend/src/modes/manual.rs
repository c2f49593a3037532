use rand::Rng;

use crate::board::Trigger;
use crate::controller::{PlaybackController, SessionOwner};
use crate::output::{AudioSource, OutputError, PlayRequest, SessionId};

/// What a trigger press resolves to, in priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Assigned(String),
    Candidate(String),
    Static(String),
    Phrase(String),
    Nothing,
}

/// Why a trigger could not be played.
#[derive(Debug, thiserror::Error)]
pub enum PlayFailure {
    #[error("nothing to play")]
    NothingToPlay,
    #[error(transparent)]
    Rejected(#[from] OutputError),
}

/// Picks exactly one way to play `trigger`: the assigned file, a random
/// candidate, the static source, then the phrase (or the label).
pub fn resolve(trigger: &Trigger, rng: &mut impl Rng) -> Resolution {
    if let Some(assigned) = trigger.assigned() {
        return Resolution::Assigned(assigned.source());
    }
    if !trigger.src_list.is_empty() {
        let index = rng.gen_range(0..trigger.src_list.len());
        return Resolution::Candidate(trigger.src_list[index].clone());
    }
    if let Some(src) = &trigger.src {
        return Resolution::Static(src.clone());
    }

    let phrase = trigger.phrase.as_deref().unwrap_or(trigger.label.as_str());
    if phrase.trim().is_empty() {
        Resolution::Nothing
    } else {
        Resolution::Phrase(phrase.to_string())
    }
}

/// Resolves `trigger` and plays it on behalf of `owner`.
pub fn resolve_and_play<S: AudioSource>(
    controller: &mut PlaybackController<S>,
    trigger: &Trigger,
    owner: SessionOwner,
    rng: &mut impl Rng,
) -> Result<SessionId, PlayFailure> {
    let request = match resolve(trigger, rng) {
        Resolution::Assigned(source) | Resolution::Candidate(source) | Resolution::Static(source) => {
            PlayRequest::Clip {
                source,
                label: trigger.title.clone(),
            }
        }
        Resolution::Phrase(text) => PlayRequest::Speech { text },
        Resolution::Nothing => {
            controller
                .status()
                .warning(format!("Nothing to play for {}", trigger.id));
            return Err(PlayFailure::NothingToPlay);
        }
    };

    Ok(controller.request(owner, request)?)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::path::PathBuf;

    use rand::{SeedableRng, rngs::SmallRng};
    use soundboard_bridge::{DroppedFile, config::TriggerConfig};

    use super::*;
    use crate::board::{Board, tests::outrage_board};
    use crate::testing::{Call, RecordingOutput, drain_statuses, status_channel};

    fn single(config: TriggerConfig) -> Board {
        let mut board = Board::default();
        board.add_trigger(None, &config).unwrap();
        board
    }

    fn audio(name: &str) -> DroppedFile {
        DroppedFile {
            name: name.into(),
            mime_type: "audio/mpeg".into(),
            path: PathBuf::from("/drops").join(name),
        }
    }

    #[test]
    fn assigned_source_beats_candidate_list() {
        let mut board = single(TriggerConfig {
            id: "t".into(),
            src: Some("static.mp3".into()),
            src_list: Some("x.mp3,y.mp3".into()),
            phrase: Some("phrase".into()),
            ..Default::default()
        });
        board.assign("t", &audio("mine.mp3")).unwrap();

        let mut rng = SmallRng::seed_from_u64(7);
        let trigger = board.trigger("t").unwrap();
        for _ in 0..50 {
            assert_eq!(
                resolve(trigger, &mut rng),
                Resolution::Assigned(PathBuf::from("/drops/mine.mp3").to_string_lossy().into_owned())
            );
        }
    }

    #[test]
    fn candidate_list_beats_static_source() {
        let board = single(TriggerConfig {
            id: "t".into(),
            src: Some("static.mp3".into()),
            src_list: Some("x.mp3,y.mp3".into()),
            ..Default::default()
        });
        let mut rng = SmallRng::seed_from_u64(7);
        let trigger = board.trigger("t").unwrap();

        let picks: HashSet<_> = (0..200)
            .map(|_| match resolve(trigger, &mut rng) {
                Resolution::Candidate(source) => source,
                other => panic!("unexpected resolution {other:?}"),
            })
            .collect();
        assert_eq!(picks, HashSet::from(["x.mp3".to_string(), "y.mp3".to_string()]));
    }

    #[test]
    fn phrase_then_label_then_nothing() {
        let mut rng = SmallRng::seed_from_u64(1);

        let board = single(TriggerConfig {
            id: "t".into(),
            label: "Label".into(),
            phrase: Some("Phrase".into()),
            ..Default::default()
        });
        assert_eq!(
            resolve(board.trigger("t").unwrap(), &mut rng),
            Resolution::Phrase("Phrase".into())
        );

        let board = single(TriggerConfig {
            id: "t".into(),
            title: "omae.mp3".into(),
            ..Default::default()
        });
        assert_eq!(
            resolve(board.trigger("t").unwrap(), &mut rng),
            Resolution::Phrase("Omae".into())
        );

        let board = single(TriggerConfig {
            id: "t".into(),
            ..Default::default()
        });
        assert_eq!(resolve(board.trigger("t").unwrap(), &mut rng), Resolution::Nothing);
    }

    #[test]
    fn nothing_to_play_makes_no_attempt() {
        let (status, mut rx) = status_channel();
        let mut controller = PlaybackController::new(RecordingOutput::new(), status, "");
        let board = single(TriggerConfig {
            id: "silent".into(),
            ..Default::default()
        });
        let mut rng = SmallRng::seed_from_u64(1);

        let result = resolve_and_play(
            &mut controller,
            board.trigger("silent").unwrap(),
            SessionOwner::Manual,
            &mut rng,
        );
        assert!(matches!(result, Err(PlayFailure::NothingToPlay)));
        assert!(controller.output().calls.is_empty());
        assert!(
            drain_statuses(&mut rx)
                .iter()
                .any(|status| status.contains("Nothing to play"))
        );
    }

    #[test]
    fn phrase_trigger_is_spoken() {
        let (status, _rx) = status_channel();
        let mut controller = PlaybackController::new(RecordingOutput::new(), status, "");
        let board = outrage_board();
        let mut rng = SmallRng::seed_from_u64(1);

        let session = resolve_and_play(
            &mut controller,
            board.trigger("hello").unwrap(),
            SessionOwner::Manual,
            &mut rng,
        )
        .unwrap();
        assert_eq!(
            controller.output().calls,
            vec![Call::Speak {
                session,
                text: "こんにちは".into()
            }]
        );
    }
}
