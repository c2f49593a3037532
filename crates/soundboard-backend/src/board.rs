//! In-memory board: categories of triggers built from configuration, plus the
//! files users dropped onto triggers during this run.

use std::collections::HashSet;
use std::path::PathBuf;

use soundboard_bridge::{
    DroppedFile,
    board::{BoardView, CategoryView, TriggerView},
    config::{BoardConfig, TriggerConfig},
};

/// Errors raised while building or editing the board.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("trigger id must not be empty")]
    EmptyId,
    #[error("duplicate trigger id {0:?}")]
    DuplicateTrigger(String),
    #[error("duplicate category id {0:?}")]
    DuplicateCategory(String),
    #[error("unknown category {0:?}")]
    UnknownCategory(String),
}

/// Errors raised when a dropped file cannot be assigned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("unknown trigger {0:?}")]
    UnknownTrigger(String),
    #[error("{name} is not an audio file ({mime_type})")]
    NotAudio { name: String, mime_type: String },
}

/// A dropped file assigned to a trigger for the lifetime of the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignedClip {
    pub file_name: String,
    pub path: PathBuf,
}

impl AssignedClip {
    pub fn source(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

/// One playable button.
#[derive(Debug, Clone)]
pub struct Trigger {
    pub id: String,
    pub title: String,
    pub label: String,
    pub src: Option<String>,
    pub src_list: Vec<String>,
    pub phrase: Option<String>,
    assigned: Option<AssignedClip>,
}

/// Splits a comma-delimited candidate list, dropping blank entries.
pub fn parse_source_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|source| !source.is_empty())
        .map(str::to_string)
        .collect()
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

impl Trigger {
    pub fn from_config(config: &TriggerConfig) -> Result<Self, BoardError> {
        let id = config.id.trim();
        if id.is_empty() {
            return Err(BoardError::EmptyId);
        }

        let label = match config.label.trim() {
            "" => crate::label::derive_label(&config.title),
            label => label.to_string(),
        };

        Ok(Self {
            id: id.to_string(),
            title: config.title.clone(),
            label,
            src: non_blank(&config.src),
            src_list: config
                .src_list
                .as_deref()
                .map(parse_source_list)
                .unwrap_or_default(),
            phrase: non_blank(&config.phrase),
            assigned: None,
        })
    }

    pub fn assigned(&self) -> Option<&AssignedClip> {
        self.assigned.as_ref()
    }

    /// Source played for this trigger by a category sequence: the assigned
    /// file, else the static source.
    pub fn sequence_source(&self) -> Option<String> {
        self.assigned
            .as_ref()
            .map(AssignedClip::source)
            .or_else(|| self.src.clone())
    }

    fn view(&self) -> TriggerView {
        TriggerView {
            id: self.id.clone(),
            label: self.label.clone(),
            title: self.title.clone(),
            assigned: self.assigned.is_some(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    pub id: String,
    pub title: String,
    pub triggers: Vec<Trigger>,
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    categories: Vec<Category>,
    ungrouped: Vec<Trigger>,
}

impl Board {
    /// Builds the board, rejecting duplicate trigger and category ids.
    pub fn from_config(config: &BoardConfig) -> Result<Self, BoardError> {
        let mut board = Board::default();
        let mut category_ids = HashSet::new();

        for category in &config.categories {
            if !category_ids.insert(category.id.as_str()) {
                return Err(BoardError::DuplicateCategory(category.id.clone()));
            }
            board.categories.push(Category {
                id: category.id.clone(),
                title: category.title.clone(),
                triggers: Vec::new(),
            });
            for trigger in &category.triggers {
                board.add_trigger(Some(&category.id), trigger)?;
            }
        }

        for trigger in &config.triggers {
            board.add_trigger(None, trigger)?;
        }

        Ok(board)
    }

    /// Every trigger on the board: categories in order, then ungrouped ones.
    pub fn triggers(&self) -> impl Iterator<Item = &Trigger> {
        self.categories
            .iter()
            .flat_map(|category| category.triggers.iter())
            .chain(self.ungrouped.iter())
    }

    fn triggers_mut(&mut self) -> impl Iterator<Item = &mut Trigger> {
        self.categories
            .iter_mut()
            .flat_map(|category| category.triggers.iter_mut())
            .chain(self.ungrouped.iter_mut())
    }

    pub fn trigger(&self, id: &str) -> Option<&Trigger> {
        self.triggers().find(|trigger| trigger.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    /// Assigns the dropped file to the trigger.
    ///
    /// Returns the previously assigned clip, which the caller releases. A
    /// rejected file leaves the prior assignment untouched.
    pub fn assign(
        &mut self,
        trigger_id: &str,
        file: &DroppedFile,
    ) -> Result<Option<AssignedClip>, AssignError> {
        if !file.is_audio() {
            return Err(AssignError::NotAudio {
                name: file.name.clone(),
                mime_type: file.mime_type.clone(),
            });
        }

        let trigger = self
            .triggers_mut()
            .find(|trigger| trigger.id == trigger_id)
            .ok_or_else(|| AssignError::UnknownTrigger(trigger_id.to_string()))?;

        trigger.title = format!("File assigned: {}", file.name);
        Ok(trigger.assigned.replace(AssignedClip {
            file_name: file.name.clone(),
            path: file.path.clone(),
        }))
    }

    /// Appends a trigger to a category, or to the ungrouped triggers.
    pub fn add_trigger(
        &mut self,
        category_id: Option<&str>,
        config: &TriggerConfig,
    ) -> Result<(), BoardError> {
        let trigger = Trigger::from_config(config)?;
        if self.trigger(&trigger.id).is_some() {
            return Err(BoardError::DuplicateTrigger(trigger.id));
        }

        match category_id {
            Some(category_id) => self
                .categories
                .iter_mut()
                .find(|category| category.id == category_id)
                .ok_or_else(|| BoardError::UnknownCategory(category_id.to_string()))?
                .triggers
                .push(trigger),
            None => self.ungrouped.push(trigger),
        }
        Ok(())
    }

    pub fn remove_trigger(&mut self, id: &str) -> Option<Trigger> {
        let list = self
            .categories
            .iter_mut()
            .map(|category| &mut category.triggers)
            .chain(std::iter::once(&mut self.ungrouped))
            .find(|triggers| triggers.iter().any(|trigger| trigger.id == id))?;
        let index = list.iter().position(|trigger| trigger.id == id)?;
        Some(list.remove(index))
    }

    pub fn view(&self, random_active: bool, sequence_playing: impl Fn(&str) -> bool) -> BoardView {
        BoardView {
            categories: self
                .categories
                .iter()
                .map(|category| CategoryView {
                    id: category.id.clone(),
                    title: category.title.clone(),
                    triggers: category.triggers.iter().map(Trigger::view).collect(),
                    sequence_playing: sequence_playing(&category.id),
                })
                .collect(),
            ungrouped: self.ungrouped.iter().map(Trigger::view).collect(),
            random_active,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use soundboard_bridge::config::CategoryConfig;

    use super::*;

    pub(crate) fn trigger(id: &str, src: Option<&str>) -> TriggerConfig {
        TriggerConfig {
            id: id.to_string(),
            title: format!("{id}.mp3"),
            src: src.map(str::to_string),
            ..Default::default()
        }
    }

    /// `outrage-category` with A (a.mp3), B (no source) and C (c.mp3), plus
    /// one ungrouped trigger that only speaks.
    pub(crate) fn outrage_board() -> Board {
        Board::from_config(&BoardConfig {
            categories: vec![CategoryConfig {
                id: "outrage-category".into(),
                title: "Outrage".into(),
                triggers: vec![
                    trigger("A", Some("a.mp3")),
                    trigger("B", None),
                    trigger("C", Some("c.mp3")),
                ],
            }],
            triggers: vec![TriggerConfig {
                id: "hello".into(),
                phrase: Some("こんにちは".into()),
                ..Default::default()
            }],
        })
        .unwrap()
    }

    fn dropped(name: &str, mime_type: &str) -> DroppedFile {
        DroppedFile {
            name: name.into(),
            mime_type: mime_type.into(),
            path: PathBuf::from("/tmp").join(name),
        }
    }

    #[test]
    fn builds_triggers_from_config() {
        let board = Board::from_config(&BoardConfig {
            categories: vec![],
            triggers: vec![TriggerConfig {
                id: "mix".into(),
                title: "kajino1.mp3".into(),
                src: Some("  ".into()),
                src_list: Some("a.mp3, ,b.mp3,".into()),
                ..Default::default()
            }],
        })
        .unwrap();

        let trigger = board.trigger("mix").unwrap();
        assert_eq!(trigger.label, "カジノ1");
        assert_eq!(trigger.src, None);
        assert_eq!(trigger.src_list, ["a.mp3", "b.mp3"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let config = BoardConfig {
            categories: vec![],
            triggers: vec![trigger("A", None), trigger("A", None)],
        };
        assert_eq!(
            Board::from_config(&config).unwrap_err(),
            BoardError::DuplicateTrigger("A".into())
        );
    }

    #[test]
    fn triggers_are_enumerated_in_board_order() {
        let ids: Vec<_> = outrage_board().triggers().map(|t| t.id.clone()).collect();
        assert_eq!(ids, ["A", "B", "C", "hello"]);
    }

    #[test]
    fn non_audio_drop_keeps_prior_assignment() {
        let mut board = outrage_board();
        board.assign("A", &dropped("first.wav", "audio/wav")).unwrap();

        let result = board.assign("A", &dropped("photo.png", "image/png"));
        assert!(matches!(result, Err(AssignError::NotAudio { .. })));

        let trigger = board.trigger("A").unwrap();
        assert_eq!(trigger.assigned().unwrap().file_name, "first.wav");
        assert_eq!(trigger.title, "File assigned: first.wav");
    }

    #[test]
    fn reassignment_returns_previous_clip() {
        let mut board = outrage_board();
        assert_eq!(board.assign("B", &dropped("one.mp3", "audio/mpeg")), Ok(None));
        let released = board
            .assign("B", &dropped("two.mp3", "audio/mpeg"))
            .unwrap()
            .unwrap();
        assert_eq!(released.file_name, "one.mp3");
        assert_eq!(
            board.trigger("B").unwrap().sequence_source(),
            Some("/tmp/two.mp3".to_string())
        );

        assert_eq!(
            board.assign("nope", &dropped("two.mp3", "audio/mpeg")),
            Err(AssignError::UnknownTrigger("nope".into()))
        );
    }

    #[test]
    fn add_and_remove_triggers() {
        let mut board = outrage_board();
        board
            .add_trigger(Some("outrage-category"), &trigger("D", Some("d.mp3")))
            .unwrap();
        assert_eq!(
            board.add_trigger(Some("missing"), &trigger("E", None)),
            Err(BoardError::UnknownCategory("missing".into()))
        );
        assert_eq!(
            board.add_trigger(None, &trigger("D", None)),
            Err(BoardError::DuplicateTrigger("D".into()))
        );

        assert_eq!(board.remove_trigger("B").unwrap().id, "B");
        assert!(board.remove_trigger("B").is_none());
        let ids: Vec<_> = board.category("outrage-category").unwrap().triggers.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["A", "C", "D"]);
    }

    #[test]
    fn view_reflects_modes_and_assignments() {
        let mut board = outrage_board();
        board.assign("C", &dropped("c2.mp3", "audio/mpeg")).unwrap();
        let view = board.view(true, |id| id == "outrage-category");
        assert!(view.random_active);
        assert!(view.categories[0].sequence_playing);
        assert!(view.categories[0].triggers[2].assigned);
        assert_eq!(view.ungrouped[0].id, "hello");
    }
}
