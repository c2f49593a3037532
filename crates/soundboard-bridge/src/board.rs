/// Read-only snapshot of a single trigger sent to the frontend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerView {
    pub id: String,
    pub label: String,
    pub title: String,
    /// Whether a dropped file is currently assigned to the trigger.
    pub assigned: bool,
}

/// Read-only snapshot of a category and its ordered triggers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryView {
    pub id: String,
    pub title: String,
    pub triggers: Vec<TriggerView>,
    /// Whether the category's sequence is currently playing.
    pub sequence_playing: bool,
}

/// Snapshot of the whole board.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoardView {
    pub categories: Vec<CategoryView>,
    /// Triggers that do not belong to any category.
    pub ungrouped: Vec<TriggerView>,
    pub random_active: bool,
}
