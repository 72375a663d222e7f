//! Habit tracker entities.

use super::{symbolic_enum, EntityId};

symbolic_enum! {
    /// How progress on a habit is measured.
    HabitType {
        Boolean => "BOOLEAN",
        Countable => "COUNTABLE",
        Duration => "DURATION",
    }
}

symbolic_enum! {
    /// Outcome recorded for one habit on one day.
    CompletionType {
        Completed => "COMPLETED",
        Skipped => "SKIPPED",
        Partial => "PARTIAL",
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Habit {
    pub id: EntityId,
    pub name: String,
    pub description: String,
    pub habit_type: HabitType,
    pub target_count: i32,
    pub color: i64,
    pub is_archived: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HabitCompletion {
    pub id: EntityId,
    /// Parent `Habit::id`.
    pub habit_id: EntityId,
    /// Start of the day the completion belongs to, epoch milliseconds.
    pub date: i64,
    pub completion_type: CompletionType,
    pub value: i32,
}
