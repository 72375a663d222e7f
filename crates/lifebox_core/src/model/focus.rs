//! Focus tracker entities: categories and the timed sessions logged against
//! them.

use super::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusCategory {
    pub id: EntityId,
    pub name: String,
    /// ARGB color packed into an integer.
    pub color: i64,
    pub icon: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusSession {
    pub id: EntityId,
    /// Parent `FocusCategory::id`.
    pub category_id: EntityId,
    pub start_time: i64,
    pub end_time: i64,
    pub duration_ms: i64,
    pub note: String,
}
