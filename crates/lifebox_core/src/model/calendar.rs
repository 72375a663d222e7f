//! Daily planner tasks and year-calculator date spans.

use super::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerTask {
    pub id: EntityId,
    pub title: String,
    pub description: String,
    pub date: i64,
    pub priority: i32,
    pub is_completed: bool,
    pub created_at: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateCalculation {
    pub id: EntityId,
    pub title: String,
    pub start_date: i64,
    pub end_date: i64,
    pub created_at: i64,
}

impl DateCalculation {
    /// Whole days between `start_date` and `end_date`, negative when reversed.
    pub fn span_days(&self) -> i64 {
        (self.end_date - self.start_date) / MILLIS_PER_DAY
    }
}

const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;
