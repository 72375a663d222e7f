//! Expense tracker and subscription tracker entities.

use super::EntityId;

#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseCategory {
    pub id: EntityId,
    pub name: String,
    pub color: i64,
    pub icon: String,
    pub monthly_budget: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Expense {
    pub id: EntityId,
    /// Parent `ExpenseCategory::id`.
    pub category_id: EntityId,
    pub amount: f64,
    pub description: String,
    pub date: i64,
    pub created_at: i64,
}

/// Recurring payment. Self-contained: no parent family.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: EntityId,
    pub name: String,
    pub price: f64,
    /// ISO 4217 code as entered by the user.
    pub currency: String,
    pub billing_cycle_days: i32,
    pub next_billing_date: i64,
    pub is_active: bool,
    pub note: String,
    pub created_at: i64,
}
