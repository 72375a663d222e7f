//! Expense tracker and subscription gateways.

use super::sqlite_store::{bool_to_int, ensure_changed, int_to_bool};
use super::{Gateway, RepoResult, SqliteStore};
use crate::model::{EntityId, Expense, ExpenseCategory, Subscription};
use rusqlite::{params, Row};

impl Gateway<ExpenseCategory> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<ExpenseCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color, icon, monthly_budget
             FROM expense_categories
             ORDER BY id ASC;",
        )?;
        let rows = stmt.query_map([], parse_category_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert(&self, category: &ExpenseCategory) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO expense_categories (name, color, icon, monthly_budget)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                category.name,
                category.color,
                category.icon,
                category.monthly_budget
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, category: &ExpenseCategory) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE expense_categories
             SET name = ?1, color = ?2, icon = ?3, monthly_budget = ?4
             WHERE id = ?5;",
            params![
                category.name,
                category.color,
                category.icon,
                category.monthly_budget,
                category.id,
            ],
        )?;
        ensure_changed(changed, "ExpenseCategory", category.id)
    }

    fn delete(&self, category: &ExpenseCategory) -> RepoResult<()> {
        self.delete_by_id("expense_categories", "ExpenseCategory", category.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("expense_categories")
    }
}

impl Gateway<Expense> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<Expense>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, amount, description, date, created_at
             FROM expenses
             ORDER BY date ASC, id ASC;",
        )?;
        let rows = stmt.query_map([], parse_expense_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert(&self, expense: &Expense) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO expenses (category_id, amount, description, date, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                expense.category_id,
                expense.amount,
                expense.description,
                expense.date,
                expense.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, expense: &Expense) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE expenses
             SET category_id = ?1, amount = ?2, description = ?3, date = ?4, created_at = ?5
             WHERE id = ?6;",
            params![
                expense.category_id,
                expense.amount,
                expense.description,
                expense.date,
                expense.created_at,
                expense.id,
            ],
        )?;
        ensure_changed(changed, "Expense", expense.id)
    }

    fn delete(&self, expense: &Expense) -> RepoResult<()> {
        self.delete_by_id("expenses", "Expense", expense.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("expenses")
    }
}

impl Gateway<Subscription> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<Subscription>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, price, currency, billing_cycle_days, next_billing_date,
                    is_active, note, created_at
             FROM subscriptions
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut subscriptions = Vec::new();
        while let Some(row) = rows.next()? {
            subscriptions.push(Subscription {
                id: row.get("id")?,
                name: row.get("name")?,
                price: row.get("price")?,
                currency: row.get("currency")?,
                billing_cycle_days: row.get("billing_cycle_days")?,
                next_billing_date: row.get("next_billing_date")?,
                is_active: int_to_bool("subscriptions.is_active", row.get("is_active")?)?,
                note: row.get("note")?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(subscriptions)
    }

    fn insert(&self, subscription: &Subscription) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO subscriptions (
                name, price, currency, billing_cycle_days, next_billing_date,
                is_active, note, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                subscription.name,
                subscription.price,
                subscription.currency,
                subscription.billing_cycle_days,
                subscription.next_billing_date,
                bool_to_int(subscription.is_active),
                subscription.note,
                subscription.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, subscription: &Subscription) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE subscriptions
             SET name = ?1, price = ?2, currency = ?3, billing_cycle_days = ?4,
                 next_billing_date = ?5, is_active = ?6, note = ?7, created_at = ?8
             WHERE id = ?9;",
            params![
                subscription.name,
                subscription.price,
                subscription.currency,
                subscription.billing_cycle_days,
                subscription.next_billing_date,
                bool_to_int(subscription.is_active),
                subscription.note,
                subscription.created_at,
                subscription.id,
            ],
        )?;
        ensure_changed(changed, "Subscription", subscription.id)
    }

    fn delete(&self, subscription: &Subscription) -> RepoResult<()> {
        self.delete_by_id("subscriptions", "Subscription", subscription.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("subscriptions")
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<ExpenseCategory> {
    Ok(ExpenseCategory {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        icon: row.get("icon")?,
        monthly_budget: row.get("monthly_budget")?,
    })
}

fn parse_expense_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get("id")?,
        category_id: row.get("category_id")?,
        amount: row.get("amount")?,
        description: row.get("description")?,
        date: row.get("date")?,
        created_at: row.get("created_at")?,
    })
}
