//! Habit tracker gateways: habits and their daily completions.

use super::sqlite_store::{bool_to_int, ensure_changed, int_to_bool, invalid_enum};
use super::{Gateway, RepoResult, SqliteStore};
use crate::model::{CompletionType, EntityId, Habit, HabitCompletion, HabitType};
use rusqlite::{params, Row};

impl Gateway<Habit> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, description, habit_type, target_count, color, is_archived, created_at
             FROM habits
             ORDER BY id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn insert(&self, habit: &Habit) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO habits (
                name, description, habit_type, target_count, color, is_archived, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                habit.name,
                habit.description,
                habit.habit_type.as_name(),
                habit.target_count,
                habit.color,
                bool_to_int(habit.is_archived),
                habit.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, habit: &Habit) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habits
             SET name = ?1, description = ?2, habit_type = ?3, target_count = ?4,
                 color = ?5, is_archived = ?6, created_at = ?7
             WHERE id = ?8;",
            params![
                habit.name,
                habit.description,
                habit.habit_type.as_name(),
                habit.target_count,
                habit.color,
                bool_to_int(habit.is_archived),
                habit.created_at,
                habit.id,
            ],
        )?;
        ensure_changed(changed, "Habit", habit.id)
    }

    fn delete(&self, habit: &Habit) -> RepoResult<()> {
        self.delete_by_id("habits", "Habit", habit.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("habits")
    }
}

impl Gateway<HabitCompletion> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<HabitCompletion>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, habit_id, date, completion_type, value
             FROM habit_completions
             ORDER BY date ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut completions = Vec::new();
        while let Some(row) = rows.next()? {
            completions.push(parse_completion_row(row)?);
        }
        Ok(completions)
    }

    fn insert(&self, completion: &HabitCompletion) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO habit_completions (habit_id, date, completion_type, value)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                completion.habit_id,
                completion.date,
                completion.completion_type.as_name(),
                completion.value,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, completion: &HabitCompletion) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habit_completions
             SET habit_id = ?1, date = ?2, completion_type = ?3, value = ?4
             WHERE id = ?5;",
            params![
                completion.habit_id,
                completion.date,
                completion.completion_type.as_name(),
                completion.value,
                completion.id,
            ],
        )?;
        ensure_changed(changed, "HabitCompletion", completion.id)
    }

    fn delete(&self, completion: &HabitCompletion) -> RepoResult<()> {
        self.delete_by_id("habit_completions", "HabitCompletion", completion.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("habit_completions")
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let type_text: String = row.get("habit_type")?;
    let habit_type =
        HabitType::from_name(&type_text).map_err(|err| invalid_enum("habits.habit_type", err))?;

    Ok(Habit {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        habit_type,
        target_count: row.get("target_count")?,
        color: row.get("color")?,
        is_archived: int_to_bool("habits.is_archived", row.get("is_archived")?)?,
        created_at: row.get("created_at")?,
    })
}

fn parse_completion_row(row: &Row<'_>) -> RepoResult<HabitCompletion> {
    let type_text: String = row.get("completion_type")?;
    let completion_type = CompletionType::from_name(&type_text)
        .map_err(|err| invalid_enum("habit_completions.completion_type", err))?;

    Ok(HabitCompletion {
        id: row.get("id")?,
        habit_id: row.get("habit_id")?,
        date: row.get("date")?,
        completion_type,
        value: row.get("value")?,
    })
}
