//! Daily planner and year calculator gateways.

use super::sqlite_store::{bool_to_int, ensure_changed, int_to_bool};
use super::{Gateway, RepoResult, SqliteStore};
use crate::model::{DateCalculation, EntityId, PlannerTask};
use rusqlite::{params, Row};

impl Gateway<PlannerTask> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<PlannerTask>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, description, date, priority, is_completed, created_at
             FROM planner_tasks
             ORDER BY date ASC, id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(PlannerTask {
                id: row.get("id")?,
                title: row.get("title")?,
                description: row.get("description")?,
                date: row.get("date")?,
                priority: row.get("priority")?,
                is_completed: int_to_bool("planner_tasks.is_completed", row.get("is_completed")?)?,
                created_at: row.get("created_at")?,
            });
        }
        Ok(tasks)
    }

    fn insert(&self, task: &PlannerTask) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO planner_tasks (
                title, description, date, priority, is_completed, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                task.title,
                task.description,
                task.date,
                task.priority,
                bool_to_int(task.is_completed),
                task.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, task: &PlannerTask) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE planner_tasks
             SET title = ?1, description = ?2, date = ?3, priority = ?4,
                 is_completed = ?5, created_at = ?6
             WHERE id = ?7;",
            params![
                task.title,
                task.description,
                task.date,
                task.priority,
                bool_to_int(task.is_completed),
                task.created_at,
                task.id,
            ],
        )?;
        ensure_changed(changed, "PlannerTask", task.id)
    }

    fn delete(&self, task: &PlannerTask) -> RepoResult<()> {
        self.delete_by_id("planner_tasks", "PlannerTask", task.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("planner_tasks")
    }
}

impl Gateway<DateCalculation> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<DateCalculation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, title, start_date, end_date, created_at
             FROM date_calculations
             ORDER BY id ASC;",
        )?;
        let rows = stmt.query_map([], parse_calculation_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert(&self, calculation: &DateCalculation) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO date_calculations (title, start_date, end_date, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                calculation.title,
                calculation.start_date,
                calculation.end_date,
                calculation.created_at,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, calculation: &DateCalculation) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE date_calculations
             SET title = ?1, start_date = ?2, end_date = ?3, created_at = ?4
             WHERE id = ?5;",
            params![
                calculation.title,
                calculation.start_date,
                calculation.end_date,
                calculation.created_at,
                calculation.id,
            ],
        )?;
        ensure_changed(changed, "DateCalculation", calculation.id)
    }

    fn delete(&self, calculation: &DateCalculation) -> RepoResult<()> {
        self.delete_by_id("date_calculations", "DateCalculation", calculation.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("date_calculations")
    }
}

fn parse_calculation_row(row: &Row<'_>) -> rusqlite::Result<DateCalculation> {
    Ok(DateCalculation {
        id: row.get("id")?,
        title: row.get("title")?,
        start_date: row.get("start_date")?,
        end_date: row.get("end_date")?,
        created_at: row.get("created_at")?,
    })
}
