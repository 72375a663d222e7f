//! Focus tracker gateways: categories and sessions.

use super::sqlite_store::ensure_changed;
use super::{Gateway, RepoResult, SqliteStore};
use crate::model::{EntityId, FocusCategory, FocusSession};
use rusqlite::{params, Row};

impl Gateway<FocusCategory> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<FocusCategory>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, color, icon, created_at
             FROM focus_categories
             ORDER BY id ASC;",
        )?;
        let rows = stmt.query_map([], parse_category_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert(&self, category: &FocusCategory) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO focus_categories (name, color, icon, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                category.name,
                category.color,
                category.icon,
                category.created_at
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, category: &FocusCategory) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE focus_categories
             SET name = ?1, color = ?2, icon = ?3, created_at = ?4
             WHERE id = ?5;",
            params![
                category.name,
                category.color,
                category.icon,
                category.created_at,
                category.id,
            ],
        )?;
        ensure_changed(changed, "FocusCategory", category.id)
    }

    fn delete(&self, category: &FocusCategory) -> RepoResult<()> {
        self.delete_by_id("focus_categories", "FocusCategory", category.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("focus_categories")
    }
}

impl Gateway<FocusSession> for SqliteStore<'_> {
    fn get_all(&self) -> RepoResult<Vec<FocusSession>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, category_id, start_time, end_time, duration_ms, note
             FROM focus_sessions
             ORDER BY start_time ASC, id ASC;",
        )?;
        let rows = stmt.query_map([], parse_session_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn insert(&self, session: &FocusSession) -> RepoResult<EntityId> {
        self.conn.execute(
            "INSERT INTO focus_sessions (category_id, start_time, end_time, duration_ms, note)
             VALUES (?1, ?2, ?3, ?4, ?5);",
            params![
                session.category_id,
                session.start_time,
                session.end_time,
                session.duration_ms,
                session.note,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&self, session: &FocusSession) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE focus_sessions
             SET category_id = ?1, start_time = ?2, end_time = ?3, duration_ms = ?4, note = ?5
             WHERE id = ?6;",
            params![
                session.category_id,
                session.start_time,
                session.end_time,
                session.duration_ms,
                session.note,
                session.id,
            ],
        )?;
        ensure_changed(changed, "FocusSession", session.id)
    }

    fn delete(&self, session: &FocusSession) -> RepoResult<()> {
        self.delete_by_id("focus_sessions", "FocusSession", session.id)
    }

    fn delete_all(&self) -> RepoResult<()> {
        self.delete_all_rows("focus_sessions")
    }
}

fn parse_category_row(row: &Row<'_>) -> rusqlite::Result<FocusCategory> {
    Ok(FocusCategory {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        icon: row.get("icon")?,
        created_at: row.get("created_at")?,
    })
}

fn parse_session_row(row: &Row<'_>) -> rusqlite::Result<FocusSession> {
    Ok(FocusSession {
        id: row.get("id")?,
        category_id: row.get("category_id")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
        duration_ms: row.get("duration_ms")?,
        note: row.get("note")?,
    })
}
