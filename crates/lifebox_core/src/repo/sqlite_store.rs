//! SQLite-backed store shared by every module gateway.
//!
//! # Invariants
//! - Construction fails unless the connection is fully migrated.
//! - Every insert commits independently; there is no surrounding transaction.

use crate::db::migrations::{current_user_version, latest_version, MODULE_TABLES};
use crate::model::{EntityId, UnknownVariant};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;

/// SQLite store over a migrated connection.
pub struct SqliteStore<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    /// Returns the underlying connection.
    pub fn connection(&self) -> &'conn Connection {
        self.conn
    }

    pub(super) fn delete_by_id(
        &self,
        table: &'static str,
        entity: &'static str,
        id: EntityId,
    ) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(&format!("DELETE FROM {table} WHERE id = ?1;"), [id])?;
        ensure_changed(changed, entity, id)
    }

    pub(super) fn delete_all_rows(&self, table: &'static str) -> RepoResult<()> {
        self.conn.execute(&format!("DELETE FROM {table};"), [])?;
        Ok(())
    }
}

/// Turns a zero-row `UPDATE` or `DELETE` into `NotFound`.
pub(super) fn ensure_changed(changed: usize, entity: &'static str, id: EntityId) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

/// Maps an unknown persisted enum name to `InvalidData` with column context.
pub(super) fn invalid_enum(column: &str, err: UnknownVariant) -> RepoError {
    RepoError::InvalidData(format!("{err} in {column}"))
}

pub(super) fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

pub(super) fn int_to_bool(column: &str, value: i64) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for table in MODULE_TABLES {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
