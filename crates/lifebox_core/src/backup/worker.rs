//! Background execution of export and import.
//!
//! # Responsibility
//! - Run one backup operation on a dedicated thread with its own connection.
//! - Hand the caller a cancel token and a joinable result.
//!
//! # Invariants
//! - A worker never shares a `Connection` with the calling thread.
//! - A panicking worker surfaces as `BackupError::Worker`, never as a panic
//!   in the caller.

use super::file::{export_to_file, import_from_file, ExportReport};
use super::stats::ImportStats;
use super::{BackupError, BackupResult, CancelToken};
use crate::config::BackupOptions;
use crate::db::open_db;
use crate::repo::SqliteStore;
use log::{error, info};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

/// Handle to a running backup operation.
#[derive(Debug)]
pub struct BackupTask<T> {
    handle: JoinHandle<BackupResult<T>>,
    cancel: CancelToken,
}

impl<T> BackupTask<T> {
    /// Requests cancellation at the worker's next checkpoint.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Blocks until the worker reports.
    pub fn join(self) -> BackupResult<T> {
        self.handle.join().unwrap_or_else(|payload| {
            let message = panic_message(payload.as_ref());
            error!("event=backup_worker module=backup status=panicked error={message}");
            Err(BackupError::Worker(message))
        })
    }
}

/// Exports the store at `db_path` into `options.backup_dir` on a worker thread.
pub fn spawn_export(
    db_path: PathBuf,
    options: BackupOptions,
) -> BackupResult<BackupTask<ExportReport>> {
    spawn("lifebox-export", move |cancel| {
        cancel.checkpoint()?;
        let conn = open_db(&db_path)?;
        let store = SqliteStore::try_new(&conn)?;
        cancel.checkpoint()?;
        export_to_file(&store, &options)
    })
}

/// Imports `backup_path` into the store at `db_path` on a worker thread.
pub fn spawn_import(
    db_path: PathBuf,
    backup_path: PathBuf,
) -> BackupResult<BackupTask<ImportStats>> {
    spawn("lifebox-import", move |cancel| {
        cancel.checkpoint()?;
        let conn = open_db(&db_path)?;
        let store = SqliteStore::try_new(&conn)?;
        import_from_file(&store, &backup_path, &cancel)
    })
}

fn spawn<T, F>(name: &str, work: F) -> BackupResult<BackupTask<T>>
where
    T: Send + 'static,
    F: FnOnce(CancelToken) -> BackupResult<T> + Send + 'static,
{
    let cancel = CancelToken::new();
    let worker_cancel = cancel.clone();
    let handle = thread::Builder::new()
        .name(name.to_string())
        .spawn(move || work(worker_cancel))?;
    info!("event=backup_worker module=backup status=spawned worker={name}");
    Ok(BackupTask { handle, cancel })
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "worker panicked".to_string()
}

#[cfg(test)]
mod tests {
    use super::{spawn, spawn_export, spawn_import};
    use crate::backup::module::BackupModule;
    use crate::backup::BackupError;
    use crate::config::BackupOptions;
    use crate::db::open_db;
    use crate::model::PlannerTask;
    use crate::repo::{Gateway, SqliteStore};
    use tempfile::TempDir;

    #[test]
    fn export_then_import_across_worker_threads() {
        let dir = TempDir::new().unwrap();
        let source_path = dir.path().join("source.sqlite3");
        {
            let conn = open_db(&source_path).unwrap();
            let store = SqliteStore::try_new(&conn).unwrap();
            store
                .insert(&PlannerTask {
                    id: 0,
                    title: "Water plants".to_string(),
                    description: String::new(),
                    date: 1_700_000_000_000,
                    is_completed: false,
                    priority: 1,
                    created_at: 1,
                })
                .unwrap();
        }

        let report = spawn_export(source_path, BackupOptions::new(dir.path()))
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(report.record_count(), 1);

        let target_path = dir.path().join("target.sqlite3");
        let stats = spawn_import(target_path.clone(), report.path)
            .unwrap()
            .join()
            .unwrap();
        assert_eq!(stats.count(BackupModule::DailyPlanner), 1);

        let conn = open_db(&target_path).unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();
        let tasks = Gateway::<PlannerTask>::get_all(&store).unwrap();
        assert_eq!(tasks[0].title, "Water plants");
    }

    #[test]
    fn panicking_worker_reports_worker_failure() {
        let task = spawn::<(), _>("lifebox-test", |_| panic!("boom")).unwrap();
        match task.join() {
            Err(BackupError::Worker(message)) => assert_eq!(message, "boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
