//! File-backed export and import.
//!
//! # Responsibility
//! - Name backup files from local wall-clock time.
//! - Write backups atomically so a failed export never leaves a partial file
//!   under the final name.
//!
//! # Invariants
//! - An existing backup file is never overwritten; a numeric suffix is added.

use super::envelope::encode;
use super::export::{build_snapshot, SectionFailure};
use super::import::import_from_reader;
use super::module::BackupModule;
use super::stats::ImportStats;
use super::{BackupError, BackupResult, CancelToken};
use crate::config::BackupOptions;
use crate::repo::LifeStore;
use chrono::{DateTime, Local};
use log::{error, info};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

const BACKUP_EXTENSION: &str = "json";

/// Result of one file export.
#[derive(Debug)]
pub struct ExportReport {
    pub path: PathBuf,
    /// Envelope timestamp, epoch milliseconds.
    pub timestamp: i64,
    pub section_counts: Vec<(BackupModule, usize)>,
    /// Modules exported as empty because they could not be read.
    pub degraded: Vec<SectionFailure>,
}

impl ExportReport {
    pub fn record_count(&self) -> usize {
        self.section_counts.iter().map(|(_, count)| count).sum()
    }
}

/// `<prefix>_YYYY-MM-DD_HH-mm-ss.json` for the given local time.
pub fn default_file_name(now: DateTime<Local>, prefix: &str) -> String {
    format!(
        "{prefix}_{}.{BACKUP_EXTENSION}",
        now.format("%Y-%m-%d_%H-%M-%S")
    )
}

/// Exports `store` into a new file under `options.backup_dir`.
///
/// # Errors
/// - `Io` when the directory or file cannot be written.
/// - `Format` when the snapshot cannot be serialized.
pub fn export_to_file<S: LifeStore + ?Sized>(
    store: &S,
    options: &BackupOptions,
) -> BackupResult<ExportReport> {
    let snapshot = build_snapshot(store);
    let bytes = encode(&snapshot.envelope, options.pretty)?;

    fs::create_dir_all(&options.backup_dir)?;
    let file_name = default_file_name(Local::now(), &options.file_prefix);
    let path = unique_path(&options.backup_dir, &file_name);
    write_atomic(&path, &bytes).map_err(|err| {
        error!(
            "event=backup_file_write module=backup status=error path={} error={}",
            path.display(),
            err
        );
        BackupError::Io(err)
    })?;

    let report = ExportReport {
        path,
        timestamp: snapshot.envelope.timestamp,
        section_counts: snapshot.envelope.section_counts(),
        degraded: snapshot.degraded,
    };
    info!(
        "event=backup_file_write module=backup status=ok path={} records={} bytes={} degraded_sections={}",
        report.path.display(),
        report.record_count(),
        bytes.len(),
        report.degraded.len()
    );
    Ok(report)
}

/// Imports the backup stored at `path`.
pub fn import_from_file<S: LifeStore + ?Sized>(
    store: &S,
    path: &Path,
    cancel: &CancelToken,
) -> BackupResult<ImportStats> {
    cancel.checkpoint()?;
    let file = File::open(path).map_err(|err| {
        error!(
            "event=backup_file_read module=backup status=error path={} error={}",
            path.display(),
            err
        );
        BackupError::Io(err)
    })?;
    let mut reader = BufReader::new(file);
    import_from_reader(store, &mut reader, cancel)
}

fn unique_path(dir: &Path, file_name: &str) -> PathBuf {
    let candidate = dir.join(file_name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = file_name
        .strip_suffix(&format!(".{BACKUP_EXTENSION}"))
        .unwrap_or(file_name);
    let mut suffix = 1_u32;
    loop {
        let candidate = dir.join(format!("{stem}_{suffix}.{BACKUP_EXTENSION}"));
        if !candidate.exists() {
            return candidate;
        }
        suffix += 1;
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path)?;
    let mut writer = BufWriter::new(file);
    let written = writer
        .write_all(bytes)
        .and_then(|()| writer.flush())
        .and_then(|()| writer.get_ref().sync_all());
    if let Err(err) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(err);
    }

    fs::rename(&temp_path, path).map_err(|err| {
        let _ = fs::remove_file(&temp_path);
        err
    })
}

#[cfg(test)]
mod tests {
    use super::{default_file_name, export_to_file, import_from_file, unique_path};
    use crate::backup::module::BackupModule;
    use crate::backup::CancelToken;
    use crate::config::BackupOptions;
    use crate::db::open_db_in_memory;
    use crate::model::Subscription;
    use crate::repo::{Gateway, SqliteStore};
    use chrono::{Local, TimeZone};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn file_name_uses_local_timestamp() {
        let now = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            default_file_name(now, "Backup"),
            "Backup_2024-03-09_07-05-01.json"
        );
    }

    #[test]
    fn existing_file_gets_numeric_suffix() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Backup_x.json"), b"{}").unwrap();
        fs::write(dir.path().join("Backup_x_1.json"), b"{}").unwrap();

        let path = unique_path(dir.path(), "Backup_x.json");
        assert_eq!(path, dir.path().join("Backup_x_2.json"));
    }

    #[test]
    fn exported_file_imports_into_another_store() {
        let dir = TempDir::new().unwrap();
        let source_conn = open_db_in_memory().unwrap();
        let source = SqliteStore::try_new(&source_conn).unwrap();
        source
            .insert(&Subscription {
                id: 0,
                name: "Music".to_string(),
                price: 9.99,
                currency: "EUR".to_string(),
                billing_cycle_days: 30,
                next_billing_date: 1_700_000_000_000,
                is_active: true,
                note: String::new(),
                created_at: 1,
            })
            .unwrap();

        let options = BackupOptions::new(dir.path().join("nested"));
        let report = export_to_file(&source, &options).unwrap();
        assert!(report.path.exists());
        assert_eq!(report.record_count(), 1);
        assert!(report.degraded.is_empty());
        assert!(!report.path.with_extension("json.tmp").exists());

        let target_conn = open_db_in_memory().unwrap();
        let target = SqliteStore::try_new(&target_conn).unwrap();
        let stats = import_from_file(&target, &report.path, &CancelToken::new()).unwrap();
        assert_eq!(stats.count(BackupModule::SubscriptionTracker), 1);
        assert_eq!(stats.total(), 1);
    }

    #[test]
    fn missing_file_is_an_io_failure() {
        let dir = TempDir::new().unwrap();
        let conn = open_db_in_memory().unwrap();
        let store = SqliteStore::try_new(&conn).unwrap();

        let err = import_from_file(&store, &dir.path().join("absent.json"), &CancelToken::new())
            .unwrap_err();
        assert_eq!(err.code(), "io_failure");
    }
}
