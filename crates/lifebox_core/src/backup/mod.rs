//! Backup/restore engine.
//!
//! # Responsibility
//! - Export every module of a store into one versioned, portable envelope.
//! - Rebuild a store from an envelope, relinking children to freshly assigned
//!   parent ids.
//!
//! # Invariants
//! - Only I/O, format, version and cancellation errors fail a whole call.
//! - Module failures are contained and reported through `ImportStats` or
//!   `Snapshot::degraded`.
//! - Nothing is rolled back: every insert commits on its own.

use crate::db::DbError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub mod envelope;
pub mod export;
pub mod file;
pub mod import;
pub mod module;
pub mod record;
pub mod remap;
pub mod stats;
pub mod worker;

pub use envelope::{decode, encode, Envelope, BACKUP_FORMAT_VERSION};
pub use export::{build_snapshot, export_to_writer, SectionFailure, Snapshot};
pub use file::{default_file_name, export_to_file, import_from_file, ExportReport};
pub use import::{import_envelope, import_from_reader};
pub use module::BackupModule;
pub use remap::IdRemap;
pub use stats::{ImportStats, ModuleOutcome};
pub use worker::{spawn_export, spawn_import, BackupTask};

pub type BackupResult<T> = Result<T, BackupError>;

/// Whole-operation failure of an export or import call.
#[derive(Debug)]
pub enum BackupError {
    /// Byte sink/source unreachable.
    Io(std::io::Error),
    /// Bytes are not a backup envelope.
    Format(serde_json::Error),
    /// Envelope version differs from `BACKUP_FORMAT_VERSION`.
    UnsupportedVersion { found: i64, supported: i64 },
    /// A `CancelToken` was triggered at a checkpoint.
    Cancelled,
    /// The store could not be opened for a background task.
    Store(RepoError),
    /// A background task died before reporting.
    Worker(String),
}

impl Display for BackupError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "backup I/O failed: {err}"),
            Self::Format(err) => write!(f, "not a valid backup file: {err}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "backup format version {found} is not supported (expected {supported})"
            ),
            Self::Cancelled => write!(f, "backup operation cancelled"),
            Self::Store(err) => write!(f, "store unavailable: {err}"),
            Self::Worker(message) => write!(f, "backup worker failed: {message}"),
        }
    }
}

impl Error for BackupError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::UnsupportedVersion { .. } | Self::Cancelled | Self::Worker(_) => None,
        }
    }
}

impl From<std::io::Error> for BackupError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<RepoError> for BackupError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

impl From<DbError> for BackupError {
    fn from(value: DbError) -> Self {
        Self::Store(RepoError::Db(value))
    }
}

impl BackupError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Io(_) => "io_failure",
            Self::Format(_) => "format_failure",
            Self::UnsupportedVersion { .. } => "version_failure",
            Self::Cancelled => "cancelled",
            Self::Store(_) => "store_unavailable",
            Self::Worker(_) => "worker_failure",
        }
    }
}

/// Cooperative cancellation flag shared between a caller and a running task.
///
/// Checked only at coarse checkpoints; a module that started writing always
/// runs to completion.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub(crate) fn checkpoint(&self) -> BackupResult<()> {
        if self.is_cancelled() {
            return Err(BackupError::Cancelled);
        }
        Ok(())
    }
}

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::{BackupError, CancelToken};

    #[test]
    fn cancel_token_is_shared_between_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(observer.checkpoint().is_ok());

        token.cancel();
        assert!(observer.is_cancelled());
        assert!(matches!(observer.checkpoint(), Err(BackupError::Cancelled)));
    }

    #[test]
    fn version_error_names_both_versions() {
        let err = BackupError::UnsupportedVersion {
            found: 2,
            supported: 1,
        };
        assert_eq!(
            err.to_string(),
            "backup format version 2 is not supported (expected 1)"
        );
        assert_eq!(err.code(), "version_failure");
    }
}
