//! Core of the Lifebox personal data store: schema, entity gateways, and the
//! backup/restore engine.

pub mod backup;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;

pub use backup::{
    build_snapshot, decode, encode, export_to_file, export_to_writer, import_envelope,
    import_from_file, import_from_reader, spawn_export, spawn_import, BackupError, BackupModule,
    BackupResult, BackupTask, CancelToken, Envelope, ExportReport, ImportStats, ModuleOutcome,
    Snapshot, BACKUP_FORMAT_VERSION,
};
pub use config::BackupOptions;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use repo::{Gateway, LifeStore, RepoError, RepoResult, SqliteStore};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
