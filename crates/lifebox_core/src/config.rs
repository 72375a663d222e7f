//! Backup configuration.

use std::path::PathBuf;

/// Default filename prefix for exported backups.
pub const DEFAULT_FILE_PREFIX: &str = "Backup";

/// Options for file-based export.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupOptions {
    /// Directory that receives exported files. Created on demand.
    pub backup_dir: PathBuf,
    /// Indented JSON when `true`.
    pub pretty: bool,
    pub file_prefix: String,
}

impl BackupOptions {
    pub fn new(backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            backup_dir: backup_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            backup_dir: PathBuf::from("."),
            pretty: true,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{BackupOptions, DEFAULT_FILE_PREFIX};
    use std::path::PathBuf;

    #[test]
    fn defaults_to_pretty_output_in_current_dir() {
        let options = BackupOptions::default();
        assert!(options.pretty);
        assert_eq!(options.backup_dir, PathBuf::from("."));
        assert_eq!(options.file_prefix, DEFAULT_FILE_PREFIX);
    }

    #[test]
    fn builders_override_single_fields() {
        let options = BackupOptions::new("/tmp/backups")
            .with_pretty(false)
            .with_file_prefix("Nightly");
        assert_eq!(options.backup_dir, PathBuf::from("/tmp/backups"));
        assert!(!options.pretty);
        assert_eq!(options.file_prefix, "Nightly");
    }
}
