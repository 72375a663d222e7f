//! `lifebox` command-line entry point.
//!
//! # Responsibility
//! - Map flags and environment variables onto core backup calls.
//! - Print human-readable results; detailed diagnostics go to the log file.

use anyhow::{bail, Context, Result};
use chrono::{Local, TimeZone};
use clap::{Parser, Subcommand};
use lifebox_core::{
    decode, default_log_level, init_logging, spawn_export, spawn_import, BackupOptions,
};
use log::info;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(
    name = "lifebox",
    version,
    about = "Backup and restore for the Lifebox personal data store"
)]
struct Cli {
    /// SQLite store to back up or restore into
    #[arg(long, global = true, env = "LIFEBOX_DB", default_value = "lifebox.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "LIFEBOX_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true, env = "LIFEBOX_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write every module of the store into a new backup file
    Export {
        /// Directory receiving the backup file
        #[arg(short, long, default_value = ".")]
        out_dir: PathBuf,
        /// Filename prefix
        #[arg(long, default_value = "Backup")]
        prefix: String,
        /// Write compact JSON instead of indented JSON
        #[arg(long)]
        compact: bool,
    },
    /// Add the records of a backup file to the store
    Import {
        /// Backup file to read
        file: PathBuf,
    },
    /// Show what a backup file contains without touching the store
    Inspect {
        /// Backup file to read
        file: PathBuf,
    },
}

impl Commands {
    fn name(&self) -> &'static str {
        match self {
            Self::Export { .. } => "export",
            Self::Import { .. } => "import",
            Self::Inspect { .. } => "inspect",
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    info!(
        "event=cli_command module=cli status=start command={} db={}",
        cli.command.name(),
        cli.db.display()
    );

    match cli.command {
        Commands::Export {
            out_dir,
            prefix,
            compact,
        } => export(&cli.db, out_dir, prefix, compact),
        Commands::Import { file } => import(&cli.db, file),
        Commands::Inspect { file } => inspect(&file),
    }
}

fn export(db: &Path, out_dir: PathBuf, prefix: String, compact: bool) -> Result<()> {
    let options = BackupOptions::new(out_dir)
        .with_pretty(!compact)
        .with_file_prefix(prefix);
    let report = spawn_export(db.to_path_buf(), options)?
        .join()
        .with_context(|| format!("export of {} failed", db.display()))?;

    println!(
        "Exported {} records to {}",
        report.record_count(),
        report.path.display()
    );
    for failure in &report.degraded {
        println!(
            "warning: {} could not be read and was exported empty: {}",
            failure.module.label(),
            failure.reason
        );
    }
    Ok(())
}

fn import(db: &Path, file: PathBuf) -> Result<()> {
    if !file.is_file() {
        bail!("backup file not found: {}", file.display());
    }
    let stats = spawn_import(db.to_path_buf(), file.clone())?
        .join()
        .with_context(|| format!("import of {} failed", file.display()))?;

    println!("{}", stats.summary());
    for (module, reason) in stats.failures() {
        println!("warning: {} was not imported: {}", module.label(), reason);
    }
    Ok(())
}

fn inspect(file: &Path) -> Result<()> {
    let bytes =
        std::fs::read(file).with_context(|| format!("failed to read {}", file.display()))?;
    let envelope = decode(&bytes)?;

    let created = Local
        .timestamp_millis_opt(envelope.timestamp)
        .single()
        .map(|time| time.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| envelope.timestamp.to_string());
    println!("Format version: {}", envelope.version);
    if !envelope.is_supported_version() {
        println!("  (this build cannot import this version)");
    }
    println!("Created: {created}");
    for (module, count) in envelope.section_counts() {
        println!("- {}: {}", module.label(), count);
    }
    println!("Total: {}", envelope.source_record_count());
    Ok(())
}
