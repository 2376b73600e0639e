//! pathlist-backup - Main entry point
//!
//! Copies the files selected by a path list into a timestamped backup directory.

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use pathlist_backup::{
    confirm::{AssumeYes, ConfirmationGate, TerminalGate},
    executor::progress::{format_bytes, format_duration},
    utils, BackupError, RunOutcome, Runner, Settings,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path list describing what to back up
    #[arg(short, long, value_name = "FILE", default_value = "./PATHLIST")]
    pathlist: PathBuf,

    /// Settings file (JSON or TOML)
    #[arg(short, long, value_name = "FILE", default_value = "./settings.json")]
    settings: PathBuf,

    /// Log level (trace, debug, info, warn, error), overrides settings
    #[arg(short, long)]
    log_level: Option<String>,

    /// Do not ask for confirmation above the warning size
    #[arg(short, long)]
    yes: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::from_file(&args.settings)
        .with_context(|| format!("loading settings from {}", args.settings.display()))?;

    let log_level = args.log_level.as_deref().unwrap_or(&settings.log_level);
    utils::logger::init(log_level)?;

    tracing::info!("Starting pathlist-backup v{}", env!("CARGO_PKG_VERSION"));

    let gate: Box<dyn ConfirmationGate> = if args.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(TerminalGate::stdio())
    };

    let mut runner = Runner::new(settings, gate);
    let outcome = match runner.run_file(&args.pathlist, &Local::now()) {
        Ok(outcome) => outcome,
        Err(e @ (BackupError::Copy { .. } | BackupError::CreateDir { .. })) => {
            tracing::error!("Backup aborted, the backup directory may be incomplete: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing::error!("Backup aborted, nothing was copied: {}", e);
            return Err(e.into());
        }
    };

    match outcome {
        RunOutcome::Completed(report) => tracing::info!(
            "Backed up {} files ({}) to \"{}\" in {}",
            report.files_copied,
            format_bytes(report.bytes_copied),
            report.backup_dir.display(),
            format_duration(report.elapsed)
        ),
        RunOutcome::Declined { total_size } => {
            tracing::warn!("Cancelling backup of {}.", format_bytes(total_size))
        }
        RunOutcome::AlreadyExists(dir) => {
            tracing::info!("Already created backup \"{}\"", dir.display())
        }
    }

    Ok(())
}
