//! Orchestrates a backup run: parse, enumerate, record, confirm, copy.

use crate::config::Settings;
use crate::confirm::ConfirmationGate;
use crate::executor::manifest::{BackupManifest, JsonManifestWriter, ManifestWriter};
use crate::executor::progress::format_bytes;
use crate::executor::{BackupExecutor, BackupOutcome, BackupReport};
use crate::fs::walker;
use crate::pathlist;
use crate::utils::errors::{BackupError, Result};
use chrono::{Datelike, Timelike};
use std::path::{Path, PathBuf};
use tracing::info;

const CONFIRM_QUESTION: &str = "Are you sure you want to continue? Y N: ";

/// How a run ended
#[derive(Debug)]
pub enum RunOutcome {
    Completed(BackupReport),
    /// The user declined to back up `total_size` bytes; nothing was created.
    Declined { total_size: u64 },
    /// A backup for this minute already exists; nothing was copied.
    AlreadyExists(PathBuf),
}

/// Read a path list file.
pub fn load_pathlist(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| BackupError::FileSystem {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

pub struct Runner<G> {
    settings: Settings,
    gate: G,
    manifest_writer: Option<Box<dyn ManifestWriter>>,
}

impl<G: ConfirmationGate> Runner<G> {
    /// Writes the manifest as JSON when `settings.backupped_files` is set.
    pub fn new(settings: Settings, gate: G) -> Self {
        let manifest_writer = settings
            .backupped_files
            .as_ref()
            .map(|path| Box::new(JsonManifestWriter::new(path)) as Box<dyn ManifestWriter>);

        Self {
            settings,
            gate,
            manifest_writer,
        }
    }

    pub fn with_manifest_writer(mut self, writer: Option<Box<dyn ManifestWriter>>) -> Self {
        self.manifest_writer = writer;
        self
    }

    #[cfg(test)]
    fn gate(&self) -> &G {
        &self.gate
    }

    /// Load the path list at `pathlist` and run a backup from it.
    pub fn run_file<T: Datelike + Timelike>(&mut self, pathlist: &Path, now: &T) -> Result<RunOutcome> {
        info!("Loading path list {}", pathlist.display());
        let text = load_pathlist(pathlist)?;
        self.run(&text, now)
    }

    /// Run a backup from path list `text`, timestamped with `now`.
    pub fn run<T: Datelike + Timelike>(&mut self, text: &str, now: &T) -> Result<RunOutcome> {
        let spec = pathlist::parse(text)?;
        info!(
            "Parsed path list: {} include, {} exclude paths",
            spec.include.len(),
            spec.exclude.len()
        );

        info!("Finding files. (May take a minute.)");
        let list = walker::enumerate(&spec)?;
        info!(
            "Found {} files, {}",
            list.files.len(),
            format_bytes(list.total_size)
        );

        if let Some(writer) = &self.manifest_writer {
            writer.write(&BackupManifest::new(&spec, &list))?;
        }

        if list.total_size >= self.settings.warning_size {
            info!(
                "Total size {} reaches the warning size {}",
                format_bytes(list.total_size),
                format_bytes(self.settings.warning_size)
            );
            if !self
                .gate
                .confirm(&format_bytes(list.total_size), CONFIRM_QUESTION)?
            {
                return Ok(RunOutcome::Declined {
                    total_size: list.total_size,
                });
            }
        }

        let executor = BackupExecutor::new(&self.settings.backups_dir);
        match executor.execute(&list.files, now)? {
            BackupOutcome::Completed(report) => Ok(RunOutcome::Completed(report)),
            BackupOutcome::AlreadyExists(dir) => Ok(RunOutcome::AlreadyExists(dir)),
        }
    }
}
