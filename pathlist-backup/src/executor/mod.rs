//! Backup executor - copies enumerated files into a timestamped directory.
//!
//! The backup directory is named `YYYY-M-D-H-m` after the run's start time
//! (no zero padding, minute resolution). If that directory already exists the
//! run is skipped without touching the file system. Otherwise every file is
//! copied below it, mirroring its source path with the first `:` removed, so
//! `C:\data\a.txt` lands at `<backup>\C\data\a.txt`.
//!
//! Copying is sequential and stops at the first failure. Files copied before
//! the failure are left in place.

pub mod manifest;
pub mod progress;

use crate::fs::walker::FileEntry;
use crate::utils::errors::{BackupError, Result};
use chrono::{Datelike, Timelike};
use progress::{format_bytes, format_duration, CopyProgress};
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Summary of a completed backup
#[derive(Debug, Clone)]
pub struct BackupReport {
    pub backup_dir: PathBuf,
    pub files_copied: usize,
    pub bytes_copied: u64,
    pub elapsed: Duration,
}

/// Result of a backup attempt
#[derive(Debug)]
pub enum BackupOutcome {
    Completed(BackupReport),
    /// The backup directory for this minute is already present; nothing was copied.
    AlreadyExists(PathBuf),
}

/// Directory name for a backup started at `now`, e.g. `2024-3-7-9-5`.
pub fn backup_dir_name<T: Datelike + Timelike>(now: &T) -> String {
    format!(
        "{}-{}-{}-{}-{}",
        now.year(),
        now.month(),
        now.day(),
        now.hour(),
        now.minute()
    )
}

/// Location of `source` inside `backup_dir`.
///
/// Only the first `:` is removed; this is a fixed volume-separator rule and
/// not a general path translation. Root, `.` and `..` components are dropped
/// so every file stays below `backup_dir`: `../docs/a.txt` maps to
/// `<backup>/docs/a.txt`.
pub fn backup_path_for(backup_dir: &Path, source: &Path) -> PathBuf {
    let source = PathBuf::from(source.to_string_lossy().replacen(':', "", 1));
    let relative: PathBuf = source
        .components()
        .filter(|c| matches!(c, Component::Normal(_)))
        .collect();
    backup_dir.join(relative)
}

/// Main backup executor
pub struct BackupExecutor {
    destination_root: PathBuf,
}

impl BackupExecutor {
    pub fn new(destination_root: impl Into<PathBuf>) -> Self {
        Self {
            destination_root: destination_root.into(),
        }
    }

    /// Backup directory a run started at `now` would use.
    pub fn backup_dir<T: Datelike + Timelike>(&self, now: &T) -> PathBuf {
        self.destination_root.join(backup_dir_name(now))
    }

    /// Copy `files` into the backup directory for `now`.
    pub fn execute<T: Datelike + Timelike>(
        &self,
        files: &[FileEntry],
        now: &T,
    ) -> Result<BackupOutcome> {
        let backup_dir = self.backup_dir(now);

        let exists = backup_dir
            .try_exists()
            .map_err(|source| BackupError::FileSystem {
                path: backup_dir.clone(),
                source,
            })?;
        if exists {
            return Ok(BackupOutcome::AlreadyExists(backup_dir));
        }

        info!("Creating backup directory {}", backup_dir.display());
        create_dir_all(&backup_dir)?;

        let total_bytes = files.iter().map(|f| f.size).sum();
        let mut progress = CopyProgress::new(total_bytes, files.len());

        info!(
            "Copying {} files ({})",
            files.len(),
            format_bytes(total_bytes)
        );

        for file in files {
            let dest = backup_path_for(&backup_dir, &file.path);
            debug!("\"{}\" -> \"{}\"", file.path.display(), dest.display());

            if let Some(parent) = dest.parent() {
                create_dir_all(parent)?;
            }

            std::fs::copy(&file.path, &dest).map_err(|source| BackupError::Copy {
                source_path: file.path.clone(),
                dest_path: dest.clone(),
                source,
            })?;

            progress.record(file.size);
            debug!(
                "{}/{} files, {:.1}%",
                progress.files_copied, progress.total_files, progress.percent_complete
            );
        }

        let elapsed = progress.elapsed();
        info!(
            "Backup completed: {} files, {} in {}",
            progress.files_copied,
            format_bytes(progress.copied_bytes),
            format_duration(elapsed)
        );

        Ok(BackupOutcome::Completed(BackupReport {
            backup_dir,
            files_copied: progress.files_copied,
            bytes_copied: progress.copied_bytes,
            elapsed,
        }))
    }
}

/// Copy `files` into a timestamped directory under `destination_root`.
pub fn execute<T: Datelike + Timelike>(
    files: &[FileEntry],
    destination_root: &Path,
    now: &T,
) -> Result<BackupOutcome> {
    BackupExecutor::new(destination_root).execute(files, now)
}

fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|source| BackupError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::path::normalize;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    fn entry(path: &Path) -> FileEntry {
        FileEntry {
            path: path.to_path_buf(),
            size: fs::metadata(path).unwrap().len(),
        }
    }

    fn completed(outcome: BackupOutcome) -> BackupReport {
        match outcome {
            BackupOutcome::Completed(report) => report,
            other => panic!("expected completed backup, got {other:?}"),
        }
    }

    #[test]
    fn test_backup_dir_name_is_unpadded() {
        assert_eq!(backup_dir_name(&at(2024, 3, 7, 9, 5, 59)), "2024-3-7-9-5");
        assert_eq!(backup_dir_name(&at(2023, 12, 31, 23, 59, 0)), "2023-12-31-23-59");
        assert_eq!(backup_dir_name(&at(2024, 1, 1, 0, 0, 0)), "2024-1-1-0-0");
    }

    #[test]
    fn test_backup_path_strips_first_colon() {
        let dir = Path::new("/backups/2024-1-1-0-0");
        assert_eq!(
            backup_path_for(dir, Path::new("C:/data/a.txt")),
            dir.join("C/data/a.txt")
        );
        assert_eq!(
            backup_path_for(dir, Path::new("/home/user/a:b:c.txt")),
            dir.join("home/user/ab:c.txt")
        );
        assert_eq!(
            backup_path_for(dir, Path::new("relative/a.txt")),
            dir.join("relative/a.txt")
        );
    }

    #[test]
    fn test_backup_path_stays_inside_backup_dir() {
        let dir = Path::new("/backups/2024-1-1-0-0");
        for source in ["../docs/a.txt", "./../../x/../b.txt", "/../etc/c.txt", "C:/../d.txt"] {
            let dest = backup_path_for(dir, Path::new(&normalize(source)));
            assert!(dest.starts_with(dir), "{source} -> {}", dest.display());
            assert!(
                dest.components().all(|c| !matches!(c, Component::ParentDir)),
                "{source} -> {}",
                dest.display()
            );
        }
        assert_eq!(
            backup_path_for(dir, Path::new(&normalize("../docs/a.txt"))),
            dir.join("docs/a.txt")
        );
    }

    #[test]
    fn test_execute_copies_bytes() -> Result<()> {
        let source = TempDir::new()?;
        let dest = TempDir::new()?;

        fs::create_dir_all(source.path().join("nested/deeper"))?;
        let a = source.path().join("a.txt");
        let b = source.path().join("nested/deeper/b.bin");
        fs::write(&a, b"hello backup")?;
        fs::write(&b, (0..=255u8).collect::<Vec<u8>>())?;

        let files = vec![entry(&a), entry(&b)];
        let report = completed(execute(&files, dest.path(), &at(2024, 6, 1, 12, 30, 0))?);

        assert_eq!(report.backup_dir, dest.path().join("2024-6-1-12-30"));
        assert_eq!(report.files_copied, 2);
        assert_eq!(report.bytes_copied, 12 + 256);

        for file in &files {
            let copy = backup_path_for(&report.backup_dir, &file.path);
            assert_eq!(fs::read(copy)?, fs::read(&file.path)?);
        }
        Ok(())
    }

    #[test]
    fn test_second_run_in_same_minute_is_skipped() -> Result<()> {
        let source = TempDir::new()?;
        let dest = TempDir::new()?;
        let a = source.path().join("a.txt");
        fs::write(&a, b"first")?;

        let executor = BackupExecutor::new(dest.path());
        let report = completed(executor.execute(&[entry(&a)], &at(2024, 6, 1, 12, 30, 1))?);

        fs::write(&a, b"second")?;
        let outcome = executor.execute(&[entry(&a)], &at(2024, 6, 1, 12, 30, 58))?;

        match outcome {
            BackupOutcome::AlreadyExists(dir) => assert_eq!(dir, report.backup_dir),
            other => panic!("expected AlreadyExists, got {other:?}"),
        }
        let copy = backup_path_for(&report.backup_dir, &a);
        assert_eq!(fs::read(copy)?, b"first");
        Ok(())
    }

    #[test]
    fn test_copy_failure_stops_remaining_files() -> Result<()> {
        let source = TempDir::new()?;
        let dest = TempDir::new()?;

        let first = source.path().join("first.txt");
        let missing = source.path().join("missing.txt");
        let last = source.path().join("last.txt");
        fs::write(&first, b"1")?;
        fs::write(&last, b"3")?;

        let files = vec![
            entry(&first),
            FileEntry { path: missing.clone(), size: 2 },
            entry(&last),
        ];
        let now = at(2024, 6, 1, 12, 31, 0);

        match execute(&files, dest.path(), &now) {
            Err(BackupError::Copy { source_path, .. }) => assert_eq!(source_path, missing),
            other => panic!("expected Copy error, got {other:?}"),
        }

        let backup_dir = dest.path().join(backup_dir_name(&now));
        assert!(backup_path_for(&backup_dir, &first).exists());
        assert!(!backup_path_for(&backup_dir, &last).exists());
        Ok(())
    }

    #[test]
    fn test_empty_file_list_creates_directory() -> Result<()> {
        let dest = TempDir::new()?;
        let report = completed(execute(&[], &dest.path().join("root"), &at(2025, 2, 3, 4, 5, 6))?);

        assert!(report.backup_dir.is_dir());
        assert_eq!(report.files_copied, 0);
        Ok(())
    }
}
