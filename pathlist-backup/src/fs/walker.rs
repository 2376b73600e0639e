//! File enumeration for a parsed path list.
//!
//! Each include path is walked depth-first in directory-listing order.
//! Exclusion is a literal string-prefix test on the entry's path and prunes
//! whole subtrees: an excluded directory is never read.

use crate::pathlist::PathSpec;
use crate::utils::errors::{BackupError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// A regular file selected for backup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
}

/// Files selected by a path list and their combined size.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumerationResult {
    pub files: Vec<FileEntry>,
    pub total_size: u64,
}

impl EnumerationResult {
    fn push(&mut self, entry: FileEntry) {
        self.total_size += entry.size;
        self.files.push(entry);
    }
}

/// Check whether `path` starts with any exclude prefix.
///
/// This is not segment-aware: `/data/tm` also excludes `/data/tmp`.
pub fn is_excluded(path: &str, exclude: &[String]) -> bool {
    exclude.iter().any(|prefix| path.starts_with(prefix.as_str()))
}

/// Walk every include path of `spec` and collect its regular files.
///
/// The first unreadable entry, symbolic link or special file aborts the
/// walk. A file reached through more than one include path is recorded once.
pub fn enumerate(spec: &PathSpec) -> Result<EnumerationResult> {
    for exclude in &spec.exclude {
        tracing::debug!("Excluding {}", exclude);
    }

    let mut result = EnumerationResult::default();
    let mut seen = HashSet::new();

    for include in &spec.include {
        if is_excluded(include, &spec.exclude) {
            tracing::debug!("Include path {} is excluded", include);
            continue;
        }

        let before = result.files.len();
        walk_include(Path::new(include), &spec.exclude, &mut seen, &mut result)?;

        tracing::info!(
            "Scanned path: {} ({} files, {} bytes so far)",
            include,
            result.files.len() - before,
            result.total_size
        );
    }

    Ok(result)
}

fn walk_include(
    root: &Path,
    exclude: &[String],
    seen: &mut HashSet<PathBuf>,
    result: &mut EnumerationResult,
) -> Result<()> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| !is_excluded(&entry.path().to_string_lossy(), exclude));

    for entry in walker {
        let entry = entry.map_err(|e| walk_error(e, root))?;
        let file_type = entry.file_type();

        if file_type.is_dir() {
            continue;
        }
        if file_type.is_symlink() {
            return Err(unsupported(&entry, "symbolic link"));
        }
        if !file_type.is_file() {
            return Err(unsupported(&entry, "special file"));
        }

        let size = entry.metadata().map_err(|e| walk_error(e, root))?.len();
        let path = entry.into_path();

        if !seen.insert(path.clone()) {
            tracing::debug!("Skipping duplicate {}", path.display());
            continue;
        }

        result.push(FileEntry { path, size });
    }

    Ok(())
}

fn walk_error(err: walkdir::Error, root: &Path) -> BackupError {
    let path = err.path().unwrap_or(root).to_path_buf();
    BackupError::FileSystem {
        path,
        source: err.into(),
    }
}

fn unsupported(entry: &DirEntry, kind: &'static str) -> BackupError {
    BackupError::UnsupportedEntry {
        path: entry.path().to_path_buf(),
        kind,
    }
}
