//! Backup manifest.
//!
//! A manifest records the path list a run was started from together with
//! every file it selected, so a backup can be audited after the fact.

use crate::fs::walker::{EnumerationResult, FileEntry};
use crate::pathlist::PathSpec;
use crate::utils::errors::{BackupError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Path list merged with the files it resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupManifest {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub files: Vec<FileEntry>,
    pub total_size: u64,
}

impl BackupManifest {
    pub fn new(spec: &PathSpec, list: &EnumerationResult) -> Self {
        Self {
            include: spec.include.clone(),
            exclude: spec.exclude.clone(),
            files: list.files.clone(),
            total_size: list.total_size,
        }
    }
}

/// Destination for a run's manifest.
pub trait ManifestWriter {
    fn write(&self, manifest: &BackupManifest) -> Result<()>;
}

/// Writes the manifest as indented JSON to a file.
#[derive(Debug, Clone)]
pub struct JsonManifestWriter {
    path: PathBuf,
}

impl JsonManifestWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManifestWriter for JsonManifestWriter {
    fn write(&self, manifest: &BackupManifest) -> Result<()> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        manifest.serialize(&mut ser)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| BackupError::FileSystem {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        std::fs::write(&self.path, buf).map_err(|source| BackupError::FileSystem {
            path: self.path.clone(),
            source,
        })?;

        tracing::info!(
            "Wrote manifest to {} ({} files)",
            self.path.display(),
            manifest.files.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn manifest() -> BackupManifest {
        let spec = PathSpec {
            include: vec!["/data".to_string()],
            exclude: vec!["/data/tmp".to_string()],
        };
        let list = EnumerationResult {
            files: vec![FileEntry {
                path: PathBuf::from("/data/a.txt"),
                size: 10,
            }],
            total_size: 10,
        };
        BackupManifest::new(&spec, &list)
    }

    #[test]
    fn test_manifest_merges_spec_and_list() {
        let manifest = manifest();
        assert_eq!(manifest.include, vec!["/data"]);
        assert_eq!(manifest.exclude, vec!["/data/tmp"]);
        assert_eq!(manifest.files.len(), 1);
        assert_eq!(manifest.total_size, 10);
    }

    #[test]
    fn test_json_writer_creates_parent_dirs() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().join("reports/nested/backupped.json");

        let writer = JsonManifestWriter::new(&path);
        writer.write(&manifest())?;

        let content = std::fs::read_to_string(&path)?;
        assert!(content.contains("\n    \"include\": ["));

        let parsed: serde_json::Value = serde_json::from_str(&content)?;
        assert_eq!(parsed["total_size"], 10);
        assert_eq!(parsed["files"][0]["path"], "/data/a.txt");
        assert_eq!(parsed["files"][0]["size"], 10);
        Ok(())
    }
}
