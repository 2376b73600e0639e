//! Settings for a backup run.
//!
//! Loaded from a JSON or TOML file (chosen by extension) with environment
//! variable overrides prefixed `PATHLIST_BACKUP_`, e.g.
//! `PATHLIST_BACKUP_WARNING_SIZE=1000`.

use crate::utils::errors::{BackupError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_PREFIX: &str = "PATHLIST_BACKUP";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Where to write the manifest of selected files (not written if unset)
    #[serde(default)]
    pub backupped_files: Option<PathBuf>,

    /// Total size in bytes at or above which the user is asked to confirm
    #[serde(default = "default_warning_size")]
    pub warning_size: u64,

    /// Directory that receives the timestamped backup directories
    pub backups_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_warning_size() -> u64 {
    10 * 1024 * 1024 * 1024 // 10 GiB
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Settings {
    /// Load settings from `path` with environment overrides.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::load(path, None)
    }

    /// Settings with only the required backup directory set.
    pub fn new(backups_dir: impl Into<PathBuf>) -> Self {
        Self {
            backupped_files: None,
            warning_size: default_warning_size(),
            backups_dir: backups_dir.into(),
            log_level: default_log_level(),
        }
    }

    /// `env` replaces the process environment when given.
    fn load(path: &Path, env: Option<config::Map<String, String>>) -> Result<Self> {
        if !path.is_file() {
            return Err(BackupError::Config(format!(
                "settings file not found: {}",
                path.display()
            )));
        }

        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(env),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        Ok(settings)
    }
}
