//! Path-list backup library
//!
//! Selects files with a declarative path list, measures them, and copies
//! them into a timestamped backup directory.

pub mod config;
pub mod confirm;
pub mod executor;
pub mod fs;
pub mod pathlist;
pub mod runner;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use executor::{BackupExecutor, BackupOutcome, BackupReport};
pub use fs::walker::{enumerate, EnumerationResult, FileEntry};
pub use pathlist::{parse, PathSpec};
pub use runner::{RunOutcome, Runner};
pub use utils::errors::BackupError;
pub type Result<T> = std::result::Result<T, BackupError>;
