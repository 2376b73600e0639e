//! Utility modules for the path-list backup.

pub mod errors;
pub mod logger;

pub use errors::{BackupError, Result};
