//! File system helpers: path normalization and file enumeration.

pub mod path;
pub mod walker;
