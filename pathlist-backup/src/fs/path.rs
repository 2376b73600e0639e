//! Path string normalization.
//!
//! Paths in a path list are kept as strings rather than `PathBuf`s until they
//! reach the file system, because exclusion is a literal string-prefix test.
//! Both `/` and `\` are accepted as separators on input and rewritten to the
//! platform's main separator.

use std::path::MAIN_SEPARATOR;

/// Separator every normalized path uses.
pub const SEPARATOR: char = MAIN_SEPARATOR;

/// Returns true for either separator convention.
fn is_separator(c: char) -> bool {
    c == '/' || c == '\\'
}

/// Normalize a path string.
///
/// Canonicalizes separators, collapses repeated separators, drops `.`
/// segments and resolves `..` against the preceding segment. A trailing
/// separator is preserved, so `EXCLUDE tmp/` only matches entries below `tmp`.
/// An empty input normalizes to `.`.
pub fn normalize(raw: &str) -> String {
    if raw.is_empty() {
        return ".".to_string();
    }

    let absolute = raw.starts_with(is_separator);
    let trailing = raw.ends_with(is_separator);

    let mut segments: Vec<&str> = Vec::new();
    for segment in raw.split(is_separator) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last != ".." && !is_drive(last) => {
                    segments.pop();
                }
                Some(last) if is_drive(last) => {}
                None if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let mut normalized = String::with_capacity(raw.len());
    if absolute {
        normalized.push(SEPARATOR);
    }
    normalized.push_str(&segments.join(&SEPARATOR.to_string()));

    if normalized.is_empty() {
        normalized.push('.');
    }
    if trailing && !normalized.ends_with(SEPARATOR) {
        normalized.push(SEPARATOR);
    }

    normalized
}

/// A leading `C:` style volume segment, which `..` cannot climb above.
fn is_drive(segment: &str) -> bool {
    segment.len() == 2 && segment.ends_with(':') && segment.as_bytes()[0].is_ascii_alphabetic()
}
