//! Path list parsing.
//!
//! A path list is a line-oriented text document:
//!
//! ```text
//! DEFINE <ROOT> /srv/projects
//! INCLUDE <ROOT>/website
//! EXCLUDE <ROOT>/website/node_modules
//! ```
//!
//! Every macro defined so far is substituted into a line, in definition
//! order, before the line is interpreted. Lines that are not directives are
//! ignored.

use crate::fs::path::normalize;
use crate::utils::errors::{BackupError, Result};
use serde::{Deserialize, Serialize};

const DEFINE: &str = "DEFINE ";
const INCLUDE: &str = "INCLUDE ";
const EXCLUDE: &str = "EXCLUDE ";

/// A named text substitution, e.g. `<ROOT>` -> `/srv/projects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Macro {
    /// Name including its angle brackets
    pub name: String,

    /// Text substituted for every occurrence of `name`
    pub replacement: String,
}

impl Macro {
    /// Parse the text following `DEFINE `.
    ///
    /// The name runs from a leading `<` up to the last `> ` that still leaves
    /// a non-empty replacement, so `<A> x <B> y` defines `<A> x <B>` as `y`.
    fn parse(rest: &str) -> Option<Self> {
        if !rest.starts_with('<') {
            return None;
        }

        let (end, _) = rest
            .match_indices("> ")
            .filter(|(idx, _)| *idx >= 2 && rest.len() > idx + 2)
            .last()?;

        Some(Self {
            name: rest[..=end].to_string(),
            replacement: rest[end + 2..].to_string(),
        })
    }
}

/// Parsed include and exclude paths, in the order they were written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathSpec {
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

/// Apply `active` macros to `line`, in order, replacing every occurrence.
pub fn expand(line: &str, active: &[Macro]) -> String {
    active
        .iter()
        .fold(line.to_string(), |acc, m| acc.replace(&m.name, &m.replacement))
}

/// Parse a path list document into a [`PathSpec`].
///
/// Fails with [`BackupError::MalformedDirective`] on a `DEFINE` line that
/// does not have the form `DEFINE <NAME> replacement`.
pub fn parse(text: &str) -> Result<PathSpec> {
    let mut spec = PathSpec::default();
    let mut macros: Vec<Macro> = Vec::new();

    for (idx, raw) in text.split('\n').enumerate() {
        let line = expand(raw.trim_end(), &macros);

        if let Some(rest) = line.strip_prefix(DEFINE) {
            let define = Macro::parse(rest).ok_or_else(|| BackupError::MalformedDirective {
                line: idx + 1,
                text: line.clone(),
            })?;
            tracing::debug!("Defined {} as {:?}", define.name, define.replacement);
            macros.push(define);
        } else if let Some(rest) = line.strip_prefix(INCLUDE) {
            spec.include.push(normalize(rest));
        } else if let Some(rest) = line.strip_prefix(EXCLUDE) {
            spec.exclude.push(normalize(rest));
        }
    }

    Ok(spec)
}
