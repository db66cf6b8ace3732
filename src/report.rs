//! Outcome of a merge.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;

/// A line of the source file that was overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UpdatedEntry {
    pub key: String,
    /// 1-based line number in the source file.
    pub line: usize,
}

/// What a merge did to its target.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    pub target: PathBuf,
    pub lines_read: usize,
    pub updated: Vec<UpdatedEntry>,
    pub appended: Vec<String>,
    /// False for dry runs and for merges into an in-memory sink.
    pub committed: bool,
}

impl MergeReport {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for MergeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} updated, {} appended",
            self.target.display(),
            self.updated.len(),
            self.appended.len()
        )?;
        if !self.committed {
            write!(f, " (not committed)")?;
        }
        Ok(())
    }
}
