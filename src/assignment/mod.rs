//! Assignments to merge into a configuration file.
//!
//! An [`AssignmentSet`] is built once per invocation from `name=value`
//! tokens and consumed by the merge engine, which flips each entry's
//! `applied` flag as it overwrites a line in place.

mod name;
mod probe;

pub use name::{validate, NameError};
pub use probe::{NamespaceProbe, NoProbe, Presence, SystemProbe};

use confmerge_scan::is_space;
use tracing::warn;

use crate::error::{MergeError, Result};

/// A pending `key=value` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub key: String,
    pub value: String,
    /// Set once this assignment has replaced a line of the source file.
    pub applied: bool,
}

impl Assignment {
    /// Split a `name=value` token on its first `=`.
    pub fn split_token(token: &str) -> Result<(&str, &str)> {
        token
            .split_once('=')
            .ok_or_else(|| MergeError::MissingSeparator(token.to_string()))
    }

    /// The line written for this assignment, without terminator.
    pub fn render(&self) -> String {
        format!("{}={}", self.key, self.value)
    }
}

/// Ordered collection of assignments.
///
/// Duplicate keys are kept as separate entries in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentSet {
    entries: Vec<Assignment>,
}

impl AssignmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append an assignment.
    ///
    /// Leading whitespace is trimmed from `value`; the rest is kept verbatim.
    pub fn add(&mut self, key: &str, value: &str) -> Result<()> {
        validate(key).map_err(|reason| MergeError::InvalidName {
            name: key.to_string(),
            reason,
        })?;

        let value = value.trim_start_matches(|c: char| c.is_ascii() && is_space(c as u8));
        if value.is_empty() {
            return Err(MergeError::EmptyValue(key.to_string()));
        }

        self.entries.push(Assignment {
            key: key.to_string(),
            value: value.to_string(),
            applied: false,
        });
        Ok(())
    }

    /// Like [`AssignmentSet::add`], but also asks `probe` whether the name
    /// exists and warns when it does not.
    pub fn add_checked(
        &mut self,
        key: &str,
        value: &str,
        probe: &dyn NamespaceProbe,
    ) -> Result<()> {
        self.add(key, value)?;
        if probe.lookup(key) == Presence::Unknown {
            warn!("Unknown sysctl name '{}'", key);
        }
        Ok(())
    }

    /// Parse and add a `name=value` token.
    pub fn add_token(&mut self, token: &str, probe: &dyn NamespaceProbe) -> Result<()> {
        let (key, value) = Assignment::split_token(token)?;
        self.add_checked(key, value, probe)
    }

    /// Build a set from CLI tokens, stopping at the first bad one.
    pub fn from_tokens<I, S>(tokens: I, probe: &dyn NamespaceProbe) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        for token in tokens {
            set.add_token(token.as_ref(), probe)?;
        }
        Ok(set)
    }

    /// Index of the entry a line with `candidate` as its key should take.
    ///
    /// The first not-yet-applied entry with that key wins, so repeated keys
    /// on the command line fill repeated lines in the file in order and only
    /// the surplus is appended. Taking the first entry unconditionally would
    /// append the later duplicates again on every run, so merging the same
    /// set twice would keep growing the file. Once every such entry is
    /// applied, further lines reuse the first one.
    pub fn find(&self, candidate: &[u8]) -> Option<usize> {
        let mut first = None;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.key.as_bytes() != candidate {
                continue;
            }
            if !entry.applied {
                return Some(i);
            }
            first.get_or_insert(i);
        }
        first
    }

    /// Mark entry `index` as written in place and return it.
    pub fn apply(&mut self, index: usize) -> Option<&Assignment> {
        let entry = self.entries.get_mut(index)?;
        entry.applied = true;
        Some(entry)
    }

    /// Entries that have not replaced any line, in insertion order.
    pub fn pending(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.iter().filter(|e| !e.applied)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
