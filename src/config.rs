//! Invocation settings.

use std::path::PathBuf;

use crate::assignment::{NamespaceProbe, NoProbe, SystemProbe};

/// File rewritten when no other target is given.
pub const DEFAULT_TARGET: &str = "/etc/sysctl.conf";

/// Settings for one merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeConfig {
    /// File to merge into.
    pub target: PathBuf,
    /// Warn about names the running system does not know.
    pub probe: bool,
    /// Compute the merged content but leave the target alone.
    pub dry_run: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            target: PathBuf::from(DEFAULT_TARGET),
            probe: true,
            dry_run: false,
        }
    }
}

impl MergeConfig {
    /// Default settings for a different target file.
    pub fn for_target(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// The namespace probe these settings call for.
    pub fn namespace_probe(&self) -> Box<dyn NamespaceProbe> {
        if self.probe {
            Box::new(SystemProbe)
        } else {
            Box::new(NoProbe)
        }
    }
}
