//! Error taxonomy for merge operations.

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::assignment::NameError;

/// Result type for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;

/// Filesystem step that failed during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoOp {
    Stat,
    Open,
    Lock,
    Read,
    CreateTemp,
    Write,
    Chmod,
    Sync,
    Rename,
}

impl IoOp {
    /// Name of the operation as shown to the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stat => "stat",
            Self::Open => "open",
            Self::Lock => "flock",
            Self::Read => "read",
            Self::CreateTemp => "mkstemp",
            Self::Write => "write",
            Self::Chmod => "chmod",
            Self::Sync => "fsync",
            Self::Rename => "rename",
        }
    }
}

impl fmt::Display for IoOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from building an assignment set or committing a merge.
///
/// Every variant is fatal to the invocation.
#[derive(Debug, Error)]
pub enum MergeError {
    #[error("missing '=' in assignment '{0}'")]
    MissingSeparator(String),

    #[error("invalid sysctl name '{name}': {reason}")]
    InvalidName { name: String, reason: NameError },

    #[error("no value defined for '{0}'")]
    EmptyValue(String),

    #[error("{op}({}): {source}", path.display())]
    Io {
        op: IoOp,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl MergeError {
    /// Wrap an I/O error with the step and path it came from.
    pub fn io(op: IoOp, path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            op,
            path: path.into(),
            source,
        }
    }

    /// The failing filesystem step, if this is an I/O error.
    pub fn io_op(&self) -> Option<IoOp> {
        match self {
            Self::Io { op, .. } => Some(*op),
            _ => None,
        }
    }
}
