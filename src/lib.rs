//! conf-merge - merge `key=value` settings into a configuration file
//!
//! Matching keys are rewritten in place, unmatched ones are appended, and
//! every other line (comments, blank lines, unrelated settings) is kept
//! byte-for-byte. The file is replaced atomically under an exclusive lock.

pub mod assignment;
pub mod commit;
pub mod config;
pub mod error;
pub mod merge;
pub mod report;
pub mod rewrite;

pub use assignment::{Assignment, AssignmentSet, NamespaceProbe, NoProbe, Presence, SystemProbe};
pub use config::{MergeConfig, DEFAULT_TARGET};
pub use error::{IoOp, MergeError, Result};
pub use merge::{merge, merge_tokens, MergeOutcome};
pub use report::{MergeReport, UpdatedEntry};
pub use rewrite::{classify, rewrite, rewrite_bytes, Classification};
