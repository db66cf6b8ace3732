//! Merge-rewrite engine.
//!
//! Streams a source file through a [`LineScanner`], replacing lines whose
//! candidate key names a pending assignment and copying every other line
//! byte-for-byte, terminator included. Assignments that never matched are
//! appended at the end, each on its own newline-terminated line.

use std::io::{self, BufRead, Write};
use std::path::Path;

use confmerge_scan::{candidate_key, LineScanner};
use tracing::debug;

use crate::assignment::AssignmentSet;
use crate::error::{IoOp, MergeError, Result};
use crate::report::{MergeReport, UpdatedEntry};

/// How a source line relates to the assignment set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Replace the line with the assignment at this index.
    Match(usize),
    /// Copy the line through unchanged.
    NoMatch,
}

/// Classify one source line (without terminator) against `set`.
pub fn classify(line: &[u8], set: &AssignmentSet) -> Classification {
    match set.find(candidate_key(line)) {
        Some(i) => Classification::Match(i),
        None => Classification::NoMatch,
    }
}

/// Rewrite `source` into `out`, merging in `set`.
///
/// `path` names the source in errors and in the returned report. The report
/// is never marked committed; that is up to the caller.
pub fn rewrite<R, W>(
    source: R,
    set: &mut AssignmentSet,
    out: &mut W,
    path: &Path,
) -> Result<MergeReport>
where
    R: BufRead,
    W: Write + ?Sized,
{
    let mut scanner = LineScanner::new(source);
    let mut report = MergeReport {
        target: path.to_path_buf(),
        ..MergeReport::default()
    };
    let write_err = |e: io::Error| MergeError::io(IoOp::Write, path, e);

    let mut open_last_line = false;
    loop {
        let line = match scanner.next_line() {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => return Err(MergeError::io(IoOp::Read, path, e)),
        };

        let replacement = match classify(line.content, set) {
            Classification::Match(i) => set.apply(i),
            Classification::NoMatch => None,
        };
        match replacement {
            Some(entry) => {
                debug!(line = line.number, key = %entry.key, "replacing line");
                out.write_all(entry.render().as_bytes()).map_err(write_err)?;
                report.updated.push(UpdatedEntry {
                    key: entry.key.clone(),
                    line: line.number,
                });
            }
            None => out.write_all(line.content).map_err(write_err)?,
        }
        out.write_all(line.terminator()).map_err(write_err)?;
        open_last_line = !line.terminated;
    }
    report.lines_read = scanner.lines_read();

    // An appended assignment must not run on from an unterminated last line.
    if open_last_line && set.pending().next().is_some() {
        out.write_all(b"\n").map_err(write_err)?;
    }
    for entry in set.pending() {
        debug!(key = %entry.key, "appending");
        writeln!(out, "{}", entry.render()).map_err(write_err)?;
        report.appended.push(entry.key.clone());
    }

    Ok(report)
}

/// Rewrite an in-memory source, returning the new content.
pub fn rewrite_bytes(source: &[u8], set: &mut AssignmentSet) -> Result<(Vec<u8>, MergeReport)> {
    let mut out = Vec::with_capacity(source.len());
    let report = rewrite(source, set, &mut out, Path::new("<memory>"))?;
    Ok((out, report))
}
