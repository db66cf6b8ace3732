//! Merging an assignment set into a file on disk.

use tracing::info;

use crate::assignment::AssignmentSet;
use crate::commit::{commit_with, preview_with};
use crate::config::MergeConfig;
use crate::error::Result;
use crate::report::MergeReport;
use crate::rewrite::rewrite;

/// Result of [`merge`]: the report, plus the merged content for dry runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub report: MergeReport,
    pub preview: Option<Vec<u8>>,
}

/// Merge `set` into the file named by `config`.
///
/// The whole read-modify-write runs under an exclusive lock on the target.
/// With `dry_run` set, the merged content is returned and the target is
/// left as it was.
pub fn merge(config: &MergeConfig, set: &mut AssignmentSet) -> Result<MergeOutcome> {
    let target = config.target.as_path();

    if config.dry_run {
        let (content, report) = preview_with(target, |reader, writer| {
            rewrite(reader, set, writer, target)
        })?;
        return Ok(MergeOutcome {
            report,
            preview: Some(content),
        });
    }

    let mut report = commit_with(target, |reader, writer| rewrite(reader, set, writer, target))?;
    report.committed = true;
    info!("{}", report);

    Ok(MergeOutcome {
        report,
        preview: None,
    })
}

/// Build a set from `name=value` tokens and merge it in one step.
pub fn merge_tokens<I, S>(config: &MergeConfig, tokens: I) -> Result<MergeOutcome>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let probe = config.namespace_probe();
    let mut set = AssignmentSet::from_tokens(tokens, probe.as_ref())?;
    merge(config, &mut set)
}
