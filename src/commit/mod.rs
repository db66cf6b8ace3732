//! Atomic replacement of a target file.
//!
//! The commit protocol, in order:
//! 1. Stat the target and capture its permission bits
//! 2. Open it read/write and take an exclusive, blocking lock
//! 3. Create a uniquely named temp file in the target's directory
//! 4. Stream the new content (produced from the locked read) into it
//! 5. Copy the captured permission bits onto the temp file
//! 6. Flush and sync the temp file
//! 7. Rename the temp file over the target
//!
//! Until step 7 succeeds the target is untouched, and readers of the target
//! path only ever see the old or the new file. Any failure after step 3
//! removes the temp file. The lock is held until the rename has happened.

mod lock;

pub use lock::TargetLock;

use std::fs::{self, File, Permissions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile, PersistError};
use tracing::{debug, info, warn};

use crate::error::{IoOp, MergeError, Result};

/// State of the target captured before it is rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSnapshot {
    pub permissions: Permissions,
}

impl TargetSnapshot {
    /// Stat `path`. Fails if it does not exist or cannot be inspected.
    pub fn capture(path: &Path) -> Result<Self> {
        let metadata = fs::metadata(path).map_err(|e| MergeError::io(IoOp::Stat, path, e))?;
        Ok(Self {
            permissions: metadata.permissions(),
        })
    }

    /// Stat the file actually held by `lock`.
    ///
    /// This may differ from an earlier [`TargetSnapshot::capture`] when the
    /// target was replaced while the lock was being waited for.
    pub fn of_locked(lock: &TargetLock) -> Result<Self> {
        let metadata = lock
            .file()
            .metadata()
            .map_err(|e| MergeError::io(IoOp::Stat, lock.path(), e))?;
        Ok(Self {
            permissions: metadata.permissions(),
        })
    }
}

/// Rewrite `target` atomically.
///
/// `produce` reads the current content from the locked target and writes the
/// replacement. If it fails, or any later step does, the target keeps its
/// old content and mode.
pub fn commit_with<T, F>(target: &Path, produce: F) -> Result<T>
where
    F: FnOnce(&mut dyn BufRead, &mut dyn Write) -> Result<T>,
{
    TargetSnapshot::capture(target)?;
    let lock = TargetLock::acquire(target)?;
    debug!("Locked {}", target.display());
    let snapshot = TargetSnapshot::of_locked(&lock)?;

    let mut temp = create_temp(target)?;
    debug!("Writing {}", temp.path().display());

    let value = match fill_temp(&lock, &mut temp, &snapshot, produce) {
        Ok(value) => value,
        Err(e) => {
            discard(temp);
            return Err(e);
        }
    };

    if let Err(PersistError { error, file }) = temp.persist(target) {
        discard(file);
        return Err(MergeError::io(IoOp::Rename, target, error));
    }
    info!("Replaced {}", target.display());

    drop(lock);
    Ok(value)
}

/// Read `target` under the lock and run `produce` against it, keeping the
/// output in memory instead of replacing the file.
pub fn preview_with<T, F>(target: &Path, produce: F) -> Result<(Vec<u8>, T)>
where
    F: FnOnce(&mut dyn BufRead, &mut dyn Write) -> Result<T>,
{
    TargetSnapshot::capture(target)?;
    let lock = TargetLock::acquire(target)?;

    let mut reader = BufReader::new(lock.file());
    let mut out = Vec::new();
    let value = produce(&mut reader, &mut out)?;
    Ok((out, value))
}

fn create_temp(target: &Path) -> Result<NamedTempFile> {
    let dir = parent_dir(target);
    let prefix = match target.file_name() {
        Some(name) => format!(".{}.", name.to_string_lossy()),
        None => ".conf-merge.".to_string(),
    };
    Builder::new()
        .prefix(&prefix)
        .tempfile_in(&dir)
        .map_err(|e| MergeError::io(IoOp::CreateTemp, dir, e))
}

fn fill_temp<T, F>(
    lock: &TargetLock,
    temp: &mut NamedTempFile,
    snapshot: &TargetSnapshot,
    produce: F,
) -> Result<T>
where
    F: FnOnce(&mut dyn BufRead, &mut dyn Write) -> Result<T>,
{
    let temp_path = temp.path().to_path_buf();
    let mut reader = BufReader::new(lock.file());

    let value = {
        let mut writer = BufWriter::new(temp.as_file_mut());
        let value = produce(&mut reader, &mut writer)?;
        writer
            .flush()
            .map_err(|e| MergeError::io(IoOp::Write, &temp_path, e))?;
        value
    };

    let file: &File = temp.as_file();
    file.set_permissions(snapshot.permissions.clone())
        .map_err(|e| MergeError::io(IoOp::Chmod, &temp_path, e))?;
    file.sync_all()
        .map_err(|e| MergeError::io(IoOp::Sync, &temp_path, e))?;

    Ok(value)
}

/// Remove an abandoned temp file. Failure is logged, not escalated.
fn discard(temp: NamedTempFile) {
    let path = temp.path().to_path_buf();
    if let Err(e) = temp.close() {
        warn!("Could not remove temporary file {}: {}", path.display(), e);
    }
}

/// Directory a temp file for `target` must live in to be renamed onto it.
fn parent_dir(target: &Path) -> PathBuf {
    match target.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
