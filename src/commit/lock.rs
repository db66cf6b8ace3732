//! Exclusive advisory lock on the target file.
//!
//! Concurrent invocations against the same file are serialized: the lock is
//! taken on the target itself (not a sidecar file), blocks without timeout,
//! and is released when the guard is dropped.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::error::{IoOp, MergeError, Result};

/// Open, exclusively locked handle on a target file.
pub struct TargetLock {
    path: PathBuf,
    file: File,
}

impl TargetLock {
    /// Open `path` for reading and writing and take an exclusive lock on it.
    ///
    /// Blocks until any other holder releases the lock. Contention is logged
    /// once before waiting. If the file was replaced by another writer while
    /// we waited, the lock is retaken on the replacement.
    pub fn acquire(path: &Path) -> Result<Self> {
        loop {
            let file = OpenOptions::new()
                .read(true)
                .write(true)
                .open(path)
                .map_err(|e| MergeError::io(IoOp::Open, path, e))?;

            match try_lock_exclusive(&file) {
                Ok(()) => {}
                Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                    warn!("Lock contention on {}, waiting...", path.display());
                    let start = Instant::now();
                    lock_exclusive(&file).map_err(|e| MergeError::io(IoOp::Lock, path, e))?;
                    info!(
                        "Lock acquired after {:.1}s contention: {}",
                        start.elapsed().as_secs_f64(),
                        path.display()
                    );
                }
                Err(e) => return Err(MergeError::io(IoOp::Lock, path, e)),
            }

            if is_current(path, &file).map_err(|e| MergeError::io(IoOp::Stat, path, e))? {
                return Ok(Self {
                    path: path.to_path_buf(),
                    file,
                });
            }
            debug!("{} was replaced while waiting for the lock, retrying", path.display());
        }
    }

    /// The locked file, positioned wherever the last read left it.
    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TargetLock {
    fn drop(&mut self) {
        // Closing the descriptor would release it too.
        unlock(&self.file);
    }
}

#[cfg(unix)]
fn flock(file: &File, operation: libc::c_int) -> io::Result<()> {
    use std::os::unix::io::AsRawFd;

    let fd = file.as_raw_fd();
    loop {
        let result = unsafe { libc::flock(fd, operation) };
        if result == 0 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EINTR) => continue,
            Some(libc::EWOULDBLOCK) => {
                return Err(io::Error::new(io::ErrorKind::WouldBlock, "lock held"))
            }
            _ => return Err(err),
        }
    }
}

/// Whether `file` is still the file found at `path`.
#[cfg(unix)]
fn is_current(path: &Path, file: &File) -> io::Result<bool> {
    use std::os::unix::fs::MetadataExt;

    let held = file.metadata()?;
    match fs::metadata(path) {
        Ok(current) => Ok(held.dev() == current.dev() && held.ino() == current.ino()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

#[cfg(unix)]
fn try_lock_exclusive(file: &File) -> io::Result<()> {
    flock(file, libc::LOCK_EX | libc::LOCK_NB)
}

#[cfg(unix)]
fn lock_exclusive(file: &File) -> io::Result<()> {
    flock(file, libc::LOCK_EX)
}

#[cfg(unix)]
fn unlock(file: &File) {
    let _ = flock(file, libc::LOCK_UN);
}

// No advisory locking off unix; invocations are not serialized there.
#[cfg(not(unix))]
fn is_current(_path: &Path, _file: &File) -> io::Result<bool> {
    Ok(true)
}

#[cfg(not(unix))]
fn try_lock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn lock_exclusive(_file: &File) -> io::Result<()> {
    Ok(())
}

#[cfg(not(unix))]
fn unlock(_file: &File) {}
