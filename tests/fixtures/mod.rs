//! Shared helpers for merge integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use conf_merge::{MergeConfig, MergeOutcome};
use tempfile::TempDir;

/// Create `sysctl.conf` in `dir` with `content`.
pub fn write_target(dir: &TempDir, content: &[u8]) -> PathBuf {
    let path = dir.path().join("sysctl.conf");
    fs::write(&path, content).unwrap();
    path
}

/// Config for `target` with namespace lookups off.
pub fn config_for(target: &Path) -> MergeConfig {
    MergeConfig {
        probe: false,
        ..MergeConfig::for_target(target)
    }
}

/// Merge `tokens` into `target` and return the outcome.
pub fn merge_into(target: &Path, tokens: &[&str]) -> MergeOutcome {
    conf_merge::merge_tokens(&config_for(target), tokens).unwrap()
}

/// Merge `tokens` into a fresh file holding `source`; return the new content.
pub fn merged(source: &[u8], tokens: &[&str]) -> Vec<u8> {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, source);
    merge_into(&target, tokens);
    fs::read(&target).unwrap()
}

/// Names of all entries in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
