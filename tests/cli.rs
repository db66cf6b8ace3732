//! Tests for the `conf-merge` binary.

mod fixtures;

use std::fs;
use std::process::{Command, Output};

use fixtures::write_target;
use tempfile::TempDir;

fn conf_merge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_conf-merge"))
        .args(args)
        .output()
        .expect("failed to run conf-merge")
}

fn assert_usage(output: &Output) {
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<_> = stderr.lines().collect();
    assert_eq!(lines.len(), 2, "unexpected usage text: {}", stderr);
    assert!(lines[0].starts_with("Usage: conf-merge -h"));
}

#[test]
fn test_no_arguments_prints_usage() {
    assert_usage(&conf_merge(&[]));
}

#[test]
fn test_help_flag_prints_usage_and_fails() {
    assert_usage(&conf_merge(&["-h"]));
}

#[test]
fn test_unknown_flag_prints_usage() {
    assert_usage(&conf_merge(&["-x", "a.b=1"]));
}

#[test]
fn test_token_without_separator_prints_usage() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"a.b=1\n");
    let output = conf_merge(&["-n", "-f", target.to_str().unwrap(), "a.b=2", "c.d"]);

    assert_usage(&output);
    assert_eq!(fs::read(&target).unwrap(), b"a.b=1\n");
}

#[test]
fn test_merge_into_file() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"net.max=10\n# comment\n");
    let output = conf_merge(&["-n", "-f", target.to_str().unwrap(), "net.max=20", "net.buf=5"]);

    assert!(output.status.success(), "{:?}", output);
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read(&target).unwrap(), b"net.max=20\n# comment\nnet.buf=5\n");
}

#[test]
fn test_value_may_start_with_dash() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"");
    let output = conf_merge(&["-n", "-f", target.to_str().unwrap(), "a.b=-1"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(fs::read(&target).unwrap(), b"a.b=-1\n");
}

#[test]
fn test_invalid_name_is_fatal() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"");
    let output = conf_merge(&["-n", "-f", target.to_str().unwrap(), "nodot=1"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid sysctl name 'nodot'"), "{}", stderr);
    assert_eq!(fs::read(&target).unwrap(), b"");
}

#[test]
fn test_empty_value_is_fatal() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"");
    let output = conf_merge(&["-n", "-f", target.to_str().unwrap(), "a.b= "]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no value defined for 'a.b'"));
}

#[test]
fn test_missing_target_is_fatal() {
    let dir = TempDir::new().unwrap();
    let target = dir.path().join("absent.conf");
    let output = conf_merge(&["-n", "-f", target.to_str().unwrap(), "a.b=1"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("stat("));
    assert!(!target.exists());
}

#[test]
fn test_dry_run_prints_merged_content() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"a.b=1\n");
    let output = conf_merge(&["-n", "--dry-run", "-f", target.to_str().unwrap(), "a.b=2", "c.d=3"]);

    assert!(output.status.success(), "{:?}", output);
    assert_eq!(output.stdout, b"a.b=2\nc.d=3\n");
    assert_eq!(fs::read(&target).unwrap(), b"a.b=1\n");
}

#[test]
fn test_json_report() {
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"a.b=1\n");
    let output = conf_merge(&["-n", "--json", "-f", target.to_str().unwrap(), "a.b=2", "c.d=3"]);

    assert!(output.status.success(), "{:?}", output);
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["committed"], true);
    assert_eq!(report["updated"][0]["key"], "a.b");
    assert_eq!(report["updated"][0]["line"], 1);
    assert_eq!(report["appended"][0], "c.d");
}

#[test]
#[cfg(target_os = "linux")]
fn test_unknown_name_warns_but_succeeds() {
    if !std::path::Path::new("/proc/sys/kernel").is_dir() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let target = write_target(&dir, b"");
    let output = conf_merge(&["-f", target.to_str().unwrap(), "kernel.no_such_parameter_here=1"]);

    assert!(output.status.success(), "{:?}", output);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown sysctl name 'kernel.no_such_parameter_here'"), "{}", stderr);
    assert_eq!(fs::read(&target).unwrap(), b"kernel.no_such_parameter_here=1\n");
}
