//! Integration tests for the CLI binary
//!
//! Tests CLI commands, flag combinations, and output formatting using assert_cmd

// TODO: Migrate to cargo_bin! macro when stable migration path is documented
// https://github.com/assert-rs/assert_cmd/issues/225
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

mod common;

use common::fixtures::{write_config, write_snapshot};

// ===== Basic CLI Tests =====

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::cargo_bin("sizewatch").unwrap();

    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("sizewatch"))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = Command::cargo_bin("sizewatch").unwrap();

    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("sizewatch"));
}

#[test]
fn test_cli_help_for_subcommands() {
    for subcmd in ["diff", "pr", "completions"] {
        let mut cmd = Command::cargo_bin("sizewatch").unwrap();

        cmd.arg(subcmd)
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Usage:"));
    }
}

#[test]
fn test_completions_bash_emits_script() {
    let mut cmd = Command::cargo_bin("sizewatch").unwrap();

    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("sizewatch"));
}

// ===== Diff Command =====

#[test]
fn test_diff_markdown_output_for_grown_bundle() {
    let dir = TempDir::new().unwrap();
    let base = write_snapshot(&dir, "base.json", &[("core", 15000, 4500)]).unwrap();
    let head = write_snapshot(&dir, "head.json", &[("core", 15400, 4600)]).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .args([
            "diff",
            "--base",
            &base.display().to_string(),
            "--head",
            &head.display().to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("+400 B (+2.67%) parsed"))
        .stdout(predicate::str::contains("+100 B (+2.22%) gzip"));
}

#[test]
fn test_diff_json_output_carries_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let base = write_snapshot(&dir, "base.json", &[("core", 15000, 4500)]).unwrap();
    let head = write_snapshot(&dir, "head.json", &[("core", 15400, 4600)]).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    let output = cmd
        .current_dir(dir.path())
        .args([
            "diff",
            "--base",
            &format!("file:{}", base.display()),
            "--head",
            &format!("file:{}", head.display()),
            "--output",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(parsed["totals"]["totalParsed"], 400);
    assert_eq!(parsed["fileCounts"]["changed"], 1);
    assert_eq!(parsed["entries"][0]["parsed"]["absoluteDiff"], 400);
}

#[test]
fn test_diff_new_bundle_reports_null_relative_diff() {
    let dir = TempDir::new().unwrap();
    let base = write_snapshot(&dir, "base.json", &[]).unwrap();
    let head = write_snapshot(&dir, "head.json", &[("x", 3500, 1200)]).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    let output = cmd
        .current_dir(dir.path())
        .args([
            "diff",
            "--base",
            &base.display().to_string(),
            "--head",
            &head.display().to_string(),
            "--output",
            "json",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let parsed: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert!(parsed["entries"][0]["parsed"]["relativeDiff"].is_null());
    assert_eq!(parsed["fileCounts"]["added"], 1);
    assert_eq!(parsed["totals"]["totalParsed"], 3500);
}

#[test]
fn test_diff_identical_snapshots_report_no_changes() {
    let dir = TempDir::new().unwrap();
    let base = write_snapshot(&dir, "base.json", &[("core", 1000, 400)]).unwrap();
    let head = write_snapshot(&dir, "head.json", &[("core", 1000, 400)]).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .args([
            "diff",
            "--base",
            &base.display().to_string(),
            "--head",
            &head.display().to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("No bundle size changes"));
}

#[test]
fn test_diff_respects_config_track_list() {
    let dir = TempDir::new().unwrap();
    let base = write_snapshot(
        &dir,
        "base.json",
        &[("core", 1000, 400), ("icons", 500, 200)],
    )
    .unwrap();
    let head = write_snapshot(
        &dir,
        "head.json",
        &[("core", 1200, 450), ("icons", 600, 230)],
    )
    .unwrap();
    write_config(&dir, r#"{"entries": [], "track": ["core"]}"#).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .args([
            "diff",
            "--base",
            &base.display().to_string(),
            "--head",
            &head.display().to_string(),
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("| `core` |"))
        .stdout(predicate::str::contains("<details>"));
}

// ===== Error Handling =====

#[test]
fn test_diff_missing_base_snapshot_fails() {
    let dir = TempDir::new().unwrap();
    let head = write_snapshot(&dir, "head.json", &[("core", 1000, 400)]).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .args([
            "diff",
            "--base",
            "missing.json",
            "--head",
            &head.display().to_string(),
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base snapshot"));
}

#[test]
fn test_diff_unknown_scheme_is_usage_error() {
    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.args(["diff", "--base", "ftp://x/s.json", "--head", "ftp://y/s.json"])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("Unsupported snapshot URI"));
}

#[test]
fn test_diff_unknown_output_format_fails() {
    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.args([
        "diff",
        "--base",
        "a.json",
        "--head",
        "b.json",
        "--output",
        "yaml",
    ])
    .assert()
    .failure();
}

#[test]
fn test_build_with_missing_config_exits_with_noinput() {
    let dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .assert()
        .failure()
        .code(66)
        .stderr(predicate::str::contains("Configuration file not found"))
        .stderr(predicate::str::contains("help:"));
}

#[test]
fn test_build_with_duplicate_entry_ids_exits_with_dataerr() {
    let dir = TempDir::new().unwrap();
    write_config(
        &dir,
        r#"{
            "entries": [
                {"id": "core", "import": "@acme/core"},
                {"id": "core", "import": "@acme/other"}
            ]
        }"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .assert()
        .failure()
        .code(65)
        .stderr(predicate::str::contains("Duplicate entry id"));
}

#[test]
fn test_build_entry_without_source_exits_with_dataerr() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"entries": [{"id": "core"}]}"#).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .assert()
        .failure()
        .code(65)
        .stderr(predicate::str::contains(
            "neither inline code nor an import specifier",
        ));
}

#[test]
fn test_pr_without_repo_config_exits_with_usage_error() {
    let dir = TempDir::new().unwrap();
    write_config(&dir, r#"{"entries": []}"#).unwrap();

    let mut cmd = Command::cargo_bin("sizewatch").unwrap();
    cmd.current_dir(dir.path())
        .args(["pr", "7"])
        .assert()
        .failure()
        .code(64)
        .stderr(predicate::str::contains("repo"));
}
