//! End-to-end tests for the snapfeat binary
//!
//! These tests validate:
//! - stdout carries only the failed paths
//! - the output table is written under the root by default
//! - output format and summary flags
//! - error exit codes

mod common;

use assert_cmd::Command;
use common::DnaFile;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn snapfeat(root: &Path) -> Command {
    let mut cmd = Command::cargo_bin("snapfeat").unwrap();
    cmd.env_remove("SNAPFEAT_OUTPUT")
        .env_remove("SNAPFEAT_FORMAT")
        .env_remove("SNAPFEAT_EXCLUDE")
        .env_remove("LOG_OUTPUT")
        .env_remove("LOG_FILTER")
        .env_remove("RUST_LOG")
        .env("LOG_LEVEL", "warn")
        .arg("--root")
        .arg(root);
    cmd
}

// ============================================================================
// Default Run
// ============================================================================

#[test]
fn test_reports_failed_files_on_stdout() {
    let dir = TempDir::new().unwrap();
    DnaFile::circular("ATGCATGCAA")
        .feature("promoter1", "1-8")
        .write_to(dir.path().join("a.dna"));
    fs::write(dir.path().join("b.dna"), b"not snapgene").unwrap();

    snapfeat(dir.path())
        .assert()
        .success()
        .stdout("b.dna\n");

    assert_eq!(
        fs::read_to_string(dir.path().join("features.tsv")).unwrap(),
        "promoter1\tATGCATGC\n"
    );
}

#[test]
fn test_empty_root_succeeds_silently() {
    let dir = TempDir::new().unwrap();

    snapfeat(dir.path()).assert().success().stdout("");

    assert_eq!(fs::read(dir.path().join("features.tsv")).unwrap(), b"");
}

#[test]
fn test_missing_root_fails() {
    let dir = TempDir::new().unwrap();

    snapfeat(&dir.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope"));
}

// ============================================================================
// Flags
// ============================================================================

#[test]
fn test_json_format() {
    let dir = TempDir::new().unwrap();
    DnaFile::circular("ATGCATGC")
        .feature("promoter1", "1-8")
        .write_to(dir.path().join("a.dna"));

    snapfeat(dir.path())
        .args(["--format", "json"])
        .assert()
        .success();

    let parsed: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("features.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(parsed["promoter1"], "ATGCATGC");
}

#[test]
fn test_invalid_format_rejected() {
    let dir = TempDir::new().unwrap();

    snapfeat(dir.path())
        .args(["--format", "xml"])
        .assert()
        .failure();
}

#[test]
fn test_explicit_output_and_summary() {
    let dir = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    DnaFile::circular("GGGGCCCC")
        .feature("gc", "3-6")
        .write_to(dir.path().join("gc.dna"));
    let output = out.path().join("db.tsv");
    let summary = out.path().join("summary.json");

    snapfeat(dir.path())
        .arg("--output")
        .arg(&output)
        .arg("--summary")
        .arg(&summary)
        .assert()
        .success()
        .stdout("");

    assert_eq!(fs::read_to_string(&output).unwrap(), "gc\tGGCC\n");
    assert!(!dir.path().join("features.tsv").exists());

    let parsed: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&summary).unwrap()).unwrap();
    assert_eq!(parsed["files_scanned"], 1);
    assert_eq!(parsed["features_written"], 1);
}

#[test]
fn test_exclude_flag() {
    let dir = TempDir::new().unwrap();
    DnaFile::circular("AAAA")
        .feature("skipped", "1-4")
        .write_to(dir.path().join("archive/old.dna"));
    fs::write(dir.path().join("archive/broken.dna"), b"junk").unwrap();
    DnaFile::circular("TTTT")
        .feature("kept", "1-4")
        .write_to(dir.path().join("new.dna"));

    snapfeat(dir.path())
        .args(["-x", "archive"])
        .assert()
        .success()
        .stdout("");

    assert_eq!(
        fs::read_to_string(dir.path().join("features.tsv")).unwrap(),
        "kept\tTTTT\n"
    );
}

#[test]
fn test_verbose_flag_beats_log_level_env() {
    let dir = TempDir::new().unwrap();

    snapfeat(dir.path())
        .env("LOG_LEVEL", "error")
        .arg("--verbose")
        .assert()
        .success()
        .stdout("")
        .stderr(predicate::str::contains("Resolved configuration"));

    snapfeat(dir.path())
        .env("LOG_LEVEL", "error")
        .assert()
        .success()
        .stderr(predicate::str::contains("Resolved configuration").not());
}

#[cfg(unix)]
#[test]
fn test_symlinked_input_decoded() {
    let dir = TempDir::new().unwrap();
    let store = TempDir::new().unwrap();
    DnaFile::circular("ATGCATGCAA")
        .feature("linked", "1-8")
        .write_to(store.path().join("target.dna"));
    std::os::unix::fs::symlink(store.path().join("target.dna"), dir.path().join("link.dna"))
        .unwrap();

    snapfeat(dir.path()).assert().success().stdout("");

    assert_eq!(
        fs::read_to_string(dir.path().join("features.tsv")).unwrap(),
        "linked\tATGCATGC\n"
    );
}

#[test]
fn test_help() {
    Command::cargo_bin("snapfeat")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--root"));
}
