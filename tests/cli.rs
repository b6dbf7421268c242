//! End-to-end tests of the gridkeeper binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn gridkeeper() -> Command {
    let mut cmd = Command::cargo_bin("gridkeeper").unwrap();
    cmd.env_remove("GRIDKEEPER_BASE_URL")
        .env_remove("GRIDKEEPER_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    gridkeeper()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("entities"))
        .stdout(predicate::str::contains("related"));
}

#[test]
fn test_entities_runs_offline() {
    let dir = tempfile::tempdir().unwrap();
    gridkeeper()
        .current_dir(dir.path())
        .arg("entities")
        .assert()
        .success()
        .stdout(predicate::str::contains("divisions"))
        .stdout(predicate::str::contains("user-modules"));
}

#[test]
fn test_unknown_entity_fails() {
    let dir = tempfile::tempdir().unwrap();
    gridkeeper()
        .current_dir(dir.path())
        .args(["list", "spaceships"])
        .assert()
        .failure();
}

#[test]
fn test_unreachable_backend_reports_network_error() {
    let dir = tempfile::tempdir().unwrap();
    gridkeeper()
        .current_dir(dir.path())
        .args(["list", "divisions", "--base-url", "http://127.0.0.1:9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Network error - please try again."));
}

#[test]
fn test_invalid_config_file_is_reported() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server\nbase_url =").unwrap();
    gridkeeper()
        .arg("--config")
        .arg(file.path())
        .arg("entities")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}
