//! End-to-end tests for the commands that run without a store

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const STATE: &str = r#"{
    "pipelines": [
        {"id": "nightly-build", "name": "Nightly Build", "stages": ["fetch", "build", "ship"],
         "currentStage": "build", "completedStages": ["fetch"], "status": "running"},
        {"id": "weekly-report", "name": "Weekly Report", "stages": ["collect", "send"],
         "completedStages": ["collect", "send"], "status": "complete"},
        {"name": "Orphan", "status": "failed"}
    ],
    "kpis": {"signups": 12}
}"#;

fn statusboard() -> Command {
    let mut cmd = cargo_bin_cmd!("statusboard");
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_help() {
    statusboard()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("update"))
        .stdout(predicate::str::contains("watch"));
}

#[test]
fn test_project_inline_text() {
    statusboard()
        .args(["project", STATE])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 running, 1 complete, 1 failed"))
        .stdout(predicate::str::contains("Nightly Build [running]"))
        .stdout(predicate::str::contains("▶ build"));
}

#[test]
fn test_project_json_from_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    fs::write(&path, STATE).unwrap();

    let output = statusboard()
        .args(["project", "--json", &format!("@{}", path.display())])
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pipelines"][0]["completion_percent"], 33);
    assert_eq!(json["pipelines"][0]["stages"][1]["tag"], "current");
    assert_eq!(json["pipelines"][1]["completion_percent"], 100);
    assert_eq!(json["summary"]["failed"], 1);
}

#[test]
fn test_project_from_stdin_with_collapse() {
    let output = statusboard()
        .args(["project", "--json", "--collapse", "nightly-build"])
        .write_stdin(STATE)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["pipelines"][0]["expanded"], false);
}

#[test]
fn test_project_rejects_unknown_status() {
    statusboard()
        .args(["project", r#"{"pipelines": [{"id": "p", "status": "paused"}]}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse state document"));
}

#[test]
fn test_update_dry_run_prints_records() {
    let output = statusboard()
        .args(["update", "--dry-run", STATE])
        .output()
        .unwrap();
    assert!(output.status.success());

    let records: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["pipeline_id"], "weekly-report");
    assert_eq!(records[0]["status"], "complete");
    assert_eq!(records[0]["duration"], "unknown");
    assert!(records[0]["started_at"].is_null());
}

#[test]
fn test_schema_uses_table_flags() {
    statusboard()
        .args(["schema", "--history-table", "runs"])
        .assert()
        .success()
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS dashboard_state"))
        .stdout(predicate::str::contains("CREATE TABLE IF NOT EXISTS runs"))
        .stdout(predicate::str::contains("UNIQUE"));
}

#[test]
fn test_schema_rejects_bad_table_name() {
    statusboard()
        .args(["schema", "--state-table", "drop table"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a valid table name"));
}
