//! End-to-end tests driving the `timetrack` binary.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn timetrack(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("timetrack").unwrap();
    cmd.env("TIMETRACK_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "command failed: {output:?}");
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    timetrack(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("start"))
        .stdout(predicate::str::contains("report"));
}

#[test]
fn test_timer_lifecycle() {
    let home = TempDir::new().unwrap();

    timetrack(&home)
        .args(["start", "Sales", "CRM work", "-d", "pipeline"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started Sales - CRM work"));

    timetrack(&home)
        .arg("pause")
        .assert()
        .success()
        .stdout(predicate::str::contains("Paused"));

    let status = json_output(timetrack(&home).args(["status", "--output", "json"]));
    assert_eq!(status["state"], "paused");
    assert_eq!(status["description"], "pipeline");

    timetrack(&home).arg("resume").assert().success();

    let stopped = json_output(timetrack(&home).args(["stop", "-o", "json"]));
    assert_eq!(stopped["state"], "stopped");
    assert_eq!(stopped["pauses"].as_array().unwrap().len(), 1);

    timetrack(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("No active timer"));

    assert!(home.path().join("sessions.json").exists());
}

#[test]
fn test_start_twice_fails() {
    let home = TempDir::new().unwrap();
    timetrack(&home).args(["start", "Sales"]).assert().success();

    timetrack(&home)
        .args(["start", "Marketing"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("already running"));
}

#[test]
fn test_switch_stops_previous() {
    let home = TempDir::new().unwrap();
    timetrack(&home).args(["start", "Sales"]).assert().success();

    timetrack(&home)
        .args(["start", "Marketing", "--switch"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopped Sales"))
        .stdout(predicate::str::contains("Started Marketing"));

    let list = json_output(timetrack(&home).args(["list", "-o", "json"]));
    assert_eq!(list["count"], 2);
}

#[test]
fn test_errors_without_active_timer() {
    let home = TempDir::new().unwrap();

    for command in ["pause", "resume", "stop"] {
        timetrack(&home)
            .arg(command)
            .assert()
            .failure()
            .stderr(predicate::str::contains("No active timer"));
    }
}

#[test]
fn test_resume_when_running_fails() {
    let home = TempDir::new().unwrap();
    timetrack(&home).args(["start", "Sales"]).assert().success();

    timetrack(&home)
        .arg("resume")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not paused"));
}

#[test]
fn test_invalid_category_lists_choices() {
    let home = TempDir::new().unwrap();
    timetrack(&home)
        .args(["start", "Gardening"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid categories are"));

    timetrack(&home)
        .args(["start", "Sales", "Branding"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Valid subcategories for Sales"));
}

#[test]
fn test_add_edit_delete() {
    let home = TempDir::new().unwrap();

    let added = json_output(timetrack(&home).args([
        "add",
        "Other",
        "MetaLand",
        "--start",
        "2024-03-04T09:00",
        "--duration",
        "45m",
        "-o",
        "json",
    ]));
    assert_eq!(added["id"], 1);
    assert_eq!(added["duration_seconds"], 45 * 60);

    let edited = json_output(timetrack(&home).args([
        "edit",
        "1",
        "--duration",
        "1.5h",
        "--description",
        "planning",
        "-o",
        "json",
    ]));
    assert_eq!(edited["duration_seconds"], 90 * 60);
    assert_eq!(edited["description"], "planning");

    timetrack(&home)
        .args(["delete", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted session 1"));

    timetrack(&home)
        .args(["delete", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No session found with id 1"));
}

#[test]
fn test_add_rejects_end_before_start() {
    let home = TempDir::new().unwrap();
    timetrack(&home)
        .args([
            "add",
            "Sales",
            "--start",
            "2024-03-04T10:00",
            "--end",
            "2024-03-04T09:00",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid time range"));
}

#[test]
fn test_huge_numbers_fail_cleanly() {
    let home = TempDir::new().unwrap();

    for args in [
        vec!["start", "Sales", "--offset", "999999999999999999"],
        vec!["add", "Sales", "--start", "2024-03-04T09:00", "--duration", "9999999999h"],
        vec!["remove", "--day", "-9223372036854775808"],
    ] {
        timetrack(&home)
            .args(&args)
            .assert()
            .failure()
            .code(1)
            .stderr(predicate::str::contains("Invalid input"))
            .stderr(predicate::str::contains("panicked").not());
    }
}

#[test]
fn test_report_summary_orders_categories() {
    let home = TempDir::new().unwrap();
    timetrack(&home)
        .args(["add", "Marketing", "--start", "2024-03-04T13:00", "--duration", "10"])
        .assert()
        .success();
    timetrack(&home)
        .args(["add", "Sales", "--start", "2024-03-04T09:00", "--duration", "25"])
        .assert()
        .success();

    let report = json_output(timetrack(&home).args(["report", "all", "--by", "day", "-o", "json"]));
    let bucket = &report["report"]["buckets"][0];
    assert_eq!(bucket["label"], "2024-03-04");
    assert_eq!(bucket["categories"][0]["category"], "Sales");
    assert_eq!(bucket["categories"][0]["seconds"], 25 * 60);
    assert_eq!(bucket["categories"][1]["category"], "Marketing");

    timetrack(&home)
        .args(["report", "all", "--format", "cospend"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Date: 2024-03-04"));

    timetrack(&home)
        .args(["report", "all", "--format", "detailed"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total Hours: 0.583h"));
}

#[test]
fn test_remove_all() {
    let home = TempDir::new().unwrap();
    timetrack(&home)
        .args(["add", "Sales", "--start", "2024-03-04T09:00", "--duration", "1h"])
        .assert()
        .success();

    timetrack(&home)
        .args(["remove", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 session in total"));

    timetrack(&home).arg("remove").assert().failure();
}

#[test]
fn test_categories_management() {
    let home = TempDir::new().unwrap();

    timetrack(&home)
        .arg("categories")
        .assert()
        .success()
        .stdout(predicate::str::contains("Product dev"));

    timetrack(&home)
        .args(["categories", "add", "Research", "Reading"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added category Research"));

    timetrack(&home)
        .args(["start", "research", "reading"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Started Research - Reading"));

    timetrack(&home)
        .args(["categories", "list", "Research"])
        .assert()
        .success()
        .stdout(predicate::str::contains("- Reading"));
}

#[test]
fn test_corrupt_sessions_file_is_reported() {
    let home = TempDir::new().unwrap();
    std::fs::write(home.path().join("sessions.json"), "{ nope").unwrap();

    timetrack(&home)
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("sessions.json"));
}

#[test]
fn test_config_default_output() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.yaml"),
        "general:\n  default_output: json\n",
    )
    .unwrap();

    timetrack(&home)
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::diff("null\n"));
}

#[test]
fn test_completions() {
    let home = TempDir::new().unwrap();
    timetrack(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("timetrack"));
}
