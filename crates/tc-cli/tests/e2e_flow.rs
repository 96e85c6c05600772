//! End-to-end tests driving the `timecard` binary.
//!
//! Each test runs against an isolated `HOME` so the default log location
//! (`~/.timecard/timecard.txt`) lands in a temp directory.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn timecard_binary() -> String {
    env!("CARGO_BIN_EXE_timecard").to_string()
}

fn timecard(home: &Path, args: &[&str]) -> Output {
    Command::new(timecard_binary())
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("TIMECARD_LOG_PATH")
        .env_remove("TIMECARD_FORMAT")
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("failed to run timecard")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn log_lines(home: &Path) -> Vec<String> {
    std::fs::read_to_string(home.join(".timecard/timecard.txt"))
        .map(|c| c.lines().map(str::to_string).collect())
        .unwrap_or_default()
}

#[test]
fn test_fresh_card_status() {
    let temp = TempDir::new().unwrap();

    let output = timecard(temp.path(), &["st"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let out = stdout(&output);
    assert!(out.starts_with("NOW "), "{out}");
    assert!(out.contains("Currently CHECKED OUT"), "{out}");
    assert!(out.contains("Work today (since "), "{out}");
    assert!(out.contains("Work this week (since "), "{out}");
    assert!(out.contains("Work last week ("), "{out}");
    assert!(!temp.path().join(".timecard").exists());
}

#[test]
fn test_check_in_and_out_flow() {
    let temp = TempDir::new().unwrap();

    let output = timecard(temp.path(), &["in", "writing", "tests"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "CHECKED IN: writing tests\n");

    let output = timecard(temp.path(), &["st"]);
    assert!(stdout(&output).contains("Currently CHECKED IN"));

    let output = timecard(temp.path(), &["out"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "CHECKED OUT\n");

    let lines = log_lines(temp.path());
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" - in writing tests"), "{}", lines[0]);
    assert!(lines[1].ends_with(" - out"), "{}", lines[1]);
}

#[test]
fn test_double_check_in_fails_without_writing() {
    let temp = TempDir::new().unwrap();

    assert!(timecard(temp.path(), &["in"]).status.success());
    let before = log_lines(temp.path());

    let output = timecard(temp.path(), &["in"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(
        stderr(&output).contains("Can not check IN. You are already checked IN."),
        "{}",
        stderr(&output)
    );
    assert_eq!(log_lines(temp.path()), before);
}

#[test]
fn test_check_out_when_checked_out_fails() {
    let temp = TempDir::new().unwrap();

    let output = timecard(temp.path(), &["out"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Can not check OUT"));
    assert!(log_lines(temp.path()).is_empty());
}

#[test]
fn test_adjustments() {
    let temp = TempDir::new().unwrap();

    assert!(timecard(temp.path(), &["in"]).status.success());
    let output = timecard(temp.path(), &["add", "30"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Can not adjust time while a session is open"));

    assert!(timecard(temp.path(), &["out"]).status.success());
    let output = timecard(temp.path(), &["add", "30"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert_eq!(stdout(&output), "ADJUSTED: +30 minutes\n");

    let output = timecard(temp.path(), &["sub", "10"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let output = timecard(temp.path(), &["add", "half"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("invalid number of minutes"));

    let lines = log_lines(temp.path());
    assert_eq!(&lines[2..], ["add 30", "sub 10"]);
}

#[test]
fn test_unknown_command_exits_one() {
    let temp = TempDir::new().unwrap();

    let output = timecard(temp.path(), &["pause"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!stderr(&output).is_empty());
}

#[test]
fn test_malformed_log_is_fatal() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join(".timecard");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("timecard.txt"), "20150101T08:00:00 - in\nnonsense\n").unwrap();

    let output = timecard(temp.path(), &["st"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("line 2"), "{}", stderr(&output));

    let output = timecard(temp.path(), &["out"]);
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(log_lines(temp.path()).len(), 2);
}

#[test]
fn test_csv_log_via_environment() {
    let temp = TempDir::new().unwrap();
    let log_path = temp.path().join("work.csv");

    let run = |args: &[&str]| {
        Command::new(timecard_binary())
            .env("HOME", temp.path())
            .env("XDG_CONFIG_HOME", temp.path().join(".config"))
            .env("TIMECARD_LOG_PATH", &log_path)
            .env("TIMECARD_FORMAT", "csv")
            .args(args)
            .output()
            .unwrap()
    };

    assert!(run(&["in", "csv"]).status.success());
    assert!(run(&["out"]).status.success());
    assert!(run(&["add", "5"]).status.success());

    let content = std::fs::read_to_string(&log_path).unwrap();
    let ops: Vec<_> = content
        .lines()
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(ops, ["in", "out", "add"]);
    assert!(content.ends_with("add,5\n"));

    let output = run(&["st", "--json"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["checked_in"], false);
    assert_eq!(report["windows"].as_array().unwrap().len(), 3);
}

#[test]
fn test_config_file_selects_log() {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("timecard.toml");
    let log_path = temp.path().join("custom").join("card.txt");
    std::fs::write(
        &config_path,
        format!("log_path = {:?}\n", log_path.display().to_string()),
    )
    .unwrap();

    let config_arg = config_path.display().to_string();
    let output = timecard(temp.path(), &["--config", &config_arg, "in"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(log_path.exists());
    assert!(log_lines(temp.path()).is_empty());
}
