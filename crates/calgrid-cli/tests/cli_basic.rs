//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run and verify outputs. Every test
//! passes its own `--config` so the user's config is never touched.

use std::path::{Path, PathBuf};
use std::process::Command;

use indoc::indoc;
use tempfile::TempDir;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(args: &[&str]) -> (String, String, i32) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "calgrid-cli", "--"])
        .args(args)
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

/// Temp dir holding a payload file and a config path.
fn workspace(payload: &str) -> (TempDir, PathBuf, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("items.json");
    std::fs::write(&input, payload).unwrap();
    let config = dir.path().join("config.toml");
    (dir, input, config)
}

fn s(path: &Path) -> &str {
    path.to_str().unwrap()
}

fn json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Failed to parse JSON output")
}

#[test]
fn test_day_layout() {
    let (_dir, input, config) = workspace(indoc! {r#"
        [
            {"id": "a", "title": "A", "startTime": "09:00", "endTime": "10:00"},
            {"id": "b", "title": "B", "startTime": "09:30", "endTime": "10:30"},
            {"id": "c", "title": "C", "startTime": "09:15", "endTime": "09:45"}
        ]
    "#});
    let (stdout, stderr, code) = run_cli(&["day", "--input", s(&input), "--config", s(&config)]);
    assert_eq!(code, 0, "day failed: {stderr}");

    let out = json(&stdout);
    let placements = out.as_array().unwrap();
    assert_eq!(placements.len(), 3);
    assert!(placements.iter().all(|p| p["totalColumns"] == 3));
    assert_eq!(placements[1]["id"], "c");
    assert_eq!(placements[1]["column"], 1);
}

#[test]
fn test_week_layout() {
    let (_dir, input, config) = workspace(indoc! {r#"
        {"items": [
            {"id": "x", "title": "X", "date": "2024-01-08", "startTime": "09:00", "endTime": "10:00"},
            {"id": "y", "title": "Y", "date": "2024-01-08", "startTime": "09:00", "endTime": "10:00"},
            {"id": "trip", "title": "Trip", "startDate": "2024-01-06", "endDate": "2024-01-09"}
        ]}
    "#});
    let (stdout, stderr, code) = run_cli(&[
        "week",
        "--input",
        s(&input),
        "--start",
        "2024-01-07",
        "--config",
        s(&config),
    ]);
    assert_eq!(code, 0, "week failed: {stderr}");

    let out = json(&stdout);
    let monday = out["timeline"]["2024-01-08"].as_array().unwrap();
    assert_eq!(monday.len(), 2);
    assert!(monday.iter().all(|p| p["totalColumns"] == 2));
    let spans = out["spans"].as_array().unwrap();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0]["startIdx"], 0);
    assert_eq!(spans[0]["endIdx"], 2);
    assert_eq!(spans[0]["startISO"], "2024-01-06");
}

#[test]
fn test_month_layout() {
    let (_dir, input, config) = workspace(indoc! {r#"
        [
            {"id": "a", "title": "A", "startDate": "2024-01-01", "endDate": "2024-01-10"},
            {"id": "t1", "title": "T1", "date": "2024-01-03", "isTask": true, "completed": true},
            {"id": "t2", "title": "T2", "date": "2024-01-03", "isTask": true, "completed": true}
        ]
    "#});
    let (stdout, stderr, code) = run_cli(&[
        "month",
        "--input",
        s(&input),
        "--month",
        "2024-01",
        "--today",
        "2024-01-03",
        "--config",
        s(&config),
    ]);
    assert_eq!(code, 0, "month failed: {stderr}");

    let out = json(&stdout);
    let cells = out.as_array().unwrap();
    assert_eq!(cells.len(), 42);
    assert_eq!(cells[0]["date"], "2023-12-31");
    let wednesday = &cells[3];
    assert_eq!(wednesday["isToday"], true);
    assert_eq!(wednesday["schedules"][0]["kind"], "spanSpacer");
    assert_eq!(wednesday["tasks"][0]["kind"], "summary");
    assert_eq!(wednesday["tasks"][0]["summary"]["allCompleted"], true);
}

#[test]
fn test_month_rejects_bad_month() {
    let (_dir, input, config) = workspace("[]");
    let (_, stderr, code) = run_cli(&[
        "month",
        "--input",
        s(&input),
        "--month",
        "2024-13",
        "--config",
        s(&config),
    ]);
    assert_ne!(code, 0);
    assert!(stderr.contains("YYYY-MM"));
}

#[test]
fn test_missing_input_file() {
    let (dir, _input, config) = workspace("[]");
    let missing = dir.path().join("nope.json");
    let (_, stderr, code) = run_cli(&["day", "--input", s(&missing), "--config", s(&config)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_holidays() {
    let (_dir, _input, config) = workspace("[]");
    let (stdout, stderr, code) = run_cli(&["holidays", "--year", "2025", "--config", s(&config)]);
    assert_eq!(code, 0, "holidays failed: {stderr}");

    let out = json(&stdout);
    let holidays = out.as_array().unwrap();
    assert!(holidays.iter().any(|h| h["date"] == "2025-01-01"));
}

#[test]
fn test_config_set_get_reset() {
    let (_dir, _input, config) = workspace("[]");
    let config = s(&config);

    let (stdout, _, code) = run_cli(&["config", "get", "layout.task_block_minutes", "--config", config]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "60");

    let (_, stderr, code) = run_cli(&["config", "set", "layout.task_block_minutes", "30", "--config", config]);
    assert_eq!(code, 0, "config set failed: {stderr}");
    let (stdout, _, _) = run_cli(&["config", "get", "layout.task_block_minutes", "--config", config]);
    assert_eq!(stdout.trim(), "30");

    let (_, _, code) = run_cli(&["config", "set", "layout.task_block_minutes", "0", "--config", config]);
    assert_ne!(code, 0);

    let (_, _, code) = run_cli(&["config", "reset", "--config", config]);
    assert_eq!(code, 0);
    let (stdout, _, _) = run_cli(&["config", "get", "layout.task_block_minutes", "--config", config]);
    assert_eq!(stdout.trim(), "60");
}

#[test]
fn test_config_unknown_key() {
    let (_dir, _input, config) = workspace("[]");
    let (_, stderr, code) = run_cli(&["config", "get", "no.such.key", "--config", s(&config)]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}
