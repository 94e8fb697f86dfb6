//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data directory.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_vibedeck"))
        .args(args)
        .env("VIBEDECK_DATA_DIR", dir)
        .env_remove("VIBEDECK_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

/// Parse the JSON that follows the first line of a command's output.
fn json_after_header(stdout: &str) -> serde_json::Value {
    let body = stdout.split_once('\n').map(|(_, rest)| rest).unwrap_or("");
    serde_json::from_str(body).expect("valid JSON body")
}

fn add_task(dir: &Path, title: &str, minutes: &str) -> String {
    let (code, stdout, stderr) = run_cli(dir, &["task", "add", title, "--minutes", minutes]);
    assert_eq!(code, 0, "task add failed: {stderr}");
    assert!(stdout.starts_with("Task created:"));
    json_after_header(&stdout)["id"]
        .as_str()
        .expect("task id")
        .to_string()
}

#[test]
fn test_task_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "first", "10");
    add_task(dir.path(), "second", "5");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(code, 0);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let titles: Vec<_> = tasks
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(titles, ["second", "first"]);
    assert_eq!(tasks[0]["durationSeconds"], 300);
}

#[test]
fn test_task_add_rejection_is_not_a_failure() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "keep", "5");
    let (_, before, _) = run_cli(dir.path(), &["task", "list"]);

    let (code, stdout, stderr) = run_cli(dir.path(), &["task", "add", "big", "--minutes", "500"]);
    assert_eq!(code, 0, "rejection must not fail the command: {stderr}");
    assert!(stdout.starts_with("rejected: minutes must be at most 240"));

    let (code, stdout, _) = run_cli(dir.path(), &["task", "add", "   ", "--minutes", "5"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "rejected: task title must not be empty");

    let (_, after, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(before, after);
}

#[test]
fn test_task_total() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "a", "10");
    add_task(dir.path(), "b", "15");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "total"]);
    assert_eq!(code, 0);
    let total: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(total["plannedSeconds"], 1500);
    assert_eq!(total["display"], "25:00");
    assert_eq!(total["pending"], 2);
}

#[test]
fn test_task_complete_updates_profile_and_history() {
    let dir = tempfile::tempdir().unwrap();
    let id = add_task(dir.path(), "ship it", "25");

    let (code, stdout, _) = run_cli(dir.path(), &["task", "complete", &id]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("Vibe check: ship it"));

    let (_, stdout, _) = run_cli(dir.path(), &["profile"]);
    let profile: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["vibesCompleted"], 1);
    assert_eq!(profile["currentStreak"], 1);
    assert_eq!(profile["handle"], "@vibe-coder");

    let (_, stdout, _) = run_cli(dir.path(), &["history"]);
    let history: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history[0]["id"], id.as_str());
    assert_eq!(history[0]["isCompleted"], true);
}

#[test]
fn test_task_complete_unknown_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "keep", "5");
    let (_, before, _) = run_cli(dir.path(), &["task", "list"]);

    let (code, stdout, _) = run_cli(dir.path(), &["task", "complete", "nope"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "rejected: no pending task with id nope");

    let (_, after, _) = run_cli(dir.path(), &["task", "list"]);
    assert_eq!(before, after);
    let (_, stdout, _) = run_cli(dir.path(), &["profile"]);
    let profile: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["vibesCompleted"], 0);
}

#[test]
fn test_history_limit() {
    let dir = tempfile::tempdir().unwrap();
    for title in ["a", "b", "c"] {
        let id = add_task(dir.path(), title, "1");
        run_cli(dir.path(), &["task", "complete", &id]);
    }
    let (code, stdout, _) = run_cli(dir.path(), &["history", "--limit", "2"]);
    assert_eq!(code, 0);
    let history: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(history.as_array().unwrap().len(), 2);
    assert_eq!(history[0]["title"], "c");
}

#[test]
fn test_status_shows_idle_focus() {
    let dir = tempfile::tempdir().unwrap();
    add_task(dir.path(), "plan", "20");

    let (code, stdout, _) = run_cli(dir.path(), &["status"]);
    assert_eq!(code, 0);
    let view: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(view["mode"], "focus");
    assert_eq!(view["phase"], "idle");
    assert_eq!(view["secondsRemaining"], 1200);
    assert_eq!(view["display"], "20:00");
    assert_eq!(view["primaryAction"], "START FOCUS");
    assert_eq!(view["activeTask"]["title"], "plan");
}

#[test]
fn test_config_set_and_get() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.break_secs"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "300");

    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.break_secs", "120"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.break_secs"]);
    assert_eq!(stdout.trim(), "120");

    let (code, _, _) = run_cli(dir.path(), &["config", "reset"]);
    assert_eq!(code, 0);
    let (_, stdout, _) = run_cli(dir.path(), &["config", "get", "timer.break_secs"]);
    assert_eq!(stdout.trim(), "300");
}

#[test]
fn test_config_rejects_unknown_key() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run_cli(dir.path(), &["config", "get", "timer.nope"]);
    assert_eq!(code, 1);
    let (code, _, _) = run_cli(dir.path(), &["config", "set", "timer.break_secs", "soon"]);
    assert_eq!(code, 1);
}

#[test]
fn test_profile_name_from_config() {
    let dir = tempfile::tempdir().unwrap();
    run_cli(dir.path(), &["config", "set", "profile.name", "Night Owl"]);
    let (_, stdout, _) = run_cli(dir.path(), &["profile"]);
    let profile: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(profile["name"], "Night Owl");
    assert_eq!(profile["handle"], "@night-owl");
}

#[test]
fn test_focus_session_reads_commands_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = Command::new(env!("CARGO_BIN_EXE_vibedeck"))
        .arg("focus")
        .env("VIBEDECK_DATA_DIR", dir.path())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn focus session");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"start\nadd 2 write docs\nlist\nquit\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("add a task first"));
    assert!(stdout.contains("added write docs (2 min)"));
    assert!(stdout.contains("START FOCUS"));

    let (_, stdout, _) = run_cli(dir.path(), &["task", "list"]);
    let tasks: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(tasks[0]["title"], "write docs");
}
