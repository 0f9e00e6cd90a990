//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::io::Write;
use std::process::{Command, Stdio};

/// Run a CLI command with `stdin` and return (stdout, stderr, exit code).
fn run_cli(data_dir: &std::path::Path, args: &[&str], stdin: &str) -> (String, String, i32) {
    let mut child = Command::new(env!("CARGO_BIN_EXE_fittrack-cli"))
        .args(args)
        .env("FITTRACK_DATA_DIR", data_dir)
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute CLI command");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(stdin.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn offline_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(
        dir.path(),
        &["config", "set", "api.base_url", "http://127.0.0.1:9/api/"],
        "",
    );
    assert_eq!(code, 0);
    dir
}

#[test]
fn test_config_list_shows_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "list"], "");
    assert_eq!(code, 0, "config list failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["goals"]["steps_goal"], 10000);
    assert_eq!(parsed["storage"]["backend"], "file");
}

#[test]
fn test_config_set_get_reset() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["config", "set", "goals.steps_goal", "8000"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "goals.steps_goal"], "");
    assert_eq!(stdout.trim(), "8000");

    let (stdout, _, code) = run_cli(dir.path(), &["config", "reset"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "config reset to defaults");
    let (stdout, _, _) = run_cli(dir.path(), &["config", "get", "goals.steps_goal"], "");
    assert_eq!(stdout.trim(), "10000");
}

#[test]
fn test_config_unknown_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope"], "");
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key: nope"));
}

#[test]
fn test_auth_status_signed_out() {
    let dir = tempfile::tempdir().unwrap();
    let (stdout, _, code) = run_cli(dir.path(), &["auth", "status"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "not signed in");

    let (stdout, _, code) = run_cli(dir.path(), &["auth", "logout"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "signed out");
}

#[test]
fn test_signup_back_on_first_step_cancels() {
    let dir = offline_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["signup"], ":back\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("Step 1 of 4: Personal Information"));
    assert!(stdout.contains("Signup cancelled"));
}

#[test]
fn test_signup_rejects_short_password_before_network() {
    let dir = offline_dir();
    let script = "Jane\nDoe\njane@example.com\n1995-06-15\n168\n60\nfemale\n2\nabc\nabc\n";
    let (stdout, stderr, code) = run_cli(dir.path(), &["signup", "--dry-run"], script);
    // Input runs out on the re-asked password step.
    assert_eq!(code, 1);
    assert!(stdout.contains("Step 4 of 4: Create Password"));
    assert!(stdout.contains("Error: Password must be at least 8 characters"));
    assert!(!stdout.contains("Creating account..."));
    assert!(stderr.contains("input closed"));
}

#[test]
fn test_activity_signed_out_falls_back() {
    let dir = offline_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["activity", "--json"], "");
    assert_eq!(code, 0, "activity failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["data_error"], "Not signed in");
    assert_eq!(parsed["steps_goal"], 10000);
    assert_eq!(parsed["chart"].as_array().unwrap().len(), 0);
}

#[test]
fn test_recorded_steps_show_up_offline() {
    let dir = offline_dir();
    let (stdout, _, code) = run_cli(dir.path(), &["steps", "1234"], "");
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "ok");

    let (stdout, _, code) = run_cli(dir.path(), &["activity", "--json"], "");
    assert_eq!(code, 0);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["today"]["steps"], 1234);
    assert_eq!(parsed["data_error"], "Not signed in");
}

#[test]
fn test_activity_text_report() {
    let dir = offline_dir();
    run_cli(dir.path(), &["config", "set", "ui.ansi", "false"], "");
    let (stdout, _, code) = run_cli(dir.path(), &["activity", "--filter", "monthly"], "");
    assert_eq!(code, 0);
    assert!(stdout.contains("My Activity"));
    assert!(stdout.contains("This Month"));
    assert!(stdout.contains("Unable to load activity data"));
}

#[test]
fn test_activity_rejects_unknown_filter() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["activity", "--filter", "daily"], "");
    assert_eq!(code, 2);
    assert!(stderr.contains("daily"));
}
