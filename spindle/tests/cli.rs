///
/// CLI Integration Tests
///
/// Runs the `spindle` binary via `env!("CARGO_BIN_EXE_spindle")` and
/// asserts on its stdout, stderr and exit status. Configurations are
/// written into a fresh temp directory per test.
///
/// Run all:  `cargo test --test cli`
///

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn spindle(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_spindle"))
        .args(args)
        .output()
        .expect("failed to run spindle")
}

fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("spindle.toml");
    fs::write(&path, content).expect("failed to write config");
    path
}

fn run_config(content: &str) -> Output {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let path = write_config(tmp.path(), content);
    spindle(&["run", "--config", &path.to_string_lossy()])
}

fn stdout_lines(output: &Output) -> Vec<String> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_run_defaults_prints_one_line_per_worker() {
    let output = spindle(&["run"]);
    assert!(
        output.status.success(),
        "spindle run failed:\nstderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let mut lines = stdout_lines(&output);
    lines.sort();
    assert_eq!(
        lines,
        vec!["Hello world! WorkerThread1", "Hello world! WorkerThread2"]
    );
}

#[test]
fn test_run_hello_world_a_and_b() {
    let output = run_config(
        r#"
[[threads]]
name = "A"
messages = ["Hello world!"]

[[threads]]
name = "B"
messages = ["Hello world!"]
"#,
    );
    assert!(output.status.success());

    let lines = stdout_lines(&output);
    assert_eq!(lines.len(), 2, "unexpected output: {:?}", lines);
    assert!(lines.iter().any(|l| l == "Hello world! A"));
    assert!(lines.iter().any(|l| l == "Hello world! B"));
}

#[test]
fn test_run_keeps_posting_order() {
    let messages: Vec<String> = (1..=20).map(|i| format!("\"m{}\"", i)).collect();
    let output = run_config(&format!(
        "[runtime]\nqueue_capacity = 64\n\n[[threads]]\nname = \"solo\"\nmessages = [{}]\n",
        messages.join(", ")
    ));
    assert!(output.status.success());

    let expected: Vec<String> = (1..=20).map(|i| format!("m{} solo", i)).collect();
    assert_eq!(stdout_lines(&output), expected);
}

#[test]
fn test_run_unhandled_tag_is_fatal() {
    let output = run_config(
        r#"
[[threads]]
name = "A"
messages = [{ text = "odd", tag = 1030 }]
"#,
    );
    assert!(!output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Fault"), "stderr: {}", stderr);
    assert!(stderr.contains("unexpected tag 0x0406"), "stderr: {}", stderr);
}

#[test]
fn test_run_reserved_tag_is_fatal() {
    let output = run_config(
        r#"
[[threads]]
name = "A"
messages = [{ text = "exit", tag = 1024 }]
"#,
    );
    assert!(!output.status.success());
    assert!(stdout_lines(&output).is_empty());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("reserved"), "stderr: {}", stderr);
}

#[test]
fn test_run_missing_config_exits_with_error() {
    let output = spindle(&["run", "--config", "/definitely/not/here/spindle.toml"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Config not found"));
}

#[test]
fn test_check_reports_summary_and_errors() {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let path = write_config(
        tmp.path(),
        "[[threads]]\nname = \"A\"\nmessages = [\"x\", \"y\"]\n",
    );
    let output = spindle(&["check", &path.to_string_lossy()]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("(1 threads, 2 messages)"));

    let path = write_config(
        tmp.path(),
        "[[threads]]\nname = \"A\"\n\n[[threads]]\nname = \"A\"\n",
    );
    let output = spindle(&["check", &path.to_string_lossy()]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("duplicate thread name"));
}

#[test]
fn test_init_then_run() {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let dir = tmp.path().join("project");

    let output = spindle(&["init", &dir.to_string_lossy()]);
    assert!(output.status.success());
    assert!(dir.join("spindle.toml").exists());

    let again = spindle(&["init", &dir.to_string_lossy()]);
    assert_eq!(again.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&again.stderr).contains("already exists"));

    let config = dir.join("spindle.toml");
    let output = spindle(&["run", "--config", &config.to_string_lossy()]);
    assert!(output.status.success());
    assert_eq!(stdout_lines(&output).len(), 2);
}
