//! CLI Integration Tests
//!
//! These tests verify that the CLI commands work correctly end-to-end.
//! They test the actual binary behavior, not just the library.
//!
//! Run with:
//! ```bash
//! cargo test --test cli_integration
//! ```

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};
use tempfile::tempdir;

/// Run shardstore against a store rooted in `dir` and return (stdout, stderr, success)
fn run_store(args: &[&str], dir: &Path) -> (String, String, bool) {
    let output = base_command(dir)
        .args(args)
        .output()
        .expect("Failed to execute shardstore");

    (
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
        output.status.success(),
    )
}

/// Run shardstore with `input` piped to stdin
fn run_store_with_stdin(args: &[&str], dir: &Path, input: &[u8]) -> (Vec<u8>, bool) {
    let mut child = base_command(dir)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute shardstore");

    child.stdin.take().unwrap().write_all(input).unwrap();
    let output = child.wait_with_output().unwrap();
    (output.stdout, output.status.success())
}

/// Isolated from any user config
fn base_command(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shardstore"));
    cmd.arg("--no-config")
        .arg("--root")
        .arg(dir.join("store"))
        .args(["-f", "json"]);
    cmd
}

fn parse(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout.trim()).expect("stdout should be JSON")
}

// ============================================================================
// Put / Get
// ============================================================================

#[test]
fn test_cli_put_file_and_get() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.txt");
    std::fs::write(&input, "Hello, world!").unwrap();

    let (stdout, _stderr, success) = run_store(&["put", "greeting", input.to_str().unwrap()], dir.path());
    assert!(success, "put should succeed");
    let value = parse(&stdout);
    assert_eq!(value["status"], "ok");
    assert_eq!(value["bytes"], 13);

    let (stdout, _stderr, success) = run_store(&["get", "greeting"], dir.path());
    assert!(success, "get should succeed");
    assert_eq!(stdout, "Hello, world!");
}

#[test]
fn test_cli_put_from_stdin() {
    let dir = tempdir().unwrap();

    let (stdout, success) = run_store_with_stdin(&["put", "piped"], dir.path(), b"\x00\x01binary\xff");
    assert!(success, "put from stdin should succeed");
    let value = parse(&String::from_utf8_lossy(&stdout));
    assert_eq!(value["bytes"], 9);

    let output = base_command(dir.path())
        .args(["get", "piped"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout, b"\x00\x01binary\xff");
}

#[test]
fn test_cli_get_to_file() {
    let dir = tempdir().unwrap();
    run_store_with_stdin(&["put", "key"], dir.path(), b"payload");

    let out = dir.path().join("out.bin");
    let (stdout, _stderr, success) = run_store(&["get", "key", "-o", out.to_str().unwrap()], dir.path());

    assert!(success, "get -o should succeed");
    assert_eq!(parse(&stdout)["bytes"], 7);
    assert_eq!(std::fs::read(&out).unwrap(), b"payload");
}

#[test]
fn test_cli_get_nonexistent_key() {
    let dir = tempdir().unwrap();

    let (_stdout, stderr, success) = run_store(&["get", "nonexistent"], dir.path());

    assert!(!success, "get nonexistent should fail");
    assert!(stderr.contains("not found"), "should explain: {}", stderr);
}

// ============================================================================
// Has / Delete / Clear
// ============================================================================

#[test]
fn test_cli_has_lifecycle() {
    let dir = tempdir().unwrap();

    let (stdout, _, success) = run_store(&["has", "key"], dir.path());
    assert!(success);
    assert_eq!(parse(&stdout)["exists"], false);

    run_store_with_stdin(&["put", "key"], dir.path(), b"data");
    let (stdout, _, _) = run_store(&["has", "key"], dir.path());
    assert_eq!(parse(&stdout)["exists"], true);

    let (stdout, _, success) = run_store(&["delete", "key"], dir.path());
    assert!(success, "delete should succeed");
    assert_eq!(parse(&stdout)["status"], "ok");

    let (stdout, _, _) = run_store(&["has", "key"], dir.path());
    assert_eq!(parse(&stdout)["exists"], false);
}

#[test]
fn test_cli_clear() {
    let dir = tempdir().unwrap();
    run_store_with_stdin(&["put", "a"], dir.path(), b"1");
    run_store_with_stdin(&["put", "b"], dir.path(), b"2");

    let (_, _, success) = run_store(&["clear"], dir.path());
    assert!(success, "clear should succeed");
    assert!(!dir.path().join("store").exists());

    let (stdout, _, _) = run_store(&["has", "a"], dir.path());
    assert_eq!(parse(&stdout)["exists"], false);
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_cli_path_shows_sharded_layout() {
    let dir = tempdir().unwrap();

    let (stdout, _, success) = run_store(&["path", "hello"], dir.path());
    assert!(success);

    let value = parse(&stdout);
    assert_eq!(value["pathname"], "aaf4c/61ddc/c5e8a/2dabe/de0f3/b482c/d9aea/9434d");
    assert_eq!(value["filename"], "aaf4c61ddcc5e8a2dabede0f3b482cd9aea9434d");
    assert_eq!(value["first_segment"], "aaf4c");
}

#[test]
fn test_cli_identity_transform() {
    let dir = tempdir().unwrap();

    let (_, success) = run_store_with_stdin(&["-t", "identity", "put", "notes"], dir.path(), b"plain");
    assert!(success);
    assert!(dir.path().join("store/notes/notes").is_file());

    let (_, stderr, success) = run_store(&["-t", "identity", "has", "../escape"], dir.path());
    assert!(!success, "traversal keys should be rejected");
    assert!(stderr.contains("Invalid key"), "should explain: {}", stderr);
}

#[test]
fn test_cli_zero_block_size_rejected() {
    let dir = tempdir().unwrap();

    let (_, _, success) = run_store(&["-b", "0", "has", "key"], dir.path());
    assert!(!success, "block size 0 should be rejected");
}

// ============================================================================
// Config
// ============================================================================

#[test]
fn test_cli_config_file_is_used() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("custom.json");
    std::fs::write(&config_path, r#"{ "hash": "blake3", "block_size": 8 }"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_shardstore"))
        .arg("--config")
        .arg(&config_path)
        .arg("--root")
        .arg(dir.path().join("store"))
        .args(["path", "hello"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value = parse(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(value["filename"].as_str().unwrap().len(), 64);
    assert_eq!(value["first_segment"].as_str().unwrap().len(), 8);
}

#[test]
fn test_cli_config_save() {
    let dir = tempdir().unwrap();

    let config_path = dir.path().join("config.json");
    let output = Command::new(env!("CARGO_BIN_EXE_shardstore"))
        .arg("--config")
        .arg(&config_path)
        .args(["--atomic", "config", "--save"])
        .output()
        .unwrap();
    assert!(output.status.success(), "config --save should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(parse(&stdout)["atomic_writes"], true);

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap())
            .unwrap();
    assert_eq!(saved["atomic_writes"], true);
    assert_eq!(saved["transform"], "cas");
}

#[test]
fn test_cli_missing_config_file_rejected() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("missing.json");

    let output = Command::new(env!("CARGO_BIN_EXE_shardstore"))
        .arg("--config")
        .arg(&config_path)
        .args(["has", "key"])
        .output()
        .unwrap();

    assert!(!output.status.success(), "missing config should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.json"), "should name the file: {}", stderr);
    assert!(!config_path.exists());
}

// ============================================================================
// Error messages
// ============================================================================

#[test]
fn test_cli_put_missing_file_names_path() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("no-such-input.bin");

    let (_, stderr, success) = run_store(&["put", "key", input.to_str().unwrap()], dir.path());

    assert!(!success, "put of a missing file should fail");
    assert!(stderr.contains("no-such-input.bin"), "should name the file: {}", stderr);
}
