//! Error scenario integration tests

use std::process::Command;

fn voxnotes_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voxnotes"))
}

#[test]
fn config_get_unknown_key() {
    let output = voxnotes_bin()
        .args(["config", "get", "unknown_key"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown key"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_unknown_key() {
    let output = voxnotes_bin()
        .args(["config", "set", "unknown_key", "value"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("unknown key"),
        "Expected error about unknown key, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_number() {
    let output = voxnotes_bin()
        .args(["config", "set", "chunk_interval_ms", "soon"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("expected a number"),
        "Expected error about invalid number, got: {}",
        stderr
    );
}

#[test]
fn config_set_invalid_boolean() {
    let output = voxnotes_bin()
        .args(["config", "set", "notify", "maybe"])
        .output()
        .expect("Failed to execute command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("expected true or false"),
        "Expected error about invalid boolean, got: {}",
        stderr
    );
}

#[test]
fn config_list_with_no_file() {
    let output = voxnotes_bin()
        .args(["config", "list"])
        .env("HOME", "/nonexistent")
        .env("XDG_CONFIG_HOME", "/nonexistent")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("api_key"),
        "Expected config list output, got: {}",
        stdout
    );
}
