//! CLI integration tests

use std::process::Command;

fn voxnotes_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_voxnotes"))
}

#[test]
fn help_output() {
    let output = voxnotes_bin()
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voice notes"));
    assert!(stdout.contains("--endpoint"));
    assert!(stdout.contains("--api-key"));
    assert!(stdout.contains("--notify"));
    assert!(stdout.contains("--import"));
}

#[test]
fn version_output() {
    let output = voxnotes_bin()
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voxnotes"));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn config_path_command() {
    let output = voxnotes_bin()
        .args(["config", "path"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("voxnotes"));
    assert!(stdout.contains("config.toml"));
}

#[test]
fn config_help() {
    let output = voxnotes_bin()
        .args(["config", "--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("init"));
    assert!(stdout.contains("set"));
    assert!(stdout.contains("get"));
    assert!(stdout.contains("list"));
    assert!(stdout.contains("path"));
}

#[test]
fn config_set_then_get_round_trip() {
    let dir = tempfile::tempdir().expect("tempdir");

    let set = voxnotes_bin()
        .args(["config", "set", "probe_timeout_ms", "1500"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(set.status.success());

    let get = voxnotes_bin()
        .args(["config", "get", "probe_timeout_ms"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(get.status.success());
    let stdout = String::from_utf8_lossy(&get.stdout);
    assert!(stdout.contains("1500"));
}

#[test]
fn config_init_creates_file_once() {
    let dir = tempfile::tempdir().expect("tempdir");

    let first = voxnotes_bin()
        .args(["config", "init"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(first.status.success());

    let second = voxnotes_bin()
        .args(["config", "init"])
        .env("XDG_CONFIG_HOME", dir.path())
        .env("HOME", dir.path())
        .output()
        .expect("Failed to execute command");
    assert!(!second.status.success());
    let stderr = String::from_utf8_lossy(&second.stderr);
    assert!(stderr.contains("already exists"));
}

// The interactive studio itself needs a microphone; it is exercised through
// the application-layer tests with mock ports instead.
