//! Integration tests for the justweather CLI

use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary against an isolated store and config directory
fn run(store: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_justweather"))
        .args(args)
        .env("JUSTWEATHER_STORE__LOCATION", store.path().join("store"))
        .env("XDG_CONFIG_HOME", store.path().join("config"))
        .env("RUST_LOG", "warn")
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_cli_help() {
    let store = tempfile::tempdir().unwrap();
    let output = run(&store, &["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("justweather"));
    assert!(stdout.contains("precipitation"));
}

#[test]
fn test_list_on_fresh_store() {
    let store = tempfile::tempdir().unwrap();
    let output = run(&store, &["list"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("No locations"));
}

#[test]
fn test_inverted_range_is_rejected() {
    let store = tempfile::tempdir().unwrap();
    let output = run(
        &store,
        &[
            "hourly",
            "--latitude",
            "46.948",
            "--longitude",
            "7.4474",
            "--start",
            "2026-10-16",
            "--end",
            "2026-10-15",
        ],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid input"), "{stderr}");
}

#[test]
fn test_restore_unknown_location_fails() {
    let store = tempfile::tempdir().unwrap();
    let output = run(&store, &["restore", "--latitude", "1", "--longitude", "2"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Saved locations are unavailable"));
}
