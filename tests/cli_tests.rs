//! CLI integration tests
//!
//! Tests the command-line interface using assert_cmd

use assert_cmd::Command;
use predicates::prelude::*;

/// Get a command for the cluster-probe binary
fn probe_cmd() -> Command {
    Command::cargo_bin("cluster-probe").unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Help and Version Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    probe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster-probe"))
        .stdout(predicate::str::contains("resolve"))
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("monitor"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_command() {
    probe_cmd()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster-probe"))
        .stdout(predicate::str::contains("Build Information"))
        .stdout(predicate::str::contains("Git Hash"))
        .stdout(predicate::str::contains("Target"));
}

#[test]
fn test_short_version_flag() {
    probe_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cluster-probe"));
}

// ─────────────────────────────────────────────────────────────────
// Config Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_show_default() {
    probe_cmd()
        .arg("config")
        .arg("show")
        .assert()
        .success()
        .stdout(predicate::str::contains("[resolver]"))
        .stdout(predicate::str::contains("[broker]"))
        .stdout(predicate::str::contains("[scanner]"))
        .stdout(predicate::str::contains("[logging]"))
        .stdout(predicate::str::contains("ufo"));
}

#[test]
fn test_config_validate_default() {
    // Default config should always be valid
    probe_cmd()
        .arg("config")
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_config_validate_nonexistent_file() {
    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg("/nonexistent/path/probe.toml")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found").or(predicate::str::contains("Error")));
}

#[test]
fn test_config_init_help() {
    probe_cmd()
        .arg("config")
        .arg("init")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialize"))
        .stdout(predicate::str::contains("--path"))
        .stdout(predicate::str::contains("--force"));
}

// ─────────────────────────────────────────────────────────────────
// Probe Command Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_resolve_help() {
    probe_cmd()
        .arg("resolve")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resolver"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_scan_help() {
    probe_cmd()
        .arg("scan")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--width"))
        .stdout(predicate::str::contains("--monitor"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn test_monitor_help() {
    probe_cmd()
        .arg("monitor")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("HOST"))
        .stdout(predicate::str::contains("cpu001.cm.cluster"));
}

#[test]
fn test_scan_with_invalid_config() {
    probe_cmd()
        .arg("scan")
        .arg("--config")
        .arg("/nonexistent/probe.toml")
        .assert()
        .failure();
}

#[test]
fn test_monitor_with_invalid_config() {
    probe_cmd()
        .arg("monitor")
        .arg("gpu001.cm.cluster")
        .arg("--config")
        .arg("/nonexistent/probe.toml")
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────
// Verbosity Flag Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_verbose_flag() {
    probe_cmd()
        .arg("-v")
        .arg("version")
        .assert()
        .success();
}

#[test]
fn test_quiet_flag() {
    probe_cmd()
        .arg("--quiet")
        .arg("version")
        .assert()
        .success();
}

// ─────────────────────────────────────────────────────────────────
// Error Handling Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_unknown_command() {
    probe_cmd()
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_missing_subcommand() {
    // Running without any command should show help or error
    probe_cmd()
        .assert()
        .failure();
}
