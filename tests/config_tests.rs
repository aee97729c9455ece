//! Configuration system tests
//!
//! Tests configuration loading and validation through the binary, since the
//! crate ships as a CLI only.

use std::fs;
use std::path::PathBuf;

use predicates::prelude::*;
use tempfile::TempDir;

/// Test fixture for configuration testing
struct ConfigFixture {
    _temp_dir: TempDir,
    config_path: PathBuf,
}

impl ConfigFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("probe.toml");
        Self {
            _temp_dir: temp_dir,
            config_path,
        }
    }

    fn write_config(&self, content: &str) {
        fs::write(&self.config_path, content).unwrap();
    }

    fn path(&self) -> &str {
        self.config_path.to_str().unwrap()
    }
}

fn probe_cmd() -> assert_cmd::Command {
    assert_cmd::Command::cargo_bin("cluster-probe").unwrap()
}

// ─────────────────────────────────────────────────────────────────
// Valid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_minimal_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[hosts]

[resolver]

[broker]

[scanner]

[logging]
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"));
}

#[test]
fn test_full_config() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[hosts]
ranges = [
    { prefix = "cpu", start = 1, end = 2 },
    { prefix = "gpu", start = 1, end = 22 },
]
domain = ".cm.cluster"

[resolver]
port = 65535
path = "/resolve_coref"
sample_text = "John said he would help Mary. She was grateful."
timeout_secs = 3

[broker]
port = 5672
username = "guest"
password = "guest"
exchange = "ufo"
heartbeat_secs = 600
connect_timeout_secs = 5

[scanner]
width = 10

[logging]
level = "debug"
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success();
}

#[test]
fn test_config_show_reflects_file_values() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[broker]
exchange = "sightings"

[scanner]
width = 3
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("show")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("sightings"))
        .stdout(predicate::str::contains("width = 3"));
}

// ─────────────────────────────────────────────────────────────────
// Invalid Configuration Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_malformed_toml() {
    let fixture = ConfigFixture::new();
    fixture.write_config("this is [not valid toml");

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse"));
}

#[test]
fn test_inverted_host_range() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[hosts]
ranges = [{ prefix = "gpu", start = 9, end = 3 }]
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .failure();
}

#[test]
fn test_zero_scanner_width() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[scanner]
width = 0
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("width"));
}

#[test]
fn test_invalid_log_level() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[logging]
level = "shout"
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("log level"));
}

#[test]
fn test_domain_without_leading_dot() {
    let fixture = ConfigFixture::new();
    fixture.write_config(
        r#"
[hosts]
domain = "cm.cluster"
"#,
    );

    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(fixture.path())
        .assert()
        .failure();
}

// ─────────────────────────────────────────────────────────────────
// Environment Override Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_env_override_rejected_when_invalid() {
    // An invalid level injected through the environment must fail validation
    probe_cmd()
        .arg("config")
        .arg("validate")
        .env("CLUSTER_PROBE_LOG_LEVEL", "bogus")
        .assert()
        .failure();
}

#[test]
fn test_env_override_applies_to_show() {
    probe_cmd()
        .arg("config")
        .arg("show")
        .env("CLUSTER_PROBE_BROKER_EXCHANGE", "telemetry")
        .assert()
        .success()
        .stdout(predicate::str::contains("telemetry"));
}

// ─────────────────────────────────────────────────────────────────
// Config Init Tests
// ─────────────────────────────────────────────────────────────────

#[test]
fn test_config_init_creates_valid_file() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("generated.toml");

    probe_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(target.to_str().unwrap())
        .assert()
        .success();

    assert!(target.exists());

    // The generated file must validate
    probe_cmd()
        .arg("config")
        .arg("validate")
        .arg("--config")
        .arg(target.to_str().unwrap())
        .assert()
        .success();
}

#[test]
fn test_config_init_refuses_overwrite_without_force() {
    let temp_dir = TempDir::new().unwrap();
    let target = temp_dir.path().join("generated.toml");
    fs::write(&target, "# existing").unwrap();

    probe_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(target.to_str().unwrap())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));

    probe_cmd()
        .arg("config")
        .arg("init")
        .arg("--path")
        .arg(target.to_str().unwrap())
        .arg("--force")
        .assert()
        .success();
}
