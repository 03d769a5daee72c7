//! Integration tests for the `huefdw` CLI binary.
//!
//! Argument parsing, help output, completions, refusals and config
//! handling run without a bridge; the table commands run against a
//! wiremock bridge hosted on a background runtime.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `huefdw` binary with env isolation.
///
/// Clears all `HUEFDW_*` env vars and points the config file at `config`
/// so tests never touch the user's real configuration.
fn huefdw_cmd(config: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("huefdw");
    cmd.env("HOME", "/tmp/huefdw-cli-test-nonexistent")
        .env("XDG_CONFIG_HOME", "/tmp/huefdw-cli-test-nonexistent")
        .env("HUEFDW_CONFIG", config)
        .env_remove("HUEFDW_PROFILE")
        .env_remove("HUEFDW_BRIDGE")
        .env_remove("HUEFDW_USERNAME")
        .env_remove("HUEFDW_KVTYPE")
        .env_remove("HUEFDW_OUTPUT")
        .env_remove("HUEFDW_INSECURE")
        .env_remove("HUEFDW_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn isolated() -> (tempfile::TempDir, assert_cmd::Command) {
    let dir = tempfile::tempdir().unwrap();
    let cmd = huefdw_cmd(&dir.path().join("config.toml"));
    (dir, cmd)
}

/// Concatenate stdout + stderr from a command output for flexible matching.
fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

/// A wiremock bridge on its own runtime; the binary runs synchronously.
struct Bridge {
    runtime: tokio::runtime::Runtime,
    server: MockServer,
}

impl Bridge {
    fn start() -> Self {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let server = runtime.block_on(MockServer::start());
        Self { runtime, server }
    }

    fn mount(&self, mock: Mock) {
        self.runtime.block_on(mock.mount(&self.server));
    }

    fn uri(&self) -> String {
        self.server.uri()
    }

    fn verify(&self) {
        self.runtime.block_on(self.server.verify());
    }
}

fn lights() -> serde_json::Value {
    json!({
        "1": {"name": "Hall", "state": {"on": true, "bri": 254, "reachable": true}},
        "2": {"name": "Desk", "state": {"on": false, "bri": 10, "reachable": true}},
        "3": {"name": "Porch", "state": {"on": true, "bri": 120, "reachable": false}}
    })
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let (_dir, mut cmd) = isolated();
    let output = cmd.output().unwrap();
    assert_eq!(output.status.code(), Some(2), "Expected exit code 2");
    let text = combined_output(&output);
    assert!(text.contains("Usage"), "Expected 'Usage' in output:\n{text}");
}

#[test]
fn test_help_flag() {
    let (_dir, mut cmd) = isolated();
    cmd.arg("--help").assert().success().stdout(
        predicate::str::contains("Hue bridge")
            .and(predicate::str::contains("select"))
            .and(predicate::str::contains("update"))
            .and(predicate::str::contains("columns")),
    );
}

#[test]
fn test_version_flag() {
    let (_dir, mut cmd) = isolated();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("huefdw"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

#[test]
fn test_completions_zsh() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

// ── Error cases ─────────────────────────────────────────────────────

#[test]
fn test_invalid_subcommand() {
    let (_dir, mut cmd) = isolated();
    let output = cmd.arg("foobar").output().unwrap();
    assert!(!output.status.success());
    let text = combined_output(&output);
    assert!(
        text.contains("unrecognized") || text.contains("foobar"),
        "Expected error mentioning invalid subcommand:\n{text}"
    );
}

#[test]
fn test_invalid_kind() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["select", "groups"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_select_without_bridge() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["select", "lights"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No bridge configured"));
}

#[test]
fn test_bad_qualifier_is_usage_error() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", "127.0.0.1:9", "select", "lights", "-w", "brightness"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("missing operator"));
}

#[test]
fn test_update_light_needs_id() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", "127.0.0.1:9", "update", "lights", "--set", "is_on=true"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("light_id"));
}

#[test]
fn test_unknown_profile() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("config.toml");
    std::fs::write(&config, "[profiles.home]\nbridge = \"10.0.0.2\"\n").unwrap();

    huefdw_cmd(&config)
        .args(["--profile", "attic", "select", "lights"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("attic").and(predicate::str::contains("home")));
}

// ── Refused operations ──────────────────────────────────────────────

#[test]
fn test_insert_is_refused() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", "127.0.0.1:9", "insert", "lights", "--set", "light_name=New"])
        .assert()
        .code(5)
        .stderr(predicate::str::contains("insert is not supported on lights"));
}

#[test]
fn test_delete_is_refused_with_payload() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", "127.0.0.1:9", "-o", "json-compact", "delete", "scenes", "ab12cd"])
        .assert()
        .code(5)
        .stdout(predicate::str::contains(r#""operation":"delete""#))
        .stdout(predicate::str::contains(r#""payload":"ab12cd""#));
}

// ── Columns ─────────────────────────────────────────────────────────

#[test]
fn test_columns_plain() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["-o", "plain", "columns", "lights"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("light_id")
                .and(predicate::str::contains("reachable"))
                .and(predicate::str::contains("pointsymbol")),
        );
}

#[test]
fn test_columns_mutable_only() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["-o", "plain", "columns", "sensors", "--mutable"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let (_dir, mut cmd) = isolated();
    cmd.args(["-o", "plain", "columns", "lights", "-m"])
        .assert()
        .success()
        .stdout(predicate::str::contains("is_on").and(predicate::str::contains("reachable").not()));
}

// ── Config ──────────────────────────────────────────────────────────

#[test]
fn test_config_init_show_and_profiles() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("nested").join("config.toml");

    huefdw_cmd(&config)
        .args([
            "config",
            "init",
            "--name",
            "home",
            "--address",
            "192.168.1.20",
            "--plain-username",
            "s3cr3t-user",
        ])
        .assert()
        .success();
    let written = std::fs::read_to_string(&config).unwrap();
    assert!(written.contains("[profiles.home]"));

    huefdw_cmd(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("192.168.1.20").and(predicate::str::contains("s3cr3t").not()));

    huefdw_cmd(&config)
        .args(["config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* home"));
}

#[test]
fn test_config_init_rejects_bad_address() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["config", "init", "--address", "ftp://bridge"])
        .assert()
        .code(2);
}

#[test]
fn test_config_use_unknown_profile() {
    let (_dir, mut cmd) = isolated();
    cmd.args(["config", "use", "attic"]).assert().code(4);
}

// ── Against a bridge ────────────────────────────────────────────────

#[test]
fn test_select_with_qualifier() {
    let bridge = Bridge::start();
    bridge.mount(
        Mock::given(method("GET"))
            .and(path("/api/testuser/lights/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(lights()))
            .expect(1),
    );

    let (_dir, mut cmd) = isolated();
    let output = cmd
        .args(["-b", &bridge.uri(), "-u", "testuser", "-o", "json-compact"])
        .args(["select", "lights", "-c", "light_id,light_name", "-w", "is_on = true"])
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", combined_output(&output));

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        rows,
        json!([
            {"light_id": 1, "light_name": "Hall"},
            {"light_id": 3, "light_name": "Porch"}
        ])
    );
    bridge.verify();
}

#[test]
fn test_select_plain_prints_row_ids() {
    let bridge = Bridge::start();
    bridge.mount(
        Mock::given(method("GET"))
            .and(path("/api/testuser/lights/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(lights())),
    );

    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", &bridge.uri(), "-u", "testuser", "-o", "plain"])
        .args(["select", "lights", "-w", "light_id in 2,3"])
        .assert()
        .success()
        .stdout("2\n3\n");
}

#[test]
fn test_select_unauthorized() {
    let bridge = Bridge::start();
    bridge.mount(
        Mock::given(method("GET"))
            .and(path("/api/stranger/config/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"error": {"type": 1, "address": "/", "description": "unauthorized user"}}
            ]))),
    );

    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", &bridge.uri(), "-u", "stranger", "select", "config"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("does not recognise this username"));
}

#[test]
fn test_update_light() {
    let bridge = Bridge::start();
    bridge.mount(
        Mock::given(method("PUT"))
            .and(path("/api/testuser/lights/1/state"))
            .and(body_json(json!({"on": true, "bri": 200, "transitiontime": 4})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"success": {"/lights/1/state/on": true}},
                {"success": {"/lights/1/state/bri": 200}},
                {"success": {"/lights/1/state/transitiontime": 4}}
            ])))
            .expect(1),
    );

    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", &bridge.uri(), "-u", "testuser", "--color", "never"])
        .args(["update", "lights", "1", "--set", "is_on=true", "--set", "brightness=200"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("is_on = true")
                .and(predicate::str::contains("brightness = 200")),
        );
    bridge.verify();
}

#[test]
fn test_update_partial_failure() {
    let bridge = Bridge::start();
    bridge.mount(
        Mock::given(method("PUT"))
            .and(path("/api/testuser/lights/2/state"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"success": {"/lights/2/state/transitiontime": 4}},
                {"error": {
                    "type": 201,
                    "address": "/lights/2/state/hue",
                    "description": "parameter, hue, is not modifiable. Device is set to off."
                }}
            ]))),
    );

    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", &bridge.uri(), "-u", "testuser", "--color", "never"])
        .args(["update", "lights", "2", "--set", "hue=25000"])
        .assert()
        .code(6)
        .stdout(predicate::str::contains("hue: bridge error 201"))
        .stderr(predicate::str::contains("1 of 2 column(s) were not applied"));
}

#[test]
fn test_update_read_only_column_sends_nothing() {
    let bridge = Bridge::start();
    bridge.mount(
        Mock::given(method("PUT"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0),
    );

    let (_dir, mut cmd) = isolated();
    cmd.args(["-b", &bridge.uri(), "-u", "testuser", "--color", "never"])
        .args(["update", "config", "--set", "mac=00:17:88:00:00:00"])
        .assert()
        .code(6)
        .stdout(predicate::str::contains("nothing sent"));
    bridge.verify();
}
