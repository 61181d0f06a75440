//! Integration tests for koli-cli
//!
//! These tests verify the CLI commands work end-to-end against a temporary
//! database. No test reaches the network.
//! Tests run serially to avoid database lock conflicts.

use assert_cmd::Command;
use predicates::prelude::*;
use serial_test::serial;
use tempfile::TempDir;

/// Get a Command for the koli binary
fn koli() -> Command {
    let mut cmd = Command::cargo_bin("koli").unwrap();
    cmd.env_remove("KOLI_DB_PATH")
        .env_remove("KOLI_PASSWORD")
        .env_remove("KOLI_LICENSE_KEY")
        .env_remove("KOLI_TOKEN_STORE")
        .env_remove("RUST_LOG");
    cmd
}

/// A koli command bound to a fresh database in `dir`, with the session token
/// kept beside it instead of in the OS keychain
fn koli_in(dir: &TempDir) -> Command {
    let mut cmd = koli();
    cmd.arg("--db")
        .arg(dir.path().join("koli.db"))
        .args(["--token-store", "file"]);
    cmd
}

/// Run and parse stdout as JSON
fn json_stdout(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap_or_else(|e| {
        panic!(
            "stdout is not JSON ({}): {}",
            e,
            String::from_utf8_lossy(&output.stdout)
        )
    })
}

// =============================================================================
// Help and Version Tests
// =============================================================================

#[test]
#[serial]
fn test_cli_help() {
    koli()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("koli"))
        .stdout(predicate::str::contains("COMMAND").or(predicate::str::contains("Commands")));
}

#[test]
#[serial]
fn test_cli_version() {
    koli()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("koli"));
}

#[test]
#[serial]
fn test_koli_help_lists_subcommands() {
    koli()
        .args(["koli", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("scan"))
        .stdout(predicate::str::contains("add-item"))
        .stdout(predicate::str::contains("receipt"));
}

#[test]
#[serial]
fn test_orders_help() {
    koli()
        .args(["orders", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("convert"));
}

#[test]
#[serial]
fn test_login_requires_password() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["login", "--user", "u1"])
        .assert()
        .failure();
}

// =============================================================================
// Config Command Tests
// =============================================================================

#[test]
#[serial]
fn test_config_show_suggests_default_url() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("api_base_url"))
        .stdout(predicate::str::contains("ExtWsLiveV2"));
}

#[test]
#[serial]
fn test_config_set_get_roundtrip() {
    let dir = TempDir::new().unwrap();

    koli_in(&dir)
        .args(["config", "set", "api_base_url", "  https://erp.test/Services  "])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set api_base_url = https://erp.test/Services"));

    koli_in(&dir)
        .args(["config", "get", "api_base_url"])
        .assert()
        .success()
        .stdout(predicate::str::diff("https://erp.test/Services\n"));
}

#[test]
#[serial]
fn test_config_company_password_is_masked() {
    let dir = TempDir::new().unwrap();

    koli_in(&dir)
        .args(["config", "set", "company_password", "s3cret"])
        .assert()
        .success()
        .stdout(predicate::str::contains("s3cret").not());

    koli_in(&dir)
        .args(["--format", "json", "config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("****"))
        .stdout(predicate::str::contains("s3cret").not());
}

#[test]
#[serial]
fn test_config_set_rejects_bad_url() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["config", "set", "api_base_url", "erp.test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("http:// or https://"));
}

#[test]
#[serial]
fn test_config_set_unknown_key_fails() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["config", "set", "jira_url", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown config key"));
}

#[test]
#[serial]
fn test_config_reset_clears_values() {
    let dir = TempDir::new().unwrap();

    koli_in(&dir)
        .args(["config", "set", "company_code", "C1"])
        .assert()
        .success();
    koli_in(&dir)
        .args(["--quiet", "config", "reset"])
        .assert()
        .success();
    koli_in(&dir)
        .args(["config", "get", "company_code"])
        .assert()
        .success()
        .stdout(predicate::str::diff("\n"));
}

// =============================================================================
// Session Command Tests
// =============================================================================

#[test]
#[serial]
fn test_status_when_logged_out() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["--format", "json", "status"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"logged_in\": false"));
}

#[test]
#[serial]
fn test_login_without_api_url_fails_before_network() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["login", "--user", "u1", "--password", "p1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("API URL is not configured"));
}

#[test]
#[serial]
fn test_logout_when_logged_out_succeeds() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
}

// =============================================================================
// Data Command Tests
// =============================================================================

#[test]
#[serial]
fn test_data_commands_require_login() {
    let dir = TempDir::new().unwrap();

    for args in [
        vec!["accounts"],
        vec!["inventory"],
        vec!["koli", "list"],
        vec!["koli", "scan", "PK-1"],
        vec!["orders", "list"],
    ] {
        koli_in(&dir)
            .args(&args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Not logged in"));
    }
}

#[test]
#[serial]
fn test_unknown_token_store_is_rejected() {
    let dir = TempDir::new().unwrap();
    koli()
        .arg("--db")
        .arg(dir.path().join("koli.db"))
        .args(["--token-store", "vault", "status"])
        .assert()
        .failure();
}

#[test]
#[serial]
fn test_orphan_token_file_is_cleared_on_start() {
    let dir = TempDir::new().unwrap();
    let token_path = dir.path().join("auth_token");
    std::fs::write(&token_path, "orphan").unwrap();

    let status = json_stdout(koli_in(&dir).args(["--format", "json", "status"]));

    assert_eq!(status["logged_in"], false);
    assert!(!token_path.exists());
}

// =============================================================================
// JSON Output Tests
// =============================================================================

#[test]
#[serial]
fn test_json_config_show_is_parseable() {
    let dir = TempDir::new().unwrap();

    // No URL set, so the suggestion line is printed too
    let rows = json_stdout(koli_in(&dir).args(["--format", "json", "config", "show"]));

    let rows = rows.as_array().unwrap();
    assert_eq!(rows[0]["key"], "api_base_url");
    assert_eq!(rows[0]["source"], "unset");
}

#[test]
#[serial]
fn test_json_config_set_and_get_are_parseable() {
    let dir = TempDir::new().unwrap();

    koli_in(&dir)
        .args(["--format", "json", "config", "set", "company_code", "C1"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let row = json_stdout(koli_in(&dir).args(["--format", "json", "config", "get", "company_code"]));
    assert_eq!(row["value"], "C1");
    assert_eq!(row["source"], "db");
}

#[test]
#[serial]
fn test_json_logout_keeps_stdout_empty() {
    let dir = TempDir::new().unwrap();
    koli_in(&dir)
        .args(["--format", "json", "logout"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Logged out"));
}
