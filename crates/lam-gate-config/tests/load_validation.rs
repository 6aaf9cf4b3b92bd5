//! Config load and validation tests for lam-gate-config.
// crates/lam-gate-config/tests/load_validation.rs
// =============================================================================
// Module: Config Load Validation Tests
// Description: Defaults, file loading, and fail-closed validation.
// Purpose: Ensure lam-gate.toml is parsed strictly with sane defaults.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::fs;
use std::path::PathBuf;

use lam_gate_config::ConfigError;
use lam_gate_config::GateConfig;
use tempfile::tempdir;

type TestResult = Result<(), String>;

/// Assert that parsing fails with an invalid-config message containing `needle`.
fn assert_invalid(toml: &str, needle: &str) -> TestResult {
    match GateConfig::parse(toml) {
        Err(ConfigError::Invalid(message)) if message.contains(needle) => Ok(()),
        Err(other) => Err(format!("unexpected error '{other}', wanted '{needle}'")),
        Ok(_) => Err("expected invalid config".to_string()),
    }
}

#[test]
fn empty_file_yields_conventional_layout() {
    let config = GateConfig::parse("").unwrap();
    assert_eq!(config, GateConfig::default());
    assert_eq!(config.paths.lam_source_path(), PathBuf::from("docs/lam/source"));
    assert_eq!(
        config.paths.lam_schema_path(),
        PathBuf::from("docs/reference/lam-config-schema.json")
    );
    assert_eq!(config.paths.samba_schema_path(), PathBuf::from("docs/reference/samba-schema.json"));
    assert_eq!(config.samba.container, "Samba-AD");
    assert_eq!(config.lam.container, "Samba-AD-LAM");
    assert!(config.lam.fetch_missing_source);
    assert!(!config.audit.enabled);
}

#[test]
fn sections_override_defaults() {
    let config = GateConfig::parse(
        r#"
[paths]
samba_schema = "snapshots/samba.json"

[samba]
container = "dc1"
search_base = "OU=Staff,DC=example,DC=org"

[lam]
fetch_missing_source = false

[audit]
enabled = true
path = "gate-audit.jsonl"
"#,
    )
    .unwrap();
    assert_eq!(config.paths.samba_schema_path(), PathBuf::from("snapshots/samba.json"));
    assert_eq!(config.samba.container, "dc1");
    assert_eq!(config.samba.search_base, "OU=Staff,DC=example,DC=org");
    assert_eq!(config.samba.ldap_uri, "ldaps://127.0.0.1:636");
    assert!(!config.lam.fetch_missing_source);
    assert_eq!(config.audit.path.as_deref(), Some("gate-audit.jsonl"));
}

#[test]
fn malformed_toml_is_a_parse_error() {
    assert!(matches!(GateConfig::parse("[paths"), Err(ConfigError::Parse(_))));
}

#[test]
fn empty_container_is_rejected() -> TestResult {
    assert_invalid("[samba]\ncontainer = \"\"", "samba.container must be non-empty")
}

#[test]
fn container_with_spaces_is_rejected() -> TestResult {
    assert_invalid("[lam]\ncontainer = \"my container\"", "lam.container may only contain")
}

#[test]
fn non_ldap_uri_is_rejected() -> TestResult {
    assert_invalid("[samba]\nldap_uri = \"https://dc1\"", "samba.ldap_uri")
}

#[test]
fn unparenthesized_filter_is_rejected() -> TestResult {
    assert_invalid("[samba]\nuser_filter = \"objectClass=user\"", "samba.user_filter")
}

#[test]
fn bad_password_env_name_is_rejected() -> TestResult {
    assert_invalid("[samba]\npassword_env = \"SAMBA PASS\"", "samba.password_env")
}

#[test]
fn blank_schema_path_is_rejected() -> TestResult {
    assert_invalid("[paths]\nlam_schema = \"  \"", "paths.lam_schema must be non-empty")
}

#[test]
fn explicit_missing_file_fails_closed() {
    let dir = tempdir().unwrap();
    let result = GateConfig::load(Some(&dir.path().join("absent.toml")));
    assert!(matches!(result, Err(ConfigError::Io(_))));
}

#[test]
fn explicit_file_is_loaded() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lam-gate.toml");
    fs::write(&path, "[samba]\ncontainer = \"dc2\"\n").unwrap();
    let config = GateConfig::load(Some(&path)).unwrap();
    assert_eq!(config.samba.container, "dc2");
}

#[test]
fn oversized_file_is_rejected() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lam-gate.toml");
    let padding = format!("# {}\n", "x".repeat(1024 * 1024));
    fs::write(&path, padding).unwrap();
    let result = GateConfig::load(Some(&path));
    assert!(matches!(result, Err(ConfigError::Invalid(message)) if message.contains("size limit")));
}
