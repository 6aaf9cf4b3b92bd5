//! Login and structure rule tests for lam-gate-core.
// crates/lam-gate-core/tests/login_structure_validation.rs
// =============================================================================
// Module: Login and Structure Validation Tests
// Description: Rule-level tests for login, admin, and layout checks.
// Purpose: Pin down which findings are errors and which are warnings.
// =============================================================================

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    reason = "Test-only assertions and helpers are permitted."
)]

mod common;

use lam_gate_core::Check;
use lam_gate_core::LamSchema;
use lam_gate_core::validate_config;
use lam_gate_core::validation::check_login;
use lam_gate_core::validation::check_structure;
use serde_json::Value;
use serde_json::json;

use crate::common::lam_schema;
use crate::common::object;
use crate::common::samba_schema;
use crate::common::valid_config;

// ============================================================================
// SECTION: Login Check
// ============================================================================

#[test]
fn valid_config_passes_login_check_cleanly() {
    let outcome = check_login(&valid_config(), &lam_schema());
    assert!(outcome.is_clean(), "unexpected findings: {outcome:?}");
}

#[test]
fn unknown_login_method_is_an_error_listing_valid_values() {
    let mut config = valid_config();
    config.insert("loginMethod".to_string(), json!("fancy"));
    let outcome = check_login(&config, &lam_schema());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("'fancy'"));
    assert!(outcome.errors[0].contains("list, search"));
}

#[test]
fn missing_login_method_is_an_error() {
    let mut config = valid_config();
    config.remove("loginMethod");
    let outcome = check_login(&config, &lam_schema());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("Invalid loginMethod"));
}

#[test]
fn empty_login_method_set_is_only_a_warning() {
    let schema = LamSchema {
        login_methods: Vec::new(),
        ..lam_schema()
    };
    let mut config = valid_config();
    config.insert("loginMethod".to_string(), json!("anything"));
    let outcome = check_login(&config, &schema);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("schema may be incomplete"));
}

#[test]
fn unknown_access_level_is_an_error() {
    let mut config = valid_config();
    config.insert("accessLevel".to_string(), json!(300));
    let outcome = check_login(&config, &lam_schema());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("Invalid accessLevel: 300"));
    assert!(outcome.errors[0].contains("0, 100, 200"));
}

#[test]
fn whole_number_float_access_level_matches_by_value() {
    let mut config = valid_config();
    config.insert("accessLevel".to_string(), json!(100.0));
    assert!(check_login(&config, &lam_schema()).is_clean());

    config.insert("accessLevel".to_string(), json!(100.5));
    assert_eq!(check_login(&config, &lam_schema()).errors.len(), 1);
}

#[test]
fn string_access_level_is_an_error() {
    let mut config = valid_config();
    config.insert("accessLevel".to_string(), json!("100"));
    let outcome = check_login(&config, &lam_schema());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("Invalid accessLevel: 100"));
}

#[test]
fn access_level_is_unchecked_without_reference_levels() {
    let schema = LamSchema {
        access_levels: Vec::new(),
        ..lam_schema()
    };
    let mut config = valid_config();
    config.insert("accessLevel".to_string(), json!(999));
    assert!(check_login(&config, &schema).is_clean());
}

#[test]
fn admins_array_is_a_single_error() {
    let mut config = valid_config();
    config.insert(
        "Admins".to_string(),
        json!(["CN=Administrator,CN=Users,DC=haver,DC=internal", "CN=Ops,DC=haver,DC=internal"]),
    );
    let outcome = check_login(&config, &lam_schema());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("not array"));
}

#[test]
fn admins_joined_with_commas_warns() {
    let mut config = valid_config();
    config.insert(
        "Admins".to_string(),
        json!("CN=Administrator,CN=Users,DC=haver,DC=internal,CN=Ops,CN=Users,DC=haver,DC=internal"),
    );
    let outcome = check_login(&config, &lam_schema());
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("should be semicolon"));
}

#[test]
fn comma_joined_common_names_warn() {
    let mut config = valid_config();
    config.insert("Admins".to_string(), json!("CN=alice,CN=bob"));
    let outcome = check_login(&config, &lam_schema());
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("should be semicolon"));
}

#[test]
fn admins_joined_with_semicolons_is_clean() {
    let mut config = valid_config();
    config.insert(
        "Admins".to_string(),
        json!("CN=Administrator,CN=Users,DC=haver,DC=internal;CN=Ops,CN=Users,DC=haver,DC=internal"),
    );
    assert!(check_login(&config, &lam_schema()).is_clean());
}

#[test]
fn admins_without_cn_prefix_warns_with_truncated_echo() {
    let mut config = valid_config();
    let long_value = format!("uid=admin{}", "x".repeat(80));
    config.insert("Admins".to_string(), Value::String(long_value));
    let outcome = check_login(&config, &lam_schema());
    assert_eq!(outcome.warnings.len(), 1);
    let echoed = outcome.warnings[0].split("Current: ").nth(1).unwrap();
    assert_eq!(echoed.chars().count(), 50);
}

// ============================================================================
// SECTION: Structure Check
// ============================================================================

#[test]
fn valid_config_passes_structure_check_cleanly() {
    assert!(check_structure(&valid_config()).is_clean());
}

#[test]
fn deprecated_keys_yield_one_error_together() {
    let mut config = valid_config();
    config.insert("types".to_string(), json!({}));
    config.insert("modules".to_string(), json!({}));
    let outcome = check_structure(&config);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("deprecated"));
}

#[test]
fn missing_type_settings_is_an_error() {
    let mut config = valid_config();
    config.remove("typeSettings");
    let outcome = check_structure(&config);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("Missing required 'typeSettings' section"));
}

#[test]
fn plain_ldap_server_url_warns() {
    let mut config = valid_config();
    config.insert("ServerURL".to_string(), json!("ldap://dc1.haver.internal:389"));
    let outcome = check_structure(&config);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("ldaps://"));
}

#[test]
fn empty_server_url_is_ignored() {
    let mut config = valid_config();
    config.insert("ServerURL".to_string(), json!(""));
    assert!(check_structure(&config).is_clean());
}

// ============================================================================
// SECTION: Aggregation
// ============================================================================

#[test]
fn report_preserves_check_order() {
    let config = object(json!({
        "loginMethod": "bogus",
        "types": {},
        "typeSettings": {"attr_user": "title"},
        "moduleSettings": {"x": "y"}
    }));
    let report = validate_config(&config, Some(&lam_schema()), Some(&samba_schema()));
    assert_eq!(report.checks_run, Check::ALL.to_vec());
    assert!(report.errors[0].contains("loginMethod"));
    assert!(report.errors[1].contains("accessLevel"));
    assert!(report.errors[2].contains("deprecated"));
    assert!(report.errors[3].contains("title"));
    assert!(report.errors[4].contains("moduleSettings['x']"));
    assert_eq!(report.errors.len(), 5);
    assert!(!report.passed());
}

#[test]
fn warnings_alone_do_not_fail_the_report() {
    let mut config = valid_config();
    config.insert("ServerURL".to_string(), json!("ldap://dc1"));
    let report = validate_config(&config, Some(&lam_schema()), Some(&samba_schema()));
    assert_eq!(report.warnings.len(), 1);
    assert!(report.passed());
}
