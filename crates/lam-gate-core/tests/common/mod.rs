// crates/lam-gate-core/tests/common/mod.rs
// =============================================================================
// Module: Core Test Helpers
// Description: Shared schema and config fixtures for validation tests.
// Purpose: Reduce duplication across integration tests for lam-gate-core.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeMap;

use lam_gate_core::ConfigObject;
use lam_gate_core::LamSchema;
use lam_gate_core::SambaSchema;
use serde_json::Value;

/// Returns an account manager schema resembling a real extraction.
pub fn lam_schema() -> LamSchema {
    LamSchema {
        login_methods: vec!["list".to_string(), "search".to_string()],
        access_levels: vec![0, 100, 200],
        ..LamSchema::default()
    }
}

/// Returns a directory schema with the curated lists and warning table.
pub fn samba_schema() -> SambaSchema {
    let warning = "Not in default Samba AD schema, may cause errors".to_string();
    SambaSchema {
        version: Some("4.x".to_string()),
        safe_attr_user: strings(&[
            "sAMAccountName",
            "cn",
            "givenName",
            "sn",
            "displayName",
            "mail",
            "description",
        ]),
        safe_attr_group: strings(&["sAMAccountName", "cn", "description", "member"]),
        warnings: BTreeMap::from([
            ("employeeNumber".to_string(), warning.clone()),
            ("department".to_string(), warning.clone()),
            ("title".to_string(), warning),
        ]),
        ..SambaSchema::default()
    }
}

/// Returns a configuration that passes every check without messages.
pub fn valid_config() -> ConfigObject {
    object(serde_json::json!({
        "ServerURL": "ldaps://dc1.haver.internal:636",
        "Admins": "CN=Administrator,CN=Users,DC=haver,DC=internal",
        "loginMethod": "search",
        "accessLevel": 100,
        "typeSettings": {
            "suffix_user": "CN=Users,DC=haver,DC=internal",
            "attr_user": "#sAMAccountName;#givenName;#sn;#mail",
            "attr_group": "#cn;#description"
        },
        "moduleSettings": {
            "windowsUser_0": ["value1", "value2"]
        }
    }))
}

/// Unwraps a JSON object fixture.
pub fn object(value: Value) -> ConfigObject {
    match value {
        Value::Object(map) => map,
        other => panic!("fixture must be an object, got {other}"),
    }
}

/// Converts string slices to owned strings.
pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}
