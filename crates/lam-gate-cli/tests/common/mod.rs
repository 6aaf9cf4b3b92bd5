// crates/lam-gate-cli/tests/common/mod.rs
// =============================================================================
// Module: CLI Test Helpers
// Description: Scratch workspaces and binary invocation for lam-gate.
// Purpose: Run the built binary against isolated temp directories.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::fs;
use std::path::Path;
use std::process::Command;
use std::process::Output;

use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;
use tempfile::tempdir;

/// Scratch directory holding a `lam-gate.toml` with relative default paths.
pub struct Workspace {
    /// Backing temp directory.
    pub dir: TempDir,
}

impl Workspace {
    /// Creates a workspace whose tool config disables source fetching.
    pub fn new() -> Self {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("lam-gate.toml"),
            "[lam]\nfetch_missing_source = false\n\n[samba]\npassword_env = \
             \"LAM_GATE_TEST_UNSET_PASSWORD\"\n",
        )
        .unwrap();
        Self { dir }
    }

    /// Returns the workspace root.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Appends TOML text to the workspace's `lam-gate.toml`.
    pub fn append_tool_config(&self, toml: &str) {
        let path = self.path().join("lam-gate.toml");
        let mut content = fs::read_to_string(&path).unwrap();
        content.push_str(toml);
        fs::write(path, content).unwrap();
    }

    /// Writes `value` as JSON to `relative`, creating parents.
    pub fn write_json(&self, relative: &str, value: &Value) {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, serde_json::to_vec_pretty(value).unwrap()).unwrap();
    }

    /// Writes both reference schemas at their default locations.
    pub fn write_schemas(&self) {
        self.write_json("docs/reference/lam-config-schema.json", &lam_schema());
        self.write_json("docs/reference/samba-schema.json", &samba_schema());
    }

    /// Runs the binary inside the workspace.
    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_lam-gate"))
            .args(args)
            .arg("--config")
            .arg(self.path().join("lam-gate.toml"))
            .current_dir(self.path())
            .env_remove("LAM_GATE_CONFIG")
            .output()
            .unwrap()
    }
}

/// Account manager schema as written by `extract-lam`.
pub fn lam_schema() -> Value {
    json!({
        "version": "9.3",
        "loginMethods": ["list", "search"],
        "accessLevels": [0, 100, 200],
        "configOptions": {},
        "validationRules": {},
        "typeAttributes": {}
    })
}

/// Directory schema as written by `extract-samba`.
pub fn samba_schema() -> Value {
    let reason = "Not in default Samba AD schema, may cause errors";
    json!({
        "version": "4.x",
        "all_attributes": [],
        "default_user_attributes": [],
        "common_user_attributes": {},
        "safe_attr_user": ["sAMAccountName", "cn", "givenName", "sn", "displayName", "mail", "description"],
        "safe_attr_group": ["sAMAccountName", "cn", "description", "member"],
        "warnings": {"employeeNumber": reason, "department": reason, "title": reason}
    })
}

/// A target configuration every check accepts.
pub fn valid_config() -> Value {
    json!({
        "ServerURL": "ldaps://dc1.haver.internal:636",
        "Admins": "CN=Administrator,CN=Users,DC=haver,DC=internal",
        "loginMethod": "list",
        "accessLevel": 100,
        "typeSettings": {
            "attr_user": "#sAMAccountName;#givenName;#sn;#mail",
            "attr_group": "#cn;#description"
        },
        "moduleSettings": {"posixAccount_shells": ["/bin/bash"]}
    })
}

/// Returns captured stdout as text.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Returns captured stderr as text.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
