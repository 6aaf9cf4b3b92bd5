// crates/lam-gate-extract/tests/common/mod.rs
// =============================================================================
// Module: Extract Test Helpers
// Description: Scripted command runner and source tree fixtures.
// Purpose: Exercise extractors without a container runtime.
// =============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::Path;

use lam_gate_extract::CommandOutput;
use lam_gate_extract::CommandRunner;

/// Scripted reply keyed by a substring of the rendered argument list.
pub enum Reply {
    /// Command exits zero with this stdout.
    Ok(&'static str),
    /// Command exits non-zero with this stderr.
    Fail(&'static str),
    /// Command cannot be spawned.
    Spawn,
}

/// Command runner that answers from a script and records every call.
#[derive(Default)]
pub struct ScriptedRunner {
    /// Replies in match order.
    replies: Vec<(&'static str, Reply)>,
    /// Recorded argument lists.
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    /// Adds a reply used when the joined args contain `needle`.
    pub fn on(mut self, needle: &'static str, reply: Reply) -> Self {
        self.replies.push((needle, reply));
        self
    }

    /// Returns the recorded argument lists.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, _program: &str, args: &[String]) -> io::Result<CommandOutput> {
        self.calls.borrow_mut().push(args.to_vec());
        let joined = args.join(" ");
        let reply = self.replies.iter().find(|(needle, _)| joined.contains(needle));
        match reply {
            Some((_, Reply::Ok(stdout))) => Ok(CommandOutput {
                success: true,
                stdout: (*stdout).to_string(),
                stderr: String::new(),
            }),
            Some((_, Reply::Fail(stderr))) => Ok(CommandOutput {
                success: false,
                stdout: String::new(),
                stderr: (*stderr).to_string(),
            }),
            Some((_, Reply::Spawn)) | None => {
                Err(io::Error::new(io::ErrorKind::NotFound, "docker not found"))
            }
        }
    }
}

/// Minimal `lib/config.inc` with every construct the scanner understands.
pub const CONFIG_INC: &str = r#"<?php
class LAMConfig {
    const LOGIN_LIST = 'list';
    const LOGIN_SEARCH = "search";
    const ACCESS_READ_ONLY = 0;
    const ACCESS_PASSWORDS = 100;
    const ACCESS_ALL = 200;
    public $ServerURL = "ldaps://localhost";
    public $treesuffix;
    public $cachetimeout = null;
    public $Admins   = 'cn=admin' ;
    function validate_ServerURL($value) { return true; }
    function validate_Admins( $a, $b ) { return true; }
}
"#;

/// Minimal `lib/types.inc` with repeated attribute literals.
pub const TYPES_INC: &str = r#"<?php
$attrs = array('sAMAccountName', "displayName", 'mail', 'memberOf', 'mail');
$other = 'description';
$ignored = 'uidNumber';
"#;

/// Writes a source tree under `root`.
pub fn write_source_tree(root: &Path, config: Option<&str>, types: Option<&str>) {
    fs::create_dir_all(root.join("lib")).unwrap();
    if let Some(config) = config {
        fs::write(root.join("lib/config.inc"), config).unwrap();
    }
    if let Some(types) = types {
        fs::write(root.join("lib/types.inc"), types).unwrap();
    }
}
