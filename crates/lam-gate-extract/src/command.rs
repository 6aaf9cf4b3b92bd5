// crates/lam-gate-extract/src/command.rs
// ============================================================================
// Module: External Command Runner
// Description: Blocking subprocess seam for container runtime calls.
// Purpose: Isolate process spawning so extraction logic is testable offline.
// Dependencies: Standard library process APIs.
// ============================================================================

//! ## Overview
//! Extraction talks to the outside world only through [`CommandRunner`]. The
//! production [`SystemCommandRunner`] spawns the program, waits for it with no
//! timeout, and captures both streams as lossy UTF-8. Tests substitute a
//! scripted runner.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io;
use std::process::Command;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Container runtime binary.
pub const CONTAINER_RUNTIME: &str = "docker";
/// Placeholder substituted for secrets in rendered command lines.
const REDACTED: &str = "****";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Whether the command exited with status zero.
    pub success: bool,
    /// Captured standard output.
    pub stdout: String,
    /// Captured standard error.
    pub stderr: String,
}

/// Executes external programs to completion.
pub trait CommandRunner {
    /// Runs `program` with `args` and captures its output.
    ///
    /// # Errors
    ///
    /// Returns an I/O error when the program cannot be spawned.
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput>;
}

/// Runner that spawns real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<CommandOutput> {
        let output = Command::new(program).args(args).output()?;
        Ok(CommandOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Renders a command line for diagnostics with `secret` masked.
#[must_use]
pub fn render_command(program: &str, args: &[String], secret: Option<&str>) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        match secret {
            Some(secret) if !secret.is_empty() && arg == secret => rendered.push_str(REDACTED),
            _ => rendered.push_str(arg),
        }
    }
    rendered
}

/// Builds a `docker exec <container> <command...>` argument list.
#[must_use]
pub fn exec_args(container: &str, command: &[&str]) -> Vec<String> {
    let mut args = vec!["exec".to_string(), container.to_string()];
    args.extend(command.iter().map(|part| (*part).to_string()));
    args
}

// ============================================================================
// SECTION: Tests
// ============================================================================
