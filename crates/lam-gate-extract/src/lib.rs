// crates/lam-gate-extract/src/lib.rs
// ============================================================================
// Module: LAM Gate Extract Library
// Description: Reference schema extractors for the account manager and the
//              directory service.
// Purpose: Refresh the cached schemas the validator checks against.
// Dependencies: lam-gate-core, regex, thiserror
// ============================================================================

//! ## Overview
//! Two extractors feed the cached reference schemas:
//!
//! - [`lam`] scrapes the account manager's PHP sources with regular
//!   expressions.
//! - [`samba`] queries the running directory container through the
//!   [`command::CommandRunner`] seam.
//!
//! Gaps in the data are reported as [`ExtractionNotice`] values next to the
//! schema. Only conditions that make extraction meaningless are
//! [`ExtractError`]s.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod command;
pub mod lam;
pub mod samba;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use command::CommandOutput;
pub use command::CommandRunner;
pub use command::SystemCommandRunner;
pub use lam::LamExtraction;
pub use lam::SourceContainer;
pub use lam::extract_lam_schema;
pub use lam::extract_lam_schema_with;
pub use lam::source_tree_missing;
pub use samba::SambaExtraction;
pub use samba::SambaQuery;
pub use samba::extract_samba_schema;

// ============================================================================
// SECTION: Notices
// ============================================================================

/// Non-fatal data gap observed during extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionNotice {
    /// A source file to scan does not exist.
    SourceFileMissing {
        /// Expected file location.
        path: PathBuf,
    },
    /// Copying the source tree out of its container failed.
    SourceFetchFailed {
        /// Container the copy was attempted from.
        container: String,
        /// Failure detail.
        detail: String,
    },
    /// An external command failed; secrets are already masked.
    CommandFailed {
        /// Rendered command line.
        command: String,
        /// Captured error output.
        detail: String,
    },
    /// The schema attribute listing came back empty.
    EmptyAttributeList,
    /// No bind password was available for the user-object query.
    PasswordMissing {
        /// Environment variable that was consulted.
        env_var: String,
    },
    /// The user-object query yielded no attributes.
    EmptyUserQuery,
}

impl fmt::Display for ExtractionNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SourceFileMissing { path } => {
                write!(f, "source file not found: {}", path.display())
            }
            Self::SourceFetchFailed { container, detail } => {
                write!(f, "failed to copy source from container '{container}': {detail}")
            }
            Self::CommandFailed { command, detail } => {
                write!(f, "command failed: {command}: {detail}")
            }
            Self::EmptyAttributeList => f.write_str("schema attribute list is empty"),
            Self::PasswordMissing { env_var } => {
                write!(f, "{env_var} is not set; skipping user object query")
            }
            Self::EmptyUserQuery => f.write_str("user object query returned no attributes"),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal extraction failures.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The directory container is not running.
    #[error("container '{container}' is not running")]
    ContainerNotRunning {
        /// Container name that was checked.
        container: String,
    },
    /// A built-in pattern failed to compile.
    #[error("pattern compile error: {0}")]
    Pattern(String),
}
