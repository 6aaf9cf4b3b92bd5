// crates/lam-gate-core/src/target.rs
// ============================================================================
// Module: Target Configuration Loading
// Description: Bounded loading of the account manager configuration under test.
// Purpose: Fail fast with a precise reason before any rule runs.
// Dependencies: serde_json, thiserror
// ============================================================================

//! ## Overview
//! The configuration being validated is externally authored JSON. Loading is
//! the only hard-failure point of validation: a missing file, an unreadable or
//! oversized file, malformed JSON, or a non-object root all stop the run. Any
//! object root is accepted; finding contract violations inside it is the job
//! of [`crate::validation`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::io::ErrorKind;
use std::io::Read;
use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::validation::ConfigObject;
use crate::validation::json_type_name;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum size of a target configuration file.
pub const MAX_TARGET_CONFIG_BYTES: usize = 16 * 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Target configuration loading errors.
#[derive(Debug, Error)]
pub enum TargetConfigError {
    /// The file does not exist.
    #[error("config file not found: {0}")]
    Missing(String),
    /// The file could not be read.
    #[error("failed to read config file {path}: {message}")]
    Io {
        /// Path of the config file.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// The file exceeds the size limit.
    #[error("config file {path} is {size} bytes (limit {limit})")]
    TooLarge {
        /// Path of the config file.
        path: String,
        /// Actual size in bytes.
        size: u64,
        /// Size limit in bytes.
        limit: usize,
    },
    /// The file is not valid JSON.
    #[error("invalid JSON in config file: {0}")]
    Parse(String),
    /// The JSON root is not an object.
    #[error("config root must be a JSON object, found {0}")]
    NotObject(&'static str),
}

// ============================================================================
// SECTION: Loading
// ============================================================================

/// Loads and parses a target configuration file.
///
/// # Errors
///
/// Returns [`TargetConfigError`] when the file is missing, unreadable, too
/// large, not JSON, or not a JSON object.
pub fn load_target_config(path: &Path) -> Result<ConfigObject, TargetConfigError> {
    let bytes = read_with_limit(path, MAX_TARGET_CONFIG_BYTES)?;
    parse_target_config(&bytes)
}

/// Parses target configuration bytes.
///
/// # Errors
///
/// Returns [`TargetConfigError`] when the bytes are not a JSON object.
pub fn parse_target_config(bytes: &[u8]) -> Result<ConfigObject, TargetConfigError> {
    let value: Value =
        serde_json::from_slice(bytes).map_err(|err| TargetConfigError::Parse(err.to_string()))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(TargetConfigError::NotObject(json_type_name(&other))),
    }
}

/// Reads a file while enforcing a hard size limit.
fn read_with_limit(path: &Path, max_bytes: usize) -> Result<Vec<u8>, TargetConfigError> {
    let io_error = |err: std::io::Error| {
        if err.kind() == ErrorKind::NotFound {
            TargetConfigError::Missing(path.display().to_string())
        } else {
            TargetConfigError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            }
        }
    };
    let file = File::open(path).map_err(io_error)?;
    let size = file.metadata().map_err(io_error)?.len();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX);
    if size > limit {
        return Err(TargetConfigError::TooLarge {
            path: path.display().to_string(),
            size,
            limit: max_bytes,
        });
    }
    let mut bytes = Vec::new();
    file.take(limit.saturating_add(1)).read_to_end(&mut bytes).map_err(io_error)?;
    if bytes.len() > max_bytes {
        return Err(TargetConfigError::TooLarge {
            path: path.display().to_string(),
            size: u64::try_from(bytes.len()).unwrap_or(u64::MAX),
            limit: max_bytes,
        });
    }
    Ok(bytes)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test fixtures use explicit asserts and unwraps for clarity."
    )]

    use super::*;

    #[test]
    fn array_root_is_rejected() {
        let err = parse_target_config(b"[1, 2]").unwrap_err();
        assert!(matches!(err, TargetConfigError::NotObject("array")));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_target_config(b"{\"loginMethod\": ").unwrap_err();
        assert!(matches!(err, TargetConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_reported_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_target_config(&dir.path().join("absent.conf")).unwrap_err();
        assert!(matches!(err, TargetConfigError::Missing(_)));
    }

    #[test]
    fn oversized_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("big.conf");
        std::fs::write(&path, b"{\"a\": \"0123456789\"}").unwrap();
        let err = read_with_limit(&path, 4).unwrap_err();
        match err {
            TargetConfigError::TooLarge { size, limit, .. } => {
                assert!(size > 4);
                assert_eq!(limit, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
