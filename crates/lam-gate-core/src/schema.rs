// crates/lam-gate-core/src/schema.rs
// ============================================================================
// Module: Reference Schemas
// Description: Data model and JSON persistence for the extracted schemas.
// Purpose: Share one lossless representation between extractors and validator.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Two reference schemas are cached on disk as formatted JSON: the account
//! manager schema ([`LamSchema`]) scraped from its source tree, and the
//! directory schema ([`SambaSchema`]) queried from a running container.
//! Extractors write them with [`save_schema`]; the validator reads them back
//! with [`load_schema`], which reports a missing file as `Ok(None)` so callers
//! can degrade instead of failing.
//!
//! ## Invariants
//! - Map-valued fields use ordered maps so re-serialization is deterministic.
//! - Every field defaults when absent, so partial schema files still load.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Schema version label stamped on account manager schemas.
pub const LAM_SCHEMA_VERSION: &str = "9.3";
/// Schema version label stamped on directory schemas.
pub const SAMBA_SCHEMA_VERSION: &str = "4.x";
/// Entity types that receive a type attribute list.
pub const ENTITY_TYPES: [&str; 3] = ["user", "group", "computer"];
/// Maximum schema file size accepted when loading.
pub const MAX_SCHEMA_FILE_SIZE: usize = 8 * 1024 * 1024;

// ============================================================================
// SECTION: Account Manager Schema
// ============================================================================

/// Default value and requirement flag for one account manager option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigOption {
    /// Default expression as written in source, if any.
    #[serde(default)]
    pub default: Option<String>,
    /// Whether the option has no usable default.
    #[serde(default)]
    pub required: bool,
}

impl ConfigOption {
    /// Builds an option from an optional default expression.
    ///
    /// An option is required when it has no default or its default mentions
    /// `null` in any letter case.
    #[must_use]
    pub fn from_default(default: Option<&str>) -> Self {
        let default = default.map(|value| value.trim().to_string());
        let required =
            default.as_deref().is_none_or(|value| value.to_ascii_lowercase().contains("null"));
        Self {
            default,
            required,
        }
    }
}

/// Reference schema scraped from the account manager source tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LamSchema {
    /// Application version the scraping patterns were written for.
    #[serde(default)]
    pub version: Option<String>,
    /// Accepted login method identifiers.
    #[serde(default)]
    pub login_methods: Vec<String>,
    /// Accepted numeric access levels.
    #[serde(default)]
    pub access_levels: Vec<i64>,
    /// Public configuration options keyed by property name.
    #[serde(default)]
    pub config_options: BTreeMap<String, ConfigOption>,
    /// Validation routines found in source, keyed by rule name.
    #[serde(default)]
    pub validation_rules: BTreeMap<String, bool>,
    /// Attribute names per entity type.
    #[serde(default)]
    pub type_attributes: BTreeMap<String, Vec<String>>,
}

impl Default for LamSchema {
    fn default() -> Self {
        Self {
            version: Some(LAM_SCHEMA_VERSION.to_string()),
            login_methods: Vec::new(),
            access_levels: Vec::new(),
            config_options: BTreeMap::new(),
            validation_rules: BTreeMap::new(),
            type_attributes: BTreeMap::new(),
        }
    }
}

// ============================================================================
// SECTION: Directory Schema
// ============================================================================

/// Curated description of a common directory user attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    /// Human-readable description.
    pub description: String,
    /// Whether every user object carries the attribute.
    #[serde(default)]
    pub required: bool,
    /// Whether the attribute holds multiple values.
    #[serde(default)]
    pub multi_valued: bool,
    /// Optional caveat for attributes missing from the default schema.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Reference schema queried from the directory service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SambaSchema {
    /// Directory service version family.
    #[serde(default)]
    pub version: Option<String>,
    /// Every schema attribute name, sorted.
    #[serde(default)]
    pub all_attributes: Vec<String>,
    /// Attributes observed on a live user object, sorted.
    #[serde(default)]
    pub default_user_attributes: Vec<String>,
    /// Hand-maintained descriptions of common user attributes.
    #[serde(default)]
    pub common_user_attributes: BTreeMap<String, AttributeInfo>,
    /// User attributes known to work in account manager list views.
    #[serde(default)]
    pub safe_attr_user: Vec<String>,
    /// Group attributes known to work in account manager list views.
    #[serde(default)]
    pub safe_attr_group: Vec<String>,
    /// Known-problematic attributes and why they break.
    #[serde(default)]
    pub warnings: BTreeMap<String, String>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Schema persistence errors.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// I/O failure while reading or writing a schema file.
    #[error("schema io error at {path}: {message}")]
    Io {
        /// Path of the schema file.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Schema file exceeds the size limit.
    #[error("schema file {path} is {size} bytes (limit {limit})")]
    TooLarge {
        /// Path of the schema file.
        path: String,
        /// Actual size in bytes.
        size: usize,
        /// Size limit in bytes.
        limit: usize,
    },
    /// Schema file is not valid JSON for the expected shape.
    #[error("schema parse error at {path}: {message}")]
    Parse {
        /// Path of the schema file.
        path: String,
        /// Underlying error message.
        message: String,
    },
    /// Schema could not be serialized.
    #[error("schema serialize error: {0}")]
    Serialize(String),
}

// ============================================================================
// SECTION: Persistence
// ============================================================================

/// Loads a schema file, returning `Ok(None)` when it does not exist.
///
/// # Errors
///
/// Returns [`SchemaError`] when the file cannot be read, is too large, or does
/// not parse into `T`.
pub fn load_schema<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, SchemaError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(SchemaError::Io {
                path: path.display().to_string(),
                message: err.to_string(),
            });
        }
    };
    if bytes.len() > MAX_SCHEMA_FILE_SIZE {
        return Err(SchemaError::TooLarge {
            path: path.display().to_string(),
            size: bytes.len(),
            limit: MAX_SCHEMA_FILE_SIZE,
        });
    }
    serde_json::from_slice(&bytes).map(Some).map_err(|err| SchemaError::Parse {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

/// Writes a schema as two-space indented JSON, creating parent directories.
///
/// Existing files are overwritten.
///
/// # Errors
///
/// Returns [`SchemaError`] when serialization or any filesystem write fails.
pub fn save_schema<T: Serialize>(path: &Path, schema: &T) -> Result<(), SchemaError> {
    let mut content =
        serde_json::to_string_pretty(schema).map_err(|err| SchemaError::Serialize(err.to_string()))?;
    content.push('\n');
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|err| SchemaError::Io {
            path: parent.display().to_string(),
            message: err.to_string(),
        })?;
    }
    fs::write(path, content.as_bytes()).map_err(|err| SchemaError::Io {
        path: path.display().to_string(),
        message: err.to_string(),
    })
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions are permitted."
    )]

    use super::*;

    #[test]
    fn option_without_default_is_required() {
        let option = ConfigOption::from_default(None);
        assert!(option.required);
        assert_eq!(option.default, None);
    }

    #[test]
    fn option_with_null_default_is_required() {
        let option = ConfigOption::from_default(Some(" NULL "));
        assert!(option.required);
        assert_eq!(option.default.as_deref(), Some("NULL"));
    }

    #[test]
    fn option_with_literal_default_is_optional() {
        let option = ConfigOption::from_default(Some("'ldap://localhost'"));
        assert!(!option.required);
    }

    #[test]
    fn lam_schema_uses_camel_case_keys() {
        let value = serde_json::to_value(LamSchema::default()).unwrap();
        let object = value.as_object().unwrap();
        for key in ["loginMethods", "accessLevels", "configOptions", "validationRules", "typeAttributes"]
        {
            assert!(object.contains_key(key), "missing key {key}");
        }
    }

    #[test]
    fn attribute_warning_is_omitted_when_absent() {
        let info = AttributeInfo {
            description: "Common name".to_string(),
            required: true,
            multi_valued: false,
            warning: None,
        };
        let value = serde_json::to_value(info).unwrap();
        assert!(value.get("warning").is_none());
    }

    #[test]
    fn partial_samba_schema_loads_with_defaults() {
        let schema: SambaSchema = serde_json::from_str(r#"{"safe_attr_user": ["cn"]}"#).unwrap();
        assert_eq!(schema.safe_attr_user, vec!["cn".to_string()]);
        assert!(schema.warnings.is_empty());
    }
}
