// crates/lam-gate-extract/src/lam.rs
// ============================================================================
// Module: Account Manager Schema Extraction
// Description: Regex scraping of constants and properties from PHP sources.
// Purpose: Produce the account manager reference schema without running PHP.
// Dependencies: lam-gate-core, regex
// ============================================================================

//! ## Overview
//! Two files under the source root are scanned as plain text:
//!
//! - `lib/config.inc`: `LOGIN_*` string constants, `ACCESS_*` integer
//!   constants, `public $name [= default];` properties, and `validate_*`
//!   functions.
//! - `lib/types.inc`: quoted attribute-name literals, applied to every entity
//!   type alike.
//!
//! Matching is best-effort and never fatal: a missing file leaves its part of
//! the schema empty and raises an [`ExtractionNotice`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use lam_gate_core::ConfigOption;
use lam_gate_core::LamSchema;
use lam_gate_core::schema::ENTITY_TYPES;
use regex::Regex;

use crate::ExtractError;
use crate::ExtractionNotice;
use crate::command::CONTAINER_RUNTIME;
use crate::command::CommandRunner;
use crate::command::render_command;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Config source file, relative to the source root.
pub const CONFIG_SOURCE_FILE: &str = "lib/config.inc";
/// Type source file, relative to the source root.
pub const TYPES_SOURCE_FILE: &str = "lib/types.inc";

/// Login method constants: `const LOGIN_X = 'value'`.
const LOGIN_PATTERN: &str = r#"const\s+LOGIN_(\w+)\s*=\s*['"](\w+)['"]"#;
/// Access level constants: `const ACCESS_X = 100`.
const ACCESS_PATTERN: &str = r"const\s+ACCESS_(\w+)\s*=\s*(\d+)";
/// Public properties: `public $name = default;` or `public $name;`.
const PROPERTY_PATTERN: &str = r"public\s+\$(\w+)(?:\s*=\s*([^;]+))?;";
/// Validation routines: `function validate_name(...)`.
const VALIDATION_PATTERN: &str = r"function\s+validate_(\w+)\s*\([^)]*\)";
/// Quoted attribute literals in type handling code.
const ATTRIBUTE_PATTERN: &str = r#"['"]([a-zA-Z]+Name|mail|description|memberOf)['"]"#;

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Compiled scraping patterns.
struct LamPatterns {
    /// Login method constant pattern.
    login: Regex,
    /// Access level constant pattern.
    access: Regex,
    /// Public property pattern.
    property: Regex,
    /// Validation routine pattern.
    validation: Regex,
    /// Attribute literal pattern.
    attribute: Regex,
}

impl LamPatterns {
    /// Compiles every pattern.
    fn compile() -> Result<Self, String> {
        let compile = |pattern: &str| Regex::new(pattern).map_err(|err| err.to_string());
        Ok(Self {
            login: compile(LOGIN_PATTERN)?,
            access: compile(ACCESS_PATTERN)?,
            property: compile(PROPERTY_PATTERN)?,
            validation: compile(VALIDATION_PATTERN)?,
            attribute: compile(ATTRIBUTE_PATTERN)?,
        })
    }
}

/// Returns the process-wide compiled patterns.
fn patterns() -> Result<&'static LamPatterns, ExtractError> {
    static PATTERNS: OnceLock<Result<LamPatterns, String>> = OnceLock::new();
    PATTERNS
        .get_or_init(LamPatterns::compile)
        .as_ref()
        .map_err(|err| ExtractError::Pattern(err.clone()))
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Result of an account manager extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LamExtraction {
    /// Extracted schema.
    pub schema: LamSchema,
    /// Data gaps encountered along the way.
    pub notices: Vec<ExtractionNotice>,
}

/// Container location to copy a missing source tree from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceContainer {
    /// Container name.
    pub container: String,
    /// Path inside the container.
    pub path: String,
}

/// Returns true when the source root lacks `lib/config.inc`.
///
/// An empty directory left behind by a failed copy counts as missing.
#[must_use]
pub fn source_tree_missing(source_root: &Path) -> bool {
    !source_root.join(CONFIG_SOURCE_FILE).is_file()
}

/// Extracts the schema, first copying the source tree out of `fetch` when
/// [`source_tree_missing`] holds.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] only if a built-in pattern fails to
/// compile.
pub fn extract_lam_schema_with<R: CommandRunner + ?Sized>(
    runner: &R,
    source_root: &Path,
    fetch: Option<&SourceContainer>,
) -> Result<LamExtraction, ExtractError> {
    let mut fetch_notice = None;
    if let Some(source) = fetch
        && source_tree_missing(source_root)
    {
        fetch_notice = fetch_lam_source(runner, source, source_root).err();
    }
    let mut extraction = extract_lam_schema(source_root)?;
    if let Some(notice) = fetch_notice {
        extraction.notices.insert(0, notice);
    }
    Ok(extraction)
}

/// Extracts the account manager schema from a source tree.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] only if a built-in pattern fails to
/// compile; missing files are reported as notices.
pub fn extract_lam_schema(source_root: &Path) -> Result<LamExtraction, ExtractError> {
    let mut extraction = LamExtraction::default();

    match read_source(&source_root.join(CONFIG_SOURCE_FILE)) {
        Some(content) => scan_config_source(&content, &mut extraction.schema)?,
        None => extraction.notices.push(ExtractionNotice::SourceFileMissing {
            path: source_root.join(CONFIG_SOURCE_FILE),
        }),
    }

    let attributes = match read_source(&source_root.join(TYPES_SOURCE_FILE)) {
        Some(content) => scan_type_attributes(&content)?,
        None => {
            extraction.notices.push(ExtractionNotice::SourceFileMissing {
                path: source_root.join(TYPES_SOURCE_FILE),
            });
            Vec::new()
        }
    };
    extraction.schema.type_attributes = ENTITY_TYPES
        .iter()
        .map(|entity| ((*entity).to_string(), attributes.clone()))
        .collect::<BTreeMap<_, _>>();

    Ok(extraction)
}

/// Scans `config.inc` text into the schema's constant and option fields.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if a built-in pattern fails to compile.
pub fn scan_config_source(content: &str, schema: &mut LamSchema) -> Result<(), ExtractError> {
    let patterns = patterns()?;

    schema.login_methods = patterns
        .login
        .captures_iter(content)
        .filter_map(|caps| caps.get(2).map(|value| value.as_str().to_string()))
        .collect();

    schema.access_levels = patterns
        .access
        .captures_iter(content)
        .filter_map(|caps| caps.get(2).and_then(|value| value.as_str().parse::<i64>().ok()))
        .collect();

    for caps in patterns.property.captures_iter(content) {
        if let Some(name) = caps.get(1) {
            let default = caps.get(2).map(|value| value.as_str());
            schema
                .config_options
                .insert(name.as_str().to_string(), ConfigOption::from_default(default));
        }
    }

    schema.validation_rules = patterns
        .validation
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|name| (name.as_str().to_string(), true)))
        .collect();

    Ok(())
}

/// Scans `types.inc` text for attribute literals, sorted and deduplicated.
///
/// # Errors
///
/// Returns [`ExtractError::Pattern`] if a built-in pattern fails to compile.
pub fn scan_type_attributes(content: &str) -> Result<Vec<String>, ExtractError> {
    let patterns = patterns()?;
    let found: BTreeSet<String> = patterns
        .attribute
        .captures_iter(content)
        .filter_map(|caps| caps.get(1).map(|value| value.as_str().to_string()))
        .collect();
    Ok(found.into_iter().collect())
}

/// Copies the source tree out of its container into `dest`.
///
/// Failures are returned as a notice; the caller carries on with whatever is
/// on disk.
pub fn fetch_lam_source<R: CommandRunner + ?Sized>(
    runner: &R,
    source: &SourceContainer,
    dest: &Path,
) -> Result<(), ExtractionNotice> {
    fs::create_dir_all(dest).map_err(|err| ExtractionNotice::SourceFetchFailed {
        container: source.container.clone(),
        detail: err.to_string(),
    })?;
    let args = vec![
        "cp".to_string(),
        format!("{}:{}", source.container, source.path),
        dest.display().to_string(),
    ];
    let failure = |detail: String| ExtractionNotice::SourceFetchFailed {
        container: source.container.clone(),
        detail: format!("{}: {detail}", render_command(CONTAINER_RUNTIME, &args, None)),
    };
    match runner.run(CONTAINER_RUNTIME, &args) {
        Ok(output) if output.success => Ok(()),
        Ok(output) => Err(failure(output.stderr.trim().to_string())),
        Err(err) => Err(failure(err.to_string())),
    }
}

/// Reads a source file as lossy UTF-8, or `None` when it is unreadable.
fn read_source(path: &Path) -> Option<String> {
    fs::read(path).ok().map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
