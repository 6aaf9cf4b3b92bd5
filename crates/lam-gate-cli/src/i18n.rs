// crates/lam-gate-cli/src/i18n.rs
// ============================================================================
// Module: CLI Message Catalog
// Description: Message catalog and placeholder substitution for the CLI.
// Purpose: Centralize user-facing strings so wording stays consistent.
// Dependencies: Standard library collections.
// ============================================================================

//! ## Overview
//! Every line the `lam-gate` binary prints comes from [`CATALOG`] through the
//! [`t!`](crate::t) macro. Templates use `{name}` placeholders.
//!
//! ## Invariants
//! - The catalog is built once and read-only thereafter.
//! - Missing keys fall back to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static English catalog entries.
pub const CATALOG: &[(&str, &str)] = &[
    ("main.version", "lam-gate {version}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.rule", "======================================================================"),
    ("config.load_failed", "Failed to load lam-gate config: {error}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("extract.notice", "Warning: {notice}"),
    ("extract.failed", "Extraction failed: {error}"),
    ("extract.write_failed", "Failed to write schema: {error}"),
    ("extract.none_found", "None found"),
    (
        "extract.lam.fetching",
        "LAM source not found. Extracting from container '{container}'...",
    ),
    ("extract.lam.scanning", "Extracting LAM schema from {path}..."),
    ("extract.lam.summary.header", "Extracted LAM schema to {path}"),
    ("extract.lam.summary.options", "  - Config options: {count}"),
    ("extract.lam.summary.login_methods", "  - Login methods: {methods}"),
    ("extract.lam.summary.access_levels", "  - Access levels: {levels}"),
    ("extract.lam.summary.types", "  - Type attributes: {types}"),
    (
        "extract.lam.hint.no_login_methods",
        "Warning: No login methods found. Check LAM source extraction.",
    ),
    (
        "extract.lam.hint.copy_source",
        "   Run: docker cp {container}:{source} {path}",
    ),
    ("extract.samba.starting", "Extracting Samba AD schema from container '{container}'..."),
    (
        "extract.samba.not_running",
        "Container '{container}' is not running\n   Start the container and try again",
    ),
    ("extract.samba.summary.header", "Extracted Samba schema to {path}"),
    ("extract.samba.summary.total", "  - Total attributes: {count}"),
    ("extract.samba.summary.user_objects", "  - User object attributes: {count}"),
    ("extract.samba.summary.safe_user", "  - Safe attr_user attributes: {attributes}"),
    ("extract.samba.summary.warnings", "  - Attributes with warnings: {count}"),
    (
        "extract.samba.hint.no_user_objects",
        "Note: Could not query actual user objects (needs domain password)\n   Set {env} for a \
         complete attribute list",
    ),
    ("validate.loading_schemas", "Loading schemas..."),
    (
        "validate.schema_missing",
        "Warning: schema file not found: {path}\n   Run the extract commands first to generate \
         schemas",
    ),
    ("validate.schema_invalid", "Warning: ignoring unreadable schema {path}: {error}"),
    (
        "validate.no_schemas",
        "Warning: no schemas found; login and attribute checks are skipped\n   Run: lam-gate \
         extract-lam\n   Run: lam-gate extract-samba",
    ),
    ("validate.loading_config", "Loading config: {path}"),
    ("validate.config_failed", "{error}"),
    ("validate.title", "Validating LAM Configuration"),
    ("validate.progress.login", "Checking login configuration..."),
    ("validate.progress.structure", "Checking config structure..."),
    ("validate.progress.attributes", "Checking attributes against Samba schema..."),
    ("validate.progress.module_settings", "Checking module settings..."),
    ("validate.results.title", "Validation Results"),
    ("validate.results.failed", "VALIDATION FAILED: {count} error(s)"),
    ("validate.results.warnings", "{count} warning(s)"),
    ("validate.results.item", "{index}. {message}"),
    ("validate.results.skipped", "Skipped checks: {checks}"),
    ("validate.results.success", "Configuration validated successfully!\n   All checks passed"),
    ("validate.results.passed_with_warnings", "Configuration passed with warnings"),
    ("validate.json_failed", "Failed to render report: {error}"),
];

/// Returns the catalog as a lookup map.
pub(crate) fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG_MAP: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();
    CATALOG_MAP.get_or_init(|| CATALOG.iter().copied().collect())
}

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Looks up `key` and substitutes `args` into its placeholders.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Formats a catalog message from a key and named arguments.
///
/// # Arguments
///
/// - `$key` must match a catalog entry.
/// - Named arguments are substituted into `{placeholder}` positions.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $(
                $crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),
            )*
        ];
        $crate::i18n::translate($key, args)
    }};
}
