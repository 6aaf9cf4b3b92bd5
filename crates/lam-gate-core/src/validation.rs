// crates/lam-gate-core/src/validation.rs
// ============================================================================
// Module: Configuration Validation Rules
// Description: Independent checks of an account manager config against schemas.
// Purpose: Report contract violations before a configuration is deployed.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! A target configuration is an arbitrary JSON object. Four independent
//! checks inspect it and each returns a [`CheckOutcome`] with ordered error and
//! warning messages:
//!
//! - [`check_login`]: `loginMethod`, `accessLevel` and `Admins`.
//! - [`check_structure`]: deprecated and required top-level sections, `ServerURL`.
//! - [`check_attributes`]: `typeSettings.attr_user` / `attr_group` tokens.
//! - [`check_module_settings`]: every `moduleSettings` value is an array.
//!
//! [`validate_config`] runs all checks in a fixed order and concatenates their
//! messages into a [`ValidationReport`]. Checks needing a schema are skipped
//! when that schema is unavailable.
//!
//! ## Invariants
//! - Checks are pure and never short-circuit each other.
//! - A report passes exactly when it holds no errors; warnings never fail it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::schema::LamSchema;
use crate::schema::SambaSchema;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Key of the login method setting.
const LOGIN_METHOD_KEY: &str = "loginMethod";
/// Key of the access level setting.
const ACCESS_LEVEL_KEY: &str = "accessLevel";
/// Key of the administrator DN list.
const ADMINS_KEY: &str = "Admins";
/// Key of the directory server URL.
const SERVER_URL_KEY: &str = "ServerURL";
/// Key of the per-type settings section.
const TYPE_SETTINGS_KEY: &str = "typeSettings";
/// Key of the module settings section.
const MODULE_SETTINGS_KEY: &str = "moduleSettings";
/// Top-level keys from the pre-9.x layout.
const DEPRECATED_KEYS: [&str; 2] = ["types", "modules"];
/// Separator between entries of a delimited list.
const LIST_SEPARATOR: char = ';';
/// Marker prefix for predefined or disabled list attributes.
const ATTRIBUTE_MARKER: char = '#';
/// Required prefix of an administrator DN.
const ADMIN_DN_PREFIX: &str = "CN=";
/// Required scheme of the directory server URL.
const SECURE_URL_SCHEME: &str = "ldaps://";
/// Example administrator DN used in messages.
const EXAMPLE_ADMIN_DN: &str = "CN=Administrator,CN=Users,DC=haver,DC=internal";
/// Maximum characters of a value echoed back in a message.
const MAX_ECHO_CHARS: usize = 50;

/// Target configuration root object.
pub type ConfigObject = Map<String, Value>;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Identifies one validation check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    /// Login method, access level and administrator checks.
    Login,
    /// Top-level structure checks.
    Structure,
    /// List attribute checks against the directory schema.
    Attributes,
    /// Module settings shape checks.
    ModuleSettings,
}

impl Check {
    /// Every check in execution order.
    pub const ALL: [Self; 4] = [Self::Login, Self::Structure, Self::Attributes, Self::ModuleSettings];

    /// Returns the stable label of the check.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Structure => "structure",
            Self::Attributes => "attributes",
            Self::ModuleSettings => "module_settings",
        }
    }
}

/// Ordered messages produced by a single check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckOutcome {
    /// Violations that must block deployment.
    pub errors: Vec<String>,
    /// Advisory findings.
    pub warnings: Vec<String>,
}

impl CheckOutcome {
    /// Returns true when the check produced no messages.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Aggregated result of a validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Errors in check order, then message order.
    pub errors: Vec<String>,
    /// Warnings in check order, then message order.
    pub warnings: Vec<String>,
    /// Checks that ran.
    pub checks_run: Vec<Check>,
    /// Checks skipped because their schema was unavailable.
    pub skipped_checks: Vec<Check>,
}

impl ValidationReport {
    /// Returns true when no check produced an error.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.errors.is_empty()
    }

    /// Appends one check outcome, preserving message order.
    fn absorb(&mut self, check: Check, outcome: CheckOutcome) {
        self.checks_run.push(check);
        self.errors.extend(outcome.errors);
        self.warnings.extend(outcome.warnings);
    }
}

// ============================================================================
// SECTION: Orchestration
// ============================================================================

/// Runs every applicable check and aggregates the results.
#[must_use]
pub fn validate_config(
    config: &ConfigObject,
    lam: Option<&LamSchema>,
    samba: Option<&SambaSchema>,
) -> ValidationReport {
    validate_config_with(config, lam, samba, |_| {})
}

/// Runs every applicable check, calling `on_check` before each one runs.
pub fn validate_config_with<F>(
    config: &ConfigObject,
    lam: Option<&LamSchema>,
    samba: Option<&SambaSchema>,
    mut on_check: F,
) -> ValidationReport
where
    F: FnMut(Check),
{
    let mut report = ValidationReport::default();
    for check in Check::ALL {
        let outcome = match check {
            Check::Login => lam.map(|schema| {
                on_check(check);
                check_login(config, schema)
            }),
            Check::Structure => {
                on_check(check);
                Some(check_structure(config))
            }
            Check::Attributes => samba.map(|schema| {
                on_check(check);
                check_attributes(config, schema)
            }),
            Check::ModuleSettings => {
                on_check(check);
                Some(check_module_settings(config))
            }
        };
        match outcome {
            Some(outcome) => report.absorb(check, outcome),
            None => report.skipped_checks.push(check),
        }
    }
    report
}

// ============================================================================
// SECTION: Login Check
// ============================================================================

/// Checks login method, access level and the administrator list.
#[must_use]
pub fn check_login(config: &ConfigObject, schema: &LamSchema) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    let login_method = config.get(LOGIN_METHOD_KEY);
    if schema.login_methods.is_empty() {
        outcome
            .warnings
            .push("LAM schema has no login methods defined - schema may be incomplete".to_string());
    } else {
        let accepted = login_method
            .and_then(Value::as_str)
            .is_some_and(|method| schema.login_methods.iter().any(|known| known == method));
        if !accepted {
            outcome.errors.push(format!(
                "Invalid loginMethod: '{}'\n   Valid values: {}\n   Source: LAM source code \
                 lib/config.inc",
                display_value(login_method),
                schema.login_methods.join(", ")
            ));
        }
    }

    let access_level = config.get(ACCESS_LEVEL_KEY);
    if !schema.access_levels.is_empty() {
        let accepted = access_level
            .is_some_and(|value| schema.access_levels.iter().any(|level| is_level(value, *level)));
        if !accepted {
            let levels: Vec<String> = schema.access_levels.iter().map(ToString::to_string).collect();
            outcome.errors.push(format!(
                "Invalid accessLevel: {}\n   Valid values: {}",
                display_value(access_level),
                levels.join(", ")
            ));
        }
    }

    match config.get(ADMINS_KEY) {
        None | Some(Value::Null) => {}
        Some(Value::String(admins)) => check_admins_string(admins, &mut outcome),
        Some(Value::Array(_)) => outcome.errors.push(format!(
            "Admins must be semicolon-separated STRING, not array\n   Current: array\n   \
             Example: '{EXAMPLE_ADMIN_DN}'"
        )),
        Some(other) => outcome.errors.push(format!(
            "Admins must be a semicolon-separated string\n   Current: {}\n   Example: \
             '{EXAMPLE_ADMIN_DN}'",
            json_type_name(other)
        )),
    }

    outcome
}

/// Compares a config value with an access level by numeric value.
///
/// `100` and `100.0` name the same level; strings and booleans never match.
#[allow(
    clippy::cast_precision_loss,
    clippy::float_cmp,
    reason = "Access levels are small integers that f64 represents exactly."
)]
fn is_level(value: &Value, level: i64) -> bool {
    match value {
        Value::Number(number) => number.as_i64().map_or_else(
            || number.as_f64().is_some_and(|float| float == level as f64),
            |integer| integer == level,
        ),
        _ => false,
    }
}

/// Checks separators and DN prefix of a string administrator list.
fn check_admins_string(admins: &str, outcome: &mut CheckOutcome) {
    if !admins.contains(LIST_SEPARATOR) && lists_dns_with_commas(admins) {
        outcome.warnings.push(
            "Admins uses comma separators; should be semicolon\n   Multiple admins: use ';' not ','"
                .to_string(),
        );
    }
    if !admins.is_empty() && !admins.starts_with(ADMIN_DN_PREFIX) {
        let echoed: String = admins.chars().take(MAX_ECHO_CHARS).collect();
        outcome
            .warnings
            .push(format!("Admins DN should start with '{ADMIN_DN_PREFIX}'\n   Current: {echoed}"));
    }
}

/// Detects a comma-separated administrator list.
///
/// Any comma outside a single DN counts. A single DN ends with its domain
/// components and carries no `DC=` component followed by a non-`DC=` one.
fn lists_dns_with_commas(value: &str) -> bool {
    let components: Vec<&str> = value.split(',').map(str::trim).collect();
    if components.len() < 2 {
        return false;
    }
    let ends_in_domain = components.last().is_some_and(|last| is_domain_component(last));
    !ends_in_domain || joins_dns_with_commas(&components)
}

/// Detects a `DC=` component followed by a non-`DC=` component.
fn joins_dns_with_commas(components: &[&str]) -> bool {
    components.windows(2).any(|pair| match pair {
        [current, next] => is_domain_component(current) && !is_domain_component(next),
        _ => false,
    })
}

/// Returns true for an RDN of the form `DC=...`.
fn is_domain_component(component: &str) -> bool {
    component.get(..3).is_some_and(|prefix| prefix.eq_ignore_ascii_case("DC="))
}

// ============================================================================
// SECTION: Structure Check
// ============================================================================

/// Checks deprecated sections, required sections and the server URL scheme.
#[must_use]
pub fn check_structure(config: &ConfigObject) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();

    if DEPRECATED_KEYS.iter().any(|key| config.contains_key(*key)) {
        outcome.errors.push(
            "Config uses deprecated 'types'/'modules' structure\n   Should use 'typeSettings' \
             instead\n   LAM 9.x uses: typeSettings.suffix_user, typeSettings.attr_user, etc."
                .to_string(),
        );
    }

    if !config.contains_key(TYPE_SETTINGS_KEY) {
        outcome.errors.push(
            "Missing required 'typeSettings' section\n   Required for LAM 9.x configuration"
                .to_string(),
        );
    }

    match config.get(SERVER_URL_KEY) {
        Some(Value::String(url)) if !url.is_empty() && !url.starts_with(SECURE_URL_SCHEME) => {
            outcome.warnings.push(format!(
                "ServerURL should use {SECURE_URL_SCHEME} for security\n   Current: {url}"
            ));
        }
        Some(value @ (Value::Number(_) | Value::Bool(true) | Value::Array(_) | Value::Object(_))) => {
            outcome.warnings.push(format!(
                "ServerURL should be a {SECURE_URL_SCHEME} URL string\n   Current type: {}",
                json_type_name(value)
            ));
        }
        _ => {}
    }

    outcome
}

// ============================================================================
// SECTION: Attribute Check
// ============================================================================

/// Classification of one configured list attribute.
enum AttributeFinding {
    /// Known to break the list view.
    Problematic(String),
    /// Not on the curated safe list.
    NonStandard,
}

/// Checks configured list attributes against the curated safe lists.
#[must_use]
pub fn check_attributes(config: &ConfigObject, schema: &SambaSchema) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    let type_settings = config.get(TYPE_SETTINGS_KEY).and_then(Value::as_object);

    match list_setting(type_settings, "attr_user") {
        Some(attr_user) => {
            for attr in split_attribute_list(attr_user) {
                match classify_attribute(attr, &schema.safe_attr_user, &schema.warnings) {
                    Some(AttributeFinding::Problematic(reason)) => outcome.errors.push(format!(
                        "attr_user uses problematic attribute: {attr}\n   {reason}\n   This will \
                         cause TypeError in LAM ListAttribute::getAlias()"
                    )),
                    Some(AttributeFinding::NonStandard) => outcome.warnings.push(format!(
                        "attr_user uses non-standard attribute: {attr}\n   Safe attributes: {}\n   \
                         Verify this exists in your Samba AD schema",
                        schema.safe_attr_user.join(", ")
                    )),
                    None => {}
                }
            }
        }
        None => outcome.warnings.push("No attr_user configured - user list will be empty".to_string()),
    }

    if let Some(attr_group) = list_setting(type_settings, "attr_group") {
        for attr in split_attribute_list(attr_group) {
            match classify_attribute(attr, &schema.safe_attr_group, &schema.warnings) {
                Some(AttributeFinding::Problematic(reason)) => outcome.errors.push(format!(
                    "attr_group uses problematic attribute: {attr}\n   {reason}\n   This will \
                     cause TypeError in LAM ListAttribute::getAlias()"
                )),
                Some(AttributeFinding::NonStandard) => outcome.warnings.push(format!(
                    "attr_group uses non-standard attribute: {attr}\n   Safe attributes: {}",
                    schema.safe_attr_group.join(", ")
                )),
                None => {}
            }
        }
    }

    outcome
}

/// Returns a non-empty string list setting from `typeSettings`.
fn list_setting<'a>(type_settings: Option<&'a ConfigObject>, key: &str) -> Option<&'a str> {
    type_settings
        .and_then(|settings| settings.get(key))
        .and_then(Value::as_str)
        .filter(|value| !value.is_empty())
}

/// Splits a `;`-delimited attribute list and strips marker prefixes.
fn split_attribute_list(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(LIST_SEPARATOR)
        .map(|token| token.trim_start_matches(ATTRIBUTE_MARKER))
        .filter(|token| !token.is_empty())
}

/// Classifies an attribute; `None` means it is acceptable.
///
/// Known-problematic attributes are flagged even when the safe list is empty;
/// the non-standard caution needs a safe list to compare against.
fn classify_attribute(
    attr: &str,
    safe: &[String],
    warnings: &BTreeMap<String, String>,
) -> Option<AttributeFinding> {
    if safe.iter().any(|known| known == attr) {
        return None;
    }
    if let Some(reason) = warnings.get(attr) {
        return Some(AttributeFinding::Problematic(reason.clone()));
    }
    if safe.is_empty() {
        return None;
    }
    Some(AttributeFinding::NonStandard)
}

// ============================================================================
// SECTION: Module Settings Check
// ============================================================================

/// Checks that every module setting value is an array.
///
/// Empty or false-like values mean no module settings and are skipped.
#[must_use]
pub fn check_module_settings(config: &ConfigObject) -> CheckOutcome {
    let mut outcome = CheckOutcome::default();
    match config.get(MODULE_SETTINGS_KEY) {
        None => {}
        Some(value) if is_empty_like(value) => {}
        Some(Value::Object(settings)) => {
            for (key, value) in settings {
                if !value.is_array() {
                    outcome.errors.push(format!(
                        "moduleSettings['{key}'] must be array\n   Current type: {}\n   Example: \
                         'windowsUser_0': ['value1', 'value2']",
                        json_type_name(value)
                    ));
                }
            }
        }
        Some(other) => outcome.errors.push(format!(
            "moduleSettings must be an object of arrays\n   Current type: {}",
            json_type_name(other)
        )),
    }
    outcome
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the JSON type name of a value.
#[must_use]
pub const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Returns true for null, `false`, zero, and empty strings, arrays or objects.
fn is_empty_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64().is_some_and(|float| float == 0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

/// Renders an optional config value for messages.
fn display_value(value: Option<&Value>) -> String {
    match value {
        None => "<missing>".to_string(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
