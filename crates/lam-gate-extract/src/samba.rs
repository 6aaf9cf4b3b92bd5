// crates/lam-gate-extract/src/samba.rs
// ============================================================================
// Module: Directory Schema Extraction
// Description: Container queries for the directory attribute catalog.
// Purpose: Snapshot which attributes the running directory actually offers.
// Dependencies: lam-gate-core
// ============================================================================

//! ## Overview
//! Extraction runs inside the directory container through the container
//! runtime:
//!
//! 1. `docker ps` confirms the container is running (the only fatal check).
//! 2. `samba-tool schema attribute list` yields every schema attribute.
//! 3. `ldapsearch` against the user container yields the attributes present
//!    on real user objects. Skipped without a bind password.
//!
//! Command failures and empty output degrade to empty lists with notices.
//! The hand-maintained tables (common attributes, safe lists, warnings) are
//! attached unchanged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use lam_gate_core::AttributeInfo;
use lam_gate_core::SambaSchema;
use lam_gate_core::schema::SAMBA_SCHEMA_VERSION;

use crate::ExtractError;
use crate::ExtractionNotice;
use crate::command::CONTAINER_RUNTIME;
use crate::command::CommandRunner;
use crate::command::exec_args;
use crate::command::render_command;

// ============================================================================
// SECTION: Reference Tables
// ============================================================================

/// User attributes known to render in account manager list views.
pub const SAFE_USER_ATTRIBUTES: [&str; 7] =
    ["sAMAccountName", "cn", "givenName", "sn", "displayName", "mail", "description"];

/// Group attributes known to render in account manager list views.
pub const SAFE_GROUP_ATTRIBUTES: [&str; 4] = ["sAMAccountName", "cn", "description", "member"];

/// Reason attached to attributes missing from the default directory schema.
const NOT_IN_DEFAULT_SCHEMA: &str = "Not in default Samba AD schema";

/// Known-problematic attributes.
const PROBLEMATIC_ATTRIBUTES: [&str; 3] = ["employeeNumber", "department", "title"];

/// Common user attributes: name, description, required, multi-valued, caveat.
const COMMON_USER_ATTRIBUTES: [(&str, &str, bool, bool, bool); 13] = [
    ("sAMAccountName", "User logon name (required)", true, false, false),
    ("cn", "Common name", true, false, false),
    ("givenName", "First name", false, false, false),
    ("sn", "Surname/Last name", false, false, false),
    ("displayName", "Display name", false, false, false),
    ("mail", "Email address", false, false, false),
    ("description", "User description", false, false, false),
    ("telephoneNumber", "Phone number", false, false, false),
    ("memberOf", "Group memberships", false, true, false),
    ("userPrincipalName", "User principal name (UPN)", false, false, false),
    ("employeeNumber", "Employee number (may not exist in default schema)", false, false, true),
    ("department", "Department name (may not exist in default schema)", false, false, true),
    ("title", "Job title (may not exist in default schema)", false, false, true),
];

/// Returns the common user attribute descriptions.
#[must_use]
pub fn common_user_attributes() -> BTreeMap<String, AttributeInfo> {
    COMMON_USER_ATTRIBUTES
        .iter()
        .map(|(name, description, required, multi_valued, caveat)| {
            let info = AttributeInfo {
                description: (*description).to_string(),
                required: *required,
                multi_valued: *multi_valued,
                warning: caveat.then(|| NOT_IN_DEFAULT_SCHEMA.to_string()),
            };
            ((*name).to_string(), info)
        })
        .collect()
}

/// Returns the known-problematic attribute table.
#[must_use]
pub fn attribute_warnings() -> BTreeMap<String, String> {
    PROBLEMATIC_ATTRIBUTES
        .iter()
        .map(|name| ((*name).to_string(), format!("{NOT_IN_DEFAULT_SCHEMA}, may cause errors")))
        .collect()
}

// ============================================================================
// SECTION: Query Parameters
// ============================================================================

/// Parameters for a directory extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SambaQuery {
    /// Directory container name.
    pub container: String,
    /// LDAP URI used from inside the container.
    pub ldap_uri: String,
    /// Bind DN for the user-object query.
    pub bind_dn: String,
    /// Search base for the user-object query.
    pub search_base: String,
    /// LDAP filter selecting user objects.
    pub user_filter: String,
    /// Bind password; the user-object query is skipped when absent.
    pub password: Option<String>,
    /// Name of the environment variable the password is read from.
    pub password_env: String,
}

/// Result of a directory extraction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SambaExtraction {
    /// Extracted schema.
    pub schema: SambaSchema,
    /// Data gaps encountered along the way.
    pub notices: Vec<ExtractionNotice>,
}

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Extracts the directory schema from the running container.
///
/// # Errors
///
/// Returns [`ExtractError::ContainerNotRunning`] when the container is not
/// listed as running or the container runtime cannot be invoked.
pub fn extract_samba_schema<R: CommandRunner + ?Sized>(
    runner: &R,
    query: &SambaQuery,
) -> Result<SambaExtraction, ExtractError> {
    ensure_container_running(runner, &query.container)?;

    let mut notices = Vec::new();
    let all_attributes = list_schema_attributes(runner, &query.container, &mut notices);
    let default_user_attributes = query_user_attributes(runner, query, &mut notices);

    let schema = SambaSchema {
        version: Some(SAMBA_SCHEMA_VERSION.to_string()),
        all_attributes,
        default_user_attributes,
        common_user_attributes: common_user_attributes(),
        safe_attr_user: SAFE_USER_ATTRIBUTES.iter().map(|name| (*name).to_string()).collect(),
        safe_attr_group: SAFE_GROUP_ATTRIBUTES.iter().map(|name| (*name).to_string()).collect(),
        warnings: attribute_warnings(),
    };
    Ok(SambaExtraction { schema, notices })
}

/// Confirms the container is listed by `docker ps` under its exact name.
///
/// # Errors
///
/// Returns [`ExtractError::ContainerNotRunning`] otherwise.
pub fn ensure_container_running<R: CommandRunner + ?Sized>(
    runner: &R,
    container: &str,
) -> Result<(), ExtractError> {
    let args = vec![
        "ps".to_string(),
        "--filter".to_string(),
        format!("name={container}"),
        "--format".to_string(),
        "{{.Names}}".to_string(),
    ];
    let not_running = || ExtractError::ContainerNotRunning { container: container.to_string() };
    let output = runner.run(CONTAINER_RUNTIME, &args).map_err(|_| not_running())?;
    if output.success && output.stdout.lines().any(|line| line.trim() == container) {
        Ok(())
    } else {
        Err(not_running())
    }
}

/// Lists every schema attribute, sorted; empty on failure.
pub fn list_schema_attributes<R: CommandRunner + ?Sized>(
    runner: &R,
    container: &str,
    notices: &mut Vec<ExtractionNotice>,
) -> Vec<String> {
    let args = exec_args(container, &["samba-tool", "schema", "attribute", "list"]);
    let Some(stdout) = run_exec(runner, &args, None, notices) else {
        notices.push(ExtractionNotice::EmptyAttributeList);
        return Vec::new();
    };
    let attributes: BTreeSet<String> = stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();
    if attributes.is_empty() {
        notices.push(ExtractionNotice::EmptyAttributeList);
    }
    attributes.into_iter().collect()
}

/// Queries user objects and returns the attribute names they carry, sorted.
pub fn query_user_attributes<R: CommandRunner + ?Sized>(
    runner: &R,
    query: &SambaQuery,
    notices: &mut Vec<ExtractionNotice>,
) -> Vec<String> {
    let Some(password) = query.password.as_deref().filter(|password| !password.is_empty()) else {
        notices.push(ExtractionNotice::PasswordMissing { env_var: query.password_env.clone() });
        return Vec::new();
    };
    let args = exec_args(
        &query.container,
        &[
            "ldapsearch",
            "-LLL",
            "-H",
            query.ldap_uri.as_str(),
            "-D",
            query.bind_dn.as_str(),
            "-w",
            password,
            "-b",
            query.search_base.as_str(),
            "-s",
            "one",
            query.user_filter.as_str(),
            "*",
        ],
    );
    let attributes = run_exec(runner, &args, Some(password), notices)
        .map(|stdout| parse_ldif_attribute_names(&stdout))
        .unwrap_or_default();
    if attributes.is_empty() {
        notices.push(ExtractionNotice::EmptyUserQuery);
    }
    attributes
}

/// Collects attribute names from LDIF text, sorted and deduplicated.
///
/// Continuation lines, comments, and the `dn` line are skipped; attribute
/// options such as `;binary` are stripped.
#[must_use]
pub fn parse_ldif_attribute_names(ldif: &str) -> Vec<String> {
    let mut names = BTreeSet::new();
    for line in ldif.lines() {
        if line.starts_with(' ') || line.starts_with('#') {
            continue;
        }
        let Some((name, _)) = line.split_once(':') else {
            continue;
        };
        let name = name.split(';').next().unwrap_or_default().trim();
        if name.is_empty() || name.eq_ignore_ascii_case("dn") {
            continue;
        }
        names.insert(name.to_string());
    }
    names.into_iter().collect()
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Runs a container command, returning stdout on success.
fn run_exec<R: CommandRunner + ?Sized>(
    runner: &R,
    args: &[String],
    secret: Option<&str>,
    notices: &mut Vec<ExtractionNotice>,
) -> Option<String> {
    let command = || render_command(CONTAINER_RUNTIME, args, secret);
    match runner.run(CONTAINER_RUNTIME, args) {
        Ok(output) if output.success => Some(output.stdout),
        Ok(output) => {
            notices.push(ExtractionNotice::CommandFailed {
                command: command(),
                detail: redact(output.stderr.trim(), secret),
            });
            None
        }
        Err(err) => {
            notices.push(ExtractionNotice::CommandFailed {
                command: command(),
                detail: err.to_string(),
            });
            None
        }
    }
}

/// Masks `secret` wherever it appears in `text`.
fn redact(text: &str, secret: Option<&str>) -> String {
    match secret {
        Some(secret) if !secret.is_empty() => text.replace(secret, "****"),
        _ => text.to_string(),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ldif_options_and_dn_are_dropped() {
        let ldif = "dn: CN=a,CN=Users,DC=x\nobjectClass: top\n objectClass continued\n\
                    userCertificate;binary:: AAAA\n# comment: x\n\ndnsHostName: h\n";
        assert_eq!(
            parse_ldif_attribute_names(ldif),
            vec!["dnsHostName".to_string(), "objectClass".to_string(), "userCertificate".to_string()]
        );
    }

    #[test]
    fn problematic_attributes_carry_caveats() {
        let common = common_user_attributes();
        assert_eq!(common.len(), 13);
        for name in PROBLEMATIC_ATTRIBUTES {
            assert!(common.get(name).is_some_and(|info| info.warning.is_some()));
            assert!(attribute_warnings().contains_key(name));
        }
        assert!(common.get("memberOf").is_some_and(|info| info.multi_valued));
    }
}
