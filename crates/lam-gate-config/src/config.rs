// crates/lam-gate-config/src/config.rs
// ============================================================================
// Module: LAM Gate Configuration
// Description: Configuration loading and validation for the gate tooling.
// Purpose: Provide strict config parsing with defaults matching the fixed layout.
// Dependencies: serde, toml, thiserror
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Every field has a default reproducing the conventional repository layout
//! (`docs/lam/source`, `docs/reference/*.json`) and container names, so the
//! tools run without any file at all. A file requested explicitly, by flag or
//! environment, must exist; an invalid file always fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
pub const DEFAULT_CONFIG_NAME: &str = "lam-gate.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "LAM_GATE_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Maximum length of a container name.
pub(crate) const MAX_CONTAINER_NAME_LENGTH: usize = 128;
/// Maximum length of a DN or search filter.
pub(crate) const MAX_LDAP_STRING_LENGTH: usize = 1024;

// ============================================================================
// SECTION: Configuration Types
// ============================================================================

/// LAM Gate tool configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct GateConfig {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,
    /// Account manager extraction settings.
    #[serde(default)]
    pub lam: LamConfig,
    /// Directory service extraction settings.
    #[serde(default)]
    pub samba: SambaConfig,
    /// Audit trail settings.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl GateConfig {
    /// Loads configuration from disk using the default resolution rules.
    ///
    /// Resolution order: explicit `path`, then `LAM_GATE_CONFIG`, then
    /// `lam-gate.toml`. Only the last may be absent, in which case defaults
    /// are returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path, env::var(CONFIG_ENV_VAR).ok())?;
        validate_path(&resolved.path)?;
        if !resolved.required && !resolved.path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        let bytes = fs::read(&resolved.path).map_err(|err| {
            ConfigError::Io(format!("{}: {err}", resolved.path.display()))
        })?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses and validates configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.paths.validate()?;
        self.lam.validate()?;
        self.samba.validate()?;
        self.audit.validate()?;
        Ok(())
    }
}

/// Input and output locations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PathsConfig {
    /// Account manager source tree root.
    #[serde(default = "default_lam_source")]
    pub lam_source: String,
    /// Account manager schema output/input file.
    #[serde(default = "default_lam_schema")]
    pub lam_schema: String,
    /// Directory schema output/input file.
    #[serde(default = "default_samba_schema")]
    pub samba_schema: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            lam_source: default_lam_source(),
            lam_schema: default_lam_schema(),
            samba_schema: default_samba_schema(),
        }
    }
}

impl PathsConfig {
    /// Validates path settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("paths.lam_source", &self.lam_source)?;
        validate_path_string("paths.lam_schema", &self.lam_schema)?;
        validate_path_string("paths.samba_schema", &self.samba_schema)?;
        Ok(())
    }

    /// Returns the account manager source root.
    #[must_use]
    pub fn lam_source_path(&self) -> PathBuf {
        PathBuf::from(self.lam_source.trim())
    }

    /// Returns the account manager schema file path.
    #[must_use]
    pub fn lam_schema_path(&self) -> PathBuf {
        PathBuf::from(self.lam_schema.trim())
    }

    /// Returns the directory schema file path.
    #[must_use]
    pub fn samba_schema_path(&self) -> PathBuf {
        PathBuf::from(self.samba_schema.trim())
    }
}

/// Account manager extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LamConfig {
    /// Container holding the account manager web root.
    #[serde(default = "default_lam_container")]
    pub container: String,
    /// Source path inside the container, copied when the local tree is absent.
    #[serde(default = "default_lam_container_source")]
    pub container_source: String,
    /// Copy the source tree out of the container when it is missing locally.
    #[serde(default = "default_true")]
    pub fetch_missing_source: bool,
}

impl Default for LamConfig {
    fn default() -> Self {
        Self {
            container: default_lam_container(),
            container_source: default_lam_container_source(),
            fetch_missing_source: true,
        }
    }
}

impl LamConfig {
    /// Validates account manager settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_container_name("lam.container", &self.container)?;
        validate_path_string("lam.container_source", &self.container_source)?;
        Ok(())
    }
}

/// Directory service extraction settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SambaConfig {
    /// Container running the directory service.
    #[serde(default = "default_samba_container")]
    pub container: String,
    /// LDAP URI queried from inside the container.
    #[serde(default = "default_ldap_uri")]
    pub ldap_uri: String,
    /// DN used to bind for the user-object query.
    #[serde(default = "default_bind_dn")]
    pub bind_dn: String,
    /// Search base holding user objects.
    #[serde(default = "default_search_base")]
    pub search_base: String,
    /// Filter selecting user objects.
    #[serde(default = "default_user_filter")]
    pub user_filter: String,
    /// Environment variable holding the bind password.
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for SambaConfig {
    fn default() -> Self {
        Self {
            container: default_samba_container(),
            ldap_uri: default_ldap_uri(),
            bind_dn: default_bind_dn(),
            search_base: default_search_base(),
            user_filter: default_user_filter(),
            password_env: default_password_env(),
        }
    }
}

impl SambaConfig {
    /// Validates directory service settings.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_container_name("samba.container", &self.container)?;
        let uri = self.ldap_uri.trim();
        if !(uri.starts_with("ldaps://") || uri.starts_with("ldap://")) {
            return Err(ConfigError::Invalid(
                "samba.ldap_uri must start with ldap:// or ldaps://".to_string(),
            ));
        }
        validate_ldap_string("samba.bind_dn", &self.bind_dn)?;
        validate_ldap_string("samba.search_base", &self.search_base)?;
        validate_ldap_string("samba.user_filter", &self.user_filter)?;
        if !self.user_filter.trim().starts_with('(') {
            return Err(ConfigError::Invalid(
                "samba.user_filter must be a parenthesized LDAP filter".to_string(),
            ));
        }
        let env_name = self.password_env.trim();
        if env_name.is_empty()
            || !env_name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
        {
            return Err(ConfigError::Invalid(
                "samba.password_env must be a non-empty environment variable name".to_string(),
            ));
        }
        Ok(())
    }

    /// Reads the bind password from the configured environment variable.
    #[must_use]
    pub fn bind_password(&self) -> Option<String> {
        env::var(self.password_env.trim()).ok().filter(|value| !value.is_empty())
    }
}

/// Audit trail settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AuditConfig {
    /// Enable structured audit logging.
    #[serde(default)]
    pub enabled: bool,
    /// Optional audit log path (JSON lines); stderr when unset.
    #[serde(default)]
    pub path: Option<String>,
}

impl AuditConfig {
    /// Validates audit configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(path) = &self.path {
            validate_path_string("audit.path", path)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// A config path plus whether it must exist.
#[derive(Debug, PartialEq, Eq)]
struct ResolvedPath {
    /// Path to read.
    path: PathBuf,
    /// Whether absence is an error.
    required: bool,
}

/// Resolves the config path from CLI or environment defaults.
fn resolve_path(path: Option<&Path>, env_path: Option<String>) -> Result<ResolvedPath, ConfigError> {
    if let Some(path) = path {
        return Ok(ResolvedPath {
            path: path.to_path_buf(),
            required: true,
        });
    }
    if let Some(env_path) = env_path.filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(ResolvedPath {
            path: PathBuf::from(env_path),
            required: true,
        });
    }
    Ok(ResolvedPath {
        path: PathBuf::from(DEFAULT_CONFIG_NAME),
        required: false,
    })
}

/// Validates the resolved path against security limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    let path = Path::new(trimmed);
    for component in path.components() {
        let component_value = component.as_os_str().to_string_lossy();
        if component_value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} path component too long")));
        }
    }
    Ok(())
}

/// Validates a container name using the runtime's naming rules.
fn validate_container_name(field: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if value.len() > MAX_CONTAINER_NAME_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    if !value.chars().all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '_' | '.' | '-')) {
        return Err(ConfigError::Invalid(format!(
            "{field} may only contain letters, digits, '_', '.', or '-'"
        )));
    }
    Ok(())
}

/// Validates a DN or filter string.
fn validate_ldap_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_LDAP_STRING_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    Ok(())
}

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Default account manager source root.
fn default_lam_source() -> String {
    "docs/lam/source".to_string()
}

/// Default account manager schema file.
fn default_lam_schema() -> String {
    "docs/reference/lam-config-schema.json".to_string()
}

/// Default directory schema file.
fn default_samba_schema() -> String {
    "docs/reference/samba-schema.json".to_string()
}

/// Default account manager container.
fn default_lam_container() -> String {
    "Samba-AD-LAM".to_string()
}

/// Default source path inside the account manager container.
fn default_lam_container_source() -> String {
    "/var/www/html/lam/.".to_string()
}

/// Default directory service container.
fn default_samba_container() -> String {
    "Samba-AD".to_string()
}

/// Default LDAP URI.
fn default_ldap_uri() -> String {
    "ldaps://127.0.0.1:636".to_string()
}

/// Default bind DN.
fn default_bind_dn() -> String {
    "CN=Administrator,CN=Users,DC=haver,DC=internal".to_string()
}

/// Default user search base.
fn default_search_base() -> String {
    "CN=Users,DC=haver,DC=internal".to_string()
}

/// Default user object filter.
fn default_user_filter() -> String {
    "(&(objectClass=user)(!(objectClass=computer)))".to_string()
}

/// Default bind password environment variable.
fn default_password_env() -> String {
    "SAMBA_DOMAIN_PASSWORD".to_string()
}

/// Default for opt-out booleans.
const fn default_true() -> bool {
    true
}

// ============================================================================
// SECTION: Tests
// ============================================================================
