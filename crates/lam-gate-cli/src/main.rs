// crates/lam-gate-cli/src/main.rs
// ============================================================================
// Module: LAM Gate CLI Entry Point
// Description: Command dispatcher for schema extraction and config validation.
// Purpose: Gate account manager configs against cached reference schemas.
// Dependencies: clap, lam-gate-config, lam-gate-core, lam-gate-extract, serde,
//               serde_jcs, thiserror
// ============================================================================

//! ## Overview
//! `lam-gate` runs the three steps of the deployment gate:
//!
//! - `extract-lam` scrapes the account manager source tree into
//!   `lam-config-schema.json`.
//! - `extract-samba` queries the directory container into
//!   `samba-schema.json`.
//! - `validate <CONFIG>` checks a target configuration against both schemas
//!   and exits non-zero when any check reports an error.
//!
//! All user-facing strings are routed through the message catalog. Tool
//! settings come from `lam-gate.toml`; see `lam-gate-config`.

// ============================================================================
// SECTION: Modules
// ============================================================================


// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::ArgAction;
use clap::Args;
use clap::CommandFactory;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use clap::error::ErrorKind;
use lam_gate_cli::t;
use lam_gate_config::AuditConfig;
use lam_gate_config::GateConfig;
use lam_gate_core::Check;
use lam_gate_core::ExtractionAuditEvent;
use lam_gate_core::FileAuditSink;
use lam_gate_core::GateAuditSink;
use lam_gate_core::LamSchema;
use lam_gate_core::NoopAuditSink;
use lam_gate_core::SambaSchema;
use lam_gate_core::SchemaSource;
use lam_gate_core::StderrAuditSink;
use lam_gate_core::ValidationAuditEvent;
use lam_gate_core::ValidationReport;
use lam_gate_core::load_schema;
use lam_gate_core::load_target_config;
use lam_gate_core::save_schema;
use lam_gate_core::validate_config_with;
use lam_gate_extract::ExtractError;
use lam_gate_extract::ExtractionNotice;
use lam_gate_extract::SambaQuery;
use lam_gate_extract::SourceContainer;
use lam_gate_extract::SystemCommandRunner;
use lam_gate_extract::extract_lam_schema_with;
use lam_gate_extract::extract_samba_schema;
use lam_gate_extract::source_tree_missing;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

// ============================================================================
// SECTION: CLI Types
// ============================================================================

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(name = "lam-gate", disable_help_subcommand = true, disable_version_flag = true)]
struct Cli {
    /// Print version information and exit.
    #[arg(long = "version", action = ArgAction::SetTrue, global = true)]
    show_version: bool,
    /// Path to lam-gate.toml (overrides `LAM_GATE_CONFIG`).
    #[arg(long = "config", value_name = "PATH", global = true)]
    tool_config: Option<PathBuf>,
    /// Selected subcommand to execute.
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Supported CLI subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract the account manager schema from its source tree.
    ExtractLam(ExtractLamCommand),
    /// Extract the directory schema from the running container.
    ExtractSamba(ExtractSambaCommand),
    /// Validate a target configuration against the extracted schemas.
    Validate(ValidateCommand),
}

/// Arguments for `extract-lam`.
#[derive(Args, Debug)]
struct ExtractLamCommand {
    /// Source tree root (defaults to `paths.lam_source`).
    #[arg(long, value_name = "DIR")]
    source: Option<PathBuf>,
    /// Output schema file (defaults to `paths.lam_schema`).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
    /// Never copy a missing source tree out of the container.
    #[arg(long, action = ArgAction::SetTrue)]
    no_fetch: bool,
}

/// Arguments for `extract-samba`.
#[derive(Args, Debug)]
struct ExtractSambaCommand {
    /// Directory container name (defaults to `samba.container`).
    #[arg(long, value_name = "NAME")]
    container: Option<String>,
    /// Output schema file (defaults to `paths.samba_schema`).
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Arguments for `validate`.
#[derive(Args, Debug)]
struct ValidateCommand {
    /// Target configuration JSON file.
    #[arg(value_name = "CONFIG")]
    target: PathBuf,
    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Account manager schema file (defaults to `paths.lam_schema`).
    #[arg(long, value_name = "PATH")]
    lam_schema: Option<PathBuf>,
    /// Directory schema file (defaults to `paths.samba_schema`).
    #[arg(long, value_name = "PATH")]
    samba_schema: Option<PathBuf>,
}

/// Output formats for the validation report.
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Canonical JSON output.
    Json,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// CLI error wrapper for catalog-rendered error messages.
#[derive(Debug, Error)]
#[error("{message}")]
struct CliError {
    /// Human-readable error message.
    message: String,
}

impl CliError {
    /// Constructs a new [`CliError`] from a rendered message.
    const fn new(message: String) -> Self {
        Self {
            message,
        }
    }
}

/// CLI result alias for fallible operations.
type CliResult<T> = Result<T, CliError>;

// ============================================================================
// SECTION: Entry Point
// ============================================================================

/// CLI entry point returning an exit code.
fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => emit_error(&err.to_string()),
    }
}

/// Executes the CLI command dispatcher.
fn run() -> CliResult<ExitCode> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => return render_parse_error(&err),
    };

    if cli.show_version {
        let version = env!("CARGO_PKG_VERSION");
        stdout_line(&t!("main.version", version = version))?;
        return Ok(ExitCode::SUCCESS);
    }

    let Some(command) = cli.command else {
        show_help()?;
        return Ok(ExitCode::SUCCESS);
    };

    let config = GateConfig::load(cli.tool_config.as_deref())
        .map_err(|err| CliError::new(t!("config.load_failed", error = err)))?;
    let audit = build_audit_sink(&config.audit)?;

    match command {
        Commands::ExtractLam(command) => command_extract_lam(&command, &config, audit.as_ref()),
        Commands::ExtractSamba(command) => {
            command_extract_samba(&command, &config, audit.as_ref())
        }
        Commands::Validate(command) => command_validate(&command, &config, audit.as_ref()),
    }
}

/// Reports an argument parsing outcome; only help and version succeed.
fn render_parse_error(err: &clap::Error) -> CliResult<ExitCode> {
    let rendered = err.render().to_string();
    let rendered = rendered.trim_end();
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            stdout_line(rendered)?;
            Ok(ExitCode::SUCCESS)
        }
        _ => Ok(emit_error(rendered)),
    }
}

/// Prints top-level help.
fn show_help() -> CliResult<()> {
    let help = Cli::command().render_help().to_string();
    stdout_line(help.trim_end())
}

/// Builds the audit sink selected by the `[audit]` section.
fn build_audit_sink(config: &AuditConfig) -> CliResult<Box<dyn GateAuditSink>> {
    if !config.enabled {
        return Ok(Box::new(NoopAuditSink));
    }
    match config.path.as_deref() {
        Some(path) => {
            let sink = FileAuditSink::new(Path::new(path))
                .map_err(|err| CliError::new(t!("audit.open_failed", path = path, error = err)))?;
            Ok(Box::new(sink))
        }
        None => Ok(Box::new(StderrAuditSink)),
    }
}

// ============================================================================
// SECTION: Extract Commands
// ============================================================================

/// Executes `extract-lam`.
fn command_extract_lam(
    command: &ExtractLamCommand,
    config: &GateConfig,
    audit: &dyn GateAuditSink,
) -> CliResult<ExitCode> {
    let source_root = command.source.clone().unwrap_or_else(|| config.paths.lam_source_path());
    let output = command.output.clone().unwrap_or_else(|| config.paths.lam_schema_path());
    let fetch = (config.lam.fetch_missing_source && !command.no_fetch).then(|| SourceContainer {
        container: config.lam.container.clone(),
        path: config.lam.container_source.clone(),
    });

    if fetch.is_some() && source_tree_missing(&source_root) {
        stdout_line(&t!("extract.lam.fetching", container = config.lam.container))?;
    }
    stdout_line(&t!("extract.lam.scanning", path = source_root.display()))?;

    let extraction = extract_lam_schema_with(&SystemCommandRunner, &source_root, fetch.as_ref())
        .map_err(|err| CliError::new(t!("extract.failed", error = err)))?;
    emit_notices(&extraction.notices)?;

    save_schema(&output, &extraction.schema)
        .map_err(|err| CliError::new(t!("extract.write_failed", error = err)))?;
    audit.record_extraction(&ExtractionAuditEvent::new(
        SchemaSource::Lam,
        &output,
        extraction.schema.config_options.len(),
        extraction.notices.len(),
    ));

    stdout_line("")?;
    for line in lam_summary_lines(&output, &extraction.schema) {
        stdout_line(&line)?;
    }
    if extraction.schema.login_methods.is_empty() {
        stdout_line("")?;
        stdout_line(&t!("extract.lam.hint.no_login_methods"))?;
        stdout_line(&t!(
            "extract.lam.hint.copy_source",
            container = config.lam.container,
            source = config.lam.container_source,
            path = source_root.display()
        ))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Executes `extract-samba`.
fn command_extract_samba(
    command: &ExtractSambaCommand,
    config: &GateConfig,
    audit: &dyn GateAuditSink,
) -> CliResult<ExitCode> {
    let samba = &config.samba;
    let query = SambaQuery {
        container: command.container.clone().unwrap_or_else(|| samba.container.clone()),
        ldap_uri: samba.ldap_uri.clone(),
        bind_dn: samba.bind_dn.clone(),
        search_base: samba.search_base.clone(),
        user_filter: samba.user_filter.clone(),
        password: samba.bind_password(),
        password_env: samba.password_env.clone(),
    };
    let output = command.output.clone().unwrap_or_else(|| config.paths.samba_schema_path());

    stdout_line(&t!("extract.samba.starting", container = query.container))?;
    let extraction = extract_samba_schema(&SystemCommandRunner, &query).map_err(|err| match err {
        ExtractError::ContainerNotRunning {
            container,
        } => CliError::new(t!("extract.samba.not_running", container = container)),
        other => CliError::new(t!("extract.failed", error = other)),
    })?;
    emit_notices(&extraction.notices)?;

    save_schema(&output, &extraction.schema)
        .map_err(|err| CliError::new(t!("extract.write_failed", error = err)))?;
    audit.record_extraction(&ExtractionAuditEvent::new(
        SchemaSource::Samba,
        &output,
        extraction.schema.all_attributes.len(),
        extraction.notices.len(),
    ));

    stdout_line("")?;
    for line in samba_summary_lines(&output, &extraction.schema) {
        stdout_line(&line)?;
    }
    if extraction.schema.default_user_attributes.is_empty() {
        stdout_line("")?;
        stdout_line(&t!("extract.samba.hint.no_user_objects", env = query.password_env))?;
    }
    Ok(ExitCode::SUCCESS)
}

/// Prints extraction notices to stderr.
fn emit_notices(notices: &[ExtractionNotice]) -> CliResult<()> {
    for notice in notices {
        stderr_line(&t!("extract.notice", notice = notice))?;
    }
    Ok(())
}

/// Renders the account manager extraction summary.
fn lam_summary_lines(output: &Path, schema: &LamSchema) -> Vec<String> {
    let levels: Vec<String> = schema.access_levels.iter().map(ToString::to_string).collect();
    let types: Vec<&str> = schema.type_attributes.keys().map(String::as_str).collect();
    vec![
        t!("extract.lam.summary.header", path = output.display()),
        t!("extract.lam.summary.options", count = schema.config_options.len()),
        t!("extract.lam.summary.login_methods", methods = join_or_none(&schema.login_methods)),
        t!("extract.lam.summary.access_levels", levels = join_or_none(&levels)),
        t!("extract.lam.summary.types", types = types.join(", ")),
    ]
}

/// Renders the directory extraction summary.
fn samba_summary_lines(output: &Path, schema: &SambaSchema) -> Vec<String> {
    let mut lines = vec![
        t!("extract.samba.summary.header", path = output.display()),
        t!("extract.samba.summary.total", count = schema.all_attributes.len()),
    ];
    if !schema.default_user_attributes.is_empty() {
        lines.push(t!(
            "extract.samba.summary.user_objects",
            count = schema.default_user_attributes.len()
        ));
    }
    lines.push(t!(
        "extract.samba.summary.safe_user",
        attributes = schema.safe_attr_user.join(", ")
    ));
    lines.push(t!("extract.samba.summary.warnings", count = schema.warnings.len()));
    lines
}

/// Joins values with commas, or returns the "none found" label.
fn join_or_none(values: &[String]) -> String {
    if values.is_empty() { t!("extract.none_found") } else { values.join(", ") }
}

// ============================================================================
// SECTION: Validate Command
// ============================================================================

/// Machine-readable validation report.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    /// Errors in check order.
    errors: &'a [String],
    /// Warnings in check order.
    warnings: &'a [String],
    /// Labels of checks skipped for lack of a schema.
    skipped_checks: Vec<&'static str>,
    /// Whether no errors were found.
    passed: bool,
}

impl<'a> JsonReport<'a> {
    /// Builds the JSON view of a report.
    fn new(report: &'a ValidationReport) -> Self {
        Self {
            errors: &report.errors,
            warnings: &report.warnings,
            skipped_checks: skipped_labels(report),
            passed: report.passed(),
        }
    }
}

/// Executes `validate`.
fn command_validate(
    command: &ValidateCommand,
    config: &GateConfig,
    audit: &dyn GateAuditSink,
) -> CliResult<ExitCode> {
    let text = command.format == OutputFormat::Text;
    let progress = |message: String| if text { stdout_line(&message) } else { Ok(()) };

    progress(t!("validate.loading_schemas"))?;
    let lam_path = command.lam_schema.clone().unwrap_or_else(|| config.paths.lam_schema_path());
    let samba_path =
        command.samba_schema.clone().unwrap_or_else(|| config.paths.samba_schema_path());
    let lam = load_reference_schema::<LamSchema>(&lam_path)?;
    let samba = load_reference_schema::<SambaSchema>(&samba_path)?;
    if lam.is_none() && samba.is_none() {
        stderr_line(&t!("validate.no_schemas"))?;
    }

    progress(t!("validate.loading_config", path = command.target.display()))?;
    let target = load_target_config(&command.target)
        .map_err(|err| CliError::new(t!("validate.config_failed", error = err)))?;

    progress(String::new())?;
    progress(t!("output.rule"))?;
    progress(t!("validate.title"))?;
    progress(t!("output.rule"))?;
    progress(String::new())?;

    let mut progress_failure = None;
    let report = validate_config_with(&target, lam.as_ref(), samba.as_ref(), |check| {
        if progress_failure.is_none()
            && let Err(err) = progress(progress_label(check))
        {
            progress_failure = Some(err);
        }
    });
    if let Some(err) = progress_failure {
        return Err(err);
    }

    audit.record_validation(&ValidationAuditEvent::new(
        &command.target,
        report.errors.len(),
        report.warnings.len(),
        skipped_labels(&report),
    ));

    match command.format {
        OutputFormat::Text => {
            for line in render_text_report(&report) {
                stdout_line(&line)?;
            }
        }
        OutputFormat::Json => write_json_report(&report)?,
    }
    Ok(if report.passed() { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Loads a cached schema, degrading to `None` with a warning.
fn load_reference_schema<T: DeserializeOwned>(path: &Path) -> CliResult<Option<T>> {
    match load_schema::<T>(path) {
        Ok(Some(schema)) => Ok(Some(schema)),
        Ok(None) => {
            stderr_line(&t!("validate.schema_missing", path = path.display()))?;
            Ok(None)
        }
        Err(err) => {
            stderr_line(&t!("validate.schema_invalid", path = path.display(), error = err))?;
            Ok(None)
        }
    }
}

/// Returns the progress line announced before a check runs.
fn progress_label(check: Check) -> String {
    match check {
        Check::Login => t!("validate.progress.login"),
        Check::Structure => t!("validate.progress.structure"),
        Check::Attributes => t!("validate.progress.attributes"),
        Check::ModuleSettings => t!("validate.progress.module_settings"),
    }
}

/// Returns the labels of skipped checks.
fn skipped_labels(report: &ValidationReport) -> Vec<&'static str> {
    report.skipped_checks.iter().map(|check| check.label()).collect()
}

/// Renders the human-readable report.
fn render_text_report(report: &ValidationReport) -> Vec<String> {
    let mut lines =
        vec![String::new(), t!("output.rule"), t!("validate.results.title"), t!("output.rule")];
    lines.push(String::new());

    if !report.errors.is_empty() {
        lines.push(t!("validate.results.failed", count = report.errors.len()));
        lines.push(String::new());
        push_numbered(&mut lines, &report.errors);
    }
    if !report.warnings.is_empty() {
        lines.push(t!("validate.results.warnings", count = report.warnings.len()));
        lines.push(String::new());
        push_numbered(&mut lines, &report.warnings);
    }
    if report.passed() {
        if report.warnings.is_empty() {
            lines.push(t!("validate.results.success"));
        } else {
            lines.push(t!("validate.results.passed_with_warnings"));
        }
    }
    if !report.skipped_checks.is_empty() {
        lines.push(t!("validate.results.skipped", checks = skipped_labels(report).join(", ")));
    }
    lines.push(t!("output.rule"));
    lines
}

/// Appends numbered messages, each followed by a blank line.
fn push_numbered(lines: &mut Vec<String>, messages: &[String]) {
    for (index, message) in messages.iter().enumerate() {
        lines.push(t!("validate.results.item", index = index + 1, message = message));
        lines.push(String::new());
    }
}

/// Writes the report as canonical JSON.
fn write_json_report(report: &ValidationReport) -> CliResult<()> {
    let mut bytes = serde_jcs::to_vec(&JsonReport::new(report))
        .map_err(|err| CliError::new(t!("validate.json_failed", error = err)))?;
    bytes.push(b'\n');
    write_stdout_bytes(&bytes).map_err(|err| CliError::new(output_error("stdout", &err)))
}

// ============================================================================
// SECTION: Output Helpers
// ============================================================================

/// Writes a single line to stdout.
fn write_stdout_line(message: &str) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    writeln!(&mut stdout, "{message}")
}

/// Writes raw bytes to stdout without adding a newline.
fn write_stdout_bytes(bytes: &[u8]) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    stdout.write_all(bytes)
}

/// Writes a single line to stderr.
fn write_stderr_line(message: &str) -> std::io::Result<()> {
    let mut stderr = std::io::stderr();
    writeln!(&mut stderr, "{message}")
}

/// Writes a line to stdout, mapping failures to [`CliError`].
fn stdout_line(message: &str) -> CliResult<()> {
    write_stdout_line(message).map_err(|err| CliError::new(output_error("stdout", &err)))
}

/// Writes a line to stderr, mapping failures to [`CliError`].
fn stderr_line(message: &str) -> CliResult<()> {
    write_stderr_line(message).map_err(|err| CliError::new(output_error("stderr", &err)))
}

/// Formats an output error message.
fn output_error(stream: &str, error: &std::io::Error) -> String {
    let stream_label = match stream {
        "stdout" => t!("output.stream.stdout"),
        "stderr" => t!("output.stream.stderr"),
        _ => t!("output.stream.unknown"),
    };
    t!("output.write_failed", stream = stream_label, error = error)
}

/// Emits an error message to stderr and returns a failure exit code.
fn emit_error(message: &str) -> ExitCode {
    let _ = write_stderr_line(message);
    ExitCode::FAILURE
}
