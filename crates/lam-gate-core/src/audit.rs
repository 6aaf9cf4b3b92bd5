// crates/lam-gate-core/src/audit.rs
// ============================================================================
// Module: Gate Audit Logging
// Description: Structured audit events for extraction and validation runs.
// Purpose: Emit JSON-lines records without hard logging dependencies.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Every extraction and validation run can leave one JSON line behind so an
//! operator checklist has a trail of which schema snapshot was produced and
//! which configuration passed. Sinks are selected by the caller: stderr, an
//! append-only file, or nothing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Which reference schema an extraction produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaSource {
    /// Account manager source tree.
    Lam,
    /// Directory service container.
    Samba,
}

/// Extraction audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractionAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Schema produced.
    pub source: SchemaSource,
    /// Output path of the schema file.
    pub output_path: String,
    /// Number of primary entries extracted: config options for
    /// [`SchemaSource::Lam`], schema attributes for [`SchemaSource::Samba`].
    pub entries: usize,
    /// Number of degradation notices raised.
    pub notices: usize,
}

/// Validation audit event payload.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Path of the validated configuration.
    pub config_path: String,
    /// Number of errors.
    pub errors: usize,
    /// Number of warnings.
    pub warnings: usize,
    /// Labels of skipped checks.
    pub skipped_checks: Vec<&'static str>,
    /// Whether validation passed.
    pub passed: bool,
}

impl ExtractionAuditEvent {
    /// Creates a new extraction event with a consistent timestamp.
    #[must_use]
    pub fn new(source: SchemaSource, output_path: &Path, entries: usize, notices: usize) -> Self {
        Self {
            event: "schema_extracted",
            timestamp_ms: now_ms(),
            source,
            output_path: output_path.display().to_string(),
            entries,
            notices,
        }
    }
}

impl ValidationAuditEvent {
    /// Creates a new validation event with a consistent timestamp.
    #[must_use]
    pub fn new(
        config_path: &Path,
        errors: usize,
        warnings: usize,
        skipped_checks: Vec<&'static str>,
    ) -> Self {
        Self {
            event: "config_validated",
            timestamp_ms: now_ms(),
            config_path: config_path.display().to_string(),
            errors,
            warnings,
            skipped_checks,
            passed: errors == 0,
        }
    }
}

/// Current time in milliseconds since the epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for gate events.
pub trait GateAuditSink: Send + Sync {
    /// Record an extraction event.
    fn record_extraction(&self, event: &ExtractionAuditEvent);

    /// Record a validation event.
    fn record_validation(&self, event: &ValidationAuditEvent);
}

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl GateAuditSink for StderrAuditSink {
    fn record_extraction(&self, event: &ExtractionAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_validation(&self, event: &ValidationAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized payload.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl GateAuditSink for FileAuditSink {
    fn record_extraction(&self, event: &ExtractionAuditEvent) {
        self.append(event);
    }

    fn record_validation(&self, event: &ValidationAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl GateAuditSink for NoopAuditSink {
    fn record_extraction(&self, _event: &ExtractionAuditEvent) {}

    fn record_validation(&self, _event: &ValidationAuditEvent) {}
}

// ============================================================================
// SECTION: Tests
// ============================================================================
