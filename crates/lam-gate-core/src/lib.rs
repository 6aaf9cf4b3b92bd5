// crates/lam-gate-core/src/lib.rs
// ============================================================================
// Module: LAM Gate Core Library
// Description: Reference schemas, validation rules, and audit events.
// Purpose: Single source of truth for what a deployable configuration is.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! `lam-gate-core` holds the pieces shared by the extractors and the
//! validator: the two cached reference schemas and their JSON persistence,
//! the target-configuration loader, the four validation checks with their
//! aggregated report, and the audit event sinks.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod schema;
pub mod target;
pub mod validation;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use audit::ExtractionAuditEvent;
pub use audit::FileAuditSink;
pub use audit::GateAuditSink;
pub use audit::NoopAuditSink;
pub use audit::SchemaSource;
pub use audit::StderrAuditSink;
pub use audit::ValidationAuditEvent;
pub use schema::AttributeInfo;
pub use schema::ConfigOption;
pub use schema::LamSchema;
pub use schema::SambaSchema;
pub use schema::SchemaError;
pub use schema::load_schema;
pub use schema::save_schema;
pub use target::TargetConfigError;
pub use target::load_target_config;
pub use validation::Check;
pub use validation::CheckOutcome;
pub use validation::ConfigObject;
pub use validation::ValidationReport;
pub use validation::validate_config;
pub use validation::validate_config_with;
