// crates/lam-gate-config/src/lib.rs
// ============================================================================
// Module: LAM Gate Config Library
// Description: Tool configuration model and validation.
// Purpose: Single source of truth for lam-gate.toml semantics.
// Dependencies: serde, toml
// ============================================================================

//! ## Overview
//! `lam-gate-config` defines where the gate tooling reads and writes its
//! schema snapshots, which containers it talks to, how the directory is
//! queried, and where audit records go. Validation is strict and fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
