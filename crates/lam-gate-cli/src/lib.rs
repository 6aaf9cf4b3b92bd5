// crates/lam-gate-cli/src/lib.rs
// ============================================================================
// Module: LAM Gate CLI Library
// Description: Shared helpers for the lam-gate binary.
// Purpose: Expose the message catalog to the binary and its tests.
// Dependencies: Standard library.
// ============================================================================

//! ## Overview
//! The `lam-gate` binary lives in `main.rs`; this library carries the
//! message catalog and the [`t!`] macro it formats output with.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;

#[cfg(test)]
#[path = "tests/i18n.rs"]
mod i18n_tests;
