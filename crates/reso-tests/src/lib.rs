//! Integration tests for the reso gateway
//!
//! These tests exercise the full stack against the mock native engine:
//! singleton lifecycle, execution accounting, subsystem handles, and
//! return-code translation.
//!
//! # Test Structure
//!
//! - `lifecycle_test.rs` - singleton slot and destroy cascade
//! - `execution_test.rs` - in-flight accounting and drain behavior
//! - `subsystem_test.rs` - handle registry and capability delegation
//! - `error_test.rs` - translation and redaction rendering
//! - `redaction_default_test.rs` - environment-derived redaction default
//!   (own binary: the default latches on first use of the flag)
//!
//! The gateway slot is process-wide, so every test touching it is
//! `#[serial]`.

// This crate only contains tests, no library code
