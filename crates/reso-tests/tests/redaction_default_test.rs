//! Environment-derived redaction default
//!
//! Lives in its own test binary: the default is latched on the first use
//! of the flag, so no other test may touch redaction in this process
//! before the assertion runs.

#[test]
fn redaction_defaults_on_without_override() {
    std::env::remove_var(reso_core::NO_REDACT_ENV_VAR);
    assert!(reso_core::is_redacting());
}
