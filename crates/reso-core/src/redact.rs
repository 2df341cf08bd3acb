//! Process-wide redaction of parameter values in rendered errors
//!
//! Redaction masks the *textual rendering* of captured parameter values;
//! the stored snapshots are untouched. The flag is process-wide and mutable
//! at runtime, so already-constructed errors render according to the flag
//! at the moment they are formatted. Readers must not cache the flag across
//! renders.

use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::Lazy;
use serde_json::Value;

/// Marker substituted for every parameter value while redaction is on.
pub const REDACTION_MARKER: &str = "<redacted>";

/// Environment variable that, when set, disables redaction at process
/// start. Read once, on first use of the flag.
pub const NO_REDACT_ENV_VAR: &str = "RESO_NO_REDACT";

static REDACTING: Lazy<AtomicBool> =
    Lazy::new(|| AtomicBool::new(std::env::var_os(NO_REDACT_ENV_VAR).is_none()));

/// Mask parameter values in all subsequently rendered errors.
pub fn enable_redaction() {
    REDACTING.store(true, Ordering::SeqCst);
}

/// Render parameter values verbatim in all subsequently rendered errors.
pub fn disable_redaction() {
    REDACTING.store(false, Ordering::SeqCst);
}

/// Current redaction state.
pub fn is_redacting() -> bool {
    REDACTING.load(Ordering::SeqCst)
}

/// Rendered form of `value`: the fixed marker while redaction is on,
/// otherwise the value's plain text (strings unquoted, absent values as
/// `null`).
pub fn redact(value: &Value) -> String {
    if is_redacting() {
        REDACTION_MARKER.to_string()
    } else {
        render(value)
    }
}

/// Plain text form of a value, ignoring the redaction flag.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
