//! Error types for gateway operations

use std::fmt;

use thiserror::Error;

use crate::redact;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors surfaced by the gateway and its subsystem handles
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    /// Lifecycle violation: a second construction while an instance is
    /// active, or an operation on an instance that is not (or no longer)
    /// active. Fatal to the calling operation, never retried internally.
    #[error("illegal state: {0}")]
    IllegalState(String),

    /// A native call returned a non-zero code. Carries the engine's
    /// last-error state; never silently swallowed.
    #[error(transparent)]
    Native(#[from] NativeError),

    /// The tracked default configuration id changed underneath an atomic
    /// replace. Surfaced distinctly from generic native errors so callers
    /// can re-read the current id and retry.
    #[error("default config replace conflict (code {code}): {message}")]
    ReplaceConflict {
        /// Last-error code the engine reported for the conflict
        code: i64,
        /// Last-error message the engine reported
        message: String,
    },
}

impl GatewayError {
    /// Native error code attached to this error, when there is one.
    pub fn code(&self) -> Option<i64> {
        match self {
            GatewayError::IllegalState(_) => None,
            GatewayError::Native(err) => Some(err.code()),
            GatewayError::ReplaceConflict { code, .. } => Some(*code),
        }
    }
}

/// A named parameter captured when a native call failed.
///
/// The value is an immutable snapshot taken at capture time; the redaction
/// flag only affects how it renders, never what is stored.
#[derive(Debug, Clone)]
pub struct ErrorParam {
    name: String,
    value: serde_json::Value,
}

impl ErrorParam {
    pub fn new(name: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &serde_json::Value {
        &self.value
    }

    /// Rendered form of the value: the redaction marker while redaction is
    /// on, the value's plain text otherwise.
    pub fn rendered(&self) -> String {
        redact::redact(&self.value)
    }
}

impl fmt::Display for ErrorParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.rendered())
    }
}

/// Structured error built from a native return code plus the engine's
/// last-error lookup.
///
/// Rendering consults the process-wide redaction flag at format time, so a
/// stored error changes its textual form when the flag is toggled.
#[derive(Debug, Clone)]
pub struct NativeError {
    code: i64,
    message: String,
    signature: Option<String>,
    params: Vec<ErrorParam>,
}

impl NativeError {
    pub fn new(code: i64, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            signature: None,
            params: Vec::new(),
        }
    }

    /// Attach the failing method signature.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = Some(signature.into());
        self
    }

    /// Attach the parameter snapshot of the failing call.
    pub fn with_params(mut self, params: Vec<ErrorParam>) -> Self {
        self.params = params;
        self
    }

    pub fn code(&self) -> i64 {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn signature(&self) -> Option<&str> {
        self.signature.as_deref()
    }

    pub fn params(&self) -> &[ErrorParam] {
        &self.params
    }
}

impl fmt::Display for NativeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "engine error {}: {}", self.code, self.message)?;
        if let Some(signature) = &self.signature {
            write!(f, " in {}", signature)?;
        }
        if !self.params.is_empty() {
            let rendered: Vec<String> = self.params.iter().map(|p| p.to_string()).collect();
            write!(f, " [{}]", rendered.join(", "))?;
        }
        Ok(())
    }
}

impl std::error::Error for NativeError {}

/// Build the parameter snapshot for a failed native call.
///
/// ```
/// use reso_core::error_params;
///
/// let params = error_params![("record_id", "R-1"), ("config", 42u64)];
/// assert_eq!(params.len(), 2);
/// ```
#[macro_export]
macro_rules! error_params {
    () => {
        ::std::vec::Vec::new()
    };
    ($(($name:expr, $value:expr)),+ $(,)?) => {
        ::std::vec![$($crate::error::ErrorParam::new($name, $value)),+]
    };
}
