//! reso-core - Core types for the reso entity-resolution gateway
//!
//! This crate provides the pieces the gateway builds on: the error taxonomy
//! and redaction policy, the gateway configuration, the native engine
//! bindings seam, and the return-code translator every native call goes
//! through.

pub mod config;
pub mod error;
pub mod native;
pub mod redact;
pub mod retcode;

pub use config::{GatewayConfig, BOOTSTRAP_SETTINGS, DEFAULT_INSTANCE_NAME, SETTINGS_ENV_VAR};
pub use error::{ErrorParam, GatewayError, GatewayResult, NativeError};
pub use native::{ErrorSource, NativeEngine, ERR_REPLACE_CONFLICT, RC_OK};
pub use redact::{
    disable_redaction, enable_redaction, is_redacting, redact, NO_REDACT_ENV_VAR, REDACTION_MARKER,
};
pub use retcode::{handle_return_code, handle_return_code_for};
