//! Native return-code handling
//!
//! [`handle_return_code`] is the single path by which a non-zero native
//! return code becomes a caller-visible error. Callers invoke it
//! immediately after every native call, before trusting any output buffer
//! that call populated.

use crate::error::{ErrorParam, GatewayError, GatewayResult, NativeError};
use crate::native::{ErrorSource, ERR_REPLACE_CONFLICT, RC_OK};

/// Check a native return code; non-zero becomes a structured error built
/// from the engine's last-error state.
pub fn handle_return_code<S>(code: i64, source: &S) -> GatewayResult<()>
where
    S: ErrorSource + ?Sized,
{
    check(code, source, None, Vec::new())
}

/// Like [`handle_return_code`], attaching the failing method signature and
/// a snapshot of its parameters for diagnostics.
pub fn handle_return_code_for<S>(
    code: i64,
    source: &S,
    signature: &str,
    params: Vec<ErrorParam>,
) -> GatewayResult<()>
where
    S: ErrorSource + ?Sized,
{
    check(code, source, Some(signature), params)
}

fn check<S>(
    code: i64,
    source: &S,
    signature: Option<&str>,
    params: Vec<ErrorParam>,
) -> GatewayResult<()>
where
    S: ErrorSource + ?Sized,
{
    if code == RC_OK {
        return Ok(());
    }

    let error_code = source.last_error_code();
    let message = source.last_error_message();
    source.clear_last_error();

    if error_code == ERR_REPLACE_CONFLICT {
        return Err(GatewayError::ReplaceConflict {
            code: error_code,
            message,
        });
    }

    let mut err = NativeError::new(error_code, message).with_params(params);
    if let Some(signature) = signature {
        err = err.with_signature(signature);
    }
    Err(GatewayError::Native(err))
}
