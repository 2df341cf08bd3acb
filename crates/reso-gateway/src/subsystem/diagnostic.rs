//! Repository diagnostics capability

use std::sync::Arc;

use reso_core::{error_params, handle_return_code_for, GatewayResult};

use super::HandleCore;
use crate::gateway::EngineGateway;

/// Diagnostics against the engine's repository.
pub struct DiagnosticHandle {
    core: HandleCore,
}

impl DiagnosticHandle {
    pub(crate) fn new(owner: &Arc<EngineGateway>) -> Self {
        Self {
            core: HandleCore::new(owner),
        }
    }

    /// The owning gateway.
    pub fn provider(&self) -> GatewayResult<Arc<EngineGateway>> {
        self.core.provider()
    }

    /// True once the owning gateway's teardown cascade reached this handle.
    pub fn is_destroyed(&self) -> bool {
        self.core.is_destroyed()
    }

    /// Repository layout and usage details as a JSON document.
    pub fn repository_info(&self) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.diagnostic_repository_info(&mut out);
            handle_return_code_for(rc, native.as_ref(), "diagnostic_repository_info()", Vec::new())?;
            Ok(out)
        })
    }

    /// Run the repository performance probe for `seconds`.
    pub fn check_performance(&self, seconds: i64) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.diagnostic_check_performance(seconds, &mut out);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "diagnostic_check_performance(seconds)",
                error_params![("seconds", seconds)],
            )?;
            Ok(out)
        })
    }

    pub(crate) fn destroy(&self) {
        self.core.mark_destroyed();
    }
}
