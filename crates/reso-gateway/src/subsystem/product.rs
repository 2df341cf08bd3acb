//! Product metadata capability

use std::sync::Arc;

use reso_core::{handle_return_code_for, GatewayResult};

use super::HandleCore;
use crate::gateway::EngineGateway;

/// Build and license details of the native engine, as JSON documents.
pub struct ProductHandle {
    core: HandleCore,
}

impl ProductHandle {
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

    /// Engine version information.
    pub fn version(&self) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.product_version(&mut out);
            handle_return_code_for(rc, native.as_ref(), "product_version()", Vec::new())?;
            Ok(out)
        })
    }

    /// License details.
    pub fn license(&self) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.product_license(&mut out);
            handle_return_code_for(rc, native.as_ref(), "product_license()", Vec::new())?;
            Ok(out)
        })
    }

    pub(crate) fn destroy(&self) {
        self.core.mark_destroyed();
    }
}
