//! Configuration-editing capability
//!
//! Editing operates on opaque in-memory documents identified by native
//! handles. Handles the caller leaves open when the gateway is destroyed
//! are closed by the teardown cascade.

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;

use reso_core::{error_params, handle_return_code_for, GatewayResult, NativeEngine};

use super::HandleCore;
use crate::gateway::EngineGateway;

/// In-memory editing of engine configuration documents.
pub struct ConfigHandle {
    core: HandleCore,
    // Editing sessions not yet closed by the caller.
    open: Mutex<HashSet<u64>>,
}

impl ConfigHandle {
    pub(crate) fn new(owner: &Arc<EngineGateway>) -> Self {
        Self {
            core: HandleCore::new(owner),
            open: Mutex::new(HashSet::new()),
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

    /// Open an editing session seeded with the engine's template config.
    pub fn create_template(&self) -> GatewayResult<u64> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut handle = 0u64;
            let rc = native.config_create(&mut handle);
            handle_return_code_for(rc, native.as_ref(), "config_create()", Vec::new())?;
            self.open.lock().insert(handle);
            Ok(handle)
        })
    }

    /// Open an editing session over an existing definition.
    pub fn import(&self, definition: &str) -> GatewayResult<u64> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut handle = 0u64;
            let rc = native.config_import(definition, &mut handle);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_import(definition)",
                error_params![("definition", definition)],
            )?;
            self.open.lock().insert(handle);
            Ok(handle)
        })
    }

    /// Serialize an editing session back to its JSON definition.
    pub fn export(&self, handle: u64) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.config_export(handle, &mut out);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_export(handle)",
                error_params![("handle", handle)],
            )?;
            Ok(out)
        })
    }

    /// Close an editing session.
    pub fn close(&self, handle: u64) -> GatewayResult<()> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let rc = native.config_close(handle);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_close(handle)",
                error_params![("handle", handle)],
            )?;
            self.open.lock().remove(&handle);
            Ok(())
        })
    }

    /// Teardown: close any editing session the caller left open. Runs
    /// inside the destroy cascade with the gateway already draining, so it
    /// goes straight at the native engine rather than through `execute`.
    pub(crate) fn destroy(&self, native: &dyn NativeEngine) -> GatewayResult<()> {
        self.core.mark_destroyed();
        let leaked: Vec<u64> = self.open.lock().drain().collect();
        let mut result = Ok(());
        for handle in leaked {
            let rc = native.config_close(handle);
            if let Err(err) = handle_return_code_for(
                rc,
                native,
                "config_close(handle)",
                error_params![("handle", handle)],
            ) {
                result = Err(err);
            }
        }
        result
    }
}
