//! Core entity-resolution capability
//!
//! Pure delegations: the resolution semantics live behind the native
//! seam. Record identifiers are captured in the error parameter snapshot,
//! so they are subject to the process redaction policy.

use std::sync::Arc;

use reso_core::{error_params, handle_return_code, handle_return_code_for, GatewayResult};

use super::HandleCore;
use crate::gateway::EngineGateway;

/// Entity-resolution operations on the repository.
pub struct EngineHandle {
    core: HandleCore,
}

impl EngineHandle {
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

    /// Warm the engine's internal caches.
    pub fn prime(&self) -> GatewayResult<()> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let rc = native.engine_prime();
            handle_return_code(rc, native.as_ref())
        })
    }

    /// Engine workload statistics as a JSON document.
    pub fn stats(&self) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.engine_stats(&mut out);
            handle_return_code_for(rc, native.as_ref(), "engine_stats()", Vec::new())?;
            Ok(out)
        })
    }

    /// Load one record into the repository.
    pub fn add_record(
        &self,
        data_source: &str,
        record_id: &str,
        definition: &str,
    ) -> GatewayResult<()> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let rc = native.engine_add_record(data_source, record_id, definition);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "engine_add_record(data_source, record_id, definition)",
                error_params![
                    ("data_source", data_source),
                    ("record_id", record_id),
                    ("definition", definition),
                ],
            )
        })
    }

    /// Remove one record from the repository.
    pub fn delete_record(&self, data_source: &str, record_id: &str) -> GatewayResult<()> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let rc = native.engine_delete_record(data_source, record_id);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "engine_delete_record(data_source, record_id)",
                error_params![("data_source", data_source), ("record_id", record_id)],
            )
        })
    }

    /// Search for entities matching the given attribute document.
    pub fn search(&self, attributes: &str) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.engine_search(attributes, &mut out);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "engine_search(attributes)",
                error_params![("attributes", attributes)],
            )?;
            Ok(out)
        })
    }

    pub(crate) fn destroy(&self) {
        self.core.mark_destroyed();
    }
}
