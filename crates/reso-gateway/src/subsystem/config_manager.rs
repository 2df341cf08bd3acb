//! Configuration-set manager capability
//!
//! Tracks registered configuration definitions in the repository and the
//! default pointer the engine boots from.

use std::sync::Arc;

use reso_core::{error_params, handle_return_code_for, GatewayResult};

use super::HandleCore;
use crate::gateway::EngineGateway;

/// Registered configuration sets and the tracked default pointer.
pub struct ConfigManagerHandle {
    core: HandleCore,
}

impl ConfigManagerHandle {
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

    /// Register a definition; returns its repository id.
    pub fn register(&self, definition: &str, comment: &str) -> GatewayResult<i64> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut id = 0i64;
            let rc = native.config_register(definition, comment, &mut id);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_register(definition, comment)",
                error_params![("definition", definition), ("comment", comment)],
            )?;
            Ok(id)
        })
    }

    /// Fetch a registered definition by id.
    pub fn fetch(&self, config_id: i64) -> GatewayResult<String> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut out = String::new();
            let rc = native.config_fetch(config_id, &mut out);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_fetch(config_id)",
                error_params![("config_id", config_id)],
            )?;
            Ok(out)
        })
    }

    /// The currently tracked default configuration id, if one is set.
    pub fn default_config_id(&self) -> GatewayResult<Option<i64>> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let mut id = 0i64;
            let rc = native.config_default_id(&mut id);
            handle_return_code_for(rc, native.as_ref(), "config_default_id()", Vec::new())?;
            Ok((id != 0).then_some(id))
        })
    }

    /// Point the tracked default at `config_id`.
    pub fn set_default_config_id(&self, config_id: i64) -> GatewayResult<()> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let rc = native.config_set_default_id(config_id);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_set_default_id(config_id)",
                error_params![("config_id", config_id)],
            )
        })
    }

    /// Atomically replace the tracked default, failing with
    /// [`reso_core::GatewayError::ReplaceConflict`] when
    /// `expected_current` no longer matches. Callers retry with a fresh
    /// [`default_config_id`](Self::default_config_id).
    pub fn replace_default_config_id(
        &self,
        new_id: i64,
        expected_current: i64,
    ) -> GatewayResult<()> {
        let gateway = self.core.usable()?;
        gateway.execute(|| {
            let native = gateway.native();
            let rc = native.config_replace_default_id(new_id, expected_current);
            handle_return_code_for(
                rc,
                native.as_ref(),
                "config_replace_default_id(new_id, expected_current)",
                error_params![("new_id", new_id), ("expected_current", expected_current)],
            )
        })
    }

    pub(crate) fn destroy(&self) {
        self.core.mark_destroyed();
    }
}
