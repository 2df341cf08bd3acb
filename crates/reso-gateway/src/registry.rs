//! Lazily-constructed subsystem handle registry
//!
//! One initialize-once cell per capability: concurrent first-time callers
//! observe a single created handle, and repeated calls return the
//! identical instance until the gateway is destroyed.

use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, warn};

use reso_core::NativeEngine;

use crate::gateway::EngineGateway;
use crate::subsystem::{
    ConfigHandle, ConfigManagerHandle, DiagnosticHandle, EngineHandle, ProductHandle,
};

pub(crate) struct SubsystemRegistry {
    config: OnceCell<Arc<ConfigHandle>>,
    config_manager: OnceCell<Arc<ConfigManagerHandle>>,
    diagnostic: OnceCell<Arc<DiagnosticHandle>>,
    engine: OnceCell<Arc<EngineHandle>>,
    product: OnceCell<Arc<ProductHandle>>,
}

impl SubsystemRegistry {
    pub(crate) fn new() -> Self {
        Self {
            config: OnceCell::new(),
            config_manager: OnceCell::new(),
            diagnostic: OnceCell::new(),
            engine: OnceCell::new(),
            product: OnceCell::new(),
        }
    }

    pub(crate) fn config(&self, owner: &Arc<EngineGateway>) -> Arc<ConfigHandle> {
        self.config
            .get_or_init(|| {
                debug!(instance = %owner.instance_name(), "creating config handle");
                Arc::new(ConfigHandle::new(owner))
            })
            .clone()
    }

    pub(crate) fn config_manager(&self, owner: &Arc<EngineGateway>) -> Arc<ConfigManagerHandle> {
        self.config_manager
            .get_or_init(|| {
                debug!(instance = %owner.instance_name(), "creating config-manager handle");
                Arc::new(ConfigManagerHandle::new(owner))
            })
            .clone()
    }

    pub(crate) fn diagnostic(&self, owner: &Arc<EngineGateway>) -> Arc<DiagnosticHandle> {
        self.diagnostic
            .get_or_init(|| {
                debug!(instance = %owner.instance_name(), "creating diagnostic handle");
                Arc::new(DiagnosticHandle::new(owner))
            })
            .clone()
    }

    pub(crate) fn engine(&self, owner: &Arc<EngineGateway>) -> Arc<EngineHandle> {
        self.engine
            .get_or_init(|| {
                debug!(instance = %owner.instance_name(), "creating engine handle");
                Arc::new(EngineHandle::new(owner))
            })
            .clone()
    }

    pub(crate) fn product(&self, owner: &Arc<EngineGateway>) -> Arc<ProductHandle> {
        self.product
            .get_or_init(|| {
                debug!(instance = %owner.instance_name(), "creating product handle");
                Arc::new(ProductHandle::new(owner))
            })
            .clone()
    }

    /// Best-effort teardown of every created handle, in fixed order. A
    /// per-handle failure is logged and does not stop the cascade.
    pub(crate) fn destroy_all(&self, native: &dyn NativeEngine) {
        if let Some(handle) = self.engine.get() {
            handle.destroy();
        }
        if let Some(handle) = self.config.get() {
            if let Err(err) = handle.destroy(native) {
                warn!(error = %err, "config handle teardown failed");
            }
        }
        if let Some(handle) = self.config_manager.get() {
            handle.destroy();
        }
        if let Some(handle) = self.diagnostic.get() {
            handle.destroy();
        }
        if let Some(handle) = self.product.get() {
            handle.destroy();
        }
    }
}
