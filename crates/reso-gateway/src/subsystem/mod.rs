//! Capability handles
//!
//! One handle per capability, obtained from the gateway and memoized
//! there. Handles own no native resource of their own: every operation
//! routes through the owning gateway's `execute` and the return-code
//! translator, so the lifecycle and accounting rules apply uniformly.

mod config;
mod config_manager;
mod diagnostic;
mod engine;
mod product;

pub use config::ConfigHandle;
pub use config_manager::ConfigManagerHandle;
pub use diagnostic::DiagnosticHandle;
pub use engine::EngineHandle;
pub use product::ProductHandle;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use reso_core::{GatewayError, GatewayResult};

use crate::gateway::EngineGateway;

/// Plumbing shared by every capability handle: the back-reference to the
/// owning gateway and the destroyed latch flipped by the teardown cascade.
pub(crate) struct HandleCore {
    owner: Weak<EngineGateway>,
    destroyed: AtomicBool,
}

impl HandleCore {
    pub(crate) fn new(owner: &Arc<EngineGateway>) -> Self {
        Self {
            owner: Arc::downgrade(owner),
            destroyed: AtomicBool::new(false),
        }
    }

    pub(crate) fn provider(&self) -> GatewayResult<Arc<EngineGateway>> {
        self.owner.upgrade().ok_or_else(|| {
            GatewayError::IllegalState("owning gateway no longer exists".to_string())
        })
    }

    pub(crate) fn is_destroyed(&self) -> bool {
        self.destroyed.load(Ordering::SeqCst)
    }

    pub(crate) fn mark_destroyed(&self) {
        self.destroyed.store(true, Ordering::SeqCst);
    }

    /// The gateway to run a native operation against; fails once this
    /// handle has been torn down.
    pub(crate) fn usable(&self) -> GatewayResult<Arc<EngineGateway>> {
        if self.is_destroyed() {
            return Err(GatewayError::IllegalState(
                "subsystem handle has been destroyed".to_string(),
            ));
        }
        self.provider()
    }
}
