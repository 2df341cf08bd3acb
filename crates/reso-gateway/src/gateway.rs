//! Gateway lifecycle and the process-wide singleton slot

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use reso_core::{
    handle_return_code, GatewayConfig, GatewayError, GatewayResult, NativeEngine, RC_OK,
};

use crate::gate::{ExecutionGate, LifecycleState};
use crate::registry::SubsystemRegistry;
use crate::subsystem::{
    ConfigHandle, ConfigManagerHandle, DiagnosticHandle, EngineHandle, ProductHandle,
};

// The process-wide singleton slot: the one active gateway, or nothing. All
// mutation goes through `GatewayBuilder::build` and `EngineGateway::destroy`.
static ACTIVE_GATEWAY: Mutex<Option<Arc<EngineGateway>>> = Mutex::new(None);

/// Builder for the process-singleton [`EngineGateway`]
///
/// Unset options fall back to the defaults described on
/// [`GatewayConfig`]. The native bindings are the one required input.
pub struct GatewayBuilder {
    config: GatewayConfig,
    native: Arc<dyn NativeEngine>,
}

impl GatewayBuilder {
    /// Start a builder over the given native bindings with default options.
    pub fn new(native: Arc<dyn NativeEngine>) -> Self {
        Self {
            config: GatewayConfig::default(),
            native,
        }
    }

    /// Start from an existing configuration.
    pub fn from_config(native: Arc<dyn NativeEngine>, config: GatewayConfig) -> Self {
        Self { config, native }
    }

    pub fn instance_name(mut self, name: impl Into<String>) -> Self {
        self.config.instance_name = name.into();
        self
    }

    pub fn settings(mut self, settings: impl Into<String>) -> Self {
        self.config.settings = settings.into();
        self
    }

    pub fn verbose_logging(mut self, verbose: bool) -> Self {
        self.config.verbose_logging = verbose;
        self
    }

    pub fn config_id(mut self, config_id: i64) -> Self {
        self.config.config_id = Some(config_id);
        self
    }

    /// Acquire the singleton slot and initialize the native engine.
    ///
    /// Fails with [`GatewayError::IllegalState`] while another instance is
    /// active, in which case the native engine is not touched. An
    /// initialization failure leaves the slot empty.
    pub fn build(self) -> GatewayResult<Arc<EngineGateway>> {
        // The slot lock is held across native initialization so a racing
        // builder cannot initialize a second engine.
        let mut slot = ACTIVE_GATEWAY.lock();
        if slot.is_some() {
            return Err(GatewayError::IllegalState(
                "an active gateway instance already exists".to_string(),
            ));
        }

        let GatewayBuilder { config, native } = self;
        let rc = native.initialize(
            &config.instance_name,
            &config.settings,
            config.config_id,
            config.verbose_logging,
        );
        handle_return_code(rc, native.as_ref())?;

        info!(
            instance = %config.instance_name,
            config_id = ?config.config_id,
            "gateway active"
        );
        let gateway = Arc::new(EngineGateway {
            config,
            native,
            gate: ExecutionGate::new(),
            subsystems: SubsystemRegistry::new(),
        });
        *slot = Some(gateway.clone());
        Ok(gateway)
    }
}

/// The gateway owning the native entity-resolution engine
///
/// At most one instance is active per process. All native work funnels
/// through [`execute`](Self::execute); [`destroy`](Self::destroy) drains
/// in-flight work before the engine is released.
pub struct EngineGateway {
    config: GatewayConfig,
    native: Arc<dyn NativeEngine>,
    gate: ExecutionGate,
    subsystems: SubsystemRegistry,
}

impl std::fmt::Debug for EngineGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineGateway")
            .field("instance_name", &self.config.instance_name)
            .field("state", &self.gate.state())
            .finish_non_exhaustive()
    }
}

impl EngineGateway {
    /// The currently active gateway, if any. A non-owning lookup: never
    /// constructs or destroys anything.
    pub fn active() -> Option<Arc<EngineGateway>> {
        ACTIVE_GATEWAY.lock().clone()
    }

    pub fn instance_name(&self) -> &str {
        &self.config.instance_name
    }

    /// The configuration this instance was built with.
    pub fn gateway_config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn state(&self) -> LifecycleState {
        self.gate.state()
    }

    pub fn is_active(&self) -> bool {
        self.gate.state() == LifecycleState::Active
    }

    /// Fail unless this instance is still active. Covers calls through a
    /// stale reference after [`destroy`](Self::destroy).
    pub fn ensure_active(&self) -> GatewayResult<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(GatewayError::IllegalState(format!(
                "gateway instance '{}' is not active",
                self.config.instance_name
            )))
        }
    }

    /// Run `task` against the engine.
    ///
    /// The task's own failure propagates unchanged; the in-flight counter
    /// is balanced on every exit path. Fails with
    /// [`GatewayError::IllegalState`] once destruction has begun.
    pub fn execute<T, F>(&self, task: F) -> GatewayResult<T>
    where
        F: FnOnce() -> GatewayResult<T>,
    {
        let _ticket = self.gate.enter().map_err(|()| {
            GatewayError::IllegalState(format!(
                "gateway instance '{}' is not accepting work",
                self.config.instance_name
            ))
        })?;
        task()
    }

    /// Number of `execute` calls currently running. A momentary snapshot
    /// under concurrent load; never negative, `0` once all work finished.
    pub fn executing_count(&self) -> usize {
        self.gate.executing_count()
    }

    pub(crate) fn native(&self) -> &Arc<dyn NativeEngine> {
        &self.native
    }

    // --- subsystem accessors: created on first use, memoized ---

    /// Configuration-editing capability.
    pub fn config(self: &Arc<Self>) -> GatewayResult<Arc<ConfigHandle>> {
        self.ensure_active()?;
        Ok(self.subsystems.config(self))
    }

    /// Configuration-set manager capability.
    pub fn config_manager(self: &Arc<Self>) -> GatewayResult<Arc<ConfigManagerHandle>> {
        self.ensure_active()?;
        Ok(self.subsystems.config_manager(self))
    }

    /// Repository diagnostics capability.
    pub fn diagnostic(self: &Arc<Self>) -> GatewayResult<Arc<DiagnosticHandle>> {
        self.ensure_active()?;
        Ok(self.subsystems.diagnostic(self))
    }

    /// Core entity-resolution capability.
    pub fn engine(self: &Arc<Self>) -> GatewayResult<Arc<EngineHandle>> {
        self.ensure_active()?;
        Ok(self.subsystems.engine(self))
    }

    /// Product metadata capability.
    pub fn product(self: &Arc<Self>) -> GatewayResult<Arc<ProductHandle>> {
        self.ensure_active()?;
        Ok(self.subsystems.product(self))
    }

    /// Tear the gateway down: stop accepting work, drain in-flight
    /// executions, destroy created subsystem handles, release the engine,
    /// free the singleton slot.
    ///
    /// Idempotent; concurrent callers observe a single teardown and the
    /// losers return immediately. The terminal state is always reached: a
    /// failure releasing the native engine is reported only after the slot
    /// is free and the state is `Destroyed`.
    pub fn destroy(&self) -> GatewayResult<()> {
        if !self.gate.begin_destroy() {
            // Another caller already tore this instance down.
            return Ok(());
        }

        info!(instance = %self.config.instance_name, "destroying gateway");
        self.gate.drain();
        self.subsystems.destroy_all(self.native.as_ref());
        let rc = self.native.shutdown();
        let released = handle_return_code(rc, self.native.as_ref());

        {
            let mut slot = ACTIVE_GATEWAY.lock();
            if slot
                .as_ref()
                .is_some_and(|active| std::ptr::eq(Arc::as_ptr(active), self))
            {
                *slot = None;
            }
        }
        self.gate.finish_destroy();

        if let Err(err) = &released {
            warn!(
                instance = %self.config.instance_name,
                error = %err,
                "native engine release failed"
            );
        }
        info!(instance = %self.config.instance_name, "gateway destroyed");
        released
    }
}

impl Drop for EngineGateway {
    fn drop(&mut self) {
        // The slot keeps a strong reference, so an undisposed gateway can
        // only drop once the slot no longer points at it. Release the
        // engine directly; there is no in-flight work to drain with the
        // last reference gone.
        if self.gate.state() != LifecycleState::Destroyed {
            warn!(
                instance = %self.config.instance_name,
                "gateway dropped without destroy; releasing engine"
            );
            let rc = self.native.shutdown();
            if rc != RC_OK {
                warn!(
                    instance = %self.config.instance_name,
                    rc,
                    "native engine release failed during drop"
                );
            }
        }
    }
}
