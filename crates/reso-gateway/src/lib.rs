//! reso-gateway - Singleton gateway over the native entity-resolution engine
//!
//! At most one gateway instance is active per process; it owns the native
//! engine and mediates all access to it.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                     EngineGateway                        │
//! │  singleton slot + lifecycle state machine                │
//! │                                                          │
//! │  ┌──────────────┐   ┌───────────────────────────────┐   │
//! │  │ExecutionGate │   │SubsystemRegistry              │   │
//! │  │(in-flight    │   │(config / config-manager /     │   │
//! │  │ accounting)  │   │ diagnostic / engine / product)│   │
//! │  └──────┬───────┘   └──────────────┬────────────────┘   │
//! │         │                          │                    │
//! │         └─────────┬────────────────┘                    │
//! │                   │                                     │
//! │          ┌────────┴────────┐                            │
//! │          │  NativeEngine   │                            │
//! │          │ (bindings seam) │                            │
//! │          └─────────────────┘                            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Every subsystem operation routes through [`EngineGateway::execute`] and
//! the return-code translator; `destroy` drains in-flight work before the
//! engine is released.

mod gate;
mod gateway;
mod registry;
pub mod subsystem;

pub use gate::LifecycleState;
pub use gateway::{EngineGateway, GatewayBuilder};
pub use subsystem::{
    ConfigHandle, ConfigManagerHandle, DiagnosticHandle, EngineHandle, ProductHandle,
};

// Re-export for convenience
pub use reso_core::{GatewayConfig, GatewayError, GatewayResult, NativeEngine};
