//! Shared helpers for gateway integration tests

#![allow(dead_code)]

use std::sync::Arc;

use reso_core::native::mock::MockEngine;
use reso_gateway::{EngineGateway, GatewayBuilder};

/// Install a tracing subscriber once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// A fresh mock engine.
pub fn mock_engine() -> Arc<MockEngine> {
    Arc::new(MockEngine::new())
}

/// Build a gateway named `name` over a fresh mock engine.
pub fn build_gateway(name: &str) -> (Arc<EngineGateway>, Arc<MockEngine>) {
    init_tracing();
    let engine = mock_engine();
    let gateway = GatewayBuilder::new(engine.clone())
        .instance_name(name)
        .settings("{}")
        .build()
        .expect("gateway should build");
    (gateway, engine)
}
