//! Gateway lifecycle and singleton-slot tests
//!
//! The slot is process-wide, so every test here is `#[serial]` and tears
//! its gateway down before returning.

mod common;

use std::sync::Arc;
use std::thread;

use common::{build_gateway, init_tracing, mock_engine};
use reso_core::native::mock::RC_FAILURE;
use reso_gateway::{EngineGateway, GatewayBuilder, GatewayError, LifecycleState};
use serial_test::serial;

#[test]
#[serial]
fn second_construction_fails_while_first_is_active() {
    let (first, first_engine) = build_gateway("A");
    let active = EngineGateway::active().expect("slot should hold the instance");
    assert!(Arc::ptr_eq(&active, &first));

    let second_engine = mock_engine();
    let err = GatewayBuilder::new(second_engine.clone())
        .instance_name("B")
        .settings("{}")
        .build()
        .unwrap_err();
    assert!(matches!(err, GatewayError::IllegalState(_)));
    // The loser never touched its native engine.
    assert_eq!(second_engine.init_count(), 0);
    // The first instance is unaffected.
    assert!(first.is_active());

    first.destroy().unwrap();
    assert!(EngineGateway::active().is_none());
    assert_eq!(first_engine.shutdown_count(), 1);

    // With the slot free, the second construction succeeds.
    let replacement = GatewayBuilder::new(second_engine.clone())
        .instance_name("B")
        .settings("{}")
        .build()
        .unwrap();
    assert!(replacement.is_active());
    assert_eq!(second_engine.init_count(), 1);
    replacement.destroy().unwrap();
}

#[test]
#[serial]
fn builder_options_reach_the_native_engine() {
    init_tracing();
    let engine = mock_engine();
    let gateway = GatewayBuilder::new(engine.clone())
        .instance_name("opts")
        .settings(r#"{"repository":{"connection":"pg://primary"}}"#)
        .verbose_logging(true)
        .config_id(42)
        .build()
        .unwrap();

    let args = engine.init_args().unwrap();
    assert_eq!(args.instance_name, "opts");
    assert_eq!(args.settings, r#"{"repository":{"connection":"pg://primary"}}"#);
    assert_eq!(args.config_id, Some(42));
    assert!(args.verbose_logging);

    gateway.destroy().unwrap();
}

#[test]
#[serial]
fn initialization_failure_leaves_the_slot_empty() {
    init_tracing();
    let engine = mock_engine();
    engine.fail_next(RC_FAILURE, 41, "bad settings");

    let err = GatewayBuilder::new(engine.clone())
        .settings("{}")
        .build()
        .unwrap_err();
    match err {
        GatewayError::Native(native) => {
            assert_eq!(native.code(), 41);
            assert_eq!(native.message(), "bad settings");
        }
        other => panic!("expected Native, got {other:?}"),
    }
    assert!(EngineGateway::active().is_none());

    // The same engine initializes cleanly on retry.
    let gateway = GatewayBuilder::new(engine.clone()).settings("{}").build().unwrap();
    assert!(gateway.is_active());
    gateway.destroy().unwrap();
}

#[test]
#[serial]
fn destroy_is_idempotent() {
    let (gateway, engine) = build_gateway("idem");
    gateway.destroy().unwrap();
    gateway.destroy().unwrap();
    assert_eq!(engine.shutdown_count(), 1);
    assert_eq!(gateway.state(), LifecycleState::Destroyed);
}

#[test]
#[serial]
fn concurrent_destroy_observes_single_teardown() {
    let (gateway, engine) = build_gateway("race");

    let mut joins = Vec::new();
    for _ in 0..8 {
        let gateway = gateway.clone();
        joins.push(thread::spawn(move || gateway.destroy()));
    }
    for join in joins {
        join.join().unwrap().unwrap();
    }

    assert_eq!(engine.shutdown_count(), 1);
    assert_eq!(gateway.state(), LifecycleState::Destroyed);
    assert!(EngineGateway::active().is_none());
}

#[test]
#[serial]
fn stale_reference_fails_ensure_active() {
    let (gateway, _engine) = build_gateway("stale");
    gateway.ensure_active().unwrap();

    gateway.destroy().unwrap();
    let err = gateway.ensure_active().unwrap_err();
    assert!(matches!(err, GatewayError::IllegalState(_)));
    assert!(!gateway.is_active());
}

#[test]
#[serial]
fn native_release_failure_still_reaches_terminal_state() {
    let (gateway, engine) = build_gateway("release-fail");
    engine.fail_next(RC_FAILURE, 77, "device busy");

    let err = gateway.destroy().unwrap_err();
    match err {
        GatewayError::Native(native) => assert_eq!(native.code(), 77),
        other => panic!("expected Native, got {other:?}"),
    }

    // Terminal state and a free slot despite the failed release.
    assert_eq!(gateway.state(), LifecycleState::Destroyed);
    assert!(EngineGateway::active().is_none());

    // A fresh instance can be built.
    let (next, _next_engine) = build_gateway("after-release-fail");
    next.destroy().unwrap();
}
