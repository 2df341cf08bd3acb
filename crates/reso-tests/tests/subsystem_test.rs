//! Subsystem registry and capability handle tests

mod common;

use std::sync::Arc;
use std::thread;

use common::build_gateway;
use pretty_assertions::assert_eq;
use reso_gateway::GatewayError;
use serial_test::serial;

#[test]
#[serial]
fn accessors_are_identity_stable() {
    let (gateway, _engine) = build_gateway("identity");

    assert!(Arc::ptr_eq(
        &gateway.config().unwrap(),
        &gateway.config().unwrap()
    ));
    assert!(Arc::ptr_eq(
        &gateway.config_manager().unwrap(),
        &gateway.config_manager().unwrap()
    ));
    assert!(Arc::ptr_eq(
        &gateway.diagnostic().unwrap(),
        &gateway.diagnostic().unwrap()
    ));
    assert!(Arc::ptr_eq(
        &gateway.engine().unwrap(),
        &gateway.engine().unwrap()
    ));
    assert!(Arc::ptr_eq(
        &gateway.product().unwrap(),
        &gateway.product().unwrap()
    ));

    gateway.destroy().unwrap();
}

#[test]
#[serial]
fn concurrent_first_access_creates_one_handle() {
    let (gateway, _engine) = build_gateway("first-access");

    let mut joins = Vec::new();
    for _ in 0..8 {
        let gateway = gateway.clone();
        joins.push(thread::spawn(move || gateway.product().unwrap()));
    }
    let handles: Vec<_> = joins.into_iter().map(|j| j.join().unwrap()).collect();
    for handle in &handles[1..] {
        assert!(Arc::ptr_eq(&handles[0], handle));
    }

    gateway.destroy().unwrap();
}

#[test]
#[serial]
fn handles_report_their_provider() {
    let (gateway, _engine) = build_gateway("provider");

    let product = gateway.product().unwrap();
    assert!(Arc::ptr_eq(&product.provider().unwrap(), &gateway));
    let engine_handle = gateway.engine().unwrap();
    assert!(Arc::ptr_eq(&engine_handle.provider().unwrap(), &gateway));

    gateway.destroy().unwrap();
}

#[test]
#[serial]
fn destroy_cascade_reaches_created_handles() {
    let (gateway, _engine) = build_gateway("cascade");
    let product = gateway.product().unwrap();
    let engine_handle = gateway.engine().unwrap();
    assert!(!product.is_destroyed());
    assert!(!engine_handle.is_destroyed());

    gateway.destroy().unwrap();

    assert!(product.is_destroyed());
    assert!(engine_handle.is_destroyed());
    assert!(matches!(
        product.version(),
        Err(GatewayError::IllegalState(_))
    ));
    assert!(matches!(
        engine_handle.prime(),
        Err(GatewayError::IllegalState(_))
    ));
    // Accessors refuse on a destroyed gateway too.
    assert!(matches!(
        gateway.diagnostic(),
        Err(GatewayError::IllegalState(_))
    ));
}

#[test]
#[serial]
fn operations_delegate_to_the_native_engine() {
    let (gateway, engine) = build_gateway("delegate");

    let product = gateway.product().unwrap();
    assert_eq!(
        product.version().unwrap(),
        r#"{"product":"reso-engine","version":"4.0.0"}"#
    );
    assert_eq!(
        product.license().unwrap(),
        r#"{"customer":"internal","record_limit":100000}"#
    );

    let resolution = gateway.engine().unwrap();
    resolution.prime().unwrap();
    resolution.add_record("CRM", "R-1", r#"{"name":"Ada"}"#).unwrap();
    resolution.add_record("CRM", "R-2", r#"{"name":"Grace"}"#).unwrap();
    assert_eq!(resolution.stats().unwrap(), r#"{"loaded_records":2}"#);

    resolution.delete_record("CRM", "R-1").unwrap();
    let err = resolution.delete_record("CRM", "R-1").unwrap_err();
    assert!(matches!(err, GatewayError::Native(_)));

    assert_eq!(
        resolution.search(r#"{"name":"Ada"}"#).unwrap(),
        r#"{"resolved_entities":[]}"#
    );

    let diagnostic = gateway.diagnostic().unwrap();
    assert_eq!(
        diagnostic.repository_info().unwrap(),
        r#"{"repository":"mock","record_count":1}"#
    );
    assert_eq!(
        diagnostic.check_performance(3).unwrap(),
        r#"{"duration_seconds":3,"inserts_per_second":1000}"#
    );

    let calls = engine.calls();
    assert!(calls.contains(&"engine_add_record".to_string()));
    assert!(calls.contains(&"diagnostic_repository_info".to_string()));

    gateway.destroy().unwrap();
}

#[test]
#[serial]
fn leaked_config_sessions_close_during_destroy() {
    let (gateway, engine) = build_gateway("leak");
    let config = gateway.config().unwrap();

    let leaked = config.create_template().unwrap();
    let imported = config.import(r#"{"data_sources":["CRM"]}"#).unwrap();
    assert_ne!(leaked, imported);
    assert_eq!(
        config.export(imported).unwrap(),
        r#"{"data_sources":["CRM"]}"#
    );
    config.close(imported).unwrap();
    assert_eq!(engine.open_config_handles(), 1);

    // `leaked` was never closed; the destroy cascade closes it.
    gateway.destroy().unwrap();
    assert_eq!(engine.open_config_handles(), 0);
    assert!(engine.calls().iter().filter(|c| *c == "config_close").count() >= 2);
}

#[test]
#[serial]
fn default_pointer_replace_detects_conflicts() {
    let (gateway, _engine) = build_gateway("conflict");
    let manager = gateway.config_manager().unwrap();
    assert_eq!(manager.default_config_id().unwrap(), None);

    let first = manager.register(r#"{"v":1}"#, "initial").unwrap();
    let second = manager.register(r#"{"v":2}"#, "updated").unwrap();
    manager.set_default_config_id(first).unwrap();
    assert_eq!(manager.default_config_id().unwrap(), Some(first));
    assert_eq!(manager.fetch(second).unwrap(), r#"{"v":2}"#);

    // Stale expectation: the default moved to `first` in the meantime.
    let err = manager.replace_default_config_id(second, 0).unwrap_err();
    assert!(matches!(err, GatewayError::ReplaceConflict { .. }));

    // Retrying with freshly read state succeeds.
    let current = manager.default_config_id().unwrap().unwrap();
    manager.replace_default_config_id(second, current).unwrap();
    assert_eq!(manager.default_config_id().unwrap(), Some(second));

    gateway.destroy().unwrap();
}
