//! Native engine bindings seam
//!
//! The gateway treats the entity-resolution engine as an opaque external
//! collaborator: every call returns an integer code, `0` meaning success,
//! and failure details are fetched through the last-error protocol.
//! Output buffers are only valid after the return code has been checked.

pub mod mock;

/// Return code signalling success for every native call.
pub const RC_OK: i64 = 0;

/// Last-error code the engine reports when an atomic replace of the
/// default configuration id loses against a concurrent update.
pub const ERR_REPLACE_CONFLICT: i64 = 2006;

/// Last-error lookup on the native engine
///
/// Valid immediately after a native call returned non-zero; the next
/// native call on the same engine may overwrite it.
pub trait ErrorSource {
    /// Code of the most recent failure, `0` if none is stored
    fn last_error_code(&self) -> i64;
    /// Message of the most recent failure, empty if none is stored
    fn last_error_message(&self) -> String;
    /// Drop the stored failure
    fn clear_last_error(&self);
}

/// Bindings to the native entity-resolution engine
///
/// One implementation wraps the real engine library; [`mock::MockEngine`]
/// stands in for it in tests. All methods are callable from any thread and
/// may block in native code. Out-parameters are populated only on success.
pub trait NativeEngine: ErrorSource + Send + Sync {
    /// Bring the engine up. Called exactly once per gateway instance.
    /// `config_id` of `None` means the manager's current default.
    fn initialize(
        &self,
        instance_name: &str,
        settings: &str,
        config_id: Option<i64>,
        verbose_logging: bool,
    ) -> i64;

    /// Release the engine. Called exactly once, after in-flight work has
    /// drained.
    fn shutdown(&self) -> i64;

    // --- product metadata ---

    fn product_version(&self, out: &mut String) -> i64;
    fn product_license(&self, out: &mut String) -> i64;

    // --- configuration editing (opaque in-memory documents) ---

    fn config_create(&self, handle_out: &mut u64) -> i64;
    fn config_import(&self, definition: &str, handle_out: &mut u64) -> i64;
    fn config_export(&self, handle: u64, out: &mut String) -> i64;
    fn config_close(&self, handle: u64) -> i64;

    // --- configuration-set manager ---

    fn config_register(&self, definition: &str, comment: &str, id_out: &mut i64) -> i64;
    fn config_fetch(&self, config_id: i64, out: &mut String) -> i64;
    /// `0` in `id_out` means no default is tracked.
    fn config_default_id(&self, id_out: &mut i64) -> i64;
    fn config_set_default_id(&self, config_id: i64) -> i64;
    fn config_replace_default_id(&self, new_id: i64, expected_current: i64) -> i64;

    // --- repository diagnostics ---

    fn diagnostic_repository_info(&self, out: &mut String) -> i64;
    fn diagnostic_check_performance(&self, seconds: i64, out: &mut String) -> i64;

    // --- entity resolution ---

    fn engine_prime(&self) -> i64;
    fn engine_stats(&self, out: &mut String) -> i64;
    fn engine_add_record(&self, data_source: &str, record_id: &str, definition: &str) -> i64;
    fn engine_delete_record(&self, data_source: &str, record_id: &str) -> i64;
    fn engine_search(&self, attributes: &str, out: &mut String) -> i64;
}
