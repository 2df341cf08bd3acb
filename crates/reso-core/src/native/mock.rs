//! Mock native engine for testing
//!
//! Behaves like a tiny in-memory engine (config registry, record store)
//! and supports failure injection: queued failures are consumed by
//! subsequent native calls in order, one per call. Every call is recorded
//! so tests can assert delegation.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicU64, AtomicUsize, Ordering};

use parking_lot::Mutex;

use super::{ErrorSource, NativeEngine, ERR_REPLACE_CONFLICT, RC_OK};

/// Generic failure return code handed back by the mock.
pub const RC_FAILURE: i64 = -1;

/// Last-error codes the mock reports on its own protocol violations.
pub const ERR_ALREADY_INITIALIZED: i64 = 11;
pub const ERR_NOT_INITIALIZED: i64 = 12;
pub const ERR_UNKNOWN_CONFIG: i64 = 13;
pub const ERR_UNKNOWN_RECORD: i64 = 14;
pub const ERR_BAD_HANDLE: i64 = 15;

/// A queued failure: the return code handed to the caller plus the
/// last-error state the engine reports afterwards.
#[derive(Debug, Clone)]
pub struct InjectedFailure {
    pub return_code: i64,
    pub error_code: i64,
    pub message: String,
}

/// Arguments the gateway passed to `initialize`, captured for assertions.
#[derive(Debug, Clone)]
pub struct InitArgs {
    pub instance_name: String,
    pub settings: String,
    pub config_id: Option<i64>,
    pub verbose_logging: bool,
}

/// In-memory stand-in for the native entity-resolution engine
pub struct MockEngine {
    initialized: AtomicBool,
    init_count: AtomicUsize,
    shutdown_count: AtomicUsize,
    init_args: Mutex<Option<InitArgs>>,
    calls: Mutex<Vec<String>>,
    last_error: Mutex<Option<(i64, String)>>,
    injected: Mutex<VecDeque<InjectedFailure>>,

    next_config_handle: AtomicU64,
    open_configs: Mutex<HashMap<u64, String>>,

    next_config_id: AtomicI64,
    registered_configs: Mutex<HashMap<i64, String>>,
    default_config_id: AtomicI64, // 0 = unset

    records: Mutex<HashMap<(String, String), String>>,
}

impl Default for MockEngine {
    fn default() -> Self {
        Self {
            initialized: AtomicBool::new(false),
            init_count: AtomicUsize::new(0),
            shutdown_count: AtomicUsize::new(0),
            init_args: Mutex::new(None),
            calls: Mutex::new(Vec::new()),
            last_error: Mutex::new(None),
            injected: Mutex::new(VecDeque::new()),
            next_config_handle: AtomicU64::new(1),
            open_configs: Mutex::new(HashMap::new()),
            next_config_id: AtomicI64::new(1),
            registered_configs: Mutex::new(HashMap::new()),
            default_config_id: AtomicI64::new(0),
            records: Mutex::new(HashMap::new()),
        }
    }
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a failure for the next native call.
    pub fn fail_next(&self, return_code: i64, error_code: i64, message: impl Into<String>) {
        self.injected.lock().push_back(InjectedFailure {
            return_code,
            error_code,
            message: message.into(),
        });
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn init_count(&self) -> usize {
        self.init_count.load(Ordering::SeqCst)
    }

    pub fn shutdown_count(&self) -> usize {
        self.shutdown_count.load(Ordering::SeqCst)
    }

    pub fn init_args(&self) -> Option<InitArgs> {
        self.init_args.lock().clone()
    }

    /// Names of every native call made so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    /// Config editing handles that are still open.
    pub fn open_config_handles(&self) -> usize {
        self.open_configs.lock().len()
    }

    // Record the call and consume one injected failure, if any.
    fn begin(&self, call: &str) -> Option<i64> {
        self.calls.lock().push(call.to_string());
        let failure = self.injected.lock().pop_front()?;
        *self.last_error.lock() = Some((failure.error_code, failure.message));
        Some(failure.return_code)
    }

    fn fail(&self, code: i64, message: impl Into<String>) -> i64 {
        *self.last_error.lock() = Some((code, message.into()));
        RC_FAILURE
    }

    fn require_initialized(&self) -> Option<i64> {
        if self.initialized.load(Ordering::SeqCst) {
            None
        } else {
            Some(self.fail(ERR_NOT_INITIALIZED, "engine is not initialized"))
        }
    }
}

impl ErrorSource for MockEngine {
    fn last_error_code(&self) -> i64 {
        self.last_error.lock().as_ref().map_or(0, |(code, _)| *code)
    }

    fn last_error_message(&self) -> String {
        self.last_error
            .lock()
            .as_ref()
            .map_or_else(String::new, |(_, message)| message.clone())
    }

    fn clear_last_error(&self) {
        *self.last_error.lock() = None;
    }
}

impl NativeEngine for MockEngine {
    fn initialize(
        &self,
        instance_name: &str,
        settings: &str,
        config_id: Option<i64>,
        verbose_logging: bool,
    ) -> i64 {
        if let Some(rc) = self.begin("initialize") {
            return rc;
        }
        if self.initialized.swap(true, Ordering::SeqCst) {
            return self.fail(ERR_ALREADY_INITIALIZED, "engine is already initialized");
        }
        self.init_count.fetch_add(1, Ordering::SeqCst);
        *self.init_args.lock() = Some(InitArgs {
            instance_name: instance_name.to_string(),
            settings: settings.to_string(),
            config_id,
            verbose_logging,
        });
        RC_OK
    }

    fn shutdown(&self) -> i64 {
        if let Some(rc) = self.begin("shutdown") {
            return rc;
        }
        self.initialized.store(false, Ordering::SeqCst);
        self.shutdown_count.fetch_add(1, Ordering::SeqCst);
        RC_OK
    }

    fn product_version(&self, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("product_version") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        out.clear();
        out.push_str(r#"{"product":"reso-engine","version":"4.0.0"}"#);
        RC_OK
    }

    fn product_license(&self, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("product_license") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        out.clear();
        out.push_str(r#"{"customer":"internal","record_limit":100000}"#);
        RC_OK
    }

    fn config_create(&self, handle_out: &mut u64) -> i64 {
        if let Some(rc) = self.begin("config_create") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        let handle = self.next_config_handle.fetch_add(1, Ordering::SeqCst);
        self.open_configs
            .lock()
            .insert(handle, r#"{"data_sources":[]}"#.to_string());
        *handle_out = handle;
        RC_OK
    }

    fn config_import(&self, definition: &str, handle_out: &mut u64) -> i64 {
        if let Some(rc) = self.begin("config_import") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        let handle = self.next_config_handle.fetch_add(1, Ordering::SeqCst);
        self.open_configs.lock().insert(handle, definition.to_string());
        *handle_out = handle;
        RC_OK
    }

    fn config_export(&self, handle: u64, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("config_export") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        match self.open_configs.lock().get(&handle) {
            Some(definition) => {
                out.clear();
                out.push_str(definition);
                RC_OK
            }
            None => self.fail(ERR_BAD_HANDLE, format!("unknown config handle {handle}")),
        }
    }

    fn config_close(&self, handle: u64) -> i64 {
        if let Some(rc) = self.begin("config_close") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        match self.open_configs.lock().remove(&handle) {
            Some(_) => RC_OK,
            None => self.fail(ERR_BAD_HANDLE, format!("unknown config handle {handle}")),
        }
    }

    fn config_register(&self, definition: &str, _comment: &str, id_out: &mut i64) -> i64 {
        if let Some(rc) = self.begin("config_register") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        let id = self.next_config_id.fetch_add(1, Ordering::SeqCst);
        self.registered_configs
            .lock()
            .insert(id, definition.to_string());
        *id_out = id;
        RC_OK
    }

    fn config_fetch(&self, config_id: i64, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("config_fetch") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        match self.registered_configs.lock().get(&config_id) {
            Some(definition) => {
                out.clear();
                out.push_str(definition);
                RC_OK
            }
            None => self.fail(ERR_UNKNOWN_CONFIG, format!("no config with id {config_id}")),
        }
    }

    fn config_default_id(&self, id_out: &mut i64) -> i64 {
        if let Some(rc) = self.begin("config_default_id") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        *id_out = self.default_config_id.load(Ordering::SeqCst);
        RC_OK
    }

    fn config_set_default_id(&self, config_id: i64) -> i64 {
        if let Some(rc) = self.begin("config_set_default_id") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        if !self.registered_configs.lock().contains_key(&config_id) {
            return self.fail(ERR_UNKNOWN_CONFIG, format!("no config with id {config_id}"));
        }
        self.default_config_id.store(config_id, Ordering::SeqCst);
        RC_OK
    }

    fn config_replace_default_id(&self, new_id: i64, expected_current: i64) -> i64 {
        if let Some(rc) = self.begin("config_replace_default_id") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        if !self.registered_configs.lock().contains_key(&new_id) {
            return self.fail(ERR_UNKNOWN_CONFIG, format!("no config with id {new_id}"));
        }
        if self
            .default_config_id
            .compare_exchange(expected_current, new_id, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return self.fail(
                ERR_REPLACE_CONFLICT,
                format!("default config id is no longer {expected_current}"),
            );
        }
        RC_OK
    }

    fn diagnostic_repository_info(&self, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("diagnostic_repository_info") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        let record_count = self.records.lock().len();
        out.clear();
        out.push_str(&format!(
            r#"{{"repository":"mock","record_count":{record_count}}}"#
        ));
        RC_OK
    }

    fn diagnostic_check_performance(&self, seconds: i64, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("diagnostic_check_performance") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        out.clear();
        out.push_str(&format!(
            r#"{{"duration_seconds":{seconds},"inserts_per_second":1000}}"#
        ));
        RC_OK
    }

    fn engine_prime(&self) -> i64 {
        if let Some(rc) = self.begin("engine_prime") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        RC_OK
    }

    fn engine_stats(&self, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("engine_stats") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        let record_count = self.records.lock().len();
        out.clear();
        out.push_str(&format!(r#"{{"loaded_records":{record_count}}}"#));
        RC_OK
    }

    fn engine_add_record(&self, data_source: &str, record_id: &str, definition: &str) -> i64 {
        if let Some(rc) = self.begin("engine_add_record") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        self.records.lock().insert(
            (data_source.to_string(), record_id.to_string()),
            definition.to_string(),
        );
        RC_OK
    }

    fn engine_delete_record(&self, data_source: &str, record_id: &str) -> i64 {
        if let Some(rc) = self.begin("engine_delete_record") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        let key = (data_source.to_string(), record_id.to_string());
        match self.records.lock().remove(&key) {
            Some(_) => RC_OK,
            None => self.fail(
                ERR_UNKNOWN_RECORD,
                format!("no record {record_id} in {data_source}"),
            ),
        }
    }

    fn engine_search(&self, attributes: &str, out: &mut String) -> i64 {
        if let Some(rc) = self.begin("engine_search") {
            return rc;
        }
        if let Some(rc) = self.require_initialized() {
            return rc;
        }
        if attributes.trim().is_empty() {
            return self.fail(ERR_UNKNOWN_RECORD, "empty search attributes");
        }
        out.clear();
        out.push_str(r#"{"resolved_entities":[]}"#);
        RC_OK
    }
}
