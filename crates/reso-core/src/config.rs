//! Gateway configuration
//!
//! The recognized options for constructing a gateway instance. Settings are
//! an opaque string handed to the native engine, typically JSON; the
//! gateway never parses or validates them.

use serde::{Deserialize, Serialize};

/// Instance name used when the caller does not supply one.
pub const DEFAULT_INSTANCE_NAME: &str = "reso";

/// Environment variable consulted for engine settings when the caller does
/// not supply any.
pub const SETTINGS_ENV_VAR: &str = "RESO_ENGINE_SETTINGS";

/// Built-in bootstrap settings: an in-memory repository, enough for the
/// engine to come up without deployment-specific configuration.
pub const BOOTSTRAP_SETTINGS: &str = r#"{"engine":{"resource_path":"/opt/reso/resources","support_path":"/var/lib/reso"},"repository":{"connection":"sqlite::memory:"}}"#;

/// Configuration for a gateway instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Instance name reported to the native engine
    #[serde(default = "default_instance_name")]
    pub instance_name: String,
    /// Opaque engine settings, typically JSON
    #[serde(default = "default_settings")]
    pub settings: String,
    /// Ask the native engine for verbose logging
    #[serde(default)]
    pub verbose_logging: bool,
    /// Configuration id to initialize with; absent means the manager's
    /// current default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_id: Option<i64>,
}

fn default_instance_name() -> String {
    DEFAULT_INSTANCE_NAME.to_string()
}

// The environment is consulted at construction time only, never re-polled
// afterwards.
fn default_settings() -> String {
    std::env::var(SETTINGS_ENV_VAR).unwrap_or_else(|_| BOOTSTRAP_SETTINGS.to_string())
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            instance_name: default_instance_name(),
            settings: default_settings(),
            verbose_logging: false,
            config_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn defaults_without_environment() {
        std::env::remove_var(SETTINGS_ENV_VAR);
        let config = GatewayConfig::default();
        assert_eq!(config.instance_name, DEFAULT_INSTANCE_NAME);
        assert_eq!(config.settings, BOOTSTRAP_SETTINGS);
        assert!(!config.verbose_logging);
        assert_eq!(config.config_id, None);
    }

    #[test]
    #[serial]
    fn settings_default_reads_environment() {
        std::env::set_var(SETTINGS_ENV_VAR, r#"{"repository":{"connection":"pg://db"}}"#);
        let config = GatewayConfig::default();
        assert_eq!(config.settings, r#"{"repository":{"connection":"pg://db"}}"#);
        std::env::remove_var(SETTINGS_ENV_VAR);
    }

    #[test]
    fn deserializes_with_partial_options() {
        let config: GatewayConfig =
            serde_json::from_str(r#"{"instance_name":"probe","config_id":7}"#).unwrap();
        assert_eq!(config.instance_name, "probe");
        assert_eq!(config.config_id, Some(7));
        assert!(!config.verbose_logging);
    }
}
