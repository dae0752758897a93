//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Backing document store settings.
    pub store: StoreConfig,

    /// Deployment environment flag.
    pub environment: Environment,

    /// Request limits.
    pub limits: LimitsConfig,

    /// Parameter-pollution guard settings.
    pub pollution: PollutionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl GatewayConfig {
    /// Whether raw error detail may appear in response envelopes.
    pub fn expose_error_detail(&self) -> bool {
        self.environment == Environment::Development
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Backing document store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Connection string. Overridden by `MONGODB_URI`; the gateway boots
    /// without one, with every gated route answering 500 until it is set.
    pub uri: String,

    /// Driver pool size bound.
    pub max_pool_size: u32,

    /// Bound on connection establishment, seconds.
    pub connect_timeout_secs: u64,

    /// Bound on idle established sessions, seconds.
    pub idle_timeout_secs: u64,
}

impl StoreConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            uri: String::new(),
            max_pool_size: 10,
            connect_timeout_secs: 5,
            idle_timeout_secs: 45,
        }
    }
}

/// Deployment environment. Only `development` exposes raw error detail in
/// response envelopes; every other value suppresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Parse the `APP_ENV` value. Anything that is not literally
    /// `development` counts as production for detail-suppression purposes.
    pub fn from_flag(value: &str) -> Self {
        if value.eq_ignore_ascii_case("development") {
            Environment::Development
        } else {
            Environment::Production
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum request body size in bytes.
    pub body_cap_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            // 10 MiB
            body_cap_bytes: 10 * 1024 * 1024,
        }
    }
}

/// Parameter-pollution guard configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollutionConfig {
    /// Query parameters allowed to repeat (kept as arrays by handlers).
    pub whitelist: Vec<String>,
}

impl Default for PollutionConfig {
    fn default() -> Self {
        Self {
            whitelist: vec!["sort".to_string(), "fields".to_string()],
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Whether to expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Scrape listener address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_filter: "opsgate=debug,tower_http=debug".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let config = GatewayConfig::default();
        assert_eq!(config.store.max_pool_size, 10);
        assert_eq!(config.store.connect_timeout(), Duration::from_secs(5));
        assert_eq!(config.store.idle_timeout(), Duration::from_secs(45));
        assert_eq!(config.limits.body_cap_bytes, 10 * 1024 * 1024);
        assert!(config.expose_error_detail());
    }

    #[test]
    fn environment_flag_parsing() {
        assert_eq!(Environment::from_flag("development"), Environment::Development);
        assert_eq!(Environment::from_flag("DEVELOPMENT"), Environment::Development);
        assert_eq!(Environment::from_flag("production"), Environment::Production);
        assert_eq!(Environment::from_flag("staging"), Environment::Production);
        assert_eq!(Environment::from_flag(""), Environment::Production);
    }

    #[test]
    fn minimal_toml_round_trip() {
        let config: GatewayConfig = toml::from_str(
            r#"
            [store]
            uri = "mongodb://localhost:27017/hospital"

            [listener]
            bind_address = "127.0.0.1:8080"
            "#,
        )
        .unwrap();
        assert_eq!(config.store.uri, "mongodb://localhost:27017/hospital");
        assert_eq!(config.listener.bind_address, "127.0.0.1:8080");
        // Untouched sections fall back to defaults.
        assert_eq!(config.store.connect_timeout_secs, 5);
    }
}
