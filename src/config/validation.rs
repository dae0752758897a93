//! Semantic configuration checks, run after deserialization.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    #[error("limits.body_cap_bytes must be non-zero")]
    ZeroBodyCap,

    #[error("store.max_pool_size must be non-zero")]
    ZeroPoolSize,

    #[error("store.{0} must be non-zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    InvalidMetricsAddress(String),
}

/// Validate everything syntactic serde could not express. Returns all
/// problems at once so operators fix the file in one pass.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.limits.body_cap_bytes == 0 {
        errors.push(ValidationError::ZeroBodyCap);
    }

    if config.store.max_pool_size == 0 {
        errors.push(ValidationError::ZeroPoolSize);
    }

    if config.store.connect_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_timeout_secs"));
    }

    if config.store.idle_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("idle_timeout_secs"));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
