//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{Environment, GatewayConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration: optional TOML file, then environment overlay, then
/// semantic validation. A missing file is not an error; the environment
/// alone is a complete configuration source.
pub fn load_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    let mut config = match path {
        Some(p) if p.exists() => {
            let content = fs::read_to_string(p)?;
            toml::from_str(&content)?
        }
        _ => GatewayConfig::default(),
    };

    overlay_env(&mut config);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Recognized environment variables, applied on top of the file:
/// `MONGODB_URI` (connection string), `APP_ENV` (error-detail flag),
/// `PORT` (listener port, keeping the configured interface).
fn overlay_env(config: &mut GatewayConfig) {
    if let Ok(uri) = std::env::var("MONGODB_URI") {
        if !uri.is_empty() {
            config.store.uri = uri;
        }
    }

    if let Ok(env) = std::env::var("APP_ENV") {
        config.environment = Environment::from_flag(&env);
    }

    if let Ok(port) = std::env::var("PORT") {
        if let Ok(port) = port.parse::<u16>() {
            let host = config
                .listener
                .bind_address
                .rsplit_once(':')
                .map(|(host, _)| host.to_string())
                .unwrap_or_else(|| "0.0.0.0".to_string());
            config.listener.bind_address = format!("{host}:{port}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = load_config(Some(Path::new("/nonexistent/opsgate.toml"))).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:5000");
    }

    #[test]
    fn no_file_uses_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config.store.connect_timeout_secs, 5);
    }
}
