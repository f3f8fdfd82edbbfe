//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::schema::{GatewayConfig, ListenerConfig, ObservabilityConfig, ServiceConfig};
use crate::config::validation::{validate_config, validate_service_config, ValidationError};

/// Environment variable overriding `upstream.base_url`.
pub const ENV_BASE_URL: &str = "OLLAMA_BASE_URL";
/// Environment variable overriding `listener.host`.
pub const ENV_HOST: &str = "HOST";
/// Environment variable overriding `listener.port`.
pub const ENV_PORT: &str = "PORT";
/// Environment variable overriding `observability.log_level`.
pub const ENV_LOG_LEVEL: &str = "LOG_LEVEL";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Read a TOML file into `T`, or take the defaults when no path is given.
fn read_config_file<T>(path: Option<&Path>) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str::<T>(&content)?)
        }
        None => Ok(T::default()),
    }
}

/// Resolve the process configuration once at startup.
///
/// Defaults, then the optional TOML file, then environment overrides.
pub fn resolve_config(path: Option<&Path>) -> Result<GatewayConfig, ConfigError> {
    resolve_config_with(path, |var| std::env::var(var).ok())
}

/// [`resolve_config`] with an explicit variable lookup.
pub fn resolve_config_with<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: GatewayConfig = read_config_file(path)?;

    apply_env_overrides(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Resolve only the listener and logging settings.
///
/// Upstream settings are neither read nor validated, so a bad
/// `OLLAMA_BASE_URL` does not stop a service that never calls upstream.
pub fn resolve_service_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    resolve_service_config_with(path, |var| std::env::var(var).ok())
}

/// [`resolve_service_config`] with an explicit variable lookup.
pub fn resolve_service_config_with<F>(
    path: Option<&Path>,
    lookup: F,
) -> Result<ServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config: ServiceConfig = read_config_file(path)?;

    apply_listener_overrides(&mut config.listener, &mut config.observability, &lookup)?;
    validate_service_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply environment-style overrides using the given lookup.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(base_url) = lookup(ENV_BASE_URL) {
        config.upstream.base_url = base_url;
    }

    apply_listener_overrides(&mut config.listener, &mut config.observability, &lookup)
}

fn apply_listener_overrides<F>(
    listener: &mut ListenerConfig,
    observability: &mut ObservabilityConfig,
    lookup: &F,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup(ENV_HOST) {
        listener.host = host;
    }

    if let Some(port) = lookup(ENV_PORT) {
        listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            var: ENV_PORT,
            value: port.clone(),
        })?;
    }

    if let Some(level) = lookup(ENV_LOG_LEVEL) {
        observability.log_level = level;
    }

    Ok(())
}
