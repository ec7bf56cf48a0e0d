//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.api_base`.
pub const ENV_API_BASE: &str = "API_BASE";
/// Environment variable overriding `upstream.toggle_secret`.
pub const ENV_TOGGLE_SECRET: &str = "TOGGLE_SECRET";
/// Environment variable overriding `listener.bind_address`.
pub const ENV_BIND: &str = "GATEWAY_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

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

/// Parse configuration from TOML text. No validation.
pub fn parse_config(content: &str) -> Result<GatewayConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Apply environment overrides on top of file/default values.
///
/// `lookup` abstracts the process environment so callers (and tests) decide
/// where values come from.
pub fn apply_env_overrides<F>(config: &mut GatewayConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(api_base) = lookup(ENV_API_BASE) {
        config.upstream.api_base = Some(api_base);
    }
    if let Some(secret) = lookup(ENV_TOGGLE_SECRET) {
        config.upstream.toggle_secret = Some(secret);
    }
    if let Some(bind) = lookup(ENV_BIND).filter(|b| !b.trim().is_empty()) {
        config.listener.bind_address = bind;
    }
}

/// Load, override and validate configuration.
///
/// Without a path the defaults are used as the base layer.
pub fn load_config<F>(path: Option<&Path>, lookup: F) -> Result<GatewayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            parse_config(&content)?
        }
        None => GatewayConfig::default(),
    };

    apply_env_overrides(&mut config, lookup);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
