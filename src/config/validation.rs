//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the resolved upstream base URL can carry request paths
//! - Check the credential is a legal header value
//! - Validate addresses and limits
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::config::resolver::resolve;
use crate::config::schema::GatewayConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid bind address '{0}'")]
    BindAddress(String),

    #[error("invalid metrics address '{0}'")]
    MetricsAddress(String),

    #[error("invalid upstream base URL '{url}': {reason}")]
    ApiBase { url: String, reason: String },

    /// The secret itself is deliberately left out of the message.
    #[error("upstream secret is not a valid header value")]
    Secret,

    #[error("invalid log level '{0}'")]
    LogLevel(String),

    #[error("max_body_bytes must be greater than zero")]
    BodyLimit,
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    let upstream = resolve(&config.upstream);
    if let Err(reason) = check_base_url(&upstream.base_url) {
        errors.push(ValidationError::ApiBase {
            url: upstream.base_url.clone(),
            reason,
        });
    }
    if HeaderValue::from_str(upstream.credential.expose()).is_err() {
        errors.push(ValidationError::Secret);
    }

    if tracing_subscriber::EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::BodyLimit);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_base_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme '{}'", other)),
    }
    if url.cannot_be_a_base() {
        return Err("URL cannot carry a path".to_string());
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err("URL must not contain a query or fragment".to_string());
    }
    Ok(())
}
