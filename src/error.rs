//! Gateway-local errors.
//!
//! Only failures the gateway causes itself end up here. Backend error statuses
//! are relayed as-is and never become a `GatewayError`.

use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Backend unreachable, connection reset, or body read failure.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend sent a non-empty body that is not JSON.
    #[error("upstream returned malformed JSON (status {upstream_status}): {source}")]
    MalformedUpstreamBody {
        upstream_status: StatusCode,
        source: serde_json::Error,
    },

    #[error("invalid query string: {0}")]
    InvalidQuery(String),

    #[error("method {method} not allowed on {path}")]
    MethodNotAllowed { method: Method, path: String },

    /// The backend URL for an operation could not be built.
    #[error("invalid upstream target: {0}")]
    InvalidTarget(String),

    #[error("upstream credential is not a valid header value")]
    InvalidCredential,

    #[error("unknown operation: {0}")]
    UnknownOperation(String),
}

pub type GatewayResult<T> = Result<T, GatewayError>;

impl GatewayError {
    /// Wrap a backend body parse failure, remembering what the backend answered.
    pub fn malformed_body(upstream_status: StatusCode, source: serde_json::Error) -> Self {
        GatewayError::MalformedUpstreamBody {
            upstream_status,
            source,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::Transport(_) => StatusCode::BAD_GATEWAY,
            // Must differ from the status the backend itself sent.
            GatewayError::MalformedUpstreamBody {
                upstream_status, ..
            } if *upstream_status == StatusCode::INTERNAL_SERVER_ERROR => StatusCode::BAD_GATEWAY,
            GatewayError::MalformedUpstreamBody { .. }
            | GatewayError::InvalidTarget(_)
            | GatewayError::InvalidCredential => StatusCode::INTERNAL_SERVER_ERROR,
            GatewayError::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            GatewayError::UnknownOperation(_) => StatusCode::NOT_FOUND,
            GatewayError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::Transport(_) => "transport",
            GatewayError::MalformedUpstreamBody { .. } => "malformed_body",
            GatewayError::InvalidQuery(_) => "invalid_query",
            GatewayError::MethodNotAllowed { .. } => "method_not_allowed",
            GatewayError::InvalidTarget(_) => "invalid_target",
            GatewayError::InvalidCredential => "invalid_credential",
            GatewayError::UnknownOperation(_) => "unknown_operation",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = self.kind(), error = %self, "Gateway error");
        } else {
            tracing::debug!(kind = self.kind(), error = %self, "Gateway error");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
