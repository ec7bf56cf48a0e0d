//! Response relay.
//!
//! # Responsibilities
//! - Read the backend body as text
//! - Empty body → `{}`; otherwise parse as JSON
//! - Re-emit with the backend's status code, unchanged
//!
//! # Design Decisions
//! - Backend 4xx/5xx are not errors here; they pass through untouched
//! - A non-empty body that is not JSON is a collaborator contract violation
//!   and surfaces as a local 5xx that never equals the backend's status
//! - Numbers keep their original text, so large integers and out-of-range
//!   floats relay unchanged
//! - Only the content type is set on the way out; backend headers are dropped

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::error::{GatewayError, GatewayResult};
use crate::upstream::body::empty_object;

/// `(status, body)` pair returned to the browser.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayEnvelope {
    pub status: StatusCode,
    pub body: Value,
}

impl RelayEnvelope {
    /// Build an envelope from the backend status and raw body text.
    pub fn from_text(status: StatusCode, text: &str) -> GatewayResult<Self> {
        let body = if text.is_empty() {
            empty_object()
        } else {
            serde_json::from_str(text).map_err(|e| GatewayError::malformed_body(status, e))?
        };
        Ok(Self { status, body })
    }
}

impl IntoResponse for RelayEnvelope {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Read a backend response into an envelope.
pub async fn relay(response: reqwest::Response) -> GatewayResult<RelayEnvelope> {
    let status = response.status();
    let text = response.text().await?;
    RelayEnvelope::from_text(status, &text)
}
