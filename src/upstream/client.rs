//! Backend control-plane client.
//!
//! # Responsibilities
//! - Translate one inbound gateway call into exactly one backend request
//! - Attach `X-Auth-Token` (always, even when empty) and `X-Request-ID`
//! - Attach the JSON body for operations that carry one
//!
//! No retries and no timeout beyond the transport default: mutating calls
//! (toggle, retry) must not be issued twice.

use std::collections::HashMap;

use axum::body::Bytes;
use axum::http::header::HeaderName;
use axum::http::HeaderValue;

use crate::config::ResolvedUpstream;
use crate::error::{GatewayError, GatewayResult};
use crate::http::request::X_REQUEST_ID;
use crate::routing::registry::{BodyPolicy, OperationSpec};
use crate::routing::target::build_url;
use crate::upstream::body::json_or_empty;

/// Header carrying the shared secret.
pub const X_AUTH_TOKEN: HeaderName = HeaderName::from_static("x-auth-token");

/// Everything the forwarder needs from the inbound request.
#[derive(Debug, Default, Clone)]
pub struct InboundCall {
    pub path_params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Raw inbound body; `None` when it could not be read.
    pub body: Option<Bytes>,
    pub request_id: Option<String>,
}

/// Client for the backend control-plane API.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    upstream: ResolvedUpstream,
}

impl UpstreamClient {
    /// Create a client for the resolved upstream.
    ///
    /// System proxy settings are ignored; the backend is addressed directly.
    pub fn new(upstream: ResolvedUpstream) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self { http, upstream })
    }

    pub fn base_url(&self) -> &str {
        &self.upstream.base_url
    }

    /// Build the backend request for an operation without sending it.
    pub fn build_request(
        &self,
        spec: &OperationSpec,
        call: &InboundCall,
    ) -> GatewayResult<reqwest::Request> {
        let url = build_url(&self.upstream.base_url, spec, &call.path_params, &call.query)?;

        let token = HeaderValue::from_str(self.upstream.credential.expose())
            .map_err(|_| GatewayError::InvalidCredential)?;

        let mut builder = self
            .http
            .request(spec.verb.method(), url)
            .header(X_AUTH_TOKEN, token);

        if let Some(id) = call
            .request_id
            .as_deref()
            .and_then(|id| HeaderValue::from_str(id).ok())
        {
            builder = builder.header(X_REQUEST_ID, id);
        }

        if spec.body == BodyPolicy::Json {
            builder = builder.json(&json_or_empty(call.body.as_deref()));
        }

        builder
            .build()
            .map_err(|e| GatewayError::InvalidTarget(e.to_string()))
    }

    /// Issue the backend call. The response is not inspected here.
    pub async fn forward(
        &self,
        spec: &OperationSpec,
        call: InboundCall,
    ) -> GatewayResult<reqwest::Response> {
        let request = self.build_request(spec, &call)?;

        tracing::debug!(
            request_id = call.request_id.as_deref().unwrap_or("unknown"),
            operation = spec.name,
            method = %request.method(),
            path = request.url().path(),
            "Forwarding to upstream"
        );

        Ok(self.http.execute(request).await?)
    }
}
