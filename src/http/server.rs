//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router, one route per registry operation
//! - Wire up middleware (request ID, tracing, body limit)
//! - Dispatch each call to the upstream client and relay the answer
//! - Serve the local `/api/config` endpoint
//! - Bind to the listener and stop on shutdown

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::{Body, Bytes},
    extract::{
        rejection::{BytesRejection, QueryRejection},
        DefaultBodyLimit, Path, Query, State,
    },
    http::{HeaderMap, Method, Request, Uri},
    response::{IntoResponse, Response},
    routing::{get, on, MethodRouter},
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{resolve, GatewayConfig};
use crate::error::GatewayError;
use crate::http::request::{propagate_request_id_layer, request_id, set_request_id_layer};
use crate::http::response::relay;
use crate::observability::metrics;
use crate::routing::registry::{BodyPolicy, OperationSpec, API_PREFIX, OPERATIONS};
use crate::upstream::{InboundCall, UpstreamClient};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Resolve the upstream once and build the shared client.
    pub fn new(config: GatewayConfig) -> reqwest::Result<Self> {
        let upstream = UpstreamClient::new(resolve(&config.upstream))?;
        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
        })
    }
}

/// HTTP server for the gateway.
pub struct GatewayServer {
    router: Router,
    config: Arc<GatewayConfig>,
}

impl GatewayServer {
    /// Create a new server with the given configuration.
    pub fn new(config: GatewayConfig) -> reqwest::Result<Self> {
        let state = AppState::new(config)?;
        let config = state.config.clone();

        tracing::info!(
            api_base = %state.upstream.base_url(),
            operations = OPERATIONS.len(),
            "Gateway initialized"
        );

        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.limits.max_body_bytes;

    let mut router = Router::new().route(&format!("{}/config", API_PREFIX), get(config_handler));
    for spec in OPERATIONS {
        router = router.route(&spec.gateway_route(), operation_route(spec));
    }

    router
        .method_not_allowed_fallback(method_not_allowed_handler)
        .fallback(fallback_handler)
        .with_state(state)
        .layer(DefaultBodyLimit::max(max_body))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    let id = request_id(request.headers()).unwrap_or_default();
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = %id,
                    )
                }))
                .layer(propagate_request_id_layer()),
        )
}

/// Route for one registry row.
fn operation_route(spec: &'static OperationSpec) -> MethodRouter<AppState> {
    let filter = spec.verb.method_filter();

    if spec.has_path_params() {
        on(
            filter,
            move |State(state): State<AppState>,
                  Path(path_params): Path<HashMap<String, String>>,
                  query: Result<Query<HashMap<String, String>>, QueryRejection>,
                  headers: HeaderMap,
                  body: Result<Bytes, BytesRejection>| async move {
                dispatch(spec, state, path_params, query, headers, body).await
            },
        )
    } else {
        on(
            filter,
            move |State(state): State<AppState>,
                  query: Result<Query<HashMap<String, String>>, QueryRejection>,
                  headers: HeaderMap,
                  body: Result<Bytes, BytesRejection>| async move {
                dispatch(spec, state, HashMap::new(), query, headers, body).await
            },
        )
    }
}

/// Forward one call and relay the backend answer.
async fn dispatch(
    spec: &'static OperationSpec,
    state: AppState,
    path_params: HashMap<String, String>,
    query: Result<Query<HashMap<String, String>>, QueryRejection>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Response {
    let start_time = Instant::now();
    let request_id = request_id(&headers);

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            let err = GatewayError::InvalidQuery(rejection.body_text());
            metrics::record_request(spec.name, err.status().as_u16(), start_time);
            return err.into_response();
        }
    };

    let body = match body {
        Ok(bytes) => Some(bytes),
        Err(rejection) => {
            if spec.body == BodyPolicy::Json {
                tracing::warn!(
                    request_id = request_id.as_deref().unwrap_or("unknown"),
                    operation = spec.name,
                    error = %rejection,
                    "Inbound body unreadable, forwarding {{}}"
                );
            }
            None
        }
    };

    let call = InboundCall {
        path_params,
        query,
        body,
        request_id,
    };

    let result = match state.upstream.forward(spec, call).await {
        Ok(response) => relay(response).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(envelope) => {
            metrics::record_request(spec.name, envelope.status.as_u16(), start_time);
            envelope.into_response()
        }
        Err(err) => {
            metrics::record_upstream_error(spec.name, err.kind());
            metrics::record_request(spec.name, err.status().as_u16(), start_time);
            err.into_response()
        }
    }
}

/// Base URL the UI should display; the secret is never exposed.
async fn config_handler(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(json!({ "apiBase": state.upstream.base_url() }))
}

async fn fallback_handler(uri: Uri) -> GatewayError {
    GatewayError::UnknownOperation(uri.path().to_string())
}

async fn method_not_allowed_handler(method: Method, uri: Uri) -> GatewayError {
    GatewayError::MethodNotAllowed {
        method,
        path: uri.path().to_string(),
    }
}
