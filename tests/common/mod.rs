//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Bytes,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::IntoResponse,
    Router,
};
use pattern_gateway::{GatewayConfig, GatewayServer, Shutdown};
use tokio::net::TcpListener;

/// One request as the mock backend saw it.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

/// Mock control-plane API recording every request it receives.
pub struct MockBackend {
    pub addr: SocketAddr,
    captured: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockBackend {
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn requests(&self) -> Vec<CapturedRequest> {
        self.captured.lock().unwrap().clone()
    }

    /// The single request received; panics when there were zero or several.
    pub fn only_request(&self) -> CapturedRequest {
        let requests = self.requests();
        assert_eq!(requests.len(), 1, "expected exactly one backend call: {:?}", requests);
        requests.into_iter().next().unwrap()
    }
}

/// Start a mock backend answering every request with `responder`'s
/// `(status, raw body)`.
pub async fn start_programmable_backend<F>(responder: F) -> MockBackend
where
    F: Fn(&CapturedRequest) -> (u16, String) + Send + Sync + 'static,
{
    let captured = Arc::new(Mutex::new(Vec::new()));
    let responder = Arc::new(responder);

    let sink = captured.clone();
    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, body: Bytes| {
            let sink = sink.clone();
            let responder = responder.clone();
            async move {
                let request = CapturedRequest {
                    method,
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    headers,
                    body,
                };
                let (status, body) = (*responder)(&request);
                sink.lock().unwrap().push(request);
                (StatusCode::from_u16(status).unwrap(), body).into_response()
            }
        },
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockBackend { addr, captured }
}

/// Start a mock backend that always returns the same status and body.
pub async fn start_mock_backend(status: u16, body: &'static str) -> MockBackend {
    start_programmable_backend(move |_| (status, body.to_string())).await
}

/// An address nothing listens on.
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running gateway under test.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestGateway {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway pointed at `api_base` with the given secret.
pub async fn start_gateway(api_base: &str, secret: Option<&str>) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.upstream.api_base = Some(api_base.to_string());
    config.upstream.toggle_secret = secret.map(str::to_string);
    start_gateway_with(config).await
}

pub async fn start_gateway_with(config: GatewayConfig) -> TestGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = GatewayServer::new(config).unwrap();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    // Let the accept loop start
    tokio::time::sleep(Duration::from_millis(50)).await;

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    TestGateway {
        addr,
        client,
        shutdown,
    }
}
