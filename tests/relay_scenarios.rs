//! End-to-end relay behaviour against a mock control-plane API.

use axum::http::Method;
use serde_json::{json, Value};

mod common;

#[tokio::test]
async fn test_health_passthrough() {
    let backend = common::start_mock_backend(200, r#"{"status":"ok","ts":1234,"nodes":["a","b"]}"#).await;
    let gateway = common::start_gateway(&backend.base_url(), Some("s3cr3t")).await;

    let res = gateway.client.get(gateway.url("/api/health")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()[reqwest::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(
        res.text().await.unwrap(),
        r#"{"status":"ok","ts":1234,"nodes":["a","b"]}"#
    );

    let seen = backend.only_request();
    assert_eq!(seen.method, Method::GET);
    assert_eq!(seen.path, "/health");
    assert_eq!(seen.header("x-auth-token"), Some("s3cr3t"));
}

#[tokio::test]
async fn test_queue_retry_empty_503() {
    let backend = common::start_mock_backend(503, "").await;
    let gateway = common::start_gateway(&backend.base_url(), Some("s3cr3t")).await;

    let res = gateway.client.post(gateway.url("/api/queue/retry")).send().await.unwrap();

    assert_eq!(res.status(), 503);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({}));

    let seen = backend.only_request();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/queue/retry");
    assert!(seen.body.is_empty());
}

#[tokio::test]
async fn test_haproxy_toggle_forwards_body_and_secret() {
    let backend = common::start_mock_backend(200, r#"{"ok":true,"action":"drain"}"#).await;
    let gateway = common::start_gateway(&backend.base_url(), Some("s3cr3t")).await;

    let payload = json!({"action": "drain", "backend": "Jboss_client", "server": "node-a3"});
    let res = gateway
        .client
        .post(gateway.url("/api/haproxy/toggle"))
        .json(&payload)
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"ok": true, "action": "drain"}));

    let seen = backend.only_request();
    assert_eq!(seen.method, Method::POST);
    assert_eq!(seen.path, "/haproxy/toggle");
    assert_eq!(seen.header("x-auth-token"), Some("s3cr3t"));
    assert_eq!(seen.header("content-type"), Some("application/json"));
    assert_eq!(seen.json(), payload);
}

#[tokio::test]
async fn test_empty_secret_still_sent() {
    let backend = common::start_mock_backend(200, "{}").await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    let res = gateway.client.get(gateway.url("/api/graphs")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let seen = backend.only_request();
    assert_eq!(seen.headers.get_all("x-auth-token").iter().count(), 1);
    assert_eq!(seen.header("x-auth-token"), Some(""));
}

#[tokio::test]
async fn test_ops_limit_forwarded_and_defaulted() {
    let backend = common::start_mock_backend(200, r#"{"by_node":{}}"#).await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    for path in ["/api/ops?limit=7", "/api/ops"] {
        let res = gateway.client.get(gateway.url(path)).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }

    let seen = backend.requests();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].path, "/ops");
    assert_eq!(seen[0].query.as_deref(), Some("limit=7"));
    assert_eq!(seen[1].query.as_deref(), Some("limit=100"));
}

#[tokio::test]
async fn test_graph_name_encoded_as_one_segment() {
    let backend = common::start_mock_backend(200, r#"{"nodes":[],"edges":[]}"#).await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    let res = gateway
        .client
        .get(gateway.url("/api/graphs/cpu%20load%2Fnode-a.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let seen = backend.only_request();
    assert_eq!(seen.path, "/graphs/cpu%20load%2Fnode-a.json");
}

#[tokio::test]
async fn test_metric_aggregate_name_forwarded() {
    let backend = common::start_mock_backend(200, r#"{"by_node":{"a":{}}}"#).await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    let res = gateway
        .client
        .get(gateway.url("/api/metrics/agg?name=agg_1h.json"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"by_node": {"a": {}}}));

    let seen = backend.only_request();
    assert_eq!(seen.path, "/metrics/agg");
    assert_eq!(seen.query.as_deref(), Some("name=agg_1h.json"));
}

#[tokio::test]
async fn test_large_numbers_pass_through_verbatim() {
    let text = r#"{"bytes":1e400,"id":123456789012345678901234567890}"#;
    let backend = common::start_mock_backend(200, text).await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    let res = gateway.client.get(gateway.url("/api/metrics/raw")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), text);
}

#[tokio::test]
async fn test_backend_error_status_passes_through() {
    let backend = common::start_mock_backend(404, r#"{"error":"not found"}"#).await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    let res = gateway
        .client
        .get(gateway.url("/api/graphs/missing.json"))
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 404);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({"error": "not found"}));
}

#[tokio::test]
async fn test_every_operation_makes_one_call() {
    let backend = common::start_programmable_backend(|req| (200, format!(r#"{{"path":"{}"}}"#, req.path))).await;
    let gateway = common::start_gateway(&backend.base_url(), Some("s3cr3t")).await;

    for spec in pattern_gateway::routing::OPERATIONS {
        let path = spec.gateway_route().replace("{name}", "g.json");
        let request = match spec.verb {
            pattern_gateway::routing::registry::Verb::Get => gateway.client.get(gateway.url(&path)),
            pattern_gateway::routing::registry::Verb::Post => gateway.client.post(gateway.url(&path)),
        };
        let res = request.send().await.unwrap();
        assert_eq!(res.status(), 200, "{}", spec.name);

        let expected = spec.path.replace("{name}", "g.json");
        assert_eq!(res.json::<Value>().await.unwrap(), json!({ "path": expected }), "{}", spec.name);
    }

    let seen = backend.requests();
    assert_eq!(seen.len(), pattern_gateway::routing::OPERATIONS.len());
    for (spec, req) in pattern_gateway::routing::OPERATIONS.iter().zip(&seen) {
        assert_eq!(req.method, spec.verb.method(), "{}", spec.name);
        assert_eq!(req.header("x-auth-token"), Some("s3cr3t"), "{}", spec.name);
    }
}

#[tokio::test]
async fn test_request_id_reaches_backend() {
    let backend = common::start_mock_backend(200, "{}").await;
    let gateway = common::start_gateway(&backend.base_url(), None).await;

    let res = gateway
        .client
        .get(gateway.url("/api/health"))
        .header("x-request-id", "trace-42")
        .send()
        .await
        .unwrap();

    assert_eq!(res.headers()["x-request-id"], "trace-42");
    assert_eq!(backend.only_request().header("x-request-id"), Some("trace-42"));
}

#[tokio::test]
async fn test_config_endpoint() {
    let backend = common::start_mock_backend(200, "{}").await;
    let gateway = common::start_gateway(&backend.base_url(), Some("s3cr3t")).await;

    let res = gateway.client.get(gateway.url("/api/config")).send().await.unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.json::<Value>().await.unwrap(), json!({ "apiBase": backend.base_url() }));
    assert!(backend.requests().is_empty());
}
