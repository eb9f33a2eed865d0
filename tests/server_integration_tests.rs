//! Integration tests for the HTTP transport
//!
//! Each test starts a server on an ephemeral port and drives it over real
//! HTTP.

use batchsort::config::ServerConfig;
use batchsort::server::{SortResponse, SortServer};
use rand::Rng;
use serde_json::{json, Value};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const PROCESS_ROUTES: [&str; 3] = ["/process-single", "/process-concurrent", "/process-pooled"];

/// Running server plus the handles needed to stop it.
struct TestServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    handle: JoinHandle<batchsort::Result<()>>,
    client: reqwest::Client,
}

impl TestServer {
    async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let config = ServerConfig {
            listen_addr: addr,
            pool_workers: 2,
            ..ServerConfig::default()
        };
        let server = SortServer::new(config).unwrap();

        let (tx, rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve(listener, async move {
            let _ = rx.await;
        }));

        Self {
            addr,
            shutdown: Some(tx),
            handle,
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    async fn sort(&self, path: &str, to_sort: Value) -> SortResponse {
        let response = self.post_json(path, &json!({ "to_sort": to_sort })).await;
        assert_eq!(response.status(), 200, "POST {path}");
        assert_eq!(
            response.headers()["content-type"],
            "application/json",
            "POST {path}"
        );
        response.json().await.unwrap()
    }

    async fn stop(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await.unwrap().unwrap();
    }
}

#[tokio::test]
async fn test_scenarios_on_every_route() {
    let server = TestServer::start().await;

    let scenarios: [(Value, Vec<Vec<i64>>); 4] = [
        (json!([[5, 3, 1], [2, 2, 1]]), vec![vec![1, 3, 5], vec![1, 2, 2]]),
        (json!([]), vec![]),
        (json!([[], [1]]), vec![vec![], vec![1]]),
        (json!([[7]]), vec![vec![7]]),
    ];

    for route in PROCESS_ROUTES {
        for (input, expected) in &scenarios {
            let response = server.sort(route, input.clone()).await;
            assert_eq!(&response.sorted_arrays, expected, "{route} {input}");
        }
    }

    server.stop().await;
}

#[tokio::test]
async fn test_missing_or_null_field_is_empty_batch() {
    let server = TestServer::start().await;

    for body in [json!({}), json!({ "to_sort": null }), json!({ "extra": true })] {
        let response = server.post_json("/process-concurrent", &body).await;
        assert_eq!(response.status(), 200);
        let parsed: SortResponse = response.json().await.unwrap();
        assert!(parsed.sorted_arrays.is_empty());
    }

    server.stop().await;
}

#[tokio::test]
async fn test_null_body_and_null_sequences_decode_leniently() {
    let server = TestServer::start().await;

    for route in PROCESS_ROUTES {
        let response = server
            .client
            .post(server.url(route))
            .body("null")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200, "{route} null body");
        let parsed: SortResponse = response.json().await.unwrap();
        assert!(parsed.sorted_arrays.is_empty(), "{route} null body");

        let response = server.sort(route, json!([null, [2, 1]])).await;
        assert_eq!(response.sorted_arrays, vec![vec![], vec![1, 2]], "{route}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_field_name_is_case_insensitive() {
    let server = TestServer::start().await;

    for key in ["TO_SORT", "To_Sort"] {
        let mut fields = serde_json::Map::new();
        fields.insert(key.to_string(), json!([[2, 1], [9, 3, 5]]));
        let body = Value::Object(fields);
        let response = server.post_json("/process-concurrent", &body).await;
        assert_eq!(response.status(), 200, "{key}");
        let parsed: SortResponse = response.json().await.unwrap();
        assert_eq!(parsed.sorted_arrays, vec![vec![1, 2], vec![3, 5, 9]], "{key}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_cors_preflight_is_not_allowed() {
    let server = TestServer::start().await;

    for route in PROCESS_ROUTES {
        let response = server
            .client
            .request(reqwest::Method::OPTIONS, server.url(route))
            .header("origin", "http://example.com")
            .header("access-control-request-method", "POST")
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 405, "OPTIONS {route}");
        assert_eq!(response.headers()["allow"], "POST", "OPTIONS {route}");
        assert!(
            response
                .headers()
                .get("access-control-allow-origin")
                .is_none(),
            "OPTIONS {route}"
        );
    }

    server.stop().await;
}

#[tokio::test]
async fn test_non_post_methods_are_rejected() {
    let server = TestServer::start().await;

    for route in PROCESS_ROUTES {
        let get = server.client.get(server.url(route)).send().await.unwrap();
        assert_eq!(get.status(), 405, "GET {route}");
        assert_eq!(get.headers()["allow"], "POST", "GET {route}");
        assert_eq!(get.text().await.unwrap(), "Method not allowed");

        let put = server
            .client
            .put(server.url(route))
            .body(r#"{"to_sort":[[1]]}"#)
            .send()
            .await
            .unwrap();
        assert_eq!(put.status(), 405, "PUT {route}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_invalid_payloads_are_bad_requests() {
    let server = TestServer::start().await;

    let bodies = [
        "",
        "not json",
        r#"{"to_sort": [[1, 2"#,
        r#"{"to_sort": [[1.5]]}"#,
        r#"{"to_sort": "nope"}"#,
        r#"{"to_sort": [[99999999999999999999]]}"#,
    ];

    for route in PROCESS_ROUTES {
        for body in bodies {
            let response = server
                .client
                .post(server.url(route))
                .body(body)
                .send()
                .await
                .unwrap();
            assert_eq!(response.status(), 400, "{route} {body:?}");
            assert_eq!(response.text().await.unwrap(), "Invalid JSON payload");
        }
    }

    server.stop().await;
}

#[tokio::test]
async fn test_content_type_is_not_required() {
    let server = TestServer::start().await;

    let response = server
        .client
        .post(server.url("/process-single"))
        .header("content-type", "text/plain")
        .body(r#"{"to_sort":[[3,2,1]]}"#)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let parsed: SortResponse = response.json().await.unwrap();
    assert_eq!(parsed.sorted_arrays, vec![vec![1, 2, 3]]);

    server.stop().await;
}

#[tokio::test]
async fn test_routes_agree_on_random_batches() {
    let server = TestServer::start().await;

    let mut rng = rand::rng();
    let batch: Vec<Vec<i64>> = (0..50)
        .map(|_| {
            let len = rng.random_range(0..200);
            (0..len).map(|_| rng.random_range(-1_000..1_000)).collect()
        })
        .collect();

    let mut expected = batch.clone();
    for sequence in &mut expected {
        sequence.sort();
    }

    for route in PROCESS_ROUTES {
        let response = server.sort(route, json!(batch)).await;
        assert_eq!(response.sorted_arrays, expected, "{route}");
    }

    server.stop().await;
}

#[tokio::test]
async fn test_health_and_unknown_routes() {
    let server = TestServer::start().await;

    let health = server.client.get(server.url("/health")).send().await.unwrap();
    assert_eq!(health.status(), 200);
    let body: Value = health.json().await.unwrap();
    assert_eq!(body, json!({ "status": "ok" }));

    let missing = server
        .client
        .post(server.url("/process-everything"))
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    server.stop().await;
}

#[tokio::test]
async fn test_oversized_body_is_rejected() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        listen_addr: addr,
        max_body_bytes: 64,
        ..ServerConfig::default()
    };
    let server = SortServer::new(config).unwrap();
    let (tx, rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = rx.await;
    }));

    let big = json!({ "to_sort": [(0..100).collect::<Vec<i64>>()] });
    let response = reqwest::Client::new()
        .post(format!("http://{addr}/process-single"))
        .json(&big)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 413);

    let _ = tx.send(());
    handle.await.unwrap().unwrap();
}
