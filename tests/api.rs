//! Router-level tests: the HTTP surface the browser client and the sync
//! coordinator talk to.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fridge_tracker::{
    error::Result,
    notification::{PushMessage, PushTransport},
    routes::create_router,
    state::{AppState, Config},
    subscription::PushSubscription,
};
use futures::StreamExt;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tower::ServiceExt;
use wiremock::matchers::{header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[derive(Default)]
struct CapturingTransport {
    sent: Mutex<Vec<PushMessage>>,
}

#[async_trait]
impl PushTransport for CapturingTransport {
    async fn deliver(&self, _subscription: &PushSubscription, message: &PushMessage) -> Result<()> {
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}

fn config(dir: &Path, upc_api_base: &str) -> Config {
    Config {
        host: "127.0.0.1".into(),
        port: 0,
        data_file: dir.join("data.json"),
        subscriptions_file: dir.join("subscriptions.json"),
        upc_api_base: upc_api_base.into(),
        upc_token: "upc-test-token".into(),
        vapid_private_key_file: dir.join("vapid.pem"),
        vapid_subject: "mailto:test@example.com".into(),
        expiry_check_schedule: "*/10 * * * * *".into(),
        expiry_warning_days: 2,
    }
}

async fn setup(upc_api_base: &str) -> (tempfile::TempDir, Router, Arc<CapturingTransport>) {
    let dir = tempfile::tempdir().unwrap();
    let transport = Arc::new(CapturingTransport::default());
    let state = AppState::new(config(dir.path(), upc_api_base), transport.clone())
        .await
        .unwrap();
    (dir, create_router(state), transport)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_milk_scenario() {
    let (_dir, app, _) = setup("http://127.0.0.1:9").await;

    let (status, body) = send(&app, Method::GET, "/getData", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let milk = json!({"name": "Milk", "expDate": "2024-01-10"});
    let (status, body) = send(&app, Method::POST, "/add", Some(milk.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Item added successfully"}));

    let (_, body) = send(&app, Method::GET, "/getData", None).await;
    assert_eq!(body, json!([{"name": "Milk", "expDate": "2024-01-10"}]));

    let (status, body) = send(&app, Method::POST, "/add", Some(milk)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"success": false, "message": "Name must be unique"}));

    let (_, body) = send(&app, Method::GET, "/getData", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(&app, Method::DELETE, "/delete/Milk", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Item deleted successfully"}));

    let (_, body) = send(&app, Method::GET, "/getData", None).await;
    assert_eq!(body, json!([]));

    let (status, body) = send(&app, Method::DELETE, "/delete/Milk", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({"success": false, "message": "Item not found"}));
}

#[tokio::test]
async fn test_bad_expiration_date_is_rejected() {
    let (_dir, app, _) = setup("http://127.0.0.1:9").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/add",
        Some(json!({"name": "Milk", "expDate": "whenever"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_items_persist_to_data_file() {
    let (dir, app, _) = setup("http://127.0.0.1:9").await;

    send(&app, Method::POST, "/add", Some(json!({"name": "Eggs", "expDate": "2024-02-01"}))).await;

    let saved: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("data.json")).unwrap()).unwrap();
    assert_eq!(saved, json!([{"name": "Eggs", "expDate": "2024-02-01"}]));
}

#[tokio::test]
async fn test_subscribe_then_add_pushes_notification() {
    let (dir, app, transport) = setup("http://127.0.0.1:9").await;

    let subscription = json!({
        "endpoint": "https://push.example.net/device-1",
        "expirationTime": null,
        "keys": {"p256dh": "BPub", "auth": "secret"}
    });
    let (status, body) = send(&app, Method::POST, "/subscribe", Some(subscription.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "message": "Subscription added successfully"}));

    let saved: Value =
        serde_json::from_slice(&std::fs::read(dir.path().join("subscriptions.json")).unwrap())
            .unwrap();
    assert_eq!(saved, json!([subscription]));

    send(&app, Method::POST, "/add", Some(json!({"name": "Milk", "expDate": "2024-01-10"}))).await;

    // delivery is spawned after the response
    let sent = tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let sent = transport.sent.lock().await.clone();
            if !sent.is_empty() {
                return sent;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].title, "Item added!");
    assert_eq!(sent[0].body, "Your item Milk has been added to the fridge");
    assert_eq!(sent[0].redirect_url, "/");
}

#[tokio::test]
async fn test_notification_stream_emits_push_events() {
    let (_dir, app, _) = setup("http://127.0.0.1:9").await;

    let request = Request::builder()
        .uri("/notifications/stream")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    let mut stream = response.into_body().into_data_stream();

    send(&app, Method::POST, "/add", Some(json!({"name": "Milk", "expDate": "2024-01-10"}))).await;

    let event = tokio::time::timeout(Duration::from_secs(5), async {
        let mut buffered = String::new();
        while let Some(chunk) = stream.next().await {
            buffered.push_str(&String::from_utf8_lossy(&chunk.unwrap()));
            if buffered.contains("\n\n") {
                return buffered;
            }
        }
        buffered
    })
    .await
    .unwrap();

    assert!(event.starts_with("event: push\n"), "unexpected event: {event}");
    let data = event
        .lines()
        .find_map(|line| line.strip_prefix("data: "))
        .unwrap();
    let message: Value = serde_json::from_str(data).unwrap();
    assert_eq!(
        message,
        json!({
            "title": "Item added!",
            "body": "Your item Milk has been added to the fridge",
            "redirectUrl": "/"
        })
    );
}

#[tokio::test]
async fn test_proxy_passes_through_upstream_json() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/product/5901234123457"))
        .and(header_eq("authorization", "Bearer upc-test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "title": "Greek Yogurt"
        })))
        .mount(&upstream)
        .await;

    let (_dir, app, _) = setup(&upstream.uri()).await;
    let (status, body) = send(&app, Method::GET, "/proxy/5901234123457", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Greek Yogurt");
}

#[tokio::test]
async fn test_proxy_upstream_failure_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&upstream)
        .await;

    let (_dir, app, _) = setup(&upstream.uri()).await;
    let (status, body) = send(&app, Method::GET, "/proxy/123", None).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (_dir, app, _) = setup("http://127.0.0.1:9").await;
    let (status, body) = send(&app, Method::GET, "/no/such/page", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}
