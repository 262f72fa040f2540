mod common;

use axum::http::StatusCode;
use json_relay::infrastructure::broker::BrokerSink;
use json_relay::routes::RouterOptions;
use serde_json::{Value, json};

#[tokio::test]
async fn test_health_reports_healthy() {
    let app = common::spawn_app(RouterOptions::default());

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"]["publish_queue"]["status"], "ok");
    assert_eq!(body["checks"]["broker"]["status"], "ok");
    assert_eq!(body["checks"]["broker"]["message"], "Connected, queue: hello");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_includes_publish_counters() {
    let app = common::spawn_app(RouterOptions::default());

    app.server
        .post("/sample")
        .json(&json!({"a": 1}))
        .await
        .assert_status(StatusCode::ACCEPTED);
    assert_eq!(common::wait_for_messages(&app.sink, 1).await, 1);

    let body = app.server.get("/health").await.json::<Value>();

    assert_eq!(body["publish"]["enqueued"], 1);
    assert_eq!(body["publish"]["published"], 1);
    assert_eq!(body["publish"]["failed"], 0);
}

#[tokio::test]
async fn test_health_degraded_when_broker_closed() {
    let app = common::spawn_app(RouterOptions::default());

    app.sink.close().await;
    let response = app.server.get("/health").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    let body = response.json::<Value>();
    assert_eq!(body["status"], "degraded");
    assert_eq!(body["checks"]["broker"]["status"], "error");
    assert_eq!(body["checks"]["publish_queue"]["status"], "ok");
}
