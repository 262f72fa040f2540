mod common;

use axum::http::{HeaderValue, StatusCode, header};
use json_relay::routes::RouterOptions;
use serde_json::{Value, json};

#[tokio::test]
async fn test_greeting_through_nested_decorators() {
    let app = common::spawn_app(RouterOptions::default());

    let response = app.server.get("/").await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({"hello": "world"}));
}

#[tokio::test]
async fn test_greeting_rejects_post() {
    let app = common::spawn_app(RouterOptions::default());

    let response = app.server.post("/").await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.header(header::ALLOW),
        HeaderValue::from_static("GET")
    );
}
