//! Fixed greeting served at the root path.

use async_trait::async_trait;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::api::chain::Handler;
use crate::api::envelope::RequestEnvelope;

/// Answers `{"hello":"world"}`.
pub struct GreetingHandler;

#[async_trait]
impl Handler for GreetingHandler {
    async fn call(&self, _req: RequestEnvelope) -> Response {
        tracing::info!("Executing greeting response");
        (StatusCode::OK, Json(json!({ "hello": "world" }))).into_response()
    }
}
