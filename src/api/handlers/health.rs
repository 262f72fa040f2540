//! Handler for health check endpoint.

use axum::{Json, extract::State, http::StatusCode};

use crate::api::dto::health::{CheckStatus, HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service health status with component checks.
///
/// # Endpoint
///
/// `GET /health`
///
/// # Response Codes
///
/// - **200 OK**: All components healthy
/// - **503 Service Unavailable**: One or more components degraded
///
/// # Components Checked
///
/// 1. **Publish Queue**: open, with free capacity reported
/// 2. **Broker**: sink connection status
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "publish_queue": { "status": "ok", "message": "Free: 1024/1024" },
///     "broker": { "status": "ok", "message": "Connected, queue: hello" }
///   },
///   "publish": { "enqueued": 3, "rejected": 0, "published": 3, "failed": 0, "retried": 0 }
/// }
/// ```
pub async fn health_handler(
    State(state): State<AppState>,
) -> Result<Json<HealthResponse>, (StatusCode, Json<HealthResponse>)> {
    let queue_check = check_publish_queue(&state);

    let broker_check = check_broker(&state).await;

    let all_healthy = queue_check.is_ok() && broker_check.is_ok();

    let response = HealthResponse {
        status: if all_healthy { "healthy" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            publish_queue: queue_check,
            broker: broker_check,
        },
        publish: state.stats.snapshot(),
    };

    if all_healthy {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Checks if the publish queue still has a consumer.
fn check_publish_queue(state: &AppState) -> CheckStatus {
    if state.dispatcher.is_closed() {
        CheckStatus::error("Publish queue is closed")
    } else {
        CheckStatus::ok(format!(
            "Free: {}/{}",
            state.dispatcher.capacity(),
            state.dispatcher.max_capacity()
        ))
    }
}

/// Checks the broker connection.
async fn check_broker(state: &AppState) -> CheckStatus {
    if state.sink.health_check().await {
        CheckStatus::ok(format!("Connected, queue: {}", state.sink.queue_name()))
    } else {
        CheckStatus::error("Broker connection unavailable")
    }
}
