//! Request logging decorator.

use async_trait::async_trait;
use axum::response::Response;
use std::time::Instant;

use crate::api::chain::{Decorator, Next};
use crate::api::envelope::RequestEnvelope;

/// Logs entry into and exit from its position in a chain.
///
/// The label distinguishes several logging links in the same chain.
///
/// # Example Logs
///
/// ```text
/// INFO label="sample" method=POST path=/sample: Entering
/// INFO label="sample" status=202 ms=0: Leaving
/// ```
pub struct LoggingDecorator {
    label: String,
}

impl LoggingDecorator {
    pub fn new(label: impl Into<String>) -> Self {
        let label = label.into();
        tracing::debug!(label = %label, "Logging decorator constructed");
        Self { label }
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

#[async_trait]
impl Decorator for LoggingDecorator {
    async fn invoke(&self, req: RequestEnvelope, next: Next<'_>) -> Response {
        let start = Instant::now();

        tracing::info!(
            label = %self.label,
            method = %req.method(),
            path = req.uri().path(),
            bytes = req.body().len(),
            "Entering"
        );

        let response = next.run(req).await;

        tracing::info!(
            label = %self.label,
            status = response.status().as_u16(),
            ms = start.elapsed().as_millis() as u64,
            "Leaving"
        );

        response
    }
}
