//! Terminal handler for the ingestion endpoint.

use async_trait::async_trait;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use std::str::FromStr;

use crate::api::chain::Handler;
use crate::api::envelope::RequestEnvelope;
use crate::application::dispatcher::PublishDispatcher;
use crate::domain::payload::Payload;
use crate::error::AppError;

/// What the endpoint sends back after accepting a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Repeat the request body verbatim.
    Echo,
    /// Send `{}`.
    #[default]
    Empty,
}

impl FromStr for ResponseMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "echo" => Ok(Self::Echo),
            "empty" => Ok(Self::Empty),
            other => anyhow::bail!("RESPONSE_MODE must be 'echo' or 'empty', got '{}'", other),
        }
    }
}

/// Behavior switches for [`SampleHandler`].
#[derive(Debug, Clone)]
pub struct SampleOptions {
    pub response_mode: ResponseMode,
    /// 200, 202 or 203.
    pub success_status: StatusCode,
    /// When false, undecodable bodies are acknowledged but not dispatched.
    pub strict_decode: bool,
}

impl Default for SampleOptions {
    fn default() -> Self {
        Self {
            response_mode: ResponseMode::Empty,
            success_status: StatusCode::ACCEPTED,
            strict_decode: true,
        }
    }
}

/// Decodes the body, queues it for publishing and answers right away.
///
/// # Endpoint
///
/// `POST /sample` (verb configurable)
///
/// # Request Body
///
/// Any JSON object:
///
/// ```json
/// { "a": 1, "b": "x" }
/// ```
///
/// # Response Codes
///
/// - **200/202/203**: payload accepted (status configurable), body `{}` or
///   the echoed request
/// - **400 Bad Request**: body is not a JSON object (strict mode)
/// - **503 Service Unavailable**: publish queue full or closed
///
/// The response never waits for the broker.
pub struct SampleHandler {
    dispatcher: PublishDispatcher,
    options: SampleOptions,
}

impl SampleHandler {
    pub fn new(dispatcher: PublishDispatcher, options: SampleOptions) -> Self {
        Self {
            dispatcher,
            options,
        }
    }

    fn acknowledge(&self, request_body: &Bytes) -> Response {
        let body = match self.options.response_mode {
            ResponseMode::Echo => request_body.clone(),
            ResponseMode::Empty => Bytes::from_static(b"{}"),
        };

        (
            self.options.success_status,
            [(header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[async_trait]
impl Handler for SampleHandler {
    async fn call(&self, req: RequestEnvelope) -> Response {
        match Payload::decode(req.body()) {
            Ok(payload) => {
                if let Err(e) = self.dispatcher.dispatch(&payload) {
                    return AppError::from(e).into_response();
                }
                tracing::debug!(keys = payload.len(), "Payload dispatched");
                self.acknowledge(req.body())
            }
            Err(e) if self.options.strict_decode => AppError::from(e).into_response(),
            Err(e) => {
                tracing::warn!(error = %e, "Accepting undecodable body without dispatch");
                self.acknowledge(req.body())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::publish_stats::PublishStats;
    use axum::http::{Method, Uri};
    use std::sync::Arc;

    fn request(body: &'static str) -> RequestEnvelope {
        RequestEnvelope::new(
            Method::POST,
            Uri::from_static("/sample"),
            Default::default(),
            body,
        )
    }

    #[test]
    fn test_response_mode_parsing() {
        assert_eq!("echo".parse::<ResponseMode>().unwrap(), ResponseMode::Echo);
        assert_eq!(" EMPTY ".parse::<ResponseMode>().unwrap(), ResponseMode::Empty);
        assert!("mirror".parse::<ResponseMode>().is_err());
    }

    #[tokio::test]
    async fn test_object_is_dispatched_and_acknowledged() {
        let (dispatcher, mut rx) = PublishDispatcher::new(8, Arc::new(PublishStats::default()));
        let handler = SampleHandler::new(dispatcher, SampleOptions::default());

        let response = handler.call(request(r#"{"a":1,"b":"x"}"#)).await;

        assert_eq!(response.status(), StatusCode::ACCEPTED);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        let job = rx.try_recv().unwrap();
        assert_eq!(
            Payload::decode(&job.body).unwrap(),
            Payload::decode(br#"{"a":1,"b":"x"}"#).unwrap()
        );
    }

    #[tokio::test]
    async fn test_array_is_rejected_in_strict_mode() {
        let (dispatcher, mut rx) = PublishDispatcher::new(8, Arc::new(PublishStats::default()));
        let handler = SampleHandler::new(dispatcher, SampleOptions::default());

        let response = handler.call(request("[1,2,3]")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lenient_mode_acknowledges_without_dispatch() {
        let (dispatcher, mut rx) = PublishDispatcher::new(8, Arc::new(PublishStats::default()));
        let options = SampleOptions {
            strict_decode: false,
            success_status: StatusCode::OK,
            ..Default::default()
        };
        let handler = SampleHandler::new(dispatcher, options);

        let response = handler.call(request("not json")).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_full_queue_is_service_unavailable() {
        let (dispatcher, _rx) = PublishDispatcher::new(1, Arc::new(PublishStats::default()));
        let handler = SampleHandler::new(dispatcher, SampleOptions::default());

        assert_eq!(
            handler.call(request("{}")).await.status(),
            StatusCode::ACCEPTED
        );
        assert_eq!(
            handler.call(request("{}")).await.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
