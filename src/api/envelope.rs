//! Immutable view of an inbound request.

use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, Method, Uri};
use bytes::Bytes;

use crate::error::AppError;

/// Method, URI, headers and fully-read body of one request.
///
/// Header lookups are case-insensitive and keep every value of a repeated
/// header in arrival order, as [`HeaderMap`] does.
#[derive(Debug, Clone)]
pub struct RequestEnvelope {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
}

impl RequestEnvelope {
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            uri,
            headers,
            body: body.into(),
        }
    }

    /// Reads the body of an axum request into memory.
    ///
    /// # Errors
    ///
    /// Returns `413 Payload Too Large` when the body exceeds `body_limit` bytes.
    pub async fn from_request(req: Request<Body>, body_limit: usize) -> Result<Self, AppError> {
        let (parts, body) = req.into_parts();

        let body = to_bytes(body, body_limit)
            .await
            .map_err(|_| AppError::payload_too_large(body_limit))?;

        Ok(Self::new(parts.method, parts.uri, parts.headers, body))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// First value of `name` as a string, if present and valid UTF-8.
    pub fn header_str(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}
