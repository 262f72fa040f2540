//! HTTP-facing error type.
//!
//! Every request-scoped failure ends up as an [`AppError`] and is rendered
//! as a JSON body of the form `{"error": {"code", "message", "details"}}`.

use axum::{
    Json,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::dispatcher::DispatchError;
use crate::domain::payload::DecodeError;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

#[derive(Serialize)]
struct ErrorInfo {
    code: &'static str,
    message: String,
    details: Value,
}

#[derive(Debug)]
pub enum AppError {
    Validation { message: String, details: Value },
    Unauthorized { message: String, details: Value },
    Forbidden { message: String, details: Value },
    MethodNotAllowed { allow: Method },
    PayloadTooLarge { limit: usize },
    ServiceUnavailable { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }
    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }
    pub fn forbidden(message: impl Into<String>, details: Value) -> Self {
        Self::Forbidden {
            message: message.into(),
            details,
        }
    }
    pub fn method_not_allowed(allow: Method) -> Self {
        Self::MethodNotAllowed { allow }
    }
    pub fn payload_too_large(limit: usize) -> Self {
        Self::PayloadTooLarge { limit }
    }
    pub fn service_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
            details,
        }
    }

    /// Status code this error renders with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let mut extra_header = None;
        let (code, message, details) = match self {
            AppError::Validation { message, details } => ("validation_error", message, details),
            AppError::Unauthorized { message, details } => {
                extra_header = Some((
                    header::WWW_AUTHENTICATE,
                    HeaderValue::from_static("Bearer"),
                ));
                ("unauthorized", message, details)
            }
            AppError::Forbidden { message, details } => ("forbidden", message, details),
            AppError::MethodNotAllowed { allow } => {
                if let Ok(value) = HeaderValue::from_str(allow.as_str()) {
                    extra_header = Some((header::ALLOW, value));
                }
                (
                    "method_not_allowed",
                    "Method Not Allowed".to_string(),
                    json!({ "allow": allow.as_str() }),
                )
            }
            AppError::PayloadTooLarge { limit } => (
                "payload_too_large",
                "Request body is too large".to_string(),
                json!({ "limit_bytes": limit }),
            ),
            AppError::ServiceUnavailable { message, details } => {
                ("service_unavailable", message, details)
            }
        };

        let body = ErrorBody {
            error: ErrorInfo {
                code,
                message,
                details,
            },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some((name, value)) = extra_header {
            response.headers_mut().insert(name, value);
        }
        response
    }
}

impl From<DecodeError> for AppError {
    fn from(err: DecodeError) -> Self {
        AppError::bad_request(
            "Request body must be a JSON object",
            json!({ "reason": err.to_string() }),
        )
    }
}

impl From<DispatchError> for AppError {
    fn from(err: DispatchError) -> Self {
        AppError::service_unavailable(
            "Publish queue unavailable",
            json!({ "reason": err.to_string() }),
        )
    }
}
