//! Bearer token authentication decorator.

use async_trait::async_trait;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;

use crate::api::chain::{Decorator, Next};
use crate::api::envelope::RequestEnvelope;
use crate::error::AppError;

type HmacSha256 = Hmac<Sha256>;

const TOKEN_MAC_KEY: &[u8] = b"json-relay/api-token";

/// Authenticates requests against a single shared API token.
///
/// # Header Format
///
/// ```text
/// Authorization: Bearer <token>
/// ```
///
/// # Responses
///
/// - `401 Unauthorized` with `WWW-Authenticate: Bearer` when the header is
///   missing or not a Bearer credential
/// - `403 Forbidden` when the token does not match
///
/// Only an HMAC-SHA256 tag of the expected token is kept; presented tokens
/// are checked with a constant-time tag comparison.
pub struct AuthDecorator {
    expected_tag: Vec<u8>,
}

impl AuthDecorator {
    pub fn new(token: &str) -> Self {
        Self {
            expected_tag: token_tag(token),
        }
    }

    fn verify(&self, presented: &str) -> bool {
        let mut mac =
            HmacSha256::new_from_slice(TOKEN_MAC_KEY).expect("HMAC accepts any key length");
        mac.update(presented.as_bytes());
        mac.verify_slice(&self.expected_tag).is_ok()
    }
}

fn token_tag(token: &str) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(TOKEN_MAC_KEY).expect("HMAC accepts any key length");
    mac.update(token.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Extracts the credential from `Bearer <token>`; the scheme is case-insensitive.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    let token = token.trim();

    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

#[async_trait]
impl Decorator for AuthDecorator {
    async fn invoke(&self, req: RequestEnvelope, next: Next<'_>) -> Response {
        let Some(token) = req
            .header_str(header::AUTHORIZATION.as_str())
            .and_then(bearer_token)
        else {
            return AppError::unauthorized(
                "Unauthorized",
                json!({"reason": "Authorization header is missing or invalid"}),
            )
            .into_response();
        };

        if !self.verify(token) {
            tracing::warn!(path = req.uri().path(), "Rejected request with invalid token");
            return AppError::forbidden("Forbidden", json!({"reason": "Invalid token"}))
                .into_response();
        }

        next.run(req).await
    }
}
