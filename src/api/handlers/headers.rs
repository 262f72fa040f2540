//! Handler for the header echo endpoint.

use axum::http::{HeaderMap, header};
use axum::response::IntoResponse;
use std::fmt::Write;

/// Lists every request header, one `name: value` pair per line.
///
/// # Endpoint
///
/// `GET /headers`
///
/// Repeated headers produce one line per value. Non-UTF-8 bytes are
/// replaced lossily.
pub async fn headers_handler(headers: HeaderMap) -> impl IntoResponse {
    let mut body = String::new();

    for (name, value) in headers.iter() {
        let _ = writeln!(
            body,
            "{}: {}",
            name,
            String::from_utf8_lossy(value.as_bytes())
        );
    }

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], body)
}
