//! Per-request tracing spans for the whole router.

use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{
    DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer,
};
use tracing::Level;

/// Creates the outermost tracing layer.
///
/// Opens an `INFO` span per request carrying method, URI and version, and
/// logs the final status with latency in milliseconds. Request starts are
/// only logged at `DEBUG`; 5xx responses (queue full, broker unhealthy) are
/// additionally reported at `ERROR`. The decorator chain's own
/// [`crate::api::middleware::LoggingDecorator`] entries nest inside this span.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/sample version=HTTP/1.1}: finished processing request latency=1 ms status=202
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
    TraceLayer::new_for_http()
        .make_span_with(
            DefaultMakeSpan::new()
                .level(Level::INFO)
                .include_headers(false),
        )
        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}
