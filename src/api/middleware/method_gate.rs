//! Single-verb gate in front of a handler chain.

use async_trait::async_trait;
use axum::extract::Request;
use axum::http::Method;
use axum::response::{IntoResponse, Response};
use axum::routing::{MethodRouter, any};
use std::sync::Arc;

use crate::api::chain::{BoxedHandler, Handler};
use crate::api::envelope::RequestEnvelope;
use crate::error::AppError;

/// A handler chain that only answers one HTTP method.
///
/// Requests with any other method get `405 Method Not Allowed` with an
/// `Allow` header, and the wrapped chain (decorators included) never runs.
/// Comparison is exact and case-sensitive, so `post` does not match `POST`.
pub struct MethodGate {
    verb: Method,
    label: String,
    inner: BoxedHandler,
}

/// Binds `handler` to exactly one `verb`.
///
/// `label` only shows up in logs.
pub fn bind(handler: BoxedHandler, label: impl Into<String>, verb: Method) -> MethodGate {
    MethodGate {
        verb,
        label: label.into(),
        inner: handler,
    }
}

impl MethodGate {
    pub fn verb(&self) -> &Method {
        &self.verb
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Mounts the gate on an axum route. The binding is fixed from here on.
    ///
    /// The verb is checked before any body bytes are read, so a mismatched
    /// request gets 405 whatever its body size.
    pub fn into_method_router<S>(self, body_limit: usize) -> MethodRouter<S>
    where
        S: Clone + Send + Sync + 'static,
    {
        tracing::debug!(label = %self.label, verb = %self.verb, "Resource bound");
        let gate = Arc::new(self);

        any(move |req: Request| {
            let gate = gate.clone();
            async move {
                if req.method() != gate.verb {
                    return gate.reject(req.method());
                }
                match RequestEnvelope::from_request(req, body_limit).await {
                    Ok(envelope) => gate.inner.call(envelope).await,
                    Err(e) => e.into_response(),
                }
            }
        })
    }

    fn reject(&self, got: &Method) -> Response {
        tracing::debug!(
            label = %self.label,
            expected = %self.verb,
            got = %got,
            "Method not allowed"
        );
        AppError::method_not_allowed(self.verb.clone()).into_response()
    }
}

#[async_trait]
impl Handler for MethodGate {
    async fn call(&self, req: RequestEnvelope) -> Response {
        if req.method() != self.verb {
            return self.reject(req.method());
        }

        self.inner.call(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::chain::{Decorator, Next, compose, handler_fn};
    use axum::http::{StatusCode, Uri, header};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting(Arc<AtomicUsize>);

    #[async_trait]
    impl Decorator for Counting {
        async fn invoke(&self, req: RequestEnvelope, next: Next<'_>) -> Response {
            self.0.fetch_add(1, Ordering::SeqCst);
            next.run(req).await
        }
    }

    struct Fixture {
        gate: MethodGate,
        decorator_calls: Arc<AtomicUsize>,
        terminal_calls: Arc<AtomicUsize>,
    }

    fn fixture(verb: Method) -> Fixture {
        let decorator_calls = Arc::new(AtomicUsize::new(0));
        let terminal_calls = Arc::new(AtomicUsize::new(0));

        let counter = terminal_calls.clone();
        let terminal: BoxedHandler = Arc::new(handler_fn(move |_req| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                StatusCode::OK.into_response()
            }
        }));
        let decorators: Vec<Arc<dyn Decorator>> =
            vec![Arc::new(Counting(decorator_calls.clone()))];
        let chain = compose(decorators, terminal);

        Fixture {
            gate: bind(chain, "sample", verb),
            decorator_calls,
            terminal_calls,
        }
    }

    fn request(method: Method) -> RequestEnvelope {
        RequestEnvelope::new(method, Uri::from_static("/sample"), Default::default(), "{}")
    }

    #[tokio::test]
    async fn test_mismatch_is_rejected_before_chain() {
        let fixture = fixture(Method::POST);

        let response = fixture.gate.call(request(Method::GET)).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "POST");
        assert_eq!(fixture.decorator_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fixture.terminal_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_comparison_is_case_sensitive() {
        let fixture = fixture(Method::POST);
        let lowercase = Method::from_bytes(b"post").unwrap();

        let response = fixture.gate.call(request(lowercase)).await;

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(fixture.terminal_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_match_runs_chain_once() {
        let fixture = fixture(Method::GET);
        assert_eq!(fixture.gate.verb(), Method::GET);
        assert_eq!(fixture.gate.label(), "sample");

        let response = fixture.gate.call(request(Method::GET)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(fixture.decorator_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fixture.terminal_calls.load(Ordering::SeqCst), 1);
    }
}
