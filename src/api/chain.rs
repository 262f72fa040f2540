//! Handler and decorator traits plus the chain builder.
//!
//! # How a chain is assembled
//!
//! ```text
//! compose(vec![logging, auth], terminal)
//!        ↓
//! Link(logging) → Link(auth) → terminal
//! ```
//!
//! The first decorator in the vector is the outermost one: its pre-logic
//! runs first and its post-logic runs last. Each decorator receives a
//! [`Next`] that can be consumed at most once, so a decorator either
//! delegates exactly once or answers the request itself.

use async_trait::async_trait;
use axum::response::Response;
use std::future::Future;
use std::sync::Arc;

use super::envelope::RequestEnvelope;

/// Anything that turns a request into a response.
#[async_trait]
pub trait Handler: Send + Sync + 'static {
    async fn call(&self, req: RequestEnvelope) -> Response;
}

/// A shared, type-erased handler.
pub type BoxedHandler = Arc<dyn Handler>;

/// Cross-cutting behavior wrapped around a downstream handler.
#[async_trait]
pub trait Decorator: Send + Sync + 'static {
    /// Runs this decorator for one request.
    ///
    /// Implementations either call `next.run(req)` once or return their own
    /// response without calling it.
    async fn invoke(&self, req: RequestEnvelope, next: Next<'_>) -> Response;
}

/// The remainder of the chain below a decorator.
pub struct Next<'a> {
    handler: &'a dyn Handler,
}

impl Next<'_> {
    pub async fn run(self, req: RequestEnvelope) -> Response {
        self.handler.call(req).await
    }
}

struct Link {
    decorator: Arc<dyn Decorator>,
    next: BoxedHandler,
}

#[async_trait]
impl Handler for Link {
    async fn call(&self, req: RequestEnvelope) -> Response {
        let next = Next {
            handler: self.next.as_ref(),
        };
        self.decorator.invoke(req, next).await
    }
}

/// Wraps `terminal` in `decorators`, first element outermost.
pub fn compose(decorators: Vec<Arc<dyn Decorator>>, terminal: BoxedHandler) -> BoxedHandler {
    decorators
        .into_iter()
        .rev()
        .fold(terminal, |next, decorator| {
            Arc::new(Link { decorator, next }) as BoxedHandler
        })
}

/// Adapter turning an async function into a [`Handler`].
pub struct HandlerFn<F>(F);

pub fn handler_fn<F, Fut>(f: F) -> HandlerFn<F>
where
    F: Fn(RequestEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    HandlerFn(f)
}

#[async_trait]
impl<F, Fut> Handler for HandlerFn<F>
where
    F: Fn(RequestEnvelope) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    async fn call(&self, req: RequestEnvelope) -> Response {
        (self.0)(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Method, StatusCode, Uri};
    use axum::response::IntoResponse;
    use std::sync::Mutex;

    type Journal = Arc<Mutex<Vec<String>>>;

    struct Recording {
        name: &'static str,
        journal: Journal,
    }

    #[async_trait]
    impl Decorator for Recording {
        async fn invoke(&self, req: RequestEnvelope, next: Next<'_>) -> Response {
            self.journal.lock().unwrap().push(format!("{}:before", self.name));
            let response = next.run(req).await;
            self.journal.lock().unwrap().push(format!("{}:after", self.name));
            response
        }
    }

    struct Reject;

    #[async_trait]
    impl Decorator for Reject {
        async fn invoke(&self, _req: RequestEnvelope, _next: Next<'_>) -> Response {
            StatusCode::FORBIDDEN.into_response()
        }
    }

    fn terminal(journal: Journal) -> BoxedHandler {
        Arc::new(handler_fn(move |_req| {
            let journal = journal.clone();
            async move {
                journal.lock().unwrap().push("terminal".to_string());
                StatusCode::OK.into_response()
            }
        }))
    }

    fn request() -> RequestEnvelope {
        RequestEnvelope::new(
            Method::POST,
            Uri::from_static("/sample"),
            Default::default(),
            "{}",
        )
    }

    fn recording(name: &'static str, journal: &Journal) -> Arc<dyn Decorator> {
        Arc::new(Recording {
            name,
            journal: journal.clone(),
        })
    }

    #[tokio::test]
    async fn test_decorators_run_in_construction_order() {
        let journal: Journal = Default::default();
        let chain = compose(
            vec![recording("outer", &journal), recording("inner", &journal)],
            terminal(journal.clone()),
        );

        let response = chain.call(request()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            *journal.lock().unwrap(),
            [
                "outer:before",
                "inner:before",
                "terminal",
                "inner:after",
                "outer:after"
            ]
        );
    }

    #[tokio::test]
    async fn test_short_circuit_skips_downstream() {
        let journal: Journal = Default::default();
        let chain = compose(
            vec![
                recording("outer", &journal),
                Arc::new(Reject) as Arc<dyn Decorator>,
                recording("inner", &journal),
            ],
            terminal(journal.clone()),
        );

        let response = chain.call(request()).await;

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(*journal.lock().unwrap(), ["outer:before", "outer:after"]);
    }

    #[tokio::test]
    async fn test_empty_chain_is_terminal() {
        let journal: Journal = Default::default();
        let chain = compose(Vec::new(), terminal(journal.clone()));

        chain.call(request()).await;
        chain.call(request()).await;

        assert_eq!(*journal.lock().unwrap(), ["terminal", "terminal"]);
    }
}
