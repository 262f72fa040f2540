//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /sample`   - JSON ingestion (verb configurable, optional Bearer auth)
//! - `GET  /`         - Greeting
//! - `GET  /headers`  - Request header listing
//! - `GET  /health`   - Health check: publish queue and broker
//!
//! # Middleware
//!
//! - **Tracing** - tower-http span per request
//! - **Method gate** - single verb per decorator chain
//! - **Logging / Authentication** - decorators inside each chain
//! - **Path normalization** - trailing slash handling

use axum::Router;
use axum::http::Method;
use axum::routing::get;
use std::sync::Arc;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

use crate::api::chain::{BoxedHandler, Decorator, compose};
use crate::api::handlers::{
    GreetingHandler, SampleHandler, SampleOptions, headers_handler, health_handler,
};
use crate::api::middleware::{self, AuthDecorator, LoggingDecorator, bind};
use crate::state::AppState;

/// Route-level settings derived from [`crate::config::Config`].
#[derive(Debug, Clone)]
pub struct RouterOptions {
    /// Verb the ingestion endpoint is bound to.
    pub sample_method: Method,
    pub sample: SampleOptions,
    /// Enables the auth decorator on `/sample` when set.
    pub api_token: Option<String>,
    pub max_body_bytes: usize,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            sample_method: Method::POST,
            sample: SampleOptions::default(),
            api_token: None,
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Builds the ingestion chain: method gate → logging → auth (optional) → handler.
pub fn sample_chain(state: &AppState, options: &RouterOptions) -> middleware::MethodGate {
    let mut decorators: Vec<Arc<dyn Decorator>> = vec![Arc::new(LoggingDecorator::new("sample"))];
    if let Some(token) = &options.api_token {
        decorators.push(Arc::new(AuthDecorator::new(token)));
    }

    let terminal: BoxedHandler = Arc::new(SampleHandler::new(
        state.dispatcher.clone(),
        options.sample.clone(),
    ));

    bind(
        compose(decorators, terminal),
        "sample",
        options.sample_method.clone(),
    )
}

/// Builds the greeting chain wrapped in two logging decorators.
pub fn greeting_chain() -> middleware::MethodGate {
    let decorators: Vec<Arc<dyn Decorator>> = vec![
        Arc::new(LoggingDecorator::new("outer")),
        Arc::new(LoggingDecorator::new("inner")),
    ];
    let chain = compose(decorators, Arc::new(GreetingHandler));

    bind(chain, "greeting", Method::GET)
}

/// Constructs the router with every route and the tracing layer.
pub fn build_router(state: AppState, options: RouterOptions) -> Router {
    let sample = sample_chain(&state, &options).into_method_router(options.max_body_bytes);
    let greeting = greeting_chain().into_method_router(options.max_body_bytes);

    Router::new()
        .route("/", greeting)
        .route("/sample", sample)
        .route("/headers", get(headers_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(middleware::tracing::layer())
}

/// Constructs the application router with trailing-slash normalization.
pub fn app_router(state: AppState, options: RouterOptions) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(build_router(state, options))
}
