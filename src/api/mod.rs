//! HTTP layer: request envelope, decorator chain, handlers and middleware.
//!
//! # Modules
//!
//! - [`envelope`] - immutable request view handed through chains
//! - [`chain`] - `Handler`/`Decorator` traits and the `compose` builder
//! - [`middleware`] - logging, auth and method-gate decorators, tracing layer
//! - [`handlers`] - terminal handlers and plain endpoints
//! - [`dto`] - JSON response bodies

pub mod chain;
pub mod dto;
pub mod envelope;
pub mod handlers;
pub mod middleware;
