//! Decorators and layers wrapped around the ingestion endpoint.
//!
//! - [`logging`] - entry/exit logging decorator
//! - [`auth`] - Bearer token decorator
//! - [`method_gate`] - single-verb binding of a chain
//! - [`tracing`] - tower-http span layer for the whole router

pub mod auth;
pub mod logging;
pub mod method_gate;
pub mod tracing;

pub use auth::AuthDecorator;
pub use logging::LoggingDecorator;
pub use method_gate::{MethodGate, bind};
