//! HTTP request handlers.
//!
//! [`sample`] and [`greeting`] are terminal handlers for decorator chains;
//! [`headers`] and [`health`] are plain axum handlers.

pub mod greeting;
pub mod headers;
pub mod health;
pub mod sample;

pub use greeting::GreetingHandler;
pub use headers::headers_handler;
pub use health::health_handler;
pub use sample::{ResponseMode, SampleHandler, SampleOptions};
