//! Application layer sitting between HTTP handlers and the publisher pool.
//!
//! - [`dispatcher`] - non-blocking hand-off of decoded payloads

pub mod dispatcher;

pub use dispatcher::{DispatchError, PublishDispatcher};
