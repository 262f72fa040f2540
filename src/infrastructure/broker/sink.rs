//! Broker sink trait and error types.

use async_trait::async_trait;
use std::time::Duration;

/// Positive broker confirmation for a single published message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ack;

/// Errors raised while publishing a single message.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("broker rejected message for queue '{queue}'")]
    Nacked { queue: String },

    #[error("publish to queue '{queue}' failed: {reason}")]
    Transport { queue: String, reason: String },

    #[error("publish timed out after {0:?}")]
    Timeout(Duration),

    #[error("sink is closed")]
    Closed,
}

/// Errors raised while establishing the broker connection at startup.
///
/// These are fatal: the process refuses to start without a broker.
#[derive(Debug, thiserror::Error)]
pub enum ConnectionError {
    #[error("failed to connect to broker at {address}: {reason}")]
    Connect { address: String, reason: String },

    #[error("failed to open broker channel: {0}")]
    Channel(String),

    #[error("failed to declare queue '{queue}': {reason}")]
    Declare { queue: String, reason: String },
}

/// Publish-only view of a message broker.
///
/// Implementations own their connection for the life of the process and are
/// shared across publisher tasks as `Arc<dyn BrokerSink>`. Concurrent calls
/// to [`BrokerSink::publish`] must be safe; each implementation serializes
/// access to its underlying channel.
///
/// # Implementations
///
/// - [`crate::infrastructure::broker::AmqpSink`] - RabbitMQ via `lapin`
/// - [`crate::infrastructure::broker::MemorySink`] - in-process recorder
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BrokerSink: Send + Sync {
    /// Publishes one message to the declared queue.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the broker nacks the message or the
    /// transport fails. Callers decide whether to retry.
    async fn publish(&self, body: &[u8]) -> Result<Ack, PublishError>;

    /// Name of the queue messages are routed to.
    fn queue_name(&self) -> &str;

    /// Reports whether the underlying connection is usable.
    async fn health_check(&self) -> bool;

    /// Closes channel and connection. Later publishes fail with [`PublishError::Closed`].
    async fn close(&self);
}
