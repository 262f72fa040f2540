//! Publish job model for asynchronous broker delivery.

use bytes::Bytes;
use chrono::{DateTime, Utc};

/// An encoded payload waiting in the in-process queue for a publisher task.
///
/// Created by [`crate::application::dispatcher::PublishDispatcher::dispatch`]
/// and consumed by [`crate::domain::publish_worker::run_publish_workers`].
/// The HTTP response has usually been sent by the time a worker picks it up.
#[derive(Debug, Clone)]
pub struct PublishJob {
    pub body: Bytes,
    pub enqueued_at: DateTime<Utc>,
}

impl PublishJob {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            enqueued_at: Utc::now(),
        }
    }

    /// Milliseconds spent in the queue so far.
    pub fn queued_ms(&self) -> i64 {
        (Utc::now() - self.enqueued_at).num_milliseconds().max(0)
    }
}
