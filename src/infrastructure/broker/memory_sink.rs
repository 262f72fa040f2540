//! In-process sink that records published messages.

use async_trait::async_trait;
use bytes::Bytes;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

use super::sink::{Ack, BrokerSink, PublishError};

/// A sink that keeps every published message in memory.
///
/// Used by the test suite and by `BROKER_MODE=memory` when no broker is
/// available. Writes go through a single mutex, mirroring the one-channel
/// exclusion of [`crate::infrastructure::broker::AmqpSink`], and the sink
/// tracks the highest number of writers it ever saw inside that section.
#[derive(Debug)]
pub struct MemorySink {
    queue_name: String,
    messages: Mutex<Vec<Bytes>>,
    latency: Duration,
    fail_remaining: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    attempts: AtomicUsize,
    closed: AtomicBool,
}

impl MemorySink {
    pub fn new(queue_name: impl Into<String>) -> Self {
        debug!("Using MemorySink (messages are not delivered to a broker)");
        Self {
            queue_name: queue_name.into(),
            messages: Mutex::new(Vec::new()),
            latency: Duration::ZERO,
            fail_remaining: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            attempts: AtomicUsize::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Delay applied inside the write section of every publish.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Makes the next `count` publish attempts fail with a transport error.
    pub fn fail_first(self, count: usize) -> Self {
        self.fail_remaining.store(count, Ordering::SeqCst);
        self
    }

    pub async fn messages(&self) -> Vec<Bytes> {
        self.messages.lock().await.clone()
    }

    pub async fn published_count(&self) -> usize {
        self.messages.lock().await.len()
    }

    /// Total publish calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Highest number of concurrent writers observed inside the write section.
    pub fn max_concurrent_writes(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new("hello")
    }
}

#[async_trait]
impl BrokerSink for MemorySink {
    async fn publish(&self, body: &[u8]) -> Result<Ack, PublishError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.closed.load(Ordering::Acquire) {
            return Err(PublishError::Closed);
        }

        let mut messages = self.messages.lock().await;

        let writers = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(writers, Ordering::SeqCst);

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let should_fail = self
            .fail_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();

        let result = if should_fail {
            Err(PublishError::Transport {
                queue: self.queue_name.clone(),
                reason: "injected failure".to_string(),
            })
        } else {
            messages.push(Bytes::copy_from_slice(body));
            Ok(Ack)
        };

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    fn queue_name(&self) -> &str {
        &self.queue_name
    }

    async fn health_check(&self) -> bool {
        !self.closed.load(Ordering::Acquire)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }
}
