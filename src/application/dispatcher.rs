//! Hand-off from request handlers to the publisher pool.

use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::domain::payload::Payload;
use crate::domain::publish_job::PublishJob;
use crate::domain::publish_stats::PublishStats;

/// Reasons a payload could not be queued for publishing.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("publish queue is full")]
    QueueFull,

    #[error("publish queue is closed")]
    Closed,
}

/// Schedules payloads for publication without waiting on the broker.
///
/// Backed by a bounded channel: when publisher tasks fall behind, the queue
/// fills and [`PublishDispatcher::dispatch`] rejects new work instead of
/// spawning more tasks.
#[derive(Debug, Clone)]
pub struct PublishDispatcher {
    sender: mpsc::Sender<PublishJob>,
    stats: Arc<PublishStats>,
}

impl PublishDispatcher {
    /// Creates the dispatcher and the receiving end for the worker pool.
    pub fn new(capacity: usize, stats: Arc<PublishStats>) -> (Self, mpsc::Receiver<PublishJob>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { sender, stats }, receiver)
    }

    /// Encodes `payload` and queues it for a publisher task.
    ///
    /// Never waits: the call returns as soon as the job is in the queue or
    /// has been refused.
    ///
    /// # Errors
    ///
    /// - [`DispatchError::QueueFull`] when the buffer is at capacity
    /// - [`DispatchError::Closed`] when the worker pool has shut down
    pub fn dispatch(&self, payload: &Payload) -> Result<(), DispatchError> {
        let job = PublishJob::new(payload.encode());

        match self.sender.try_send(job) {
            Ok(()) => {
                self.stats.record_enqueued();
                Ok(())
            }
            Err(TrySendError::Full(_)) => {
                self.stats.record_rejected();
                tracing::warn!(
                    capacity = self.sender.max_capacity(),
                    "Publish queue full, rejecting payload"
                );
                Err(DispatchError::QueueFull)
            }
            Err(TrySendError::Closed(_)) => {
                self.stats.record_rejected();
                tracing::error!("Publish queue closed, rejecting payload");
                Err(DispatchError::Closed)
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    /// Free slots currently left in the queue.
    pub fn capacity(&self) -> usize {
        self.sender.capacity()
    }

    pub fn max_capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    pub fn stats(&self) -> &Arc<PublishStats> {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(raw: &str) -> Payload {
        Payload::decode(raw.as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_enqueues_encoded_payload() {
        let stats = Arc::new(PublishStats::default());
        let (dispatcher, mut rx) = PublishDispatcher::new(4, stats.clone());

        dispatcher.dispatch(&payload(r#"{"a":1,"b":"x"}"#)).unwrap();

        let job = rx.recv().await.unwrap();
        assert_eq!(
            Payload::decode(&job.body).unwrap(),
            payload(r#"{"b":"x","a":1}"#)
        );
        assert_eq!(stats.snapshot().enqueued, 1);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_when_full() {
        let stats = Arc::new(PublishStats::default());
        let (dispatcher, _rx) = PublishDispatcher::new(2, stats.clone());

        dispatcher.dispatch(&payload("{}")).unwrap();
        dispatcher.dispatch(&payload("{}")).unwrap();

        assert_eq!(
            dispatcher.dispatch(&payload("{}")),
            Err(DispatchError::QueueFull)
        );
        assert_eq!(dispatcher.capacity(), 0);
        assert_eq!(dispatcher.max_capacity(), 2);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.enqueued, 2);
        assert_eq!(snapshot.rejected, 1);
    }

    #[tokio::test]
    async fn test_dispatch_rejects_when_closed() {
        let (dispatcher, rx) = PublishDispatcher::new(2, Arc::new(PublishStats::default()));
        drop(rx);

        assert!(dispatcher.is_closed());
        assert_eq!(
            dispatcher.dispatch(&payload("{}")),
            Err(DispatchError::Closed)
        );
    }
}
