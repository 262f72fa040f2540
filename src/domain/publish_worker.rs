//! Fixed pool of publisher tasks draining the dispatch queue.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinSet;
use tokio_retry::RetryIf;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

use crate::domain::publish_job::PublishJob;
use crate::domain::publish_stats::PublishStats;
use crate::infrastructure::broker::{Ack, BrokerSink, PublishError};

/// Tuning for the publisher pool.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Number of publisher tasks.
    pub concurrency: usize,
    /// Upper bound for a single publish attempt.
    pub attempt_timeout: Duration,
    /// Retries after the first attempt.
    pub max_retries: usize,
    /// Base of the exponential backoff between attempts, in milliseconds.
    pub backoff_base_ms: u64,
}

impl Default for WorkerSettings {
    fn default() -> Self {
        Self {
            concurrency: 4,
            attempt_timeout: Duration::from_secs(5),
            max_retries: 2,
            backoff_base_ms: 10,
        }
    }
}

/// Runs `settings.concurrency` publisher tasks until the queue is closed and drained.
///
/// Every job is published through [`publish_with_retry`]. Failures are
/// logged and counted, never propagated: the HTTP caller has already been
/// answered by the time a job is processed.
///
/// Returns once all senders are dropped and every queued job has been handled.
pub async fn run_publish_workers(
    rx: mpsc::Receiver<PublishJob>,
    sink: Arc<dyn BrokerSink>,
    stats: Arc<PublishStats>,
    settings: WorkerSettings,
) {
    let rx = Arc::new(Mutex::new(rx));
    let mut workers = JoinSet::new();

    for worker in 0..settings.concurrency.max(1) {
        workers.spawn(worker_loop(
            worker,
            rx.clone(),
            sink.clone(),
            stats.clone(),
            settings.clone(),
        ));
    }

    while let Some(joined) = workers.join_next().await {
        if let Err(e) = joined {
            tracing::error!(error = %e, "Publisher task terminated abnormally");
        }
    }

    tracing::info!("Publish workers stopped");
}

async fn worker_loop(
    worker: usize,
    rx: Arc<Mutex<mpsc::Receiver<PublishJob>>>,
    sink: Arc<dyn BrokerSink>,
    stats: Arc<PublishStats>,
    settings: WorkerSettings,
) {
    loop {
        // The lock is released before publishing so other workers can take jobs.
        let job = rx.lock().await.recv().await;
        let Some(job) = job else {
            break;
        };

        process_job(worker, job, sink.as_ref(), &stats, &settings).await;
    }
}

async fn process_job(
    worker: usize,
    job: PublishJob,
    sink: &dyn BrokerSink,
    stats: &PublishStats,
    settings: &WorkerSettings,
) {
    let queued_ms = job.queued_ms();
    let (result, attempts) = publish_with_retry(sink, &job.body, settings).await;

    stats.record_retries(attempts.saturating_sub(1));

    match result {
        Ok(Ack) => {
            stats.record_published();
            tracing::debug!(
                worker,
                attempts,
                queued_ms,
                bytes = job.body.len(),
                "Payload published"
            );
        }
        Err(e) => {
            stats.record_failed();
            tracing::error!(
                worker,
                attempts,
                queued_ms,
                bytes = job.body.len(),
                error = %e,
                "Failed to publish payload, dropping it"
            );
        }
    }
}

/// Publishes `body` with a per-attempt timeout and jittered exponential backoff.
///
/// [`PublishError::Closed`] is not retried. Returns the final result and the
/// number of attempts made.
pub async fn publish_with_retry(
    sink: &dyn BrokerSink,
    body: &[u8],
    settings: &WorkerSettings,
) -> (Result<Ack, PublishError>, u64) {
    let attempts = AtomicU64::new(0);
    let counter = &attempts;
    let attempt_timeout = settings.attempt_timeout;

    let strategy = ExponentialBackoff::from_millis(settings.backoff_base_ms.max(1))
        .max_delay(Duration::from_secs(2))
        .map(jitter)
        .take(settings.max_retries);

    let result = RetryIf::spawn(
        strategy,
        move || async move {
            counter.fetch_add(1, Ordering::Relaxed);
            match tokio::time::timeout(attempt_timeout, sink.publish(body)).await {
                Ok(result) => result,
                Err(_) => Err(PublishError::Timeout(attempt_timeout)),
            }
        },
        |e: &PublishError| !matches!(e, PublishError::Closed),
    )
    .await;

    (result, attempts.load(Ordering::Relaxed))
}
