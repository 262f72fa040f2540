//! Counters shared by the dispatcher and the publisher pool.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Running totals for the publish path.
///
/// Mirrored into `metrics` counters; these atomics exist so the health
/// endpoint and tests can read the numbers without a metrics recorder.
#[derive(Debug, Default)]
pub struct PublishStats {
    enqueued: AtomicU64,
    rejected: AtomicU64,
    published: AtomicU64,
    failed: AtomicU64,
    retried: AtomicU64,
}

/// Point-in-time copy of [`PublishStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishStatsSnapshot {
    pub enqueued: u64,
    pub rejected: u64,
    pub published: u64,
    pub failed: u64,
    pub retried: u64,
}

impl PublishStats {
    pub fn record_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("relay_dispatch_total", "outcome" => "enqueued").increment(1);
    }

    pub fn record_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("relay_dispatch_total", "outcome" => "rejected").increment(1);
    }

    pub fn record_published(&self) {
        self.published.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("relay_publish_total", "outcome" => "ok").increment(1);
    }

    pub fn record_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
        metrics::counter!("relay_publish_total", "outcome" => "failed").increment(1);
    }

    pub fn record_retries(&self, retries: u64) {
        if retries == 0 {
            return;
        }
        self.retried.fetch_add(retries, Ordering::Relaxed);
        metrics::counter!("relay_publish_retries_total").increment(retries);
    }

    pub fn snapshot(&self) -> PublishStatsSnapshot {
        PublishStatsSnapshot {
            enqueued: self.enqueued.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            published: self.published.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            retried: self.retried.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let stats = PublishStats::default();

        stats.record_enqueued();
        stats.record_enqueued();
        stats.record_rejected();
        stats.record_published();
        stats.record_failed();
        stats.record_retries(0);
        stats.record_retries(3);

        assert_eq!(
            stats.snapshot(),
            PublishStatsSnapshot {
                enqueued: 2,
                rejected: 1,
                published: 1,
                failed: 1,
                retried: 3,
            }
        );
    }
}
