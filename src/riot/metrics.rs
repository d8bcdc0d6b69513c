use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{info, warn};

const REPORT_INTERVAL: Duration = Duration::from_secs(60);

/// Upstream request counters, reported once per minute.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    requests: AtomicU64,
    failures: AtomicU64,
}

/// Counter values at one point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub requests: u64,
    pub failures: u64,
}

impl RequestMetrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    /// A request answered with a non-success status.
    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            requests: self.total(),
            failures: self.failures.load(Ordering::Relaxed),
        }
    }

    /// Log the requests of each interval until the task is dropped.
    pub async fn log_loop(self: Arc<Self>) {
        let mut interval = tokio::time::interval(REPORT_INTERVAL);
        interval.tick().await;
        let mut last = self.snapshot();

        loop {
            interval.tick().await;
            let now = self.snapshot();
            let requests = now.requests - last.requests;
            let failures = now.failures - last.failures;

            if failures > 0 {
                warn!(requests, failures, total = now.requests, "🛰️ 📊 Riot requests in the last minute");
            } else {
                info!(requests, total = now.requests, "🛰️ 📊 Riot requests in the last minute");
            }
            last = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_are_tracked_separately() {
        let metrics = RequestMetrics::new();
        metrics.inc();
        metrics.inc();
        metrics.record_failure();

        assert_eq!(
            metrics.snapshot(),
            MetricsSnapshot {
                requests: 2,
                failures: 1
            }
        );
    }

    #[tokio::test]
    async fn log_loop_keeps_running_across_intervals() {
        tokio::time::pause();

        let metrics = RequestMetrics::new();
        let handle = tokio::spawn(metrics.clone().log_loop());

        metrics.inc();
        tokio::time::advance(Duration::from_secs(61)).await;
        tokio::time::advance(Duration::from_secs(61)).await;

        assert!(!handle.is_finished());
        handle.abort();
        let _ = handle.await;
    }
}
