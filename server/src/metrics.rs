//! Request counters for the snapshot service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Server metrics.
pub struct Metrics {
    /// Snapshots published.
    pub snapshots_published: AtomicU64,
    /// Publish requests that failed.
    pub publish_failures: AtomicU64,
    /// Snapshots served (JSON or HTML).
    pub snapshots_retrieved: AtomicU64,
    /// Lookups for unknown identifiers.
    pub snapshots_not_found: AtomicU64,
    /// Retrieve requests that failed.
    pub retrieve_failures: AtomicU64,
}

impl Metrics {
    /// Create new metrics instance.
    pub fn new() -> Self {
        Self {
            snapshots_published: AtomicU64::new(0),
            publish_failures: AtomicU64::new(0),
            snapshots_retrieved: AtomicU64::new(0),
            snapshots_not_found: AtomicU64::new(0),
            retrieve_failures: AtomicU64::new(0),
        }
    }

    pub fn published(&self) {
        self.snapshots_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn publish_failed(&self) {
        self.publish_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn retrieved(&self) {
        self.snapshots_retrieved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn not_found(&self) {
        self.snapshots_not_found.fetch_add(1, Ordering::Relaxed);
    }

    pub fn retrieve_failed(&self) {
        self.retrieve_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            snapshots_published: self.snapshots_published.load(Ordering::Relaxed),
            publish_failures: self.publish_failures.load(Ordering::Relaxed),
            snapshots_retrieved: self.snapshots_retrieved.load(Ordering::Relaxed),
            snapshots_not_found: self.snapshots_not_found.load(Ordering::Relaxed),
            retrieve_failures: self.retrieve_failures.load(Ordering::Relaxed),
        }
    }

    /// Export metrics in Prometheus format.
    pub fn to_prometheus(&self, stored: usize) -> String {
        let snapshot = self.snapshot();
        format!(
            r#"# HELP buyin_snapshots_published Total snapshots published
# TYPE buyin_snapshots_published counter
buyin_snapshots_published {}

# HELP buyin_publish_failures Total failed publish requests
# TYPE buyin_publish_failures counter
buyin_publish_failures {}

# HELP buyin_snapshots_retrieved Total snapshots served
# TYPE buyin_snapshots_retrieved counter
buyin_snapshots_retrieved {}

# HELP buyin_snapshots_not_found Total lookups of unknown snapshots
# TYPE buyin_snapshots_not_found counter
buyin_snapshots_not_found {}

# HELP buyin_retrieve_failures Total failed retrieve requests
# TYPE buyin_retrieve_failures counter
buyin_retrieve_failures {}

# HELP buyin_snapshots_stored Snapshots currently held
# TYPE buyin_snapshots_stored gauge
buyin_snapshots_stored {}
"#,
            snapshot.snapshots_published,
            snapshot.publish_failures,
            snapshot.snapshots_retrieved,
            snapshot.snapshots_not_found,
            snapshot.retrieve_failures,
            stored,
        )
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub snapshots_published: u64,
    pub publish_failures: u64,
    pub snapshots_retrieved: u64,
    pub snapshots_not_found: u64,
    pub retrieve_failures: u64,
}

/// Shared metrics instance.
pub type SharedMetrics = Arc<Metrics>;
