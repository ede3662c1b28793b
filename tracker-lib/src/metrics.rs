use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A snapshot of the tracker metrics.
/// This structure contains a copy of all metric counters as simple u64 values.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TrackerMetricsSnapshot {
    /// Number of messages accepted as new
    pub added: u64,
    /// Number of adds ignored because the id was already tracked
    pub duplicates: u64,
    /// Number of messages pushed out by capacity
    pub evicted: u64,
    /// Number of messages removed by id
    pub deleted: u64,
    /// Number of deletes for an unknown id
    pub not_found: u64,
}

impl Display for TrackerMetricsSnapshot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Tracker Metrics Snapshot:")?;
        writeln!(f, "  Added: {}", self.added)?;
        writeln!(f, "  Duplicates: {}", self.duplicates)?;
        writeln!(f, "  Evicted: {}", self.evicted)?;
        writeln!(f, "  Deleted: {}", self.deleted)?;
        writeln!(f, "  Not found: {}", self.not_found)
    }
}

/// Atomic counters updated by the tracker.
///
/// The tracker itself is single-threaded, but the counters may be read from a
/// status reporter running elsewhere.
#[derive(Debug, Default)]
pub struct TrackerMetrics {
    pub added: AtomicU64,
    pub duplicates: AtomicU64,
    pub evicted: AtomicU64,
    pub deleted: AtomicU64,
    pub not_found: AtomicU64,
}

impl TrackerMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> TrackerMetricsSnapshot {
        TrackerMetricsSnapshot {
            added: self.added.load(Ordering::Relaxed),
            duplicates: self.duplicates.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            deleted: self.deleted.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
        }
    }

    pub fn increment_added(&self) {
        self.added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_duplicates(&self) {
        self.duplicates.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_evicted(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_deleted(&self) {
        self.deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_not_found(&self) {
        self.not_found.fetch_add(1, Ordering::Relaxed);
    }
}

/// Shared metrics instance wrapped in Arc
pub type SharedTrackerMetrics = Arc<TrackerMetrics>;

pub fn create_shared_metrics() -> SharedTrackerMetrics {
    Arc::new(TrackerMetrics::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_increments() {
        let metrics = create_shared_metrics();
        metrics.increment_added();
        metrics.increment_added();
        metrics.increment_duplicates();
        metrics.increment_evicted();
        metrics.increment_not_found();

        assert_eq!(
            metrics.snapshot(),
            TrackerMetricsSnapshot {
                added: 2,
                duplicates: 1,
                evicted: 1,
                deleted: 0,
                not_found: 1,
            }
        );
    }

    #[test]
    fn test_snapshot_display() {
        let rendered = TrackerMetricsSnapshot {
            added: 5,
            evicted: 2,
            ..Default::default()
        }
        .to_string();

        assert!(rendered.starts_with("Tracker Metrics Snapshot:"));
        assert!(rendered.contains("  Added: 5\n"));
        assert!(rendered.contains("  Evicted: 2\n"));
    }
}
