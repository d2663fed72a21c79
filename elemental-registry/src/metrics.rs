//! Registry metrics
//!
//! Atomic counters for cache effectiveness and reload cost. Recording is
//! lock-free so it can happen on the hot read path.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Debug, Default)]
pub struct RegistryMetrics {
    /// Element lookups answered from the memo cache
    pub element_hits: AtomicU64,

    /// Element lookups that had to convert
    pub element_misses: AtomicU64,

    /// Conversions run, including those inside snapshot capture
    pub conversions: AtomicU64,

    /// Aggregate lookups answered from cache
    pub aggregate_hits: AtomicU64,

    /// Aggregate recomputations
    pub aggregate_recomputes: AtomicU64,

    /// Results dropped because a reload committed in the meantime
    pub stale_commits: AtomicU64,

    pub reloads: AtomicU64,

    pub failed_reloads: AtomicU64,

    /// Total time spent reloading (nanoseconds)
    pub total_reload_time_ns: AtomicU64,
}

impl RegistryMetrics {
    /// Create a new set of zeroed counters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_element_hit(&self) {
        self.element_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_element_miss(&self) {
        self.element_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_conversions(&self, count: u64) {
        self.conversions.fetch_add(count, Ordering::Relaxed);
    }

    pub fn record_aggregate_hit(&self) {
        self.aggregate_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_aggregate_recompute(&self) {
        self.aggregate_recomputes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_stale_commit(&self) {
        self.stale_commits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a reload attempt and how long it took
    pub fn record_reload(&self, duration: Duration, succeeded: bool) {
        self.reloads.fetch_add(1, Ordering::Relaxed);
        if !succeeded {
            self.failed_reloads.fetch_add(1, Ordering::Relaxed);
        }
        self.total_reload_time_ns
            .fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Reset all metrics
    pub fn reset(&self) {
        for counter in [
            &self.element_hits,
            &self.element_misses,
            &self.conversions,
            &self.aggregate_hits,
            &self.aggregate_recomputes,
            &self.stale_commits,
            &self.reloads,
            &self.failed_reloads,
            &self.total_reload_time_ns,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Get a snapshot of current metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            element_hits: self.element_hits.load(Ordering::Relaxed),
            element_misses: self.element_misses.load(Ordering::Relaxed),
            conversions: self.conversions.load(Ordering::Relaxed),
            aggregate_hits: self.aggregate_hits.load(Ordering::Relaxed),
            aggregate_recomputes: self.aggregate_recomputes.load(Ordering::Relaxed),
            stale_commits: self.stale_commits.load(Ordering::Relaxed),
            reloads: self.reloads.load(Ordering::Relaxed),
            failed_reloads: self.failed_reloads.load(Ordering::Relaxed),
            total_reload_time_ns: self.total_reload_time_ns.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of [`RegistryMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize)]
pub struct MetricsSnapshot {
    pub element_hits: u64,
    pub element_misses: u64,
    pub conversions: u64,
    pub aggregate_hits: u64,
    pub aggregate_recomputes: u64,
    pub stale_commits: u64,
    pub reloads: u64,
    pub failed_reloads: u64,
    pub total_reload_time_ns: u64,
}

impl MetricsSnapshot {
    /// Element memo hit rate (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.element_hits + self.element_misses;
        if total == 0 {
            0.0
        } else {
            self.element_hits as f64 / total as f64
        }
    }

    pub fn avg_reload_time(&self) -> Duration {
        if self.reloads == 0 {
            Duration::ZERO
        } else {
            Duration::from_nanos(self.total_reload_time_ns / self.reloads)
        }
    }
}

impl std::fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Elements: {} hits | {} misses | {:.1}% hit rate | {} conversions",
            self.element_hits,
            self.element_misses,
            self.hit_rate() * 100.0,
            self.conversions
        )?;
        writeln!(
            f,
            "Aggregates: {} hits | {} recomputes | {} stale commits dropped",
            self.aggregate_hits, self.aggregate_recomputes, self.stale_commits
        )?;
        writeln!(
            f,
            "Reloads: {} ({} failed) | Avg Time: {:.2}ms",
            self.reloads,
            self.failed_reloads,
            self.avg_reload_time().as_secs_f64() * 1000.0
        )?;
        Ok(())
    }
}
