//! Process-wide scoring counters.
//!
//! The scorer, the aggregator and the report writers bump these as they
//! go. [`Metrics::flush`] logs the totals once, which the CLI does before
//! exiting.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

pub static METRICS: Metrics = Metrics::new();

/// Counters for gaps scored, runs aggregated and report files written.
pub struct Metrics {
    gaps_evaluated: AtomicU64,
    runs_aggregated: AtomicU64,
    reports_written: AtomicU64,
}

/// Point-in-time copy of the counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub gaps_evaluated: u64,
    pub runs_aggregated: u64,
    pub reports_written: u64,
}

impl MetricsSnapshot {
    /// Counts accumulated since `earlier`.
    pub fn since(&self, earlier: &MetricsSnapshot) -> MetricsSnapshot {
        MetricsSnapshot {
            gaps_evaluated: self.gaps_evaluated.saturating_sub(earlier.gaps_evaluated),
            runs_aggregated: self.runs_aggregated.saturating_sub(earlier.runs_aggregated),
            reports_written: self.reports_written.saturating_sub(earlier.reports_written),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub const fn new() -> Self {
        Self {
            gaps_evaluated: AtomicU64::new(0),
            runs_aggregated: AtomicU64::new(0),
            reports_written: AtomicU64::new(0),
        }
    }

    pub fn inc_gaps_evaluated(&self) {
        self.gaps_evaluated.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "gaps_evaluated", "counter incremented");
    }

    pub fn inc_runs_aggregated(&self) {
        self.runs_aggregated.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "runs_aggregated", "counter incremented");
    }

    pub fn inc_reports_written(&self) {
        self.reports_written.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(metric = "reports_written", "counter incremented");
    }

    pub fn gaps_evaluated(&self) -> u64 {
        self.gaps_evaluated.load(Ordering::Relaxed)
    }

    pub fn runs_aggregated(&self) -> u64 {
        self.runs_aggregated.load(Ordering::Relaxed)
    }

    pub fn reports_written(&self) -> u64 {
        self.reports_written.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            gaps_evaluated: self.gaps_evaluated(),
            runs_aggregated: self.runs_aggregated(),
            reports_written: self.reports_written(),
        }
    }

    /// Log the current totals as one `info!` event and return them.
    pub fn flush(&self) -> MetricsSnapshot {
        let snapshot = self.snapshot();
        tracing::info!(
            metric = "flush",
            gaps_evaluated = snapshot.gaps_evaluated,
            runs_aggregated = snapshot.runs_aggregated,
            reports_written = snapshot.reports_written,
        );
        snapshot
    }
}
