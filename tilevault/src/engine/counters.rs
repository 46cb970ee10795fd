//! Run-wide counters.
//!
//! Thread-safe accumulation of per-tile outcomes across all concurrent
//! download tasks. Progress reporting reads snapshots; correctness never
//! depends on these values, but increments must not be lost.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for one run.
///
/// # Example
///
/// ```
/// use tilevault::engine::RunCounters;
///
/// let counters = RunCounters::new();
/// counters.record_success();
/// counters.record_skip();
///
/// let summary = counters.snapshot();
/// assert_eq!(summary.success, 1);
/// assert_eq!(summary.skipped, 1);
/// ```
pub struct RunCounters {
    /// Tiles downloaded and written this run
    success: AtomicU64,
    /// Tiles whose retries were exhausted
    failed: AtomicU64,
    /// Tiles already present and valid
    skipped: AtomicU64,
    /// Tiles processed in total, drives the progress report cadence
    events: AtomicU64,
}

impl RunCounters {
    /// Creates counters starting at zero.
    pub fn new() -> Self {
        Self {
            success: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            events: AtomicU64::new(0),
        }
    }

    /// Records one downloaded tile.
    pub fn record_success(&self) {
        self.success.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one exhausted tile.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one skipped tile.
    pub fn record_skip(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Counts one processed tile and returns the running total.
    pub fn record_event(&self) -> u64 {
        self.events.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Current success count.
    pub fn successes(&self) -> u64 {
        self.success.load(Ordering::Relaxed)
    }

    /// Snapshot of the outcome counters.
    pub fn snapshot(&self) -> RunSummary {
        RunSummary {
            success: self.success.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }
}

impl Default for RunCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Outcome counts at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Tiles downloaded and written
    pub success: u64,
    /// Tiles whose retries were exhausted
    pub failed: u64,
    /// Tiles already present and valid
    pub skipped: u64,
}

impl RunSummary {
    /// Total tiles processed.
    pub fn total(&self) -> u64 {
        self.success + self.failed + self.skipped
    }

    /// Difference against an earlier snapshot of the same run.
    pub fn since(&self, earlier: &RunSummary) -> RunSummary {
        RunSummary {
            success: self.success - earlier.success,
            failed: self.failed - earlier.failed,
            skipped: self.skipped - earlier.skipped,
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} downloaded, {} skipped, {} failed",
            self.success, self.skipped, self.failed
        )
    }
}
