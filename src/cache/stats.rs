//! Sweep Statistics Module
//!
//! Tracks expiry sweep activity: runs, entries expired, and skipped failures.

use serde::Serialize;

use crate::tasks::SweepReport;

// == Sweep Stats ==
/// Cumulative counters across all sweeps of one store.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SweepStats {
    /// Number of completed sweep passes
    pub runs: u64,
    /// Entries removed because their expiry passed
    pub expired: u64,
    /// Records or collections skipped because of an error
    pub failures: u64,
    /// Collections inspected in the most recent pass
    pub last_collections: usize,
}

impl SweepStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    // == Record Sweep ==
    /// Folds one sweep pass into the totals.
    pub fn record(&mut self, report: &SweepReport) {
        self.runs += 1;
        self.expired += report.expired;
        self.failures += report.failures;
        self.last_collections = report.collections;
    }

    // == Failure Rate ==
    /// Failures per run, or 0.0 before the first run.
    pub fn failure_rate(&self) -> f64 {
        if self.runs == 0 {
            0.0
        } else {
            self.failures as f64 / self.runs as f64
        }
    }
}
