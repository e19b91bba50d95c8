//! Cell-level progress of one scheduling phase.
//!
//! Both phases feed the same tracker: task groups finish on worker threads in
//! the parallel phase and on the coordinator in the sequential phase. Counts
//! are in cells (series × model) so the two phases add up to the result tree.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::types::TaskGroupResult;
use crate::observability::{Phase, record_phase_progress, record_phase_report};

/// Shared counters for one phase.
#[derive(Debug)]
pub struct PhaseProgress {
    phase: Phase,
    series_total: usize,
    models: usize,
    series_done: AtomicUsize,
    cells_failed: AtomicUsize,
    started: Instant,
    log_groups: bool,
}

impl PhaseProgress {
    /// Tracker for `series_total` task groups of `models` cells each.
    #[must_use]
    pub fn new(phase: Phase, series_total: usize, models: usize) -> Self {
        Self {
            phase,
            series_total,
            models,
            series_done: AtomicUsize::new(0),
            cells_failed: AtomicUsize::new(0),
            started: Instant::now(),
            log_groups: false,
        }
    }

    /// Log a debug line for every finished task group.
    #[must_use]
    pub const fn with_group_logging(mut self, enabled: bool) -> Self {
        self.log_groups = enabled;
        self
    }

    /// Count a finished task group.
    pub fn record(&self, group: &TaskGroupResult) {
        let group_failed = group.failed();
        let done = self.series_done.fetch_add(1, Ordering::Relaxed) + 1;
        let failed = self.cells_failed.fetch_add(group_failed, Ordering::Relaxed) + group_failed;
        record_phase_progress(self.phase, done * self.models, failed);

        if self.log_groups {
            debug!(
                phase = self.phase.as_str(),
                series = %group.series,
                done,
                total = self.series_total,
                failed_cells = failed,
                "Task group finished"
            );
        }
    }

    /// Current counts.
    #[must_use]
    pub fn report(&self) -> PhaseReport {
        let series_done = self.series_done.load(Ordering::Relaxed);
        PhaseReport {
            phase: self.phase,
            series_done,
            series_total: self.series_total,
            cells_done: series_done * self.models,
            cells_failed: self.cells_failed.load(Ordering::Relaxed),
            elapsed_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Final counts, logged and recorded.
    pub fn finish(self) -> PhaseReport {
        let report = self.report();
        record_phase_report(&report);
        info!(
            phase = report.phase.as_str(),
            series = report.series_done,
            cells = report.cells_done,
            failed_cells = report.cells_failed,
            elapsed_ms = report.elapsed_ms,
            "Phase complete"
        );
        report
    }
}

/// Counts for one phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseReport {
    /// Which phase.
    pub phase: Phase,
    /// Finished task groups.
    pub series_done: usize,
    /// Task groups scheduled.
    pub series_total: usize,
    /// Finished cells.
    pub cells_done: usize,
    /// Cells recorded as failures.
    pub cells_failed: usize,
    /// Wall time since the phase started.
    pub elapsed_ms: u64,
}

impl PhaseReport {
    /// Whether every scheduled task group finished.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        self.series_done == self.series_total
    }

    /// Cells that produced a bundle.
    #[must_use]
    pub const fn cells_succeeded(&self) -> usize {
        self.cells_done.saturating_sub(self.cells_failed)
    }
}
