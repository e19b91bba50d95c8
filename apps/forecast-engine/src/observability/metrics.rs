//! Metrics for forecast runs, recorded through the `metrics` facade.
//!
//! No exporter is installed here; the embedding application installs a
//! recorder if it wants these values. Without one every call is a no-op.

use metrics::{counter, gauge, histogram};
use serde::{Deserialize, Serialize};

use crate::models::ModelId;
use crate::scheduler::{PhaseReport, SchedulerState};

/// Execution phase a cell ran in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Inside the worker pool.
    Parallel,
    /// In the coordinating thread after the pool stopped.
    Sequential,
}

impl Phase {
    /// Metric label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Parallel => "parallel",
            Self::Sequential => "sequential",
        }
    }
}

// ============================================================================
// Task Metrics
// ============================================================================

/// Record one (series, model) cell.
///
/// # Arguments
///
/// * `phase` - Where the cell ran
/// * `model` - Model identifier
/// * `success` - Whether the cell produced a bundle
/// * `duration_seconds` - Wall time of the cell
pub fn record_cell(phase: Phase, model: ModelId, success: bool, duration_seconds: f64) {
    let status = if success { "success" } else { "failed" };
    counter!(
        "forecast_cells_total",
        "phase" => phase.as_str(),
        "model" => model.name(),
        "status" => status
    )
    .increment(1);

    histogram!(
        "forecast_model_duration_seconds",
        "phase" => phase.as_str(),
        "model" => model.name()
    )
    .record(duration_seconds);
}

/// Record a finished task group (one series in the parallel phase).
pub fn record_task_group(models: usize, duration_seconds: f64) {
    counter!("forecast_task_groups_total").increment(1);
    histogram!("forecast_task_group_models").record(models as f64);
    histogram!("forecast_task_group_duration_seconds").record(duration_seconds);
}

/// Publish running cell counts for a phase.
pub fn record_phase_progress(phase: Phase, cells_done: usize, cells_failed: usize) {
    gauge!("forecast_phase_cells_done", "phase" => phase.as_str()).set(cells_done as f64);
    gauge!("forecast_phase_cells_failed", "phase" => phase.as_str()).set(cells_failed as f64);
}

/// Record a finished phase.
pub fn record_phase_report(report: &PhaseReport) {
    let phase = report.phase.as_str();
    counter!("forecast_phase_cells_total", "phase" => phase, "status" => "success")
        .increment(report.cells_succeeded() as u64);
    counter!("forecast_phase_cells_total", "phase" => phase, "status" => "failed")
        .increment(report.cells_failed as u64);
    histogram!("forecast_phase_duration_seconds", "phase" => phase)
        .record(report.elapsed_ms as f64 / 1000.0);
}

// ============================================================================
// Run Metrics
// ============================================================================

/// Record a completed run.
pub fn record_run(series: usize, models: usize, failed_cells: usize, duration_seconds: f64) {
    counter!("forecast_runs_total").increment(1);
    counter!("forecast_failed_cells_total").increment(failed_cells as u64);
    gauge!("forecast_run_series").set(series as f64);
    gauge!("forecast_run_models").set(models as f64);
    histogram!("forecast_run_duration_seconds").record(duration_seconds);
}

/// Record a run rejected before scheduling or aborted by the scheduler.
pub fn record_run_error(kind: &'static str) {
    counter!("forecast_run_errors_total", "kind" => kind).increment(1);
}

// ============================================================================
// Scheduler Metrics
// ============================================================================

/// Scheduler state values for the state gauge.
pub mod scheduler_state {
    /// No run in progress.
    pub const IDLE: f64 = 0.0;
    /// Creating the pool.
    pub const POOL_STARTING: f64 = 1.0;
    /// Groups executing.
    pub const RUNNING: f64 = 2.0;
    /// Waiting for in-flight groups.
    pub const DRAINING: f64 = 3.0;
    /// Pool joined.
    pub const POOL_STOPPED: f64 = 4.0;
}

/// Publish the scheduler state.
pub fn record_scheduler_state(state: SchedulerState) {
    let value = match state {
        SchedulerState::Idle => scheduler_state::IDLE,
        SchedulerState::PoolStarting => scheduler_state::POOL_STARTING,
        SchedulerState::Running => scheduler_state::RUNNING,
        SchedulerState::Draining => scheduler_state::DRAINING,
        SchedulerState::PoolStopped => scheduler_state::POOL_STOPPED,
    };
    gauge!("forecast_scheduler_state").set(value);
}

/// Record a pool creation failure.
pub fn record_pool_failure(requested: usize) {
    counter!("forecast_pool_failures_total").increment(1);
    gauge!("forecast_pool_requested_workers").set(requested as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_cell() {
        // Without an installed recorder these are no-ops
        record_cell(Phase::Parallel, ModelId::Ets, true, 0.015);
        record_cell(Phase::Sequential, ModelId::Automl, false, 1.5);
    }

    #[test]
    fn test_record_task_group() {
        record_task_group(3, 0.2);
    }

    #[test]
    fn test_record_phase() {
        record_phase_progress(Phase::Parallel, 6, 1);
        record_phase_report(&PhaseReport {
            phase: Phase::Sequential,
            series_done: 2,
            series_total: 2,
            cells_done: 2,
            cells_failed: 0,
            elapsed_ms: 40,
        });
    }

    #[test]
    fn test_record_run() {
        record_run(2, 3, 1, 0.5);
        record_run_error("validation");
    }

    #[test]
    fn test_scheduler_state_constants() {
        assert!((scheduler_state::IDLE - 0.0).abs() < f64::EPSILON);
        assert!((scheduler_state::POOL_STOPPED - 4.0).abs() < f64::EPSILON);
        record_scheduler_state(SchedulerState::Running);
        record_pool_failure(64);
    }

    #[test]
    fn test_phase_labels() {
        assert_eq!(Phase::Parallel.as_str(), "parallel");
        assert_eq!(Phase::Sequential.as_str(), "sequential");
    }
}
