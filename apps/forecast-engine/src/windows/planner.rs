//! Window planner: series length + horizon + backtest spec → window plan.

use thiserror::Error;
use tracing::trace;

use super::types::{BacktestSpec, SamplePolicy, Window, WindowKind, WindowPlan};

/// Smallest training range a window may have.
pub const MIN_TRAIN_SIZE: usize = 1;

/// Errors from window planning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// The series is too short for the requested windows.
    #[error("Insufficient history: {required} observations required, {available} available")]
    InsufficientHistory {
        /// Observations needed.
        required: usize,
        /// Observations available.
        available: usize,
    },

    /// A zero-length horizon was requested.
    #[error("Forecast horizon must be at least 1")]
    ZeroHorizon,
}

/// Plan the train/test windows for one series.
///
/// Backtest windows are built backward from the most recent one (whose test
/// range ends at the last observation) and returned oldest first. Under the
/// `fixed` policy every training range has the length of the oldest
/// window's training range, so the oldest window always starts at period 0
/// and no training range reaches before the first observation.
pub fn plan(
    series_length: usize,
    horizon: usize,
    spec: &BacktestSpec,
) -> Result<WindowPlan, PlanError> {
    if horizon == 0 {
        return Err(PlanError::ZeroHorizon);
    }

    if !spec.enabled {
        if series_length < MIN_TRAIN_SIZE {
            return Err(PlanError::InsufficientHistory {
                required: MIN_TRAIN_SIZE,
                available: series_length,
            });
        }
        return Ok(WindowPlan::new(vec![Window {
            iteration: 1,
            kind: WindowKind::Future,
            train_start: 0,
            train_end: series_length,
            test_start: series_length,
            test_end: series_length.saturating_add(horizon),
        }]));
    }

    let iterations = spec.iterations.max(1);
    let step = spec.window_method.step(horizon);
    let span = (iterations - 1)
        .saturating_mul(step)
        .saturating_add(horizon);
    let required = span.saturating_add(MIN_TRAIN_SIZE);

    if series_length < required {
        return Err(PlanError::InsufficientHistory {
            required,
            available: series_length,
        });
    }

    let oldest_test_start = series_length - span;
    let mut windows: Vec<Window> = (0..iterations)
        .map(|back| {
            let test_start = series_length - horizon - back * step;
            let train_start = match spec.sample_policy {
                SamplePolicy::Expanding => 0,
                SamplePolicy::Fixed => test_start - oldest_test_start,
            };
            Window {
                iteration: 0,
                kind: WindowKind::Backtest,
                train_start,
                train_end: test_start,
                test_start,
                test_end: test_start + horizon,
            }
        })
        .collect();

    windows.reverse();
    for (i, window) in windows.iter_mut().enumerate() {
        window.iteration = i + 1;
    }

    trace!(
        series_length,
        horizon,
        iterations,
        method = ?spec.window_method,
        policy = ?spec.sample_policy,
        "Planned backtest windows"
    );

    Ok(WindowPlan::new(windows))
}
