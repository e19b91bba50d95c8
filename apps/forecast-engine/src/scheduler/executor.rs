//! Parallel fan-out of task groups over a scoped rayon pool.

use std::num::NonZeroUsize;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::config::SchedulerConfig;
use super::error::SchedulerError;
use super::progress::{PhaseProgress, PhaseReport};
use super::state::SchedulerState;
use super::task::execute_group;
use super::types::{RunContext, TaskGroupResult};
use crate::data::{SeriesUnit, split_all};
use crate::models::ModelId;
use crate::observability::{Phase, record_pool_failure, record_scheduler_state};
use crate::result::PartialTree;

/// Parallelism available to this process.
#[must_use]
pub fn available_workers() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Runs parallel-safe models for every series on a bounded worker pool.
///
/// One task group per series. The pool exists only for the duration of
/// [`run`](Self::run); its threads are joined before `run` returns.
#[derive(Debug)]
pub struct FanOutScheduler {
    config: SchedulerConfig,
    state: SchedulerState,
    last_report: Option<PhaseReport>,
}

impl FanOutScheduler {
    /// Create an idle scheduler.
    #[must_use]
    pub const fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            state: SchedulerState::Idle,
            last_report: None,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> SchedulerState {
        self.state
    }

    /// Counts from the most recent completed parallel phase.
    #[must_use]
    pub const fn last_report(&self) -> Option<&PhaseReport> {
        self.last_report.as_ref()
    }

    /// Scheduler configuration.
    #[must_use]
    pub const fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Run `models` for every series in `ctx`.
    ///
    /// Returns outcomes for `models` only. Fails without running any model
    /// when the pool cannot be created.
    pub fn run(
        &mut self,
        ctx: &RunContext<'_>,
        models: &[ModelId],
    ) -> Result<PartialTree, SchedulerError> {
        if models.is_empty() {
            debug!("No parallel-safe models requested, skipping pool");
            return Ok(PartialTree::new());
        }

        let units = split_all(ctx.series, ctx.regressors)?;
        self.transition(SchedulerState::PoolStarting);

        info!(
            series = units.len(),
            models = models.len(),
            workers = self.config.worker_count,
            "Starting parallel phase"
        );

        let progress = PhaseProgress::new(Phase::Parallel, units.len(), models.len())
            .with_group_logging(self.config.track_progress);
        let results = if self.config.uses_pool() {
            self.run_pooled(ctx, &units, models, &progress)?
        } else {
            self.transition(SchedulerState::Running);
            let results = units
                .iter()
                .map(|unit| pooled_group(ctx, unit, models, &progress))
                .collect();
            self.transition(SchedulerState::Draining);
            results
        };
        self.transition(SchedulerState::PoolStopped);
        self.last_report = Some(progress.finish());

        Ok(results
            .into_iter()
            .map(|group: TaskGroupResult| (group.series, group.outcomes))
            .collect())
    }

    fn run_pooled(
        &mut self,
        ctx: &RunContext<'_>,
        units: &[SeriesUnit],
        models: &[ModelId],
        progress: &PhaseProgress,
    ) -> Result<Vec<TaskGroupResult>, SchedulerError> {
        let requested = self.config.worker_count;
        let available = available_workers();
        if requested > available {
            return Err(self.pool_failure(
                requested,
                available,
                "worker count exceeds available parallelism".to_string(),
            ));
        }

        let built = rayon::ThreadPoolBuilder::new()
            .num_threads(requested)
            .thread_name(|index| format!("forecast-worker-{index}"))
            .build_scoped(
                |thread| thread.run(),
                |pool| {
                    self.transition(SchedulerState::Running);
                    let results: Vec<TaskGroupResult> = pool.install(|| {
                        units
                            .par_iter()
                            .map(|unit| pooled_group(ctx, unit, models, progress))
                            .collect()
                    });
                    self.transition(SchedulerState::Draining);
                    results
                },
            );

        built.map_err(|error| self.pool_failure(requested, available, error.to_string()))
    }

    fn pool_failure(
        &mut self,
        requested: usize,
        available: usize,
        message: String,
    ) -> SchedulerError {
        warn!(requested, available, error = %message, "Worker pool creation failed");
        record_pool_failure(requested);
        self.transition(SchedulerState::Idle);
        SchedulerError::PoolCreation {
            requested,
            available,
            message,
        }
    }

    fn transition(&mut self, next: SchedulerState) {
        if self.state != next {
            debug!(from = %self.state, to = %next, "Scheduler state change");
            self.state = next;
            record_scheduler_state(next);
        }
    }
}

fn pooled_group(
    ctx: &RunContext<'_>,
    unit: &SeriesUnit,
    models: &[ModelId],
    progress: &PhaseProgress,
) -> TaskGroupResult {
    // Models inside the pool get a single core each.
    let result = execute_group(ctx, unit, models, Phase::Parallel, 1);
    progress.record(&result);
    result
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::{MultiSeries, RejectMissing, SeriesColumn};
    use crate::models::ModelRegistry;
    use crate::windows::BacktestSpec;

    fn series() -> MultiSeries {
        MultiSeries::new(vec![
            SeriesColumn::named("a", (1..=12).map(f64::from).collect()),
            SeriesColumn::named("b", (1..=12).map(|v| f64::from(v) * 2.0).collect()),
            SeriesColumn::named("c", vec![5.0; 12]),
        ])
        .unwrap()
    }

    fn run_with(workers: usize) -> (Result<PartialTree, SchedulerError>, SchedulerState) {
        let series = series();
        let registry = ModelRegistry::with_baselines();
        let arguments = BTreeMap::new();
        let backtest = BacktestSpec::disabled();
        let ctx = RunContext {
            series: &series,
            regressors: None,
            horizon: 3,
            backtest: &backtest,
            arguments: &arguments,
            registry: &registry,
            missing: &RejectMissing,
        };
        let mut scheduler = FanOutScheduler::new(SchedulerConfig::with_workers(workers));
        assert_eq!(scheduler.state(), SchedulerState::Idle);

        let result = scheduler.run(&ctx, &[ModelId::Naive, ModelId::Drift]);
        (result, scheduler.state())
    }

    #[test]
    fn test_single_worker_runs_inline() {
        let (result, state) = run_with(1);

        let tree = result.unwrap();
        assert_eq!(state, SchedulerState::PoolStopped);
        assert_eq!(tree.len(), 3);
        assert!(tree.values().all(|m| m.len() == 2));
    }

    #[test]
    fn test_pool_matches_inline_results() {
        let workers = available_workers().min(4);
        let (pooled, state) = run_with(workers);
        let (inline, _) = run_with(1);

        assert_eq!(state, SchedulerState::PoolStopped);
        let pooled = pooled.unwrap();
        let inline = inline.unwrap();
        for (series, models) in &inline {
            for (model, outcome) in models {
                let other = &pooled[series][model];
                assert_eq!(
                    outcome.bundle().map(|b| &b.windows),
                    other.bundle().map(|b| &b.windows)
                );
            }
        }
    }

    #[test]
    fn test_oversubscribed_pool_fails() {
        let requested = available_workers() + 1;
        let (result, state) = run_with(requested);

        assert!(matches!(
            result,
            Err(SchedulerError::PoolCreation { requested: r, .. }) if r == requested
        ));
        assert_eq!(state, SchedulerState::Idle);
    }

    #[test]
    fn test_no_models_skips_pool() {
        let series = series();
        let registry = ModelRegistry::with_baselines();
        let arguments = BTreeMap::new();
        let backtest = BacktestSpec::disabled();
        let ctx = RunContext {
            series: &series,
            regressors: None,
            horizon: 3,
            backtest: &backtest,
            arguments: &arguments,
            registry: &registry,
            missing: &RejectMissing,
        };
        let mut scheduler = FanOutScheduler::new(SchedulerConfig::with_workers(2));

        let tree = scheduler.run(&ctx, &[]).unwrap();

        assert!(tree.is_empty());
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[test]
    fn test_phase_report_counts_cells() {
        let series = series();
        let registry = ModelRegistry::with_baselines();
        let arguments = BTreeMap::new();
        let backtest = BacktestSpec::disabled();
        let ctx = RunContext {
            series: &series,
            regressors: None,
            horizon: 3,
            backtest: &backtest,
            arguments: &arguments,
            registry: &registry,
            missing: &RejectMissing,
        };
        let mut scheduler =
            FanOutScheduler::new(SchedulerConfig::with_workers(available_workers().min(2)));
        assert!(scheduler.last_report().is_none());

        // arima has no collaborator, so one cell per series fails
        scheduler.run(&ctx, &[ModelId::Naive, ModelId::Arima]).unwrap();

        let report = scheduler.last_report().copied().unwrap();
        assert_eq!(report.phase, Phase::Parallel);
        assert!(report.is_complete());
        assert_eq!(report.cells_done, 6);
        assert_eq!(report.cells_failed, 3);
        assert_eq!(report.cells_succeeded(), 3);
    }
}
