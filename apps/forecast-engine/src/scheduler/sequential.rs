//! Runs self-parallelizing models after the worker pool has stopped.

use tracing::info;

use super::error::SchedulerError;
use super::progress::{PhaseProgress, PhaseReport};
use super::task::execute_group;
use super::types::RunContext;
use crate::data::split;
use crate::models::ModelId;
use crate::observability::Phase;
use crate::result::PartialTree;

/// Executes exclusion models one series at a time in the calling thread.
///
/// Each model is told it may use `worker_count` cores internally.
#[derive(Debug, Clone, Copy)]
pub struct ExclusionRunner {
    worker_count: usize,
}

impl ExclusionRunner {
    /// Runner passing `worker_count` as the parallelism hint.
    #[must_use]
    pub const fn new(worker_count: usize) -> Self {
        Self { worker_count }
    }

    /// Hint handed to each model.
    #[must_use]
    pub const fn worker_hint(&self) -> usize {
        self.worker_count
    }

    /// Run `models` for every series.
    pub fn run(
        &self,
        ctx: &RunContext<'_>,
        models: &[ModelId],
    ) -> Result<PartialTree, SchedulerError> {
        self.run_with_report(ctx, models).map(|(tree, _)| tree)
    }

    /// Like [`run`](Self::run), also returning the phase counts. The report
    /// is `None` when there were no exclusion models.
    pub fn run_with_report(
        &self,
        ctx: &RunContext<'_>,
        models: &[ModelId],
    ) -> Result<(PartialTree, Option<PhaseReport>), SchedulerError> {
        let mut tree = PartialTree::new();
        if models.is_empty() {
            return Ok((tree, None));
        }

        info!(
            series = ctx.series.len(),
            models = ?models,
            worker_hint = self.worker_count,
            "Starting sequential phase"
        );

        let progress = PhaseProgress::new(Phase::Sequential, ctx.series.len(), models.len())
            .with_group_logging(true);
        for index in 1..=ctx.series.len() {
            let unit = split(ctx.series, ctx.regressors, index)?;
            let group = execute_group(ctx, &unit, models, Phase::Sequential, self.worker_count);
            progress.record(&group);
            tree.insert(group.series, group.outcomes);
        }

        Ok((tree, Some(progress.finish())))
    }
}
