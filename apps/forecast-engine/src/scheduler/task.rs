//! Executes one task group: every requested model for one series.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use tracing::{Level, debug, span, warn};

use super::types::{RunContext, TaskGroupResult};
use crate::data::SeriesUnit;
use crate::models::{
    DispatchSettings, ForecastResultBundle, ModelId, PreparedSeries, dispatch, panic_message,
};
use crate::observability::{Phase, record_cell, record_task_group};
use crate::result::{FailureKind, ModelOutcome, ModelResults, TaskFailure};

/// Run `models` against `unit`.
///
/// Never fails: preprocessing and model failures are recorded per cell.
pub(crate) fn execute_group(
    ctx: &RunContext<'_>,
    unit: &SeriesUnit,
    models: &[ModelId],
    phase: Phase,
    worker_hint: usize,
) -> TaskGroupResult {
    let span = span!(
        Level::DEBUG,
        "task_group",
        series = %unit.name,
        phase = phase.as_str(),
        models = models.len()
    );
    let _enter = span.enter();
    let start = Instant::now();

    let values = match fill_gaps(ctx, unit) {
        Ok(values) => values,
        Err(failure) => {
            warn!(
                series = %unit.name,
                policy = ctx.missing.name(),
                error = %failure.message,
                "Preprocessing failed, recording failure for every model"
            );
            return TaskGroupResult {
                series: unit.name.clone(),
                outcomes: models
                    .iter()
                    .map(|model| (*model, ModelOutcome::Failed(failure.clone())))
                    .collect(),
            };
        }
    };

    let series = PreparedSeries {
        name: &unit.name,
        values: &values,
        regressors: &unit.regressors,
    };

    let mut outcomes = ModelResults::new();
    for &model in models {
        let cell_start = Instant::now();
        let result = run_model(ctx, model, &series, worker_hint);
        let elapsed = cell_start.elapsed().as_secs_f64();

        record_cell(phase, model, result.is_ok(), elapsed);
        if let Err(failure) = &result {
            warn!(
                series = %unit.name,
                model = %model,
                kind = %failure.kind,
                error = %failure.message,
                "Model failed"
            );
        }
        outcomes.insert(model, ModelOutcome::from(result));
    }

    let elapsed = start.elapsed();
    record_task_group(models.len(), elapsed.as_secs_f64());
    debug!(
        series = %unit.name,
        models = models.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "Task group complete"
    );

    TaskGroupResult {
        series: unit.name.clone(),
        outcomes,
    }
}

fn fill_gaps(ctx: &RunContext<'_>, unit: &SeriesUnit) -> Result<Vec<f64>, TaskFailure> {
    catch_unwind(AssertUnwindSafe(|| ctx.missing.apply(&unit.values)))
        .map_err(|payload| {
            TaskFailure::preprocessing_panicked(ctx.missing.name(), &panic_message(payload.as_ref()))
        })?
        .map_err(TaskFailure::from)
}

fn run_model(
    ctx: &RunContext<'_>,
    model: ModelId,
    series: &PreparedSeries<'_>,
    worker_hint: usize,
) -> Result<ForecastResultBundle, TaskFailure> {
    let Some(collaborator) = ctx.registry.get(model) else {
        return Err(TaskFailure::new(
            FailureKind::ModelFailure,
            format!("no collaborator registered for '{model}'"),
        ));
    };

    let settings = DispatchSettings {
        horizon: ctx.horizon,
        backtest: ctx.backtest,
        arguments: ctx.arguments_for(model),
        worker_hint,
    };
    dispatch(collaborator.as_ref(), model, series, &settings)
}
