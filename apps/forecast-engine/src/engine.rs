//! Public entry point: validate, fan out, run exclusions, assemble.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::data::{MissingValuePolicy, MultiSeries, RegressorSet};
use crate::error::{EngineError, ValidationError};
use crate::models::{ModelPartition, ModelRegistry};
use crate::observability::{record_run, record_run_error};
use crate::result::{AssemblyPlan, ResultTree, assemble};
use crate::scheduler::{ExclusionRunner, FanOutScheduler, RunContext};

/// Forecast orchestration harness.
///
/// Holds the collaborator registry; every [`run`](Self::run) creates and
/// tears down its own worker pool.
#[derive(Debug, Clone, Default)]
pub struct ForecastEngine {
    registry: ModelRegistry,
    missing_override: Option<Arc<dyn MissingValuePolicy>>,
}

impl ForecastEngine {
    /// Engine over `registry`.
    #[must_use]
    pub fn new(registry: ModelRegistry) -> Self {
        Self {
            registry,
            missing_override: None,
        }
    }

    /// Engine with only the built-in baseline collaborators.
    #[must_use]
    pub fn with_baselines() -> Self {
        Self::new(ModelRegistry::with_baselines())
    }

    /// Use `policy` instead of the one named in the configuration.
    #[must_use]
    pub fn with_missing_policy(mut self, policy: Arc<dyn MissingValuePolicy>) -> Self {
        self.missing_override = Some(policy);
        self
    }

    /// Collaborator registry.
    #[must_use]
    pub const fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Forecast every series with every requested model.
    ///
    /// Validation and pool creation failures abort the run before any model
    /// is invoked. Per-cell failures are recorded in the returned tree.
    pub fn run(
        &self,
        series: &MultiSeries,
        regressors: Option<&RegressorSet>,
        config: &EngineConfig,
    ) -> Result<ResultTree, EngineError> {
        let start = Instant::now();
        let result = self.run_inner(series, regressors, config);

        match &result {
            Ok(tree) => {
                let summary = tree.summary();
                record_run(
                    summary.series,
                    tree.models().len(),
                    summary.failed,
                    start.elapsed().as_secs_f64(),
                );
                info!(
                    run_id = %tree.run_id(),
                    series = summary.series,
                    cells = summary.cells,
                    succeeded = summary.succeeded,
                    failed = summary.failed,
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Forecast run complete"
                );
            }
            Err(error) => {
                record_run_error(error_kind(error));
                warn!(error = %error, "Forecast run aborted");
            }
        }

        result
    }

    fn run_inner(
        &self,
        series: &MultiSeries,
        regressors: Option<&RegressorSet>,
        config: &EngineConfig,
    ) -> Result<ResultTree, EngineError> {
        config.validate()?;
        let models = self.registry.resolve(&config.forecast.models)?;
        let arguments = config.model_arguments()?;
        let backtest = config.backtest.normalized();
        let missing = match &self.missing_override {
            Some(policy) => Arc::clone(policy),
            None => config.missing_value_method()?.policy(),
        };

        let series_names = series.names();
        if let Some(regressors) = regressors {
            regressors.validate_length(series.series_length())?;
            let summary = regressors.summary(&series_names);
            info!(
                shared = summary.shared,
                series_specific = summary.series_specific,
                "Regressors supplied"
            );
            let orphaned = regressors.orphaned(&series_names);
            if !orphaned.is_empty() {
                warn!(columns = ?orphaned, "Series-specific regressors match no series");
            }
        }

        let partition = ModelPartition::of(&models);
        info!(
            series = series.len(),
            series_length = series.series_length(),
            horizon = config.forecast.horizon,
            backtest = backtest.enabled,
            iterations = backtest.effective_iterations(),
            parallel = ?partition.parallel_safe,
            sequential = ?partition.exclusions,
            workers = config.engine.worker_count,
            missing_values = missing.name(),
            "Starting forecast run"
        );

        let ctx = RunContext {
            series,
            regressors,
            horizon: config.forecast.horizon,
            backtest: &backtest,
            arguments: &arguments,
            registry: &self.registry,
            missing: missing.as_ref(),
        };

        let mut scheduler = FanOutScheduler::new(config.engine);
        let parallel = scheduler.run(&ctx, &partition.parallel_safe)?;
        let (sequential, sequential_report) = ExclusionRunner::new(config.engine.worker_count)
            .run_with_report(&ctx, &partition.exclusions)?;
        debug!(
            parallel = ?scheduler.last_report(),
            sequential = ?sequential_report,
            "Both phases finished"
        );

        let plan = AssemblyPlan {
            series: &series_names,
            models: &models,
            horizon: config.forecast.horizon,
            backtest,
        };
        Ok(assemble(&plan, [parallel, sequential])?)
    }
}

const fn error_kind(error: &EngineError) -> &'static str {
    match error {
        EngineError::Validation(_) => "validation",
        EngineError::Scheduler(_) => "scheduler",
        EngineError::Assembly(_) => "assembly",
        EngineError::Config(_) => "config",
    }
}
