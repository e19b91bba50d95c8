//! Shared inputs and outputs of scheduler phases.

use std::collections::BTreeMap;

use crate::data::{MissingValuePolicy, MultiSeries, RegressorSet};
use crate::models::{ModelArguments, ModelId, ModelRegistry};
use crate::result::ModelResults;
use crate::windows::BacktestSpec;

static NO_ARGUMENTS: ModelArguments = ModelArguments::EMPTY;

/// Read-only inputs shared by every task group of a run.
///
/// Validated before any phase starts.
#[derive(Debug, Clone, Copy)]
pub struct RunContext<'a> {
    /// Input series.
    pub series: &'a MultiSeries,
    /// Optional regressors.
    pub regressors: Option<&'a RegressorSet>,
    /// Forecast horizon.
    pub horizon: usize,
    /// Backtest configuration (normalized).
    pub backtest: &'a BacktestSpec,
    /// Per-model arguments.
    pub arguments: &'a BTreeMap<ModelId, ModelArguments>,
    /// Collaborators.
    pub registry: &'a ModelRegistry,
    /// Gap-filling policy applied before windowing.
    pub missing: &'a dyn MissingValuePolicy,
}

impl RunContext<'_> {
    /// Arguments for `model`, empty when none were given.
    #[must_use]
    pub fn arguments_for(&self, model: ModelId) -> &ModelArguments {
        self.arguments.get(&model).unwrap_or(&NO_ARGUMENTS)
    }
}

/// Outcomes for every model of one series.
#[derive(Debug, Clone)]
pub struct TaskGroupResult {
    /// Series name.
    pub series: String,
    /// Model outcomes.
    pub outcomes: ModelResults,
}

impl TaskGroupResult {
    /// Number of failed cells.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes.values().filter(|o| !o.is_success()).count()
    }
}
