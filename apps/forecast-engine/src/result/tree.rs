//! The nested series → model result structure returned to callers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::failure::{FailureKind, TaskFailure};
use crate::models::{ForecastResultBundle, ModelId};
use crate::windows::BacktestSpec;

/// Outcome of one (series, model) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ModelOutcome {
    /// The collaborator produced a bundle.
    Success(ForecastResultBundle),
    /// The cell failed; the failure is recorded instead of aborting the run.
    Failed(TaskFailure),
}

impl ModelOutcome {
    /// Whether the cell succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// The bundle, if successful.
    #[must_use]
    pub const fn bundle(&self) -> Option<&ForecastResultBundle> {
        match self {
            Self::Success(bundle) => Some(bundle),
            Self::Failed(_) => None,
        }
    }

    /// The failure, if failed.
    #[must_use]
    pub const fn failure(&self) -> Option<&TaskFailure> {
        match self {
            Self::Success(_) => None,
            Self::Failed(failure) => Some(failure),
        }
    }
}

impl From<Result<ForecastResultBundle, TaskFailure>> for ModelOutcome {
    fn from(result: Result<ForecastResultBundle, TaskFailure>) -> Self {
        match result {
            Ok(bundle) => Self::Success(bundle),
            Err(failure) => Self::Failed(failure),
        }
    }
}

/// Model name → outcome for one series.
pub type ModelResults = BTreeMap<ModelId, ModelOutcome>;

/// Series name → model results, as produced by one execution phase.
pub type PartialTree = BTreeMap<String, ModelResults>;

/// Type marker identifying a serialized engine result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultType {
    /// Output of [`ForecastEngine::run`](crate::ForecastEngine::run).
    #[default]
    ForecastEngineResult,
}

/// Per-model success and failure counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSummary {
    /// Cells that succeeded.
    pub succeeded: usize,
    /// Cells that failed.
    pub failed: usize,
}

/// Counts across the whole tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Number of series.
    pub series: usize,
    /// Total cells.
    pub cells: usize,
    /// Successful cells.
    pub succeeded: usize,
    /// Failed cells.
    pub failed: usize,
    /// Breakdown by model.
    pub by_model: BTreeMap<ModelId, ModelSummary>,
    /// Breakdown of failures by kind.
    pub failures_by_kind: BTreeMap<FailureKind, usize>,
}

impl RunSummary {
    /// Fraction of cells that succeeded.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn success_rate(&self) -> f64 {
        if self.cells == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.cells as f64
        }
    }
}

/// Final result of a forecast run: series name → model name → outcome.
///
/// Immutable once returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultTree {
    #[serde(rename = "type")]
    result_type: ResultType,
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    horizon: usize,
    backtest: BacktestSpec,
    models: Vec<ModelId>,
    series: BTreeMap<String, ModelResults>,
}

impl ResultTree {
    pub(crate) fn new(
        horizon: usize,
        backtest: BacktestSpec,
        models: Vec<ModelId>,
        series: BTreeMap<String, ModelResults>,
    ) -> Self {
        Self {
            result_type: ResultType::ForecastEngineResult,
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            horizon,
            backtest,
            models,
            series,
        }
    }

    /// Type marker.
    #[must_use]
    pub const fn result_type(&self) -> ResultType {
        self.result_type
    }

    /// Unique id of the run.
    #[must_use]
    pub const fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// When the tree was assembled.
    #[must_use]
    pub const fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    /// Forecast horizon used.
    #[must_use]
    pub const fn horizon(&self) -> usize {
        self.horizon
    }

    /// Backtest spec used (normalized).
    #[must_use]
    pub const fn backtest(&self) -> &BacktestSpec {
        &self.backtest
    }

    /// Requested models in request order.
    #[must_use]
    pub fn models(&self) -> &[ModelId] {
        &self.models
    }

    /// Full nested mapping.
    #[must_use]
    pub const fn series(&self) -> &BTreeMap<String, ModelResults> {
        &self.series
    }

    /// Series names.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    /// Results for one series.
    #[must_use]
    pub fn get_series(&self, series: &str) -> Option<&ModelResults> {
        self.series.get(series)
    }

    /// Outcome for one cell.
    #[must_use]
    pub fn get(&self, series: &str, model: ModelId) -> Option<&ModelOutcome> {
        self.series.get(series).and_then(|m| m.get(&model))
    }

    /// Iterate every cell.
    pub fn cells(&self) -> impl Iterator<Item = (&str, ModelId, &ModelOutcome)> {
        self.series.iter().flat_map(|(name, models)| {
            models
                .iter()
                .map(move |(model, outcome)| (name.as_str(), *model, outcome))
        })
    }

    /// Success and failure counts.
    #[must_use]
    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary {
            series: self.series.len(),
            ..RunSummary::default()
        };

        for (_, model, outcome) in self.cells() {
            summary.cells += 1;
            let entry = summary.by_model.entry(model).or_default();
            match outcome {
                ModelOutcome::Success(_) => {
                    summary.succeeded += 1;
                    entry.succeeded += 1;
                }
                ModelOutcome::Failed(failure) => {
                    summary.failed += 1;
                    entry.failed += 1;
                    *summary.failures_by_kind.entry(failure.kind).or_default() += 1;
                }
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bundle(series: &str, model: ModelId) -> ForecastResultBundle {
        ForecastResultBundle {
            series_name: series.to_string(),
            model,
            windows: vec![],
            execution_time_ms: 0,
        }
    }

    fn tree() -> ResultTree {
        let mut a = ModelResults::new();
        a.insert(
            ModelId::Naive,
            ModelOutcome::Success(bundle("a", ModelId::Naive)),
        );
        a.insert(
            ModelId::Drift,
            ModelOutcome::Failed(TaskFailure::new(FailureKind::ModelFailure, "boom")),
        );
        let mut b = ModelResults::new();
        b.insert(
            ModelId::Naive,
            ModelOutcome::Success(bundle("b", ModelId::Naive)),
        );
        b.insert(
            ModelId::Drift,
            ModelOutcome::Success(bundle("b", ModelId::Drift)),
        );

        let mut series = BTreeMap::new();
        series.insert("a".to_string(), a);
        series.insert("b".to_string(), b);

        ResultTree::new(
            3,
            BacktestSpec::disabled(),
            vec![ModelId::Naive, ModelId::Drift],
            series,
        )
    }

    #[test]
    fn test_summary_counts() {
        let summary = tree().summary();

        assert_eq!(summary.series, 2);
        assert_eq!(summary.cells, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
        assert_eq!(
            summary.by_model.get(&ModelId::Drift),
            Some(&ModelSummary {
                succeeded: 1,
                failed: 1
            })
        );
        assert_eq!(
            summary.failures_by_kind.get(&FailureKind::ModelFailure),
            Some(&1)
        );
        assert!((summary.success_rate() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_lookup() {
        let tree = tree();

        assert!(tree.get("a", ModelId::Naive).is_some_and(ModelOutcome::is_success));
        assert!(tree.get("a", ModelId::Drift).and_then(ModelOutcome::failure).is_some());
        assert!(tree.get("c", ModelId::Naive).is_none());
        assert_eq!(tree.series_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_serialized_shape() {
        let value = serde_json::to_value(tree()).unwrap();

        assert_eq!(value["type"], "forecast_engine_result");
        assert_eq!(value["series"]["a"]["naive"]["status"], "success");
        assert_eq!(value["series"]["a"]["drift"]["status"], "failed");
        assert_eq!(value["series"]["a"]["drift"]["kind"], "model_failure");
    }

    #[test]
    fn test_round_trip_preserves_marker() {
        let original = tree();
        let json = serde_json::to_string(&original).unwrap();
        let parsed: ResultTree = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.result_type(), ResultType::ForecastEngineResult);
        assert_eq!(parsed.run_id(), original.run_id());
        assert_eq!(parsed, original);
    }
}
