//! Static model identifiers, their metadata, and the collaborator registry.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::baseline::{Drift, Mean, Naive, SeasonalNaive};
use super::contract::ForecastModel;
use crate::error::ValidationError;

/// Every model identifier the engine recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelId {
    /// ARIMA.
    Arima,
    /// Exponential smoothing state space.
    Ets,
    /// Seasonal-trend decomposition with a forecaster on the remainder.
    Stl,
    /// TBATS.
    Tbats,
    /// Bayesian structural time series.
    Bsts,
    /// Neural network autoregression.
    Nnetar,
    /// LSTM.
    Lstm,
    /// AutoML search; manages its own parallelism.
    Automl,
    /// Last observation repeated.
    Naive,
    /// Value from one season earlier.
    Snaive,
    /// Historical mean.
    Mean,
    /// Random walk with drift.
    Drift,
}

/// Static metadata for a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelSpec {
    /// Identifier.
    pub id: ModelId,
    /// Name used in configuration and result keys.
    pub name: &'static str,
    /// Runs its own multi-core execution; must stay out of the worker pool.
    pub self_parallelizing: bool,
}

impl ModelId {
    /// All identifiers in declaration order.
    pub const ALL: [Self; 12] = [
        Self::Arima,
        Self::Ets,
        Self::Stl,
        Self::Tbats,
        Self::Bsts,
        Self::Nnetar,
        Self::Lstm,
        Self::Automl,
        Self::Naive,
        Self::Snaive,
        Self::Mean,
        Self::Drift,
    ];

    /// Static metadata.
    #[must_use]
    pub const fn spec(self) -> ModelSpec {
        let (name, self_parallelizing) = match self {
            Self::Arima => ("arima", false),
            Self::Ets => ("ets", false),
            Self::Stl => ("stl", false),
            Self::Tbats => ("tbats", false),
            Self::Bsts => ("bsts", false),
            Self::Nnetar => ("nnetar", false),
            Self::Lstm => ("lstm", false),
            Self::Automl => ("automl", true),
            Self::Naive => ("naive", false),
            Self::Snaive => ("snaive", false),
            Self::Mean => ("mean", false),
            Self::Drift => ("drift", false),
        };
        ModelSpec {
            id: self,
            name,
            self_parallelizing,
        }
    }

    /// Configuration name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        self.spec().name
    }

    /// Whether this model must run outside the worker pool.
    #[must_use]
    pub const fn is_self_parallelizing(self) -> bool {
        self.spec().self_parallelizing
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ModelId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|id| id.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownModel {
                name: s.to_string(),
            })
    }
}

/// Resolve requested names to identifiers, rejecting unknowns and duplicates.
pub fn resolve_names<S: AsRef<str>>(names: &[S]) -> Result<Vec<ModelId>, ValidationError> {
    if names.is_empty() {
        return Err(ValidationError::NoModels);
    }

    let mut seen = HashSet::with_capacity(names.len());
    names
        .iter()
        .map(|name| {
            let id: ModelId = name.as_ref().parse()?;
            if seen.insert(id) {
                Ok(id)
            } else {
                Err(ValidationError::DuplicateModel {
                    name: id.name().to_string(),
                })
            }
        })
        .collect()
}

/// Requested models split by where they run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelPartition {
    /// Run inside the worker pool.
    pub parallel_safe: Vec<ModelId>,
    /// Run sequentially in the coordinating thread after the pool stops.
    pub exclusions: Vec<ModelId>,
}

impl ModelPartition {
    /// Partition by the static `self_parallelizing` flag, preserving order.
    #[must_use]
    pub fn of(models: &[ModelId]) -> Self {
        let (exclusions, parallel_safe) = models
            .iter()
            .copied()
            .partition(|id| id.is_self_parallelizing());
        Self {
            parallel_safe,
            exclusions,
        }
    }
}

/// Maps identifiers to collaborator implementations.
#[derive(Clone, Default)]
pub struct ModelRegistry {
    models: BTreeMap<ModelId, Arc<dyn ForecastModel>>,
}

impl ModelRegistry {
    /// Registry with no collaborators.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in baseline collaborators.
    #[must_use]
    pub fn with_baselines() -> Self {
        Self::new()
            .register(ModelId::Naive, Arc::new(Naive))
            .register(ModelId::Snaive, Arc::new(SeasonalNaive))
            .register(ModelId::Mean, Arc::new(Mean))
            .register(ModelId::Drift, Arc::new(Drift))
    }

    /// Builder-style registration; replaces any existing entry.
    #[must_use]
    pub fn register(mut self, id: ModelId, model: Arc<dyn ForecastModel>) -> Self {
        self.insert(id, model);
        self
    }

    /// Register or replace a collaborator.
    pub fn insert(&mut self, id: ModelId, model: Arc<dyn ForecastModel>) {
        self.models.insert(id, model);
    }

    /// Collaborator for `id`.
    #[must_use]
    pub fn get(&self, id: ModelId) -> Option<&Arc<dyn ForecastModel>> {
        self.models.get(&id)
    }

    /// Whether `id` has a collaborator.
    #[must_use]
    pub fn contains(&self, id: ModelId) -> bool {
        self.models.contains_key(&id)
    }

    /// Registered identifiers in order.
    #[must_use]
    pub fn ids(&self) -> Vec<ModelId> {
        self.models.keys().copied().collect()
    }

    /// Resolve names and check every model has a collaborator.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<ModelId>, ValidationError> {
        let ids = resolve_names(names)?;
        match ids.iter().find(|id| !self.contains(**id)) {
            Some(missing) => Err(ValidationError::UnregisteredModel {
                name: missing.name().to_string(),
            }),
            None => Ok(ids),
        }
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("models", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("arima", ModelId::Arima)]
    #[test_case("ETS", ModelId::Ets)]
    #[test_case(" automl ", ModelId::Automl)]
    #[test_case("snaive", ModelId::Snaive)]
    fn test_parse_model_id(name: &str, expected: ModelId) {
        assert_eq!(name.parse::<ModelId>(), Ok(expected));
    }

    #[test]
    fn test_names_round_trip() {
        for id in ModelId::ALL {
            assert_eq!(id.name().parse::<ModelId>(), Ok(id));
            assert_eq!(id.to_string(), id.name());
        }
    }

    #[test]
    fn test_only_automl_is_self_parallelizing() {
        let flagged: Vec<ModelId> = ModelId::ALL
            .into_iter()
            .filter(|id| id.is_self_parallelizing())
            .collect();
        assert_eq!(flagged, vec![ModelId::Automl]);
    }

    #[test]
    fn test_resolve_names_errors() {
        assert_eq!(
            resolve_names::<&str>(&[]),
            Err(ValidationError::NoModels)
        );
        assert!(matches!(
            resolve_names(&["arima", "prophet"]),
            Err(ValidationError::UnknownModel { .. })
        ));
        assert_eq!(
            resolve_names(&["ets", "ETS"]),
            Err(ValidationError::DuplicateModel {
                name: "ets".to_string()
            })
        );
    }

    #[test]
    fn test_partition_preserves_order() {
        let partition = ModelPartition::of(&[
            ModelId::Ets,
            ModelId::Automl,
            ModelId::Naive,
            ModelId::Arima,
        ]);

        assert_eq!(
            partition.parallel_safe,
            vec![ModelId::Ets, ModelId::Naive, ModelId::Arima]
        );
        assert_eq!(partition.exclusions, vec![ModelId::Automl]);
    }

    #[test]
    fn test_registry_resolve_requires_registration() {
        let registry = ModelRegistry::with_baselines();

        assert_eq!(
            registry.resolve(&["naive", "drift"]),
            Ok(vec![ModelId::Naive, ModelId::Drift])
        );
        assert_eq!(
            registry.resolve(&["naive", "arima"]),
            Err(ValidationError::UnregisteredModel {
                name: "arima".to_string()
            })
        );
    }

    #[test]
    fn test_register_external_collaborator() {
        let registry = ModelRegistry::new().register(ModelId::Arima, Arc::new(Naive));

        assert!(registry.contains(ModelId::Arima));
        assert!(!registry.contains(ModelId::Naive));
        assert_eq!(format!("{registry:?}"), "ModelRegistry { models: [Arima] }");
    }
}
