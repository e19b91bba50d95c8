//! Merges the parallel-phase and sequential-phase partial trees.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::warn;

use super::failure::TaskFailure;
use super::tree::{ModelOutcome, ModelResults, PartialTree, ResultTree};
use crate::models::ModelId;
use crate::windows::BacktestSpec;

/// Bookkeeping errors found while merging phases.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssemblyError {
    /// A phase produced a cell nobody requested.
    #[error("Unexpected result for series '{series}', model '{model}'")]
    UnexpectedEntry {
        /// Series name.
        series: String,
        /// Model.
        model: ModelId,
    },

    /// Both phases produced the same cell.
    #[error("Duplicate result for series '{series}', model '{model}'")]
    DuplicateEntry {
        /// Series name.
        series: String,
        /// Model.
        model: ModelId,
    },
}

/// What the assembled tree must cover.
#[derive(Debug, Clone, Copy)]
pub struct AssemblyPlan<'a> {
    /// Every series in the input.
    pub series: &'a [&'a str],
    /// Every requested model.
    pub models: &'a [ModelId],
    /// Horizon, recorded on the tree.
    pub horizon: usize,
    /// Backtest spec, recorded on the tree.
    pub backtest: BacktestSpec,
}

/// Merge phase outputs into one tree covering every requested pair.
///
/// Pairs missing from both phases are filled with a
/// [`FailureKind::Missing`](super::FailureKind::Missing) marker.
pub fn assemble(
    plan: &AssemblyPlan<'_>,
    phases: impl IntoIterator<Item = PartialTree>,
) -> Result<ResultTree, AssemblyError> {
    let mut merged: BTreeMap<String, ModelResults> = plan
        .series
        .iter()
        .map(|name| ((*name).to_string(), ModelResults::new()))
        .collect();

    for phase in phases {
        for (series, outcomes) in phase {
            for (model, outcome) in outcomes {
                let Some(slot) = merged.get_mut(&series) else {
                    return Err(AssemblyError::UnexpectedEntry { series, model });
                };
                if !plan.models.contains(&model) {
                    return Err(AssemblyError::UnexpectedEntry { series, model });
                }
                if slot.insert(model, outcome).is_some() {
                    return Err(AssemblyError::DuplicateEntry { series, model });
                }
            }
        }
    }

    for (series, outcomes) in &mut merged {
        for model in plan.models {
            outcomes.entry(*model).or_insert_with(|| {
                warn!(series = %series, model = %model, "No result produced, recording failure");
                ModelOutcome::Failed(TaskFailure::missing())
            });
        }
    }

    Ok(ResultTree::new(
        plan.horizon,
        plan.backtest,
        plan.models.to_vec(),
        merged,
    ))
}
