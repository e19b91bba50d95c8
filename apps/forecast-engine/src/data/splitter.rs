//! Projects one independent series (plus its visible regressors) out of the
//! multi-series container.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::regressors::{RegressorColumn, RegressorScope, RegressorSet};
use super::series::MultiSeries;

/// Errors from splitting.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SplitError {
    /// The requested ordinal does not name a series.
    #[error("Series index {index} out of range (1..={count})")]
    IndexOutOfRange {
        /// Requested 1-based index.
        index: usize,
        /// Number of series available.
        count: usize,
    },
}

/// One independent unit of work: a single series and the regressors it may see.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesUnit {
    /// Series name.
    pub name: String,
    /// Raw observations (gaps not yet filled).
    pub values: Vec<Option<f64>>,
    /// Shared regressors plus this series' own, prefix stripped.
    pub regressors: Vec<RegressorColumn>,
}

/// Extract the series at 1-based `index` with its scoped regressors.
pub fn split(
    series: &MultiSeries,
    regressors: Option<&RegressorSet>,
    index: usize,
) -> Result<SeriesUnit, SplitError> {
    let column = series.get(index).ok_or(SplitError::IndexOutOfRange {
        index,
        count: series.len(),
    })?;

    Ok(SeriesUnit {
        name: column.name().to_string(),
        values: column.values().to_vec(),
        regressors: regressors.map_or_else(Vec::new, |r| {
            scope_regressors(column.name(), &series.names(), r)
        }),
    })
}

/// Split every series in order.
pub fn split_all(
    series: &MultiSeries,
    regressors: Option<&RegressorSet>,
) -> Result<Vec<SeriesUnit>, SplitError> {
    (1..=series.len())
        .map(|index| split(series, regressors, index))
        .collect()
}

/// Regressors visible to `series_name`, resolving owners among `all_series`.
///
/// A series-specific column replaces a shared column of the same feature name.
fn scope_regressors(
    series_name: &str,
    all_series: &[&str],
    regressors: &RegressorSet,
) -> Vec<RegressorColumn> {
    let mut scoped: Vec<RegressorColumn> = Vec::new();

    for column in regressors.columns() {
        match column.scope(all_series) {
            RegressorScope::Shared => {
                if !scoped.iter().any(|c| c.name == column.name) {
                    scoped.push(column.clone());
                }
            }
            RegressorScope::Series { series, feature } if series == series_name => {
                let own = RegressorColumn::new(feature, column.values.clone());
                match scoped.iter_mut().find(|c| c.name == feature) {
                    Some(existing) => *existing = own,
                    None => scoped.push(own),
                }
            }
            RegressorScope::Series { .. } | RegressorScope::Unmatched => {}
        }
    }

    scoped
}
