//! JSON input document read by the binary.

use serde::{Deserialize, Serialize};

use super::regressors::{RegressorColumn, RegressorSet};
use super::series::{MultiSeries, SeriesColumn};
use crate::error::ValidationError;

/// Series and optional regressors as supplied on disk.
///
/// ```json
/// {
///   "series": [{"name": "store_a", "values": [1.0, null, 3.0]}],
///   "regressors": [{"name": "store_a__promo", "values": [0, 1, 0, 1]}]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputDocument {
    /// Series columns.
    pub series: Vec<SeriesColumn>,
    /// Regressor columns.
    #[serde(default)]
    pub regressors: Vec<RegressorColumn>,
}

impl InputDocument {
    /// Validate into engine inputs. An empty regressor list becomes `None`.
    pub fn into_parts(self) -> Result<(MultiSeries, Option<RegressorSet>), ValidationError> {
        let series = MultiSeries::new(self.series)?;
        let regressors = if self.regressors.is_empty() {
            None
        } else {
            Some(RegressorSet::new(self.regressors)?)
        };
        Ok((series, regressors))
    }
}
