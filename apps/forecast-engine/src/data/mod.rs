//! Input data model: series, regressors, splitting and gap filling.

mod input;
mod missing;
mod regressors;
mod series;
mod splitter;

pub use input::InputDocument;
pub use missing::{
    ForwardFill, LinearInterpolation, MissingValueMethod, MissingValuePolicy, PreprocessError,
    RejectMissing,
};
pub use regressors::{
    RegressorColumn, RegressorScope, RegressorSet, RegressorSummary, SERIES_SEPARATOR,
};
pub use series::{DEFAULT_SERIES_PREFIX, MultiSeries, Series, SeriesColumn};
pub use splitter::{SeriesUnit, SplitError, split, split_all};
