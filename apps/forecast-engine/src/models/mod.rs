//! Forecasting collaborators: identifiers, the call contract, the
//! registry, and per-window dispatch.

mod arguments;
mod baseline;
mod bundle;
mod contract;
mod dispatch;
mod registry;

pub use arguments::{ModelArguments, ParamValue};
pub use baseline::{Drift, Mean, Naive, SeasonalNaive};
pub use bundle::{ForecastResultBundle, WindowForecast};
pub use contract::{Forecast, ForecastModel, ForecastRequest, ModelError, RegressorWindow};
pub use dispatch::{DispatchSettings, PreparedSeries, dispatch};
pub(crate) use dispatch::panic_message;
pub use registry::{ModelId, ModelPartition, ModelRegistry, ModelSpec, resolve_names};
