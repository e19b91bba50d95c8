// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::needless_collect,
        clippy::option_if_let_else,
        clippy::items_after_statements
    )
)]

//! Forecast Engine - Rust Core Library
//!
//! Parallel orchestration harness for forecasting many time series with many
//! models.
//!
//! # Pipeline
//!
//! - **Data**: multi-series input, regressor scoping (`<series>__<feature>`
//!   columns belong to one series), missing-value policies, series splitting
//! - **Windows**: train/test window planning for future forecasts and
//!   rolling or moving backtests with expanding or fixed training samples
//! - **Models**: the collaborator contract, static model registry and
//!   per-window dispatch with failure isolation
//! - **Scheduler**: fan-out of one task group per series over a bounded
//!   worker pool, then sequential execution of self-parallelizing models
//! - **Result**: assembly of the series → model result tree
//!
//! # Example
//!
//! ```rust,ignore
//! use forecast_engine::{EngineConfig, ForecastEngine, MultiSeries};
//!
//! let series = MultiSeries::single("sales", history)?;
//! let config = EngineConfig::new(12, ["naive", "drift"]).with_workers(4);
//! let tree = ForecastEngine::with_baselines().run(&series, None, &config)?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Configuration loading and validation.
pub mod config;

/// Input containers, regressors, missing values and splitting.
pub mod data;

/// Engine entry point.
pub mod engine;

/// Error types.
pub mod error;

/// Model contract, registry and dispatch.
pub mod models;

/// Metrics.
pub mod observability;

/// Result tree and assembly.
pub mod result;

/// Worker pool and sequential runner.
pub mod scheduler;

/// Tracing subscriber setup.
pub mod telemetry;

/// Window planning.
pub mod windows;

pub use config::{ConfigError, EngineConfig, ForecastConfig, load_config, load_config_from_string};
pub use data::{
    InputDocument, MissingValueMethod, MissingValuePolicy, MultiSeries, RegressorColumn,
    RegressorSet, SeriesColumn,
};
pub use engine::ForecastEngine;
pub use error::{EngineError, ValidationError};
pub use models::{
    Forecast, ForecastModel, ForecastRequest, ForecastResultBundle, ModelArguments, ModelError,
    ModelId, ModelRegistry, ParamValue,
};
pub use result::{FailureKind, ModelOutcome, ResultTree, RunSummary, TaskFailure};
pub use scheduler::{SchedulerConfig, SchedulerError, SchedulerState};
pub use windows::{
    BacktestSpec, BacktestSpecBuilder, SamplePolicy, Window, WindowMethod, WindowPlan, plan,
};
