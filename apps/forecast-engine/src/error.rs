//! Error types for the forecast engine.
//!
//! Two categories abort a run and surface to the caller:
//!
//! | Error | Raised by | Effect |
//! |-------|-----------|--------|
//! | [`ValidationError`] | configuration / input checks | aborts before scheduling |
//! | [`SchedulerError::PoolCreation`] | fan-out scheduler | aborts before any model runs |
//! | [`SchedulerError::Split`] | series splitter | internal scheduling bug |
//! | [`AssemblyError`] | result assembler | internal bookkeeping bug |
//!
//! Everything that happens inside a single (series, model) cell is recorded in
//! the result tree as a [`TaskFailure`](crate::result::TaskFailure) instead.

use thiserror::Error;

use crate::config::ConfigError;
use crate::result::AssemblyError;
use crate::scheduler::SchedulerError;

/// Malformed inputs or configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The multi-series container has no columns.
    #[error("At least one series is required")]
    NoSeries,

    /// A series has no observations.
    #[error("Series '{name}' is empty")]
    EmptySeries {
        /// Series name.
        name: String,
    },

    /// Two series share the same name.
    #[error("Duplicate series name '{name}'")]
    DuplicateSeriesName {
        /// Series name.
        name: String,
    },

    /// Series lengths differ.
    #[error("Series '{name}' has {actual} observations, expected {expected}")]
    LengthMismatch {
        /// Series name.
        name: String,
        /// Length of the first series.
        expected: usize,
        /// Length of this series.
        actual: usize,
    },

    /// A regressor column has an empty name.
    #[error("Regressor column {position} has an empty name")]
    EmptyRegressorName {
        /// 1-based column position.
        position: usize,
    },

    /// Two regressor columns share the same name.
    #[error("Duplicate regressor name '{name}'")]
    DuplicateRegressorName {
        /// Regressor name.
        name: String,
    },

    /// A regressor column is shorter than the series it accompanies.
    #[error("Regressor '{name}' has {actual} rows, at least {required} required")]
    RegressorTooShort {
        /// Regressor name.
        name: String,
        /// Series length.
        required: usize,
        /// Regressor length.
        actual: usize,
    },

    /// A regressor column contains a non-finite value.
    #[error("Regressor '{name}' contains a non-finite value at row {row}")]
    NonFiniteRegressor {
        /// Regressor name.
        name: String,
        /// 0-based row.
        row: usize,
    },

    /// Forecast horizon is zero.
    #[error("Forecast horizon must be at least 1")]
    InvalidHorizon,

    /// Worker count is zero.
    #[error("Worker count must be at least 1")]
    InvalidWorkerCount,

    /// Backtest iteration count is zero.
    #[error("Backtest iterations must be at least 1")]
    InvalidIterations,

    /// No models were requested.
    #[error("At least one model must be requested")]
    NoModels,

    /// A requested model name is not a recognized identifier.
    #[error("Unknown model '{name}'")]
    UnknownModel {
        /// Requested name.
        name: String,
    },

    /// A model was requested more than once.
    #[error("Model '{name}' requested more than once")]
    DuplicateModel {
        /// Model name.
        name: String,
    },

    /// A recognized model has no collaborator registered with the engine.
    #[error("Model '{name}' has no registered implementation")]
    UnregisteredModel {
        /// Model name.
        name: String,
    },

    /// Arguments were supplied for a model that was not requested.
    #[error("Arguments supplied for model '{name}' which was not requested")]
    ArgumentsForUnrequestedModel {
        /// Model name.
        name: String,
    },

    /// Unknown missing-value policy name.
    #[error("Unknown missing-value policy '{name}'")]
    UnknownMissingPolicy {
        /// Requested name.
        name: String,
    },
}

/// Top-level error for a forecast run.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input or configuration validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The fan-out scheduler could not run.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    /// The result tree could not be assembled.
    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Whether this error indicates a bug in the engine rather than bad input
    /// or environment limits.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        matches!(
            self,
            Self::Assembly(_) | Self::Scheduler(SchedulerError::Split(_))
        )
    }
}
