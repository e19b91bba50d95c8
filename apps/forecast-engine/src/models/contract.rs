//! The uniform call contract every forecasting collaborator satisfies.

use thiserror::Error;

use super::arguments::ModelArguments;
use crate::windows::Window;

/// Failures reported by a model collaborator.
///
/// The scheduler records these against the (series, model) cell; they never
/// abort the run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// Fitting did not converge.
    #[error("Model failed to converge: {0}")]
    Convergence(String),

    /// Not enough training data for this model.
    #[error("Insufficient data: {required} observations required, {available} available")]
    InsufficientData {
        /// Observations needed.
        required: usize,
        /// Observations available.
        available: usize,
    },

    /// Model arguments were rejected.
    #[error("Invalid model arguments: {0}")]
    InvalidArguments(String),

    /// Any other collaborator failure.
    #[error("Model failed: {0}")]
    Failed(String),
}

/// A regressor column sliced to one window.
#[derive(Debug, Clone, PartialEq)]
pub struct RegressorWindow {
    /// Feature name (series prefix already stripped).
    pub name: String,
    /// Values over the training range.
    pub history: Vec<f64>,
    /// Values over the test range, as far as the column extends.
    pub future: Vec<f64>,
}

/// Everything a collaborator receives for one window.
#[derive(Debug, Clone, Copy)]
pub struct ForecastRequest<'a> {
    /// Series being forecast.
    pub series_name: &'a str,
    /// Gap-free training observations.
    pub history: &'a [f64],
    /// Regressors visible to this series, sliced to the window.
    pub regressors: &'a [RegressorWindow],
    /// Number of periods to forecast.
    pub horizon: usize,
    /// The window being evaluated.
    pub window: &'a Window,
    /// Caller-supplied arguments for this model.
    pub arguments: &'a ModelArguments,
    /// Cores the model may use internally (1 inside the worker pool).
    pub worker_hint: usize,
}

/// Point forecast with optional prediction bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    /// Point forecasts, one per horizon step.
    pub point: Vec<f64>,
    /// Lower prediction bound.
    pub lower: Option<Vec<f64>>,
    /// Upper prediction bound.
    pub upper: Option<Vec<f64>>,
}

impl Forecast {
    /// Point forecast without bounds.
    #[must_use]
    pub const fn point(point: Vec<f64>) -> Self {
        Self {
            point,
            lower: None,
            upper: None,
        }
    }

    /// Attach prediction bounds.
    #[must_use]
    pub fn with_bounds(mut self, lower: Vec<f64>, upper: Vec<f64>) -> Self {
        self.lower = Some(lower);
        self.upper = Some(upper);
        self
    }
}

/// A forecasting collaborator.
///
/// Implementations must be callable from worker threads and must not share
/// mutable state between calls.
pub trait ForecastModel: Send + Sync {
    /// Produce a forecast of `request.horizon` periods.
    fn forecast(&self, request: &ForecastRequest<'_>) -> Result<Forecast, ModelError>;
}
