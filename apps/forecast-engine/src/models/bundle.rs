//! Structured output of one (series, model) dispatch.

use serde::{Deserialize, Serialize};

use super::registry::ModelId;
use crate::windows::Window;

/// Forecast for a single window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowForecast {
    /// The window forecast.
    pub window: Window,
    /// Point forecasts, one per horizon step.
    pub forecast: Vec<f64>,
    /// Lower prediction bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<Vec<f64>>,
    /// Upper prediction bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<Vec<f64>>,
    /// Observed values over the test range (backtest windows only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actuals: Option<Vec<f64>>,
}

/// All windows produced by one model for one series.
///
/// Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResultBundle {
    /// Series name.
    pub series_name: String,
    /// Model that produced it.
    pub model: ModelId,
    /// One entry per planned window, oldest first.
    pub windows: Vec<WindowForecast>,
    /// Wall time spent in the collaborator, in milliseconds.
    pub execution_time_ms: u64,
}

impl ForecastResultBundle {
    /// Whether the bundle holds backtest windows.
    #[must_use]
    pub fn is_backtest(&self) -> bool {
        self.windows.iter().any(|w| w.window.is_backtest())
    }

    /// The future forecast, when backtesting was disabled.
    #[must_use]
    pub fn future_forecast(&self) -> Option<&WindowForecast> {
        self.windows.iter().find(|w| !w.window.is_backtest())
    }

    /// Backtest windows, oldest first.
    pub fn backtests(&self) -> impl Iterator<Item = &WindowForecast> {
        self.windows.iter().filter(|w| w.window.is_backtest())
    }

    /// Number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether there are no windows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
