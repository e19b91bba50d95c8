//! Core types for backtest window planning.

use std::ops::Range;

use serde::{Deserialize, Serialize};

/// How far the test window moves between backtest iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WindowMethod {
    /// Test window advances one period per iteration (overlapping).
    #[default]
    Rolling,
    /// Test window advances a full horizon per iteration (non-overlapping).
    Moving,
}

impl WindowMethod {
    /// Distance between consecutive test-window starts.
    #[must_use]
    pub const fn step(self, horizon: usize) -> usize {
        match self {
            Self::Rolling => 1,
            Self::Moving => horizon,
        }
    }
}

/// How the training range relates across backtest iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SamplePolicy {
    /// Training always starts at the first observation and grows.
    #[default]
    Expanding,
    /// Training keeps a constant length and slides forward.
    Fixed,
}

/// Backtesting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BacktestSpec {
    /// Whether to evaluate historical windows instead of forecasting the future.
    pub enabled: bool,
    /// Number of backtest windows (forced to 1 when disabled).
    pub iterations: usize,
    /// Test-window step policy.
    pub window_method: WindowMethod,
    /// Training-range policy.
    pub sample_policy: SamplePolicy,
}

impl Default for BacktestSpec {
    fn default() -> Self {
        Self::disabled()
    }
}

impl BacktestSpec {
    /// Pure future forecast.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            iterations: 1,
            window_method: WindowMethod::Rolling,
            sample_policy: SamplePolicy::Expanding,
        }
    }

    /// Backtest over `iterations` windows.
    #[must_use]
    pub const fn enabled(
        iterations: usize,
        window_method: WindowMethod,
        sample_policy: SamplePolicy,
    ) -> Self {
        Self {
            enabled: true,
            iterations,
            window_method,
            sample_policy,
        }
    }

    /// Number of windows this spec produces.
    #[must_use]
    pub const fn effective_iterations(&self) -> usize {
        if self.enabled { self.iterations } else { 1 }
    }

    /// Copy with `iterations` forced to 1 and policies reset when disabled.
    #[must_use]
    pub const fn normalized(self) -> Self {
        if self.enabled { self } else { Self::disabled() }
    }
}

/// Whether a window evaluates history or forecasts the unknown future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    /// Test range lies beyond the observed series.
    Future,
    /// Test range lies inside the observed series.
    Backtest,
}

/// A single train/test split over 0-based, half-open period ranges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    /// 1-based iteration; 1 is the earliest test period.
    pub iteration: usize,
    /// Window kind.
    pub kind: WindowKind,
    /// First training period.
    pub train_start: usize,
    /// One past the last training period.
    pub train_end: usize,
    /// First test period.
    pub test_start: usize,
    /// One past the last test period.
    pub test_end: usize,
}

impl Window {
    /// Training range.
    #[must_use]
    pub const fn train(&self) -> Range<usize> {
        self.train_start..self.train_end
    }

    /// Test range.
    #[must_use]
    pub const fn test(&self) -> Range<usize> {
        self.test_start..self.test_end
    }

    /// Training length.
    #[must_use]
    pub const fn train_len(&self) -> usize {
        self.train_end - self.train_start
    }

    /// Test length.
    #[must_use]
    pub const fn test_len(&self) -> usize {
        self.test_end - self.test_start
    }

    /// Whether actuals exist for the test range.
    #[must_use]
    pub fn is_backtest(&self) -> bool {
        self.kind == WindowKind::Backtest
    }
}

/// Ordered (oldest first), immutable sequence of windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowPlan {
    windows: Vec<Window>,
}

impl WindowPlan {
    pub(crate) const fn new(windows: Vec<Window>) -> Self {
        Self { windows }
    }

    /// Windows, oldest first.
    #[must_use]
    pub fn windows(&self) -> &[Window] {
        &self.windows
    }

    /// Number of windows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.windows.len()
    }

    /// Whether the plan is empty (never true for a planned result).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Iterate windows, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Window> {
        self.windows.iter()
    }
}

impl<'a> IntoIterator for &'a WindowPlan {
    type Item = &'a Window;
    type IntoIter = std::slice::Iter<'a, Window>;

    fn into_iter(self) -> Self::IntoIter {
        self.windows.iter()
    }
}
