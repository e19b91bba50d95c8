//! Baseline collaborators bundled with the engine.
//!
//! These are reference implementations of [`ForecastModel`] so the harness
//! runs end to end without external models. They ignore regressors.

use super::contract::{Forecast, ForecastModel, ForecastRequest, ModelError};

/// Repeats the last observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Naive;

impl ForecastModel for Naive {
    fn forecast(&self, request: &ForecastRequest<'_>) -> Result<Forecast, ModelError> {
        let last = last_value(request.history)?;
        Ok(Forecast::point(vec![last; request.horizon]))
    }
}

/// Repeats the last observed season. Argument `period` (default 1).
#[derive(Debug, Clone, Copy, Default)]
pub struct SeasonalNaive;

impl ForecastModel for SeasonalNaive {
    fn forecast(&self, request: &ForecastRequest<'_>) -> Result<Forecast, ModelError> {
        let period = request.arguments.positive_int_or("period", 1)?;
        let history = request.history;
        if history.len() < period {
            return Err(ModelError::InsufficientData {
                required: period,
                available: history.len(),
            });
        }

        let season = &history[history.len() - period..];
        Ok(Forecast::point(
            (0..request.horizon).map(|h| season[h % period]).collect(),
        ))
    }
}

/// Historical mean.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl ForecastModel for Mean {
    fn forecast(&self, request: &ForecastRequest<'_>) -> Result<Forecast, ModelError> {
        let history = request.history;
        if history.is_empty() {
            return Err(ModelError::InsufficientData {
                required: 1,
                available: 0,
            });
        }
        let mean = history.iter().sum::<f64>() / history.len() as f64;
        Ok(Forecast::point(vec![mean; request.horizon]))
    }
}

/// Random walk with drift: extends the line through the first and last
/// observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Drift;

impl ForecastModel for Drift {
    fn forecast(&self, request: &ForecastRequest<'_>) -> Result<Forecast, ModelError> {
        let history = request.history;
        if history.len() < 2 {
            return Err(ModelError::InsufficientData {
                required: 2,
                available: history.len(),
            });
        }

        let first = history[0];
        let last = history[history.len() - 1];
        let slope = (last - first) / (history.len() - 1) as f64;
        Ok(Forecast::point(
            (1..=request.horizon)
                .map(|h| last + slope * h as f64)
                .collect(),
        ))
    }
}

fn last_value(history: &[f64]) -> Result<f64, ModelError> {
    history
        .last()
        .copied()
        .ok_or(ModelError::InsufficientData {
            required: 1,
            available: 0,
        })
}
