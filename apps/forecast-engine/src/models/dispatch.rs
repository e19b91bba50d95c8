//! Calls one collaborator for one series across every planned window.

use std::any::Any;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Instant;

use tracing::{debug, trace};

use super::arguments::ModelArguments;
use super::bundle::{ForecastResultBundle, WindowForecast};
use super::contract::{Forecast, ForecastModel, ForecastRequest, RegressorWindow};
use super::registry::ModelId;
use crate::data::RegressorColumn;
use crate::result::{FailureKind, TaskFailure};
use crate::windows::{BacktestSpec, Window, plan};

/// A series after missing-value handling, ready to be windowed.
#[derive(Debug, Clone, Copy)]
pub struct PreparedSeries<'a> {
    /// Series name.
    pub name: &'a str,
    /// Gap-free observations.
    pub values: &'a [f64],
    /// Regressors visible to the series.
    pub regressors: &'a [RegressorColumn],
}

/// Per-call settings shared by every window of a dispatch.
#[derive(Debug, Clone, Copy)]
pub struct DispatchSettings<'a> {
    /// Forecast horizon.
    pub horizon: usize,
    /// Backtest configuration.
    pub backtest: &'a BacktestSpec,
    /// Arguments for this model.
    pub arguments: &'a ModelArguments,
    /// Cores the model may use internally.
    pub worker_hint: usize,
}

/// Plan the windows for `series` and invoke `model` once per window.
///
/// Any window failing fails the whole cell. Collaborator panics are caught
/// and reported as [`FailureKind::ModelFailure`].
pub fn dispatch(
    model: &dyn ForecastModel,
    id: ModelId,
    series: &PreparedSeries<'_>,
    settings: &DispatchSettings<'_>,
) -> Result<ForecastResultBundle, TaskFailure> {
    let windows = plan(series.values.len(), settings.horizon, settings.backtest)?;
    let started = Instant::now();

    let mut forecasts = Vec::with_capacity(windows.len());
    for window in &windows {
        let forecast = forecast_window(model, series, settings, window)
            .map_err(|failure| failure.at_iteration(window.iteration))?;
        forecasts.push(forecast);
    }

    let execution_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
    debug!(
        series = series.name,
        model = %id,
        windows = forecasts.len(),
        execution_time_ms,
        "Dispatch complete"
    );

    Ok(ForecastResultBundle {
        series_name: series.name.to_string(),
        model: id,
        windows: forecasts,
        execution_time_ms,
    })
}

fn forecast_window(
    model: &dyn ForecastModel,
    series: &PreparedSeries<'_>,
    settings: &DispatchSettings<'_>,
    window: &Window,
) -> Result<WindowForecast, TaskFailure> {
    let regressors = slice_regressors(series.regressors, window);
    let request = ForecastRequest {
        series_name: series.name,
        history: &series.values[window.train()],
        regressors: &regressors,
        horizon: settings.horizon,
        window,
        arguments: settings.arguments,
        worker_hint: settings.worker_hint,
    };

    trace!(
        series = series.name,
        iteration = window.iteration,
        train_len = window.train_len(),
        "Invoking model"
    );

    let forecast = catch_unwind(AssertUnwindSafe(|| model.forecast(&request)))
        .map_err(|payload| TaskFailure::panicked(&panic_message(payload.as_ref())))?
        .map_err(|error| TaskFailure::model(&error))?;

    check_shape(&forecast, settings.horizon)?;

    let actuals = window
        .is_backtest()
        .then(|| series.values.get(window.test()).map(<[f64]>::to_vec))
        .flatten();

    Ok(WindowForecast {
        window: window.clone(),
        forecast: forecast.point,
        lower: forecast.lower,
        upper: forecast.upper,
        actuals,
    })
}

fn slice_regressors(columns: &[RegressorColumn], window: &Window) -> Vec<RegressorWindow> {
    columns
        .iter()
        .map(|column| {
            let len = column.values.len();
            let clamp = |i: usize| i.min(len);
            RegressorWindow {
                name: column.name.clone(),
                history: column.values[clamp(window.train_start)..clamp(window.train_end)].to_vec(),
                future: column.values[clamp(window.test_start)..clamp(window.test_end)].to_vec(),
            }
        })
        .collect()
}

fn check_shape(forecast: &Forecast, horizon: usize) -> Result<(), TaskFailure> {
    let bounds = [("lower", &forecast.lower), ("upper", &forecast.upper)];
    if forecast.point.len() != horizon {
        return Err(TaskFailure::new(
            FailureKind::ModelFailure,
            format!(
                "model returned {} points, expected {horizon}",
                forecast.point.len()
            ),
        ));
    }
    for (label, bound) in bounds {
        let Some(values) = bound else { continue };
        if values.len() != horizon {
            return Err(TaskFailure::new(
                FailureKind::ModelFailure,
                format!(
                    "model returned {} {label} bounds, expected {horizon}",
                    values.len()
                ),
            ));
        }
    }
    Ok(())
}

pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string())
}
