//! Integration Tests for Forecast Runs
//!
//! Exercises the full flow from input containers → engine → result tree
//! using the bundled baseline collaborators and recording test doubles.

// Allow unwrap in tests - tests should panic on unexpected errors
#![allow(clippy::unwrap_used)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use forecast_engine::{
    BacktestSpec, BacktestSpecBuilder, EngineConfig, Forecast, ForecastEngine, ForecastModel,
    ForecastRequest, InputDocument, ModelError, ModelId, ModelOutcome, ModelRegistry,
    MultiSeries, RegressorColumn, RegressorSet, SamplePolicy, SeriesColumn, WindowMethod,
};

// =============================================================================
// Helpers
// =============================================================================

fn seasonal(length: usize, level: f64) -> Vec<f64> {
    (0..length)
        .map(|i| level + (i % 12) as f64 + 0.1 * i as f64)
        .collect()
}

/// Records the regressors each series sees, with their first future value.
#[derive(Default)]
struct RegressorRecorder {
    seen: Mutex<BTreeMap<String, Vec<(String, Option<f64>)>>>,
}

impl ForecastModel for RegressorRecorder {
    fn forecast(&self, request: &ForecastRequest<'_>) -> Result<Forecast, ModelError> {
        let regressors = request
            .regressors
            .iter()
            .map(|r| (r.name.clone(), r.future.first().copied()))
            .collect();
        self.seen
            .lock()
            .unwrap()
            .insert(request.series_name.to_string(), regressors);
        Ok(Forecast::point(vec![0.0; request.horizon]))
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_single_series_future_forecast() {
    let series = MultiSeries::single("monthly", seasonal(144, 100.0)).unwrap();
    let config = EngineConfig::new(12, ["naive", "drift"]);

    let tree = ForecastEngine::with_baselines()
        .run(&series, None, &config)
        .unwrap();

    assert_eq!(tree.series_names().collect::<Vec<_>>(), vec!["monthly"]);
    for model in [ModelId::Naive, ModelId::Drift] {
        let Some(ModelOutcome::Success(bundle)) = tree.get("monthly", model) else {
            panic!("expected success for {model}");
        };
        assert_eq!(bundle.len(), 1);
        let Some(future) = bundle.future_forecast() else {
            panic!("expected a future window for {model}");
        };
        assert_eq!(future.forecast.len(), 12);
        assert_eq!(future.window.train(), 0..144);
        assert_eq!(future.window.test(), 144..156);
        assert!(future.actuals.is_none());
    }
}

#[test]
fn test_rolling_expanding_backtest_for_two_series() {
    let series = MultiSeries::new(vec![
        SeriesColumn::named("north", seasonal(48, 10.0)),
        SeriesColumn::named("south", seasonal(48, 20.0)),
    ])
    .unwrap();
    let backtest = BacktestSpecBuilder::new()
        .iterations(6)
        .window_method(WindowMethod::Rolling)
        .sample_policy(SamplePolicy::Expanding)
        .build();
    let config = EngineConfig::new(6, ["mean", "naive"]).with_backtest(backtest);

    let tree = ForecastEngine::with_baselines()
        .run(&series, None, &config)
        .unwrap();

    assert_eq!(tree.summary().cells, 4);
    assert_eq!(tree.summary().failed, 0);

    for (_, _, outcome) in tree.cells() {
        let Some(bundle) = outcome.bundle() else {
            panic!("expected success");
        };
        assert_eq!(bundle.len(), 6);

        let windows: Vec<_> = bundle.backtests().map(|w| &w.window).collect();
        for (k, window) in windows.iter().enumerate() {
            assert_eq!(window.iteration, k + 1);
            assert_eq!(window.train_start, 0);
            assert_eq!(window.train_end, window.test_start);
            assert_eq!(window.test_len(), 6);
            assert_eq!(window.test_start, 37 + k);
        }
        assert_eq!(windows.last().map(|w| w.test_end), Some(48));

        for forecast in bundle.backtests() {
            assert_eq!(forecast.forecast.len(), 6);
            assert_eq!(forecast.actuals.as_ref().map(Vec::len), Some(6));
        }
    }
}

#[test]
fn test_result_shape_is_series_by_models() {
    let columns = (0..5)
        .map(|k| SeriesColumn::named(format!("s{k}"), seasonal(30, f64::from(k))))
        .collect();
    let series = MultiSeries::new(columns).unwrap();
    let config = EngineConfig::new(3, ["naive", "snaive", "mean", "drift"])
        .with_workers(std::thread::available_parallelism().map_or(1, |n| n.get().min(4)));

    let tree = ForecastEngine::with_baselines()
        .run(&series, None, &config)
        .unwrap();

    assert_eq!(tree.series().len(), 5);
    for results in tree.series().values() {
        assert_eq!(
            results.keys().copied().collect::<Vec<_>>(),
            vec![ModelId::Naive, ModelId::Snaive, ModelId::Mean, ModelId::Drift]
        );
        assert!(results.values().all(ModelOutcome::is_success));
    }
    assert_eq!(tree.summary().cells, 20);
}

#[test]
fn test_regressors_are_scoped_per_series() {
    let series = MultiSeries::new(vec![
        SeriesColumn::named("a", seasonal(24, 1.0)),
        SeriesColumn::named("b", seasonal(24, 2.0)),
    ])
    .unwrap();
    let regressors = RegressorSet::new(vec![
        RegressorColumn::new("promo", vec![1.0; 28]),
        RegressorColumn::new("a__price", vec![5.0; 28]),
        RegressorColumn::new("b__price", vec![7.0; 28]),
        RegressorColumn::new("a__promo", vec![9.0; 28]),
    ])
    .unwrap();

    let recorder = Arc::new(RegressorRecorder::default());
    let registry = ModelRegistry::new().register(ModelId::Arima, recorder.clone());
    let config = EngineConfig::new(4, ["arima"]);

    let tree = ForecastEngine::new(registry)
        .run(&series, Some(&regressors), &config)
        .unwrap();
    assert_eq!(tree.summary().succeeded, 2);

    let seen = recorder.seen.lock().unwrap();
    assert_eq!(
        seen["a"],
        vec![
            ("promo".to_string(), Some(9.0)),
            ("price".to_string(), Some(5.0))
        ]
    );
    assert_eq!(
        seen["b"],
        vec![
            ("promo".to_string(), Some(1.0)),
            ("price".to_string(), Some(7.0))
        ]
    );
}

#[test]
fn test_insufficient_history_is_recorded() {
    let series = MultiSeries::new(vec![
        SeriesColumn::named("long", seasonal(40, 1.0)),
        SeriesColumn::with_gaps(
            "sparse",
            (0..40)
                .map(|i| (i >= 35).then_some(f64::from(i)))
                .collect(),
        ),
    ])
    .unwrap();
    let config = EngineConfig::new(6, ["naive"])
        .with_backtest(BacktestSpec::enabled(
            4,
            WindowMethod::Moving,
            SamplePolicy::Fixed,
        ))
        .with_missing_values("none");

    let tree = ForecastEngine::with_baselines()
        .run(&series, None, &config)
        .unwrap();

    assert!(tree.get("long", ModelId::Naive).is_some_and(ModelOutcome::is_success));
    let failure = tree
        .get("sparse", ModelId::Naive)
        .and_then(ModelOutcome::failure)
        .unwrap();
    assert_eq!(failure.kind, forecast_engine::FailureKind::Preprocessing);

    let short = MultiSeries::single("short", seasonal(20, 1.0)).unwrap();
    let tree = ForecastEngine::with_baselines()
        .run(&short, None, &config)
        .unwrap();
    let failure = tree
        .get("short", ModelId::Naive)
        .and_then(ModelOutcome::failure)
        .unwrap();
    assert_eq!(
        failure.kind,
        forecast_engine::FailureKind::InsufficientHistory
    );
}

#[test]
fn test_input_document_round_trip() {
    let json = r#"{
        "series": [
            {"name": "store_a", "values": [1, 2, 3, 4, 5, 6, 7, 8]},
            {"values": [8, 7, 6, null, 4, 3, 2, 1]}
        ],
        "regressors": [
            {"name": "holiday", "values": [0, 0, 1, 0, 0, 0, 1, 0, 0, 1]}
        ]
    }"#;
    let document: InputDocument = serde_json::from_str(json).unwrap();
    let (series, regressors) = document.into_parts().unwrap();
    let config = EngineConfig::new(2, ["naive"]);

    let tree = ForecastEngine::with_baselines()
        .run(&series, regressors.as_ref(), &config)
        .unwrap();

    let value = serde_json::to_value(&tree).unwrap();
    assert_eq!(value["type"], "forecast_engine_result");
    assert_eq!(value["series"]["store_a"]["naive"]["status"], "success");
    assert_eq!(value["series"]["time_series_2"]["naive"]["status"], "success");
    assert_eq!(
        value["series"]["time_series_2"]["naive"]["windows"][0]["forecast"],
        serde_json::json!([1.0, 1.0])
    );
    assert!(value["run_id"].is_string());
    assert!(value["generated_at"].is_string());
}
