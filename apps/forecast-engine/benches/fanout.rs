//! Benchmarks for window planning and the two-phase fan-out.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use forecast_engine::scheduler::available_workers;
use forecast_engine::{
    BacktestSpec, EngineConfig, ForecastEngine, MultiSeries, SamplePolicy, SeriesColumn,
    WindowMethod, plan,
};

fn generate_series(count: usize, length: usize) -> MultiSeries {
    let columns = (0..count)
        .map(|k| {
            let values = (0..length)
                .map(|i| {
                    let t = i as f64;
                    10.0 + 0.05 * t * (k + 1) as f64
                        + (2.0 * std::f64::consts::PI * t / 12.0).sin()
                })
                .collect();
            SeriesColumn::named(format!("series_{k}"), values)
        })
        .collect();
    MultiSeries::new(columns).unwrap_or_else(|e| panic!("valid series: {e}"))
}

fn bench_planner(c: &mut Criterion) {
    let mut group = c.benchmark_group("window_planner");

    for iterations in [1, 12, 52] {
        let spec = BacktestSpec::enabled(iterations, WindowMethod::Rolling, SamplePolicy::Fixed);
        group.bench_with_input(
            BenchmarkId::new("rolling_fixed", iterations),
            &spec,
            |b, spec| b.iter(|| plan(black_box(520), black_box(12), spec)),
        );
    }

    group.finish();
}

fn bench_fanout(c: &mut Criterion) {
    let mut group = c.benchmark_group("fanout");
    group.sample_size(20);

    let series = generate_series(32, 144);
    let engine = ForecastEngine::with_baselines();
    let backtest = BacktestSpec::enabled(6, WindowMethod::Moving, SamplePolicy::Expanding);

    let mut workers = vec![1];
    if available_workers() > 1 {
        workers.push(available_workers());
    }

    for count in workers {
        let config = EngineConfig::new(12, ["naive", "snaive", "mean", "drift"])
            .with_workers(count)
            .with_backtest(backtest);
        group.bench_with_input(BenchmarkId::new("workers", count), &config, |b, config| {
            b.iter(|| engine.run(black_box(&series), None, config));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_planner, bench_fanout);
criterion_main!(benches);
