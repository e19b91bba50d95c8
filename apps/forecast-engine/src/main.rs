//! Forecast Engine Binary
//!
//! Runs one forecast over a JSON input document and prints the result tree
//! as JSON on stdout. Logs go to stderr.
//!
//! # Usage
//!
//! ```bash
//! FORECAST_INPUT=input.json cargo run --bin forecast-engine
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `FORECAST_INPUT`: Path to the input document (`-` reads stdin)
//!
//! ## Optional
//! - `FORECAST_CONFIG`: Path to the YAML config (default: config.yaml)
//! - `FORECAST_WORKERS`: Overrides `engine.worker_count`
//! - `FORECAST_ENV`: `development` for colored logs
//! - `RUST_LOG`: Log filter (default: forecast_engine=info)

use std::io::{Read, Write};

use anyhow::{Context, Result};
use forecast_engine::config::load_config;
use forecast_engine::telemetry::init_tracing;
use forecast_engine::{EngineConfig, ForecastEngine, InputDocument};

/// Default configuration path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn main() -> Result<()> {
    init_tracing().context("Failed to initialize tracing")?;

    tracing::info!("Starting Forecast Engine");

    let config = parse_config()?;
    log_config(&config);

    let input_path =
        std::env::var("FORECAST_INPUT").context("FORECAST_INPUT must name the input document")?;
    let document = read_input(&input_path)?;
    let (series, regressors) = document
        .into_parts()
        .context("Input document failed validation")?;

    let engine = ForecastEngine::with_baselines();
    let tree = engine
        .run(&series, regressors.as_ref(), &config)
        .context("Forecast run failed")?;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &tree).context("Failed to write result")?;
    writeln!(stdout).context("Failed to write result")?;

    Ok(())
}

/// Load the YAML config and apply environment overrides.
fn parse_config() -> Result<EngineConfig> {
    let path =
        std::env::var("FORECAST_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config(Some(&path))
        .with_context(|| format!("Failed to load configuration from {path}"))?;
    config
        .apply_overrides(|name| std::env::var(name).ok())
        .context("Failed to apply environment overrides")?;
    config
        .validate()
        .context("Configuration invalid after overrides")?;
    Ok(config)
}

fn read_input(path: &str) -> Result<InputDocument> {
    let raw = if path == "-" {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read input from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read input {path}"))?
    };
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse input {path}"))
}

fn log_config(config: &EngineConfig) {
    tracing::info!(
        horizon = config.forecast.horizon,
        models = ?config.forecast.models,
        workers = config.engine.worker_count,
        backtest = config.backtest.enabled,
        iterations = config.backtest.effective_iterations(),
        missing_values = %config.forecast.missing_values,
        "Configuration loaded"
    );
}
