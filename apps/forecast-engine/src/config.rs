//! Configuration module for the forecast engine.
//!
//! Loads the run configuration from YAML with environment variable
//! interpolation, applies environment overrides and validates it.
//!
//! # Usage
//!
//! ```rust,ignore
//! use forecast_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//!
//! println!("horizon: {}", config.forecast.horizon);
//! ```

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::MissingValueMethod;
use crate::error::ValidationError;
use crate::models::{ModelArguments, ModelId, resolve_names};
use crate::scheduler::SchedulerConfig;
use crate::windows::BacktestSpec;

/// Environment variable overriding `engine.worker_count`.
pub const WORKERS_ENV: &str = "FORECAST_WORKERS";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("Failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("Config validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// An environment override could not be parsed.
    #[error("Invalid value '{value}' for environment variable {name}")]
    InvalidOverride {
        /// Variable name.
        name: &'static str,
        /// Raw value.
        value: String,
    },
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Worker pool settings.
    #[serde(default)]
    pub engine: SchedulerConfig,

    /// Forecast request.
    pub forecast: ForecastConfig,

    /// Backtest settings.
    #[serde(default)]
    pub backtest: BacktestSpec,
}

/// What to forecast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastConfig {
    /// Number of periods to forecast.
    pub horizon: usize,

    /// Requested model names.
    pub models: Vec<String>,

    /// Per-model argument records keyed by model name.
    #[serde(default)]
    pub model_arguments: BTreeMap<String, ModelArguments>,

    /// Missing-value policy name: `none`, `linear` or `forward_fill`.
    #[serde(default = "default_missing_values")]
    pub missing_values: String,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon: 1,
            models: Vec::new(),
            model_arguments: BTreeMap::new(),
            missing_values: default_missing_values(),
        }
    }
}

fn default_missing_values() -> String {
    "linear".to_string()
}

impl EngineConfig {
    /// Configuration for `models` at `horizon` with defaults elsewhere.
    #[must_use]
    pub fn new<S: Into<String>>(horizon: usize, models: impl IntoIterator<Item = S>) -> Self {
        Self {
            forecast: ForecastConfig {
                horizon,
                models: models.into_iter().map(Into::into).collect(),
                ..ForecastConfig::default()
            },
            ..Self::default()
        }
    }

    /// Builder-style worker count.
    #[must_use]
    pub const fn with_workers(mut self, worker_count: usize) -> Self {
        self.engine.worker_count = worker_count;
        self
    }

    /// Builder-style backtest settings.
    #[must_use]
    pub const fn with_backtest(mut self, backtest: BacktestSpec) -> Self {
        self.backtest = backtest;
        self
    }

    /// Builder-style arguments for one model.
    #[must_use]
    pub fn with_arguments(mut self, model: impl Into<String>, arguments: ModelArguments) -> Self {
        self.forecast.model_arguments.insert(model.into(), arguments);
        self
    }

    /// Builder-style missing-value policy.
    #[must_use]
    pub fn with_missing_values(mut self, method: impl Into<String>) -> Self {
        self.forecast.missing_values = method.into();
        self
    }

    /// Check every field that does not depend on the input data.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.engine.worker_count == 0 {
            return Err(ValidationError::InvalidWorkerCount);
        }
        if self.forecast.horizon == 0 {
            return Err(ValidationError::InvalidHorizon);
        }
        if self.backtest.enabled && self.backtest.iterations == 0 {
            return Err(ValidationError::InvalidIterations);
        }
        self.model_arguments()?;
        self.missing_value_method()?;
        Ok(())
    }

    /// Requested models, resolved and de-duplicated.
    pub fn models(&self) -> Result<Vec<ModelId>, ValidationError> {
        resolve_names(&self.forecast.models)
    }

    /// Argument records keyed by resolved model.
    ///
    /// Every key must name a requested model.
    pub fn model_arguments(&self) -> Result<BTreeMap<ModelId, ModelArguments>, ValidationError> {
        let requested = self.models()?;
        self.forecast
            .model_arguments
            .iter()
            .map(|(name, arguments)| {
                let id: ModelId = name.parse()?;
                if !requested.contains(&id) {
                    return Err(ValidationError::ArgumentsForUnrequestedModel {
                        name: name.clone(),
                    });
                }
                Ok((id, arguments.clone()))
            })
            .collect()
    }

    /// Parsed missing-value policy.
    pub fn missing_value_method(&self) -> Result<MissingValueMethod, ValidationError> {
        self.forecast.missing_values.parse()
    }

    /// Apply environment overrides read through `lookup`.
    ///
    /// Currently only [`WORKERS_ENV`].
    pub fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        let Some(raw) = lookup(WORKERS_ENV) else {
            return Ok(());
        };
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(());
        }
        self.engine.worker_count = raw.parse().map_err(|_| ConfigError::InvalidOverride {
            name: WORKERS_ENV,
            value: raw.to_string(),
        })?;
        Ok(())
    }
}

// ============================================
// Configuration Loading
// ============================================

/// Load configuration from a YAML file with environment variable interpolation.
///
/// # Arguments
///
/// * `path` - Optional path to the config file. Defaults to "config.yaml".
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or("config.yaml");

    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_string(),
        source: e,
    })?;

    load_config_from_string(&contents)
}

/// Load configuration from a YAML string (useful for testing).
pub fn load_config_from_string(yaml: &str) -> Result<EngineConfig, ConfigError> {
    let interpolated = interpolate_env_vars(yaml);
    let mut config: EngineConfig = serde_yaml_bw::from_str(&interpolated)?;
    config.backtest = config.backtest.normalized();
    config.validate()?;
    Ok(config)
}

/// Interpolate environment variables in a string.
///
/// Supports both `${VAR}` and `${VAR:-default}` syntax.
fn interpolate_env_vars(input: &str) -> String {
    interpolate_with(input, |name| std::env::var(name).ok())
}

#[allow(clippy::expect_used)] // Regex is compile-time constant; expect() is safe here
fn interpolate_with(input: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    static ENV_VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

    let re = ENV_VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}")
            .expect("env var regex is valid")
    });

    re.replace_all(input, |cap: &regex::Captures<'_>| {
        let default_value = cap.get(2).map_or("", |m| m.as_str());
        match lookup(&cap[1]) {
            Some(v) if !v.is_empty() => v,
            _ => default_value.to_string(),
        }
    })
    .into_owned()
}
