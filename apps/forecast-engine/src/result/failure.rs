//! Failure markers recorded in the result tree.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::PreprocessError;
use crate::models::ModelError;
use crate::windows::PlanError;

/// Category of a recorded per-cell failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The series is too short for the requested windows.
    InsufficientHistory,
    /// The collaborator returned an error, panicked, or produced malformed output.
    ModelFailure,
    /// The missing-value policy refused the series.
    Preprocessing,
    /// No result arrived for a requested (series, model) pair.
    Missing,
}

impl FailureKind {
    /// Stable snake_case label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InsufficientHistory => "insufficient_history",
            Self::ModelFailure => "model_failure",
            Self::Preprocessing => "preprocessing",
            Self::Missing => "missing",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failure isolated to one (series, model) cell.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{kind}: {message}")]
pub struct TaskFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable detail.
    pub message: String,
    /// Backtest iteration that failed, when the failure is window-specific.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration: Option<usize>,
}

impl TaskFailure {
    /// Create a failure.
    #[must_use]
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            iteration: None,
        }
    }

    /// Attach the failing iteration.
    #[must_use]
    pub const fn at_iteration(mut self, iteration: usize) -> Self {
        self.iteration = Some(iteration);
        self
    }

    /// Collaborator error.
    #[must_use]
    pub fn model(error: &ModelError) -> Self {
        Self::new(FailureKind::ModelFailure, error.to_string())
    }

    /// Collaborator panic.
    #[must_use]
    pub fn panicked(message: &str) -> Self {
        Self::new(
            FailureKind::ModelFailure,
            format!("model panicked: {message}"),
        )
    }

    /// Missing-value policy panic.
    #[must_use]
    pub fn preprocessing_panicked(policy: &str, message: &str) -> Self {
        Self::new(
            FailureKind::Preprocessing,
            format!("missing-value policy '{policy}' panicked: {message}"),
        )
    }

    /// No result was produced for a requested pair.
    #[must_use]
    pub fn missing() -> Self {
        Self::new(FailureKind::Missing, "no result was produced for this model")
    }
}

impl From<PlanError> for TaskFailure {
    fn from(error: PlanError) -> Self {
        Self::new(FailureKind::InsufficientHistory, error.to_string())
    }
}

impl From<PreprocessError> for TaskFailure {
    fn from(error: PreprocessError) -> Self {
        Self::new(FailureKind::Preprocessing, error.to_string())
    }
}
