//! Missing-value policies applied to a series before windows are sliced.
//!
//! A policy turns raw observations (with `None` or non-finite gaps) into a
//! gap-free series, or refuses. Refusal is recorded against every model of
//! that series; it never aborts the run.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ValidationError;

/// Errors from applying a missing-value policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PreprocessError {
    /// The series has gaps and the policy does not fill them.
    #[error("Series has {count} missing values and policy '{policy}' does not fill gaps")]
    UnfilledGaps {
        /// Number of gaps.
        count: usize,
        /// Policy name.
        policy: &'static str,
    },

    /// Every observation is missing.
    #[error("Series has no observed values")]
    NoObservations,
}

/// Pluggable gap-filling strategy.
pub trait MissingValuePolicy: Send + Sync + fmt::Debug {
    /// Policy name for logs and failure messages.
    fn name(&self) -> &'static str;

    /// Produce a gap-free series of the same length.
    fn apply(&self, values: &[Option<f64>]) -> Result<Vec<f64>, PreprocessError>;
}

/// Refuse series that contain gaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectMissing;

impl MissingValuePolicy for RejectMissing {
    fn name(&self) -> &'static str {
        "none"
    }

    fn apply(&self, values: &[Option<f64>]) -> Result<Vec<f64>, PreprocessError> {
        let observed = observed(values);
        let gaps = observed.iter().filter(|v| v.is_none()).count();
        if gaps > 0 {
            return Err(PreprocessError::UnfilledGaps {
                count: gaps,
                policy: self.name(),
            });
        }
        Ok(observed.into_iter().flatten().collect())
    }
}

/// Linear interpolation between observed neighbours; leading and trailing
/// gaps take the nearest observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolation;

impl MissingValuePolicy for LinearInterpolation {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn apply(&self, values: &[Option<f64>]) -> Result<Vec<f64>, PreprocessError> {
        let observed = observed(values);
        let anchors: Vec<(usize, f64)> = observed
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();

        let (Some(&(first_idx, first)), Some(&(last_idx, last))) = (anchors.first(), anchors.last())
        else {
            return Err(PreprocessError::NoObservations);
        };

        let mut filled = vec![first; observed.len()];
        filled[last_idx..].fill(last);

        for pair in anchors.windows(2) {
            let (left_idx, left) = pair[0];
            let (right_idx, right) = pair[1];
            let span = (right_idx - left_idx) as f64;
            for (offset, slot) in filled[left_idx..=right_idx].iter_mut().enumerate() {
                *slot = left + (right - left) * (offset as f64 / span);
            }
        }

        filled[..first_idx].fill(first);
        Ok(filled)
    }
}

/// Carry the last observation forward; leading gaps take the first observation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ForwardFill;

impl MissingValuePolicy for ForwardFill {
    fn name(&self) -> &'static str {
        "forward_fill"
    }

    fn apply(&self, values: &[Option<f64>]) -> Result<Vec<f64>, PreprocessError> {
        let observed = observed(values);
        let first = observed
            .iter()
            .flatten()
            .copied()
            .next()
            .ok_or(PreprocessError::NoObservations)?;

        let mut last = first;
        Ok(observed
            .into_iter()
            .map(|v| {
                if let Some(v) = v {
                    last = v;
                }
                last
            })
            .collect())
    }
}

/// Configurable selection of the built-in policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingValueMethod {
    /// [`RejectMissing`].
    None,
    /// [`LinearInterpolation`].
    #[default]
    Linear,
    /// [`ForwardFill`].
    ForwardFill,
}

impl MissingValueMethod {
    /// Instantiate the policy.
    #[must_use]
    pub fn policy(self) -> Arc<dyn MissingValuePolicy> {
        match self {
            Self::None => Arc::new(RejectMissing),
            Self::Linear => Arc::new(LinearInterpolation),
            Self::ForwardFill => Arc::new(ForwardFill),
        }
    }
}

impl FromStr for MissingValueMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "linear" => Ok(Self::Linear),
            "forward_fill" | "ffill" => Ok(Self::ForwardFill),
            other => Err(ValidationError::UnknownMissingPolicy {
                name: other.to_string(),
            }),
        }
    }
}

/// Treat non-finite observations as gaps.
fn observed(values: &[Option<f64>]) -> Vec<Option<f64>> {
    values
        .iter()
        .map(|v| v.filter(|x| x.is_finite()))
        .collect()
}
