//! Per-model argument records.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::contract::ModelError;

/// Argument value that can be numeric, string or boolean.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParamValue {
    /// Integer argument.
    Int(i64),
    /// Floating point argument.
    Float(f64),
    /// String argument.
    String(String),
    /// Boolean argument.
    Bool(bool),
}

impl ParamValue {
    /// Get as integer if applicable.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Float(v) => Some(*v as i64),
            _ => None,
        }
    }

    /// Get as float if applicable.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as bool if applicable.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Get as string.
    #[must_use]
    pub fn as_str(&self) -> String {
        match self {
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::String(v) => v.clone(),
            Self::Bool(v) => v.to_string(),
        }
    }
}

/// Sparse argument record passed through to one model collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelArguments(BTreeMap<String, ParamValue>);

impl ModelArguments {
    /// The empty record, usable in `static` items.
    pub const EMPTY: Self = Self(BTreeMap::new());

    /// Empty record.
    #[must_use]
    pub const fn new() -> Self {
        Self::EMPTY
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: ParamValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Insert or replace an argument.
    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) -> Option<ParamValue> {
        self.0.insert(key.into(), value)
    }

    /// Raw lookup.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    /// Whether no arguments are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate arguments in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParamValue)> {
        self.0.iter()
    }

    /// Positive integer argument with a default.
    ///
    /// Fails with [`ModelError::InvalidArguments`] when present but not a
    /// positive integer.
    pub fn positive_int_or(&self, key: &str, default: usize) -> Result<usize, ModelError> {
        match self.0.get(key) {
            None => Ok(default),
            Some(ParamValue::Int(v)) if *v > 0 => Ok(*v as usize),
            Some(other) => Err(ModelError::InvalidArguments(format!(
                "'{key}' must be a positive integer, got {}",
                other.as_str()
            ))),
        }
    }
}
