//! External regressor columns and their series scoping convention.
//!
//! A column named `<series>__<feature>` belongs to a single series; every
//! other column is shared by all series.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Separator between the series name and the feature name.
pub const SERIES_SEPARATOR: &str = "__";

/// A named regressor column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressorColumn {
    /// Column name, optionally `<series>__<feature>`.
    pub name: String,
    /// Values aligned with the series index. Rows past the end of the series
    /// are future values for the forecast horizon.
    pub values: Vec<f64>,
}

impl RegressorColumn {
    /// Create a column.
    #[must_use]
    pub fn new(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Classify this column against the known series names.
    ///
    /// The longest series name followed by the separator wins, so a series
    /// whose own name contains the separator still owns its columns.
    #[must_use]
    pub fn scope<S: AsRef<str>>(&self, series_names: &[S]) -> RegressorScope<'_> {
        let owner = series_names
            .iter()
            .map(AsRef::as_ref)
            .filter(|series| !series.is_empty())
            .filter_map(|series| {
                let feature = self
                    .name
                    .strip_prefix(series)?
                    .strip_prefix(SERIES_SEPARATOR)?;
                (!feature.is_empty()).then_some((series.len(), feature))
            })
            .max_by_key(|(len, _)| *len);

        match owner {
            Some((len, feature)) => RegressorScope::Series {
                series: self.name.split_at(len).0,
                feature,
            },
            None if self.is_prefixed() => RegressorScope::Unmatched,
            None => RegressorScope::Shared,
        }
    }

    fn is_prefixed(&self) -> bool {
        self.name
            .split_once(SERIES_SEPARATOR)
            .is_some_and(|(series, feature)| !series.is_empty() && !feature.is_empty())
    }
}

/// Visibility of a regressor column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegressorScope<'a> {
    /// Visible to every series.
    Shared,
    /// Visible only to `series`, under the name `feature`.
    Series {
        /// Owning series name.
        series: &'a str,
        /// Feature name with the prefix stripped.
        feature: &'a str,
    },
    /// Prefixed like a series-specific column but owned by no known series.
    Unmatched,
}

/// Counts of shared and series-specific regressors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegressorSummary {
    /// Columns visible to every series.
    pub shared: usize,
    /// Columns scoped to a single series.
    pub series_specific: usize,
}

/// Ordered collection of regressor columns with unique names.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<RegressorColumn>", into = "Vec<RegressorColumn>")]
pub struct RegressorSet {
    columns: Vec<RegressorColumn>,
}

impl RegressorSet {
    /// Validate names and values.
    pub fn new(columns: Vec<RegressorColumn>) -> Result<Self, ValidationError> {
        let mut seen = HashSet::with_capacity(columns.len());

        for (position, column) in columns.iter().enumerate() {
            if column.name.trim().is_empty() {
                return Err(ValidationError::EmptyRegressorName {
                    position: position + 1,
                });
            }
            if !seen.insert(column.name.as_str()) {
                return Err(ValidationError::DuplicateRegressorName {
                    name: column.name.clone(),
                });
            }
            if let Some(row) = column.values.iter().position(|v| !v.is_finite()) {
                return Err(ValidationError::NonFiniteRegressor {
                    name: column.name.clone(),
                    row,
                });
            }
        }

        Ok(Self { columns })
    }

    /// All columns in input order.
    #[must_use]
    pub fn columns(&self) -> &[RegressorColumn] {
        &self.columns
    }

    /// Number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether there are no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Count shared vs series-specific columns. Unmatched prefixed columns
    /// count as series-specific.
    #[must_use]
    pub fn summary<S: AsRef<str>>(&self, series_names: &[S]) -> RegressorSummary {
        self.columns
            .iter()
            .fold(RegressorSummary::default(), |mut acc, c| {
                match c.scope(series_names) {
                    RegressorScope::Shared => acc.shared += 1,
                    RegressorScope::Series { .. } | RegressorScope::Unmatched => {
                        acc.series_specific += 1;
                    }
                }
                acc
            })
    }

    /// Check every column covers at least `series_length` rows.
    pub fn validate_length(&self, series_length: usize) -> Result<(), ValidationError> {
        match self.columns.iter().find(|c| c.values.len() < series_length) {
            Some(short) => Err(ValidationError::RegressorTooShort {
                name: short.name.clone(),
                required: series_length,
                actual: short.values.len(),
            }),
            None => Ok(()),
        }
    }

    /// Series-specific columns whose prefix matches none of `series_names`.
    #[must_use]
    pub fn orphaned<S: AsRef<str>>(&self, series_names: &[S]) -> Vec<&str> {
        self.columns
            .iter()
            .filter(|c| c.scope(series_names) == RegressorScope::Unmatched)
            .map(|c| c.name.as_str())
            .collect()
    }
}

impl TryFrom<Vec<RegressorColumn>> for RegressorSet {
    type Error = ValidationError;

    fn try_from(columns: Vec<RegressorColumn>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<RegressorSet> for Vec<RegressorColumn> {
    fn from(set: RegressorSet) -> Self {
        set.columns
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    const SERIES: [&str; 3] = ["store_a", "store", "store__1"];

    #[test_case("promo", RegressorScope::Shared ; "no separator is shared")]
    #[test_case("store_a__promo", RegressorScope::Series { series: "store_a", feature: "promo" } ; "prefixed is series specific")]
    #[test_case("__promo", RegressorScope::Shared ; "empty series part is shared")]
    #[test_case("store_a__", RegressorScope::Shared ; "empty feature part is shared")]
    #[test_case("store__1__price", RegressorScope::Series { series: "store__1", feature: "price" } ; "longest series name wins")]
    #[test_case("store__price", RegressorScope::Series { series: "store", feature: "price" } ; "shorter series keeps its own columns")]
    #[test_case("store__2__price", RegressorScope::Series { series: "store", feature: "2__price" } ; "feature may contain separator")]
    #[test_case("depot__price", RegressorScope::Unmatched ; "unknown prefix is unmatched")]
    fn test_scope(name: &str, expected: RegressorScope<'static>) {
        let column = RegressorColumn::new(name, vec![1.0]);
        assert_eq!(column.scope(&SERIES), expected);
    }

    #[test]
    fn test_summary_counts() {
        let set = RegressorSet::new(vec![
            RegressorColumn::new("holiday", vec![0.0]),
            RegressorColumn::new("a__promo", vec![1.0]),
            RegressorColumn::new("b__promo", vec![1.0]),
            RegressorColumn::new("c__promo", vec![1.0]),
        ])
        .unwrap();

        assert_eq!(
            set.summary(&["a", "b"]),
            RegressorSummary {
                shared: 1,
                series_specific: 3
            }
        );
    }

    #[test]
    fn test_rejects_duplicates_and_non_finite() {
        let dup = RegressorSet::new(vec![
            RegressorColumn::new("x", vec![1.0]),
            RegressorColumn::new("x", vec![2.0]),
        ]);
        assert!(matches!(
            dup,
            Err(ValidationError::DuplicateRegressorName { .. })
        ));

        let nan = RegressorSet::new(vec![RegressorColumn::new("x", vec![1.0, f64::NAN])]);
        assert_eq!(
            nan,
            Err(ValidationError::NonFiniteRegressor {
                name: "x".to_string(),
                row: 1
            })
        );
    }

    #[test]
    fn test_validate_length() {
        let set = RegressorSet::new(vec![RegressorColumn::new("x", vec![1.0, 2.0])]).unwrap();

        assert!(set.validate_length(2).is_ok());
        assert!(matches!(
            set.validate_length(3),
            Err(ValidationError::RegressorTooShort {
                required: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_orphaned_columns() {
        let set = RegressorSet::new(vec![
            RegressorColumn::new("a__x", vec![1.0]),
            RegressorColumn::new("zz__x", vec![1.0]),
            RegressorColumn::new("shared", vec![1.0]),
        ])
        .unwrap();

        assert_eq!(set.orphaned(&["a", "b"]), vec!["zz__x"]);
        assert_eq!(set.orphaned(&["zz"]), vec!["a__x"]);
    }

    #[test]
    fn test_nested_series_names_are_not_orphaned() {
        let set = RegressorSet::new(vec![
            RegressorColumn::new("store__1__price", vec![1.0]),
            RegressorColumn::new("store__2__price", vec![1.0]),
        ])
        .unwrap();

        assert!(set.orphaned(&["store__1", "store__2"]).is_empty());
        assert_eq!(set.orphaned(&["store__1"]), vec!["store__2__price"]);
    }
}
