//! Named univariate series and the multi-series container.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Prefix used for series that arrive without a name.
pub const DEFAULT_SERIES_PREFIX: &str = "time_series_";

/// A raw input column, possibly unnamed and possibly containing gaps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesColumn {
    /// Display name; `None` or empty gets an auto-generated name.
    #[serde(default)]
    pub name: Option<String>,
    /// Observations in time order. `None` marks a gap.
    pub values: Vec<Option<f64>>,
}

impl SeriesColumn {
    /// A named column without gaps.
    #[must_use]
    pub fn named(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: Some(name.into()),
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// An unnamed column without gaps.
    #[must_use]
    pub fn unnamed(values: Vec<f64>) -> Self {
        Self {
            name: None,
            values: values.into_iter().map(Some).collect(),
        }
    }

    /// A named column that may contain gaps.
    #[must_use]
    pub fn with_gaps(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self {
            name: Some(name.into()),
            values,
        }
    }
}

/// A validated, named univariate series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    values: Vec<Option<f64>>,
}

impl Series {
    /// Series name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Observations, `None` marking gaps.
    #[must_use]
    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Number of observations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the series has no observations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of gaps (missing or non-finite observations).
    #[must_use]
    pub fn gap_count(&self) -> usize {
        self.values
            .iter()
            .filter(|v| !v.is_some_and(f64::is_finite))
            .count()
    }
}

/// Ordered collection of equal-length named series.
///
/// Invariants: at least one column, every column non-empty and of equal
/// length, names unique and non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<SeriesColumn>", into = "Vec<SeriesColumn>")]
pub struct MultiSeries {
    columns: Vec<Series>,
}

impl MultiSeries {
    /// Validate raw columns and assign default names.
    ///
    /// Unnamed columns are called `time_series_<k>` where `k` is the 1-based
    /// column ordinal.
    pub fn new(columns: Vec<SeriesColumn>) -> Result<Self, ValidationError> {
        if columns.is_empty() {
            return Err(ValidationError::NoSeries);
        }

        let expected = columns[0].values.len();
        let mut seen = HashSet::with_capacity(columns.len());
        let mut validated = Vec::with_capacity(columns.len());

        for (position, column) in columns.into_iter().enumerate() {
            let name = match column.name {
                Some(name) if !name.trim().is_empty() => name,
                _ => format!("{DEFAULT_SERIES_PREFIX}{}", position + 1),
            };

            if column.values.is_empty() {
                return Err(ValidationError::EmptySeries { name });
            }
            if column.values.len() != expected {
                return Err(ValidationError::LengthMismatch {
                    name,
                    expected,
                    actual: column.values.len(),
                });
            }
            if !seen.insert(name.clone()) {
                return Err(ValidationError::DuplicateSeriesName { name });
            }

            validated.push(Series {
                name,
                values: column.values,
            });
        }

        Ok(Self { columns: validated })
    }

    /// Convenience constructor for a single named series without gaps.
    pub fn single(name: impl Into<String>, values: Vec<f64>) -> Result<Self, ValidationError> {
        Self::new(vec![SeriesColumn::named(name, values)])
    }

    /// Number of series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Always false for a validated container; provided for API symmetry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Common length of every series.
    #[must_use]
    pub fn series_length(&self) -> usize {
        self.columns.first().map_or(0, Series::len)
    }

    /// All series in input order.
    #[must_use]
    pub fn columns(&self) -> &[Series] {
        &self.columns
    }

    /// Series names in input order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.columns.iter().map(Series::name).collect()
    }

    /// Series by 1-based ordinal.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Series> {
        index.checked_sub(1).and_then(|i| self.columns.get(i))
    }
}

impl TryFrom<Vec<SeriesColumn>> for MultiSeries {
    type Error = ValidationError;

    fn try_from(columns: Vec<SeriesColumn>) -> Result<Self, Self::Error> {
        Self::new(columns)
    }
}

impl From<MultiSeries> for Vec<SeriesColumn> {
    fn from(series: MultiSeries) -> Self {
        series
            .columns
            .into_iter()
            .map(|s| SeriesColumn {
                name: Some(s.name),
                values: s.values,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names_use_ordinal() {
        let series = MultiSeries::new(vec![
            SeriesColumn::unnamed(vec![1.0, 2.0]),
            SeriesColumn::named("sales", vec![3.0, 4.0]),
            SeriesColumn {
                name: Some(String::new()),
                values: vec![Some(5.0), Some(6.0)],
            },
        ])
        .unwrap();

        assert_eq!(
            series.names(),
            vec!["time_series_1", "sales", "time_series_3"]
        );
        assert_eq!(series.series_length(), 2);
    }

    #[test]
    fn test_rejects_empty_container() {
        assert_eq!(MultiSeries::new(vec![]), Err(ValidationError::NoSeries));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let result = MultiSeries::new(vec![
            SeriesColumn::named("a", vec![1.0, 2.0, 3.0]),
            SeriesColumn::named("b", vec![1.0, 2.0]),
        ]);

        assert!(matches!(
            result,
            Err(ValidationError::LengthMismatch {
                expected: 3,
                actual: 2,
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let result = MultiSeries::new(vec![
            SeriesColumn::named("time_series_2", vec![1.0]),
            SeriesColumn::unnamed(vec![2.0]),
        ]);

        assert_eq!(
            result,
            Err(ValidationError::DuplicateSeriesName {
                name: "time_series_2".to_string()
            })
        );
    }

    #[test]
    fn test_rejects_empty_series() {
        let result = MultiSeries::new(vec![SeriesColumn::named("a", vec![])]);
        assert!(matches!(result, Err(ValidationError::EmptySeries { .. })));
    }

    #[test]
    fn test_get_is_one_based() {
        let series = MultiSeries::new(vec![
            SeriesColumn::named("a", vec![1.0]),
            SeriesColumn::named("b", vec![2.0]),
        ])
        .unwrap();

        assert!(series.get(0).is_none());
        assert_eq!(series.get(1).map(Series::name), Some("a"));
        assert_eq!(series.get(2).map(Series::name), Some("b"));
        assert!(series.get(3).is_none());
    }

    #[test]
    fn test_gap_count_includes_non_finite() {
        let series = MultiSeries::new(vec![SeriesColumn::with_gaps(
            "a",
            vec![Some(1.0), None, Some(f64::NAN), Some(4.0)],
        )])
        .unwrap();

        assert_eq!(series.columns()[0].gap_count(), 2);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[{"values": [1.0, null, 3.0]}, {"name": "b", "values": [1.0, 2.0, 3.0]}]"#;
        let series: MultiSeries = serde_json::from_str(json).unwrap();
        assert_eq!(series.names(), vec!["time_series_1", "b"]);

        let bad = r#"[{"name": "a", "values": [1.0]}, {"name": "a", "values": [2.0]}]"#;
        assert!(serde_json::from_str::<MultiSeries>(bad).is_err());
    }
}
