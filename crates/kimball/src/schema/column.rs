//! Column-level profiles and analysis records.

use serde::{Deserialize, Serialize};

use crate::classification::ClassificationResult;
use crate::inference::TypeInferenceResult;

use super::types::{Classification, ColumnType};

/// A column as listed by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name.
    pub name: String,
    /// Declared type in the store (always `String` in the bronze layer).
    pub raw_type: String,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, raw_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw_type: raw_type.into(),
        }
    }
}

/// Statistics for one column, as produced by the store.
///
/// Read-only input to a single analysis pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnProfile {
    /// Owning table.
    pub table: String,
    /// Column name.
    pub column: String,
    /// Declared type in the store.
    pub raw_type: String,
    /// Number of distinct non-null values.
    pub cardinality: usize,
    /// Number of null/missing values.
    pub null_count: usize,
    /// Number of rows in the table.
    pub total_rows: usize,
    /// Bounded sample of distinct values.
    #[serde(default)]
    pub sample_values: Vec<String>,
}

impl ColumnProfile {
    /// Create a profile with no samples.
    pub fn new(
        table: impl Into<String>,
        column: impl Into<String>,
        raw_type: impl Into<String>,
        cardinality: usize,
        null_count: usize,
        total_rows: usize,
    ) -> Self {
        Self {
            table: table.into(),
            column: column.into(),
            raw_type: raw_type.into(),
            cardinality,
            null_count,
            total_rows,
            sample_values: Vec::new(),
        }
    }

    /// Attach sample values.
    pub fn with_samples<I, S>(mut self, samples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sample_values = samples.into_iter().map(Into::into).collect();
        self
    }

    /// Distinct values per row (0 for an empty table).
    pub fn cardinality_ratio(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            self.cardinality as f64 / self.total_rows as f64
        }
    }

    /// Get the null percentage.
    pub fn null_percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.null_count as f64 / self.total_rows as f64) * 100.0
        }
    }
}

/// Everything the engine derived for one column in an analysis pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnAnalysis {
    /// Store statistics the analysis was based on.
    pub profile: ColumnProfile,
    /// Column type after numeric refinement.
    pub column_type: ColumnType,
    /// Type inference result.
    pub inference: TypeInferenceResult,
    /// Fact/dimension classification.
    pub classification: ClassificationResult,
}

impl ColumnAnalysis {
    /// Column name.
    pub fn name(&self) -> &str {
        &self.profile.column
    }

    pub fn is_fact(&self) -> bool {
        self.classification.classification == Classification::Fact
    }

    pub fn is_dimension(&self) -> bool {
        self.classification.classification == Classification::Dimension
    }

    pub fn is_primary_key_candidate(&self) -> bool {
        self.classification.is_primary_key_candidate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cardinality_ratio() {
        let profile = ColumnProfile::new("orders", "status", "String", 5, 0, 100);
        assert!((profile.cardinality_ratio() - 0.05).abs() < 1e-9);

        let empty = ColumnProfile::new("orders", "status", "String", 0, 0, 0);
        assert_eq!(empty.cardinality_ratio(), 0.0);
        assert_eq!(empty.null_percentage(), 0.0);
    }

    #[test]
    fn test_with_samples() {
        let profile = ColumnProfile::new("t", "c", "String", 2, 1, 3).with_samples(["a", "b"]);
        assert_eq!(profile.sample_values, vec!["a", "b"]);
        assert!((profile.null_percentage() - 33.333).abs() < 0.01);
    }
}
