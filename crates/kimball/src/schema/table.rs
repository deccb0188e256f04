//! Table-level analysis records and catalog summaries.

use serde::{Deserialize, Serialize};

use super::column::{ColumnAnalysis, ColumnProfile};

/// Per-table result of the profiling and classification stages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableAnalysis {
    /// Table name.
    pub table: String,
    /// Number of rows, as reported by the column profiles.
    pub row_count: usize,
    /// Analyzed columns in store order. Skipped columns are absent.
    pub columns: Vec<ColumnAnalysis>,
    /// Non-fatal problems (skipped columns).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// Table-level failure marker. When set, `columns` is empty.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Catalog summary of the columns.
    pub summary: TableSummary,
}

impl TableAnalysis {
    /// Build an analysis from its columns.
    pub fn new(table: impl Into<String>, columns: Vec<ColumnAnalysis>) -> Self {
        let row_count = columns
            .iter()
            .map(|c| c.profile.total_rows)
            .max()
            .unwrap_or(0);
        let summary = TableSummary::from_columns(&columns);
        Self {
            table: table.into(),
            row_count,
            columns,
            warnings: Vec::new(),
            error: None,
            summary,
        }
    }

    /// A table whose profiling failed.
    pub fn failed(table: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            row_count: 0,
            columns: Vec::new(),
            warnings: Vec::new(),
            error: Some(error.into()),
            summary: TableSummary::default(),
        }
    }

    /// Attach warnings.
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnAnalysis> {
        self.columns.iter().find(|c| c.name() == name)
    }

    /// Get all column names.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name()).collect()
    }

    pub fn fact_columns(&self) -> impl Iterator<Item = &ColumnAnalysis> {
        self.columns.iter().filter(|c| c.is_fact())
    }

    pub fn dimension_columns(&self) -> impl Iterator<Item = &ColumnAnalysis> {
        self.columns.iter().filter(|c| c.is_dimension())
    }

    /// Profiles of the dimension-classified columns, input to hierarchy building.
    pub fn dimension_profiles(&self) -> Vec<ColumnProfile> {
        self.dimension_columns().map(|c| c.profile.clone()).collect()
    }

    pub fn primary_key_candidates(&self) -> impl Iterator<Item = &ColumnAnalysis> {
        self.columns.iter().filter(|c| c.is_primary_key_candidate())
    }
}

/// Summary of a table's column characteristics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableSummary {
    pub total_columns: usize,
    pub fact_columns: usize,
    pub dimension_columns: usize,
    /// Mean column quality score.
    pub avg_data_quality: f64,
    /// Columns with quality above 0.8.
    pub high_quality_columns: usize,
    pub primary_key_candidates: usize,
    pub columns_with_nulls: usize,
}

impl TableSummary {
    pub fn from_columns(columns: &[ColumnAnalysis]) -> Self {
        let total_columns = columns.len();
        let avg_data_quality = if columns.is_empty() {
            0.0
        } else {
            columns
                .iter()
                .map(|c| c.classification.quality_score)
                .sum::<f64>()
                / total_columns as f64
        };

        Self {
            total_columns,
            fact_columns: columns.iter().filter(|c| c.is_fact()).count(),
            dimension_columns: columns.iter().filter(|c| c.is_dimension()).count(),
            avg_data_quality,
            high_quality_columns: columns
                .iter()
                .filter(|c| c.classification.quality_score > 0.8)
                .count(),
            primary_key_candidates: columns
                .iter()
                .filter(|c| c.is_primary_key_candidate())
                .count(),
            columns_with_nulls: columns.iter().filter(|c| c.profile.null_count > 0).count(),
        }
    }
}

/// Summary of the whole analyzed schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSummary {
    pub total_tables: usize,
    /// Tables carrying an error marker.
    pub failed_tables: usize,
    pub total_columns: usize,
    pub total_fact_columns: usize,
    pub total_dimension_columns: usize,
    pub avg_columns_per_table: f64,
    /// Fact columns per dimension column (0 when there are no dimensions).
    pub fact_dimension_ratio: f64,
}

impl SchemaSummary {
    pub fn from_tables(tables: &[TableAnalysis]) -> Self {
        let total_tables = tables.len();
        let total_columns: usize = tables.iter().map(|t| t.summary.total_columns).sum();
        let total_fact_columns: usize = tables.iter().map(|t| t.summary.fact_columns).sum();
        let total_dimension_columns: usize =
            tables.iter().map(|t| t.summary.dimension_columns).sum();

        Self {
            total_tables,
            failed_tables: tables.iter().filter(|t| !t.is_ok()).count(),
            total_columns,
            total_fact_columns,
            total_dimension_columns,
            avg_columns_per_table: if total_tables > 0 {
                total_columns as f64 / total_tables as f64
            } else {
                0.0
            },
            fact_dimension_ratio: if total_dimension_columns > 0 {
                total_fact_columns as f64 / total_dimension_columns as f64
            } else {
                0.0
            },
        }
    }
}
