//! Bronze tables and their file provenance.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// Where a bronze table was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without directory.
    pub file: String,
    pub path: PathBuf,
    /// `sha256:<hex>` digest of the raw file bytes.
    pub hash: String,
    pub size_bytes: u64,
    /// Detected format (`csv`, `tsv`, `psv`, ...).
    pub format: String,
    /// Data rows, header excluded.
    pub row_count: usize,
    pub column_count: usize,
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: impl Into<String>,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format: format.into(),
            row_count,
            column_count,
            loaded_at: Utc::now(),
        }
    }
}

/// An untyped, string-only table.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row-major cell values, each row exactly `headers.len()` wide.
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Build a table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Convenience constructor from string slices.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|v| v.to_string()).collect())
                .collect(),
        )
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of a column, in row order.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }

    pub fn get(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col).map(String::as_str))
    }

    /// Number of null cells in a column.
    pub fn null_count(&self, index: usize) -> usize {
        self.column_values(index)
            .filter(|v| Self::is_null_value(v))
            .count()
    }

    /// Distinct non-null values in first-seen order.
    pub fn distinct_ordered(&self, index: usize) -> IndexSet<&str> {
        self.column_values(index)
            .filter(|v| !Self::is_null_value(v))
            .collect()
    }

    /// Full set of distinct non-null values.
    pub fn distinct_set(&self, index: usize) -> HashSet<String> {
        self.column_values(index)
            .filter(|v| !Self::is_null_value(v))
            .map(str::to_string)
            .collect()
    }

    /// Whether a raw value stands for a missing value.
    pub fn is_null_value(value: &str) -> bool {
        let trimmed = value.trim();
        trimmed.is_empty()
            || trimmed == "."
            || trimmed == "-"
            || ["na", "n/a", "null", "none", "nil"]
                .iter()
                .any(|token| trimmed.eq_ignore_ascii_case(token))
    }
}
