//! Store abstraction the engine profiles, and the bundled bronze store.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::parser::{Parser, ParserConfig};
use super::source::{DataTable, SourceMetadata};
use crate::error::{KimballError, Result};
use crate::schema::{ColumnInfo, ColumnProfile};

/// Declared type of every bronze column.
pub const BRONZE_TYPE: &str = "String";

/// File extensions loaded by [`BronzeStore::from_dir`].
const BRONZE_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// Read access to tabular statistics.
///
/// Calls may be slow (full scans for distinct values); implementations must
/// be shareable across threads.
pub trait ProfileStore: Send + Sync {
    /// Table names in a stable order.
    fn list_tables(&self) -> Result<Vec<String>>;

    /// Columns of a table with their declared types.
    fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>>;

    /// Statistics and a bounded sample for one column.
    fn column_profile(&self, table: &str, column: &str) -> Result<ColumnProfile>;

    /// Every distinct non-null value of a column.
    fn distinct_values(&self, table: &str, column: &str) -> Result<HashSet<String>>;
}

/// Configuration for [`BronzeStore`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Distinct values kept in each profile's sample.
    pub sample_limit: usize,
    /// Parser settings used when loading files.
    pub parser: ParserConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            sample_limit: 10,
            parser: ParserConfig::default(),
        }
    }
}

/// In-memory bronze layer: ordered tables of untyped strings.
#[derive(Debug, Default)]
pub struct BronzeStore {
    tables: IndexMap<String, DataTable>,
    sources: IndexMap<String, SourceMetadata>,
    config: StoreConfig,
}

impl BronzeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Load every delimited file in a directory, one table per file stem.
    ///
    /// Files that fail to parse are skipped with a warning.
    pub fn from_dir(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|source| KimballError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut paths: Vec<_> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| {
                            BRONZE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str())
                        })
            })
            .collect();
        paths.sort();

        let parser = Parser::with_config(config.parser.clone());
        let mut store = Self::with_config(config);

        for path in paths {
            let Some(name) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
                continue;
            };
            match parser.parse_file(&path) {
                Ok((table, source)) => {
                    store.sources.insert(name.clone(), source);
                    store.insert_table(name, table);
                }
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable file"),
            }
        }

        debug!(dir = %dir.display(), tables = store.len(), "loaded bronze store");
        Ok(store)
    }

    /// Add or replace a table.
    pub fn insert_table(&mut self, name: impl Into<String>, table: DataTable) {
        self.tables.insert(name.into(), table);
    }

    pub fn table(&self, name: &str) -> Option<&DataTable> {
        self.tables.get(name)
    }

    /// Provenance of a file-backed table.
    pub fn source(&self, name: &str) -> Option<&SourceMetadata> {
        self.sources.get(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    fn lookup(&self, table: &str, column: &str) -> Result<(&DataTable, usize)> {
        let data = self
            .tables
            .get(table)
            .ok_or_else(|| KimballError::TableNotFound(table.to_string()))?;
        let index = data
            .column_index(column)
            .ok_or_else(|| KimballError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })?;
        Ok((data, index))
    }
}

impl ProfileStore for BronzeStore {
    fn list_tables(&self) -> Result<Vec<String>> {
        Ok(self.tables.keys().cloned().collect())
    }

    fn list_columns(&self, table: &str) -> Result<Vec<ColumnInfo>> {
        let data = self
            .tables
            .get(table)
            .ok_or_else(|| KimballError::TableNotFound(table.to_string()))?;
        Ok(data
            .headers
            .iter()
            .map(|h| ColumnInfo::new(h.clone(), BRONZE_TYPE))
            .collect())
    }

    fn column_profile(&self, table: &str, column: &str) -> Result<ColumnProfile> {
        let (data, index) = self.lookup(table, column)?;
        let distinct = data.distinct_ordered(index);

        Ok(ColumnProfile::new(
            table,
            column,
            BRONZE_TYPE,
            distinct.len(),
            data.null_count(index),
            data.row_count(),
        )
        .with_samples(distinct.into_iter().take(self.config.sample_limit)))
    }

    fn distinct_values(&self, table: &str, column: &str) -> Result<HashSet<String>> {
        let (data, index) = self.lookup(table, column)?;
        Ok(data.distinct_set(index))
    }
}
