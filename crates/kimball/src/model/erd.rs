//! Entity-relationship metadata derived from an analysis pass.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::RecommenderConfig;
use crate::classification::names::{
    has_key_marker, has_measure_marker, is_dimension_table_name, is_numeric_attribute_name,
};
use crate::relationship::Relationship;
use crate::schema::{ColumnType, TableAnalysis, TableType};

/// Table-level ERD entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErdTable {
    pub table: String,
    pub table_type: TableType,
    /// Measure columns, in source order.
    pub fact_columns: Vec<String>,
    /// Every other column, in source order.
    pub dimension_columns: Vec<String>,
    pub primary_key_candidates: Vec<String>,
    pub row_count: usize,
}

impl ErdTable {
    pub fn is_fact(&self) -> bool {
        self.table_type == TableType::Fact
    }
}

/// A directed reference from a non-key column to a key column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignKeyCandidate {
    pub foreign_key_table: String,
    pub foreign_key_column: String,
    pub referenced_table: String,
    pub referenced_column: String,
    pub confidence: f64,
}

/// Unordered pair of table names used to index relationships.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TablePair<'a>(&'a str, &'a str);

impl<'a> TablePair<'a> {
    pub fn new(a: &'a str, b: &'a str) -> Self {
        if a <= b { Self(a, b) } else { Self(b, a) }
    }
}

/// Tables typed as fact or dimension, plus the relationships between them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErdModel {
    pub tables: IndexMap<String, ErdTable>,
    pub relationships: Vec<Relationship>,
    /// References from non-key columns to key columns, above the configured confidence.
    #[serde(default)]
    pub foreign_keys: Vec<ForeignKeyCandidate>,
}

impl ErdModel {
    /// Build ERD metadata from successfully analyzed tables.
    pub fn from_analysis(
        tables: &[TableAnalysis],
        relationships: &[Relationship],
        config: &RecommenderConfig,
    ) -> Self {
        let tables = tables
            .iter()
            .filter(|t| t.is_ok())
            .map(|t| (t.table.clone(), erd_table(t, config)))
            .collect();

        Self {
            tables,
            relationships: relationships.to_vec(),
            foreign_keys: foreign_keys(relationships, config.foreign_key_min_confidence),
        }
    }

    pub fn table(&self, name: &str) -> Option<&ErdTable> {
        self.tables.get(name)
    }

    pub fn fact_tables(&self) -> impl Iterator<Item = &ErdTable> {
        self.tables.values().filter(|t| t.is_fact())
    }

    /// Relationships grouped by the unordered pair of tables they connect.
    pub fn relationship_map(&self) -> HashMap<TablePair<'_>, Vec<&Relationship>> {
        let mut map: HashMap<TablePair<'_>, Vec<&Relationship>> = HashMap::new();
        for rel in &self.relationships {
            map.entry(TablePair::new(&rel.table1, &rel.table2))
                .or_default()
                .push(rel);
        }
        map
    }

    /// Foreign keys declared on `table`.
    pub fn foreign_keys_of<'a>(
        &'a self,
        table: &'a str,
    ) -> impl Iterator<Item = &'a ForeignKeyCandidate> + 'a {
        self.foreign_keys
            .iter()
            .filter(move |fk| fk.foreign_key_table == table)
    }
}

/// Foreign keys implied by relationships where exactly one side is a key.
fn foreign_keys(relationships: &[Relationship], min_confidence: f64) -> Vec<ForeignKeyCandidate> {
    relationships
        .iter()
        .filter(|r| r.confidence > min_confidence && r.is_pk1 != r.is_pk2)
        .map(|r| {
            let (fk, pk) = if r.is_pk1 {
                ((&r.table2, &r.column2), (&r.table1, &r.column1))
            } else {
                ((&r.table1, &r.column1), (&r.table2, &r.column2))
            };
            ForeignKeyCandidate {
                foreign_key_table: fk.0.clone(),
                foreign_key_column: fk.1.clone(),
                referenced_table: pk.0.clone(),
                referenced_column: pk.1.clone(),
                confidence: r.confidence,
            }
        })
        .collect()
}

/// Whether a column holds a measure, judged by table name, column name and type.
pub fn is_fact_column(column_type: ColumnType, column_name: &str, table_name: &str) -> bool {
    if is_dimension_table_name(table_name) {
        return false;
    }
    if has_key_marker(column_name) || is_numeric_attribute_name(column_name) {
        return false;
    }
    if has_measure_marker(column_name) {
        return true;
    }
    column_type.is_numeric()
}

fn erd_table(analysis: &TableAnalysis, config: &RecommenderConfig) -> ErdTable {
    let (facts, dimensions): (Vec<_>, Vec<_>) = analysis
        .columns
        .iter()
        .partition(|c| is_fact_column(c.column_type, c.name(), &analysis.table));

    let table_type = if facts.len() > dimensions.len()
        || (analysis.row_count > config.large_table_rows
            && dimensions.len() > config.large_table_min_dimensions)
    {
        TableType::Fact
    } else {
        TableType::Dimension
    };

    ErdTable {
        table: analysis.table.clone(),
        table_type,
        fact_columns: facts.iter().map(|c| c.name().to_string()).collect(),
        dimension_columns: dimensions.iter().map(|c| c.name().to_string()).collect(),
        primary_key_candidates: analysis
            .primary_key_candidates()
            .map(|c| c.name().to_string())
            .collect(),
        row_count: analysis.row_count,
    }
}
