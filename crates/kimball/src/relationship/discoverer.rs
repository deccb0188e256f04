//! Cross-table relationship discovery from distinct-value overlap.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::types::{Relationship, relationship_type, types_compatible};
use crate::input::ProfileStore;
use crate::parallel::map_partitioned;
use crate::schema::TableAnalysis;

/// Configuration for relationship discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Minimum overlap confidence for a relationship to be kept.
    pub confidence_threshold: f64,
    /// Column names never considered for joins (case-insensitive).
    pub ignore_columns: Vec<String>,
    /// Evaluate value fetches and column pairs on worker threads.
    pub parallel: bool,
    /// Columns with fewer distinct values are not join candidates.
    pub min_cardinality: usize,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.7,
            ignore_columns: Vec::new(),
            parallel: true,
            min_cardinality: 2,
        }
    }
}

/// Relationships found in one pass, plus what had to be skipped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Discovery {
    /// Sorted by descending confidence.
    pub relationships: Vec<Relationship>,
    /// Columns whose values could not be read.
    pub warnings: Vec<String>,
    pub candidate_columns: usize,
    pub pairs_evaluated: usize,
}

/// A column eligible for joins, with its materialized values.
struct Candidate<'a> {
    table: &'a str,
    column: &'a str,
    raw_type: &'a str,
    is_pk: bool,
    values: HashSet<String>,
}

/// Finds joins by comparing full distinct-value sets across tables.
#[derive(Debug, Clone, Default)]
pub struct RelationshipDiscoverer {
    config: DiscoveryConfig,
}

impl RelationshipDiscoverer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DiscoveryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DiscoveryConfig {
        &self.config
    }

    /// Discover relationships among the analyzed tables.
    ///
    /// A column whose distinct values cannot be fetched is left out of every
    /// pair and reported in [`Discovery::warnings`].
    #[instrument(skip_all, fields(tables = tables.len(), threshold = confidence_threshold))]
    pub fn discover(
        &self,
        store: &dyn ProfileStore,
        tables: &[TableAnalysis],
        confidence_threshold: f64,
    ) -> Discovery {
        let eligible: Vec<(&str, &str, &str, bool)> = tables
            .iter()
            .filter(|t| t.is_ok())
            .flat_map(|t| {
                t.columns.iter().map(move |c| {
                    (
                        t.table.as_str(),
                        c.name(),
                        c.profile.raw_type.as_str(),
                        c.is_primary_key_candidate(),
                    )
                })
            })
            .filter(|(_, column, _, _)| !self.is_ignored(column))
            .filter(|(table, column, _, _)| {
                self.profile_cardinality(tables, table, column) >= self.config.min_cardinality
            })
            .collect();

        let fetched = map_partitioned(&eligible, self.config.parallel, |(table, column, _, _)| {
            store.distinct_values(table, column)
        });

        let mut warnings = Vec::new();
        let candidates: Vec<Candidate<'_>> = eligible
            .iter()
            .zip(fetched)
            .filter_map(|(&(table, column, raw_type, is_pk), values)| match values {
                Ok(values) => Some(Candidate {
                    table,
                    column,
                    raw_type,
                    is_pk,
                    values,
                }),
                Err(e) => {
                    warn!(table, column, error = %e, "skipping column in relationship discovery");
                    warnings.push(format!("{table}.{column}: distinct values unavailable: {e}"));
                    None
                }
            })
            .collect();

        let pairs: Vec<(usize, usize)> = (0..candidates.len())
            .flat_map(|i| (i + 1..candidates.len()).map(move |j| (i, j)))
            .filter(|&(i, j)| {
                let (a, b) = (&candidates[i], &candidates[j]);
                a.table != b.table && types_compatible(a.raw_type, b.raw_type)
            })
            .collect();

        let mut relationships: Vec<Relationship> =
            map_partitioned(&pairs, self.config.parallel, |&(i, j)| {
                evaluate_pair(&candidates[i], &candidates[j], confidence_threshold)
            })
            .into_iter()
            .flatten()
            .collect();

        relationships.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        info!(
            candidates = candidates.len(),
            pairs = pairs.len(),
            relationships = relationships.len(),
            "relationship discovery complete"
        );

        Discovery {
            relationships,
            warnings,
            candidate_columns: candidates.len(),
            pairs_evaluated: pairs.len(),
        }
    }

    fn is_ignored(&self, column: &str) -> bool {
        self.config
            .ignore_columns
            .iter()
            .any(|ignored| ignored.eq_ignore_ascii_case(column))
    }

    fn profile_cardinality(&self, tables: &[TableAnalysis], table: &str, column: &str) -> usize {
        tables
            .iter()
            .find(|t| t.table == table)
            .and_then(|t| t.get_column(column))
            .map(|c| c.profile.cardinality)
            .unwrap_or(0)
    }
}

fn evaluate_pair(a: &Candidate<'_>, b: &Candidate<'_>, threshold: f64) -> Option<Relationship> {
    let (smaller, larger) = if a.values.len() <= b.values.len() {
        (&a.values, &b.values)
    } else {
        (&b.values, &a.values)
    };
    let overlap = smaller.iter().filter(|v| larger.contains(*v)).count();
    if overlap == 0 {
        return None;
    }

    let confidence = overlap as f64 / smaller.len() as f64;
    if confidence < threshold {
        return None;
    }

    debug!(
        left = %format!("{}.{}", a.table, a.column),
        right = %format!("{}.{}", b.table, b.column),
        overlap,
        confidence,
        "relationship candidate"
    );

    Some(Relationship {
        table1: a.table.to_string(),
        column1: a.column.to_string(),
        table2: b.table.to_string(),
        column2: b.column.to_string(),
        overlap_count: overlap,
        cardinality1: a.values.len(),
        cardinality2: b.values.len(),
        confidence,
        relationship_type: relationship_type(
            overlap,
            a.values.len(),
            b.values.len(),
            a.is_pk,
            b.is_pk,
        ),
        is_pk1: a.is_pk,
        is_pk2: b.is_pk,
    })
}
