//! Fact/dimension table recommendation and K-table planning.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::definitions::{ColumnContext, describe_column};
use super::erd::{ErdModel, ErdTable, TablePair};
use crate::classification::names::{has_key_marker, has_measure_marker, is_identifier_name};
use crate::hierarchy::Hierarchy;
use crate::relationship::Relationship;
use crate::schema::{ColumnAnalysis, ColumnRole, ColumnType, TableAnalysis, TableType};

/// Configuration for ERD typing and recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Row count above which a dimension-heavy table is treated as a fact.
    pub large_table_rows: usize,
    /// Dimension columns a large table needs to be treated as a fact.
    pub large_table_min_dimensions: usize,
    /// Minimum confidence for derived foreign keys.
    pub foreign_key_min_confidence: f64,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            large_table_rows: 100_000,
            large_table_min_dimensions: 3,
            foreign_key_min_confidence: 0.7,
        }
    }
}

/// A column of a recommended table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedColumn {
    pub name: String,
    pub data_type: ColumnType,
    pub role: ColumnRole,
    pub description: String,
}

/// How a K-table join was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinResolution {
    /// A discovered relationship connects the two tables.
    Relationship,
    /// A fact key matches a dimension's root, leaf or primary column by name.
    NameMatch,
}

/// Join between a fact column and a dimension column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinKey {
    pub fact_column: String,
    /// Recommended dimension name.
    pub dimension: String,
    pub dimension_table: String,
    pub dimension_column: String,
    pub resolved_by: JoinResolution,
}

/// Denormalized join of a fact with its dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KTablePlan {
    pub name: String,
    /// Fact columns first, then each joined dimension's prefixed columns.
    pub columns: Vec<RecommendedColumn>,
    pub joins: Vec<JoinKey>,
    /// Candidate dimensions with no resolvable join key.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_dimensions: Vec<String>,
    /// Key-like fact columns that joined no dimension.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved_keys: Vec<String>,
}

/// A recommended fact or dimension table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelRecommendation {
    pub table_type: TableType,
    pub recommended_name: String,
    pub source_table: String,
    /// Columns in source order.
    pub columns: Vec<RecommendedColumn>,
    /// Dimension key column (dimension recommendations).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_column: Option<String>,
    /// Foreign-key columns (fact recommendations).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dimension_keys: Vec<String>,
    /// Root, leaf and intermediate column names (dimension recommendations).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hierarchy: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k_table: Option<KTablePlan>,
}

impl ModelRecommendation {
    pub fn is_fact(&self) -> bool {
        self.table_type == TableType::Fact
    }

    pub fn column(&self, name: &str) -> Option<&RecommendedColumn> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Columns a dimension can be joined on: root, leaf, and primary column.
    fn join_targets(&self) -> Vec<&str> {
        let mut targets: Vec<&str> = Vec::new();
        let candidates = [
            self.hierarchy.first().map(String::as_str),
            self.hierarchy.last().map(String::as_str),
            self.primary_column.as_deref(),
        ];
        for target in candidates.into_iter().flatten() {
            if !targets.contains(&target) {
                targets.push(target);
            }
        }
        targets
    }
}

/// Turns ERD metadata and hierarchies into table recommendations.
#[derive(Debug, Clone, Default)]
pub struct DimensionalModelRecommender {
    config: RecommenderConfig,
}

impl DimensionalModelRecommender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RecommenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Recommend fact tables (each with a K-table plan) followed by dimensions.
    pub fn recommend(
        &self,
        erd: &ErdModel,
        hierarchies: &[Hierarchy],
        tables: &[TableAnalysis],
    ) -> Vec<ModelRecommendation> {
        let analyses: HashMap<&str, &TableAnalysis> = tables
            .iter()
            .filter(|t| t.is_ok())
            .map(|t| (t.table.as_str(), t))
            .collect();

        let dimensions: Vec<ModelRecommendation> = hierarchies
            .iter()
            .filter(|h| erd.table(&h.table).is_some_and(|t| !t.is_fact()))
            .filter_map(|h| {
                let analysis = analyses.get(h.table.as_str())?;
                let erd_table = erd.table(&h.table)?;
                Some((h, *analysis, erd_table))
            })
            .enumerate()
            .map(|(i, (h, analysis, erd_table))| {
                dimension_recommendation(i + 1, h, analysis, erd_table)
            })
            .collect();

        let mut recommendations: Vec<ModelRecommendation> = erd
            .fact_tables()
            .filter_map(|t| analyses.get(t.table.as_str()).map(|a| (t, *a)))
            .enumerate()
            .map(|(i, (erd_table, analysis))| {
                let mut fact = fact_recommendation(i + 1, erd_table, analysis, &erd.relationships);
                fact.k_table = Some(plan_k_table(&fact, &dimensions, erd));
                fact
            })
            .collect();

        info!(
            facts = recommendations.len(),
            dimensions = dimensions.len(),
            "generated model recommendations"
        );

        recommendations.extend(dimensions);
        recommendations
    }
}

fn recommended_column(
    column: &ColumnAnalysis,
    table: &str,
    table_type: TableType,
    role: ColumnRole,
) -> RecommendedColumn {
    let description = describe_column(&ColumnContext {
        table,
        column: column.name(),
        column_type: column.column_type,
        table_type,
        role,
        is_primary_key: column.is_primary_key_candidate(),
        denormalized_from: None,
    });
    RecommendedColumn {
        name: column.name().to_string(),
        data_type: column.column_type,
        role,
        description,
    }
}

fn fact_recommendation(
    sequence: usize,
    erd_table: &ErdTable,
    analysis: &TableAnalysis,
    relationships: &[Relationship],
) -> ModelRecommendation {
    // Related columns are keys unless their name marks a measure.
    let joined: HashSet<&str> = relationships
        .iter()
        .filter_map(|r| r.column_for(&erd_table.table))
        .filter(|c| !has_measure_marker(c))
        .collect();

    let columns: Vec<RecommendedColumn> = analysis
        .columns
        .iter()
        .map(|c| {
            let is_measure =
                erd_table.fact_columns.iter().any(|f| f == c.name()) && !joined.contains(c.name());
            let role = if is_measure {
                ColumnRole::FactMeasure
            } else {
                ColumnRole::DimensionKey
            };
            recommended_column(c, &analysis.table, TableType::Fact, role)
        })
        .collect();

    let dimension_keys = columns
        .iter()
        .filter(|c| c.role == ColumnRole::DimensionKey)
        .map(|c| c.name.clone())
        .collect();

    ModelRecommendation {
        table_type: TableType::Fact,
        recommended_name: format!("fact{sequence}_fact"),
        source_table: analysis.table.clone(),
        columns,
        primary_column: None,
        dimension_keys,
        hierarchy: Vec::new(),
        k_table: None,
    }
}

fn dimension_recommendation(
    sequence: usize,
    hierarchy: &Hierarchy,
    analysis: &TableAnalysis,
    erd_table: &ErdTable,
) -> ModelRecommendation {
    let members: Vec<&ColumnAnalysis> = analysis
        .columns
        .iter()
        .filter(|c| {
            hierarchy.contains(c.name()) || erd_table.dimension_columns.iter().any(|d| d == c.name())
        })
        .collect();

    let primary_column = members
        .iter()
        .find(|c| c.is_primary_key_candidate())
        .map(|c| c.name().to_string())
        .or_else(|| hierarchy.leaf().map(|l| l.column.clone()));

    let columns = members
        .iter()
        .map(|c| {
            let role = if primary_column.as_deref() == Some(c.name()) {
                ColumnRole::DimensionKey
            } else {
                ColumnRole::DimensionAttribute
            };
            recommended_column(c, &analysis.table, TableType::Dimension, role)
        })
        .collect();

    ModelRecommendation {
        table_type: TableType::Dimension,
        recommended_name: format!("dimension{sequence}_dim"),
        source_table: analysis.table.clone(),
        columns,
        primary_column,
        dimension_keys: Vec::new(),
        hierarchy: hierarchy.levels.iter().map(|l| l.column.clone()).collect(),
        k_table: None,
    }
}

fn names_match(key: &str, target: &str) -> bool {
    let (key, target) = (key.to_lowercase(), target.to_lowercase());
    key == target || key.starts_with(&target) || target.starts_with(&key)
}

/// First fact key matching one of the dimension's join targets.
fn name_matched_join<'a>(
    fact: &'a ModelRecommendation,
    dimension: &'a ModelRecommendation,
) -> Option<(&'a str, &'a str)> {
    let targets = dimension.join_targets();
    fact.dimension_keys.iter().find_map(|key| {
        targets
            .iter()
            .find(|target| names_match(key, target))
            .map(|target| (key.as_str(), *target))
    })
}

/// Fact and dimension columns a discovered relationship joins on.
///
/// A foreign key referencing the dimension wins. Otherwise the relationship
/// must land on one of the dimension's join targets, preferring key sides and
/// matching names. The fact side is always one of the fact's dimension keys.
fn relationship_join<'a>(
    erd: &'a ErdModel,
    relationship_map: &HashMap<TablePair<'a>, Vec<&'a Relationship>>,
    fact: &'a ModelRecommendation,
    dimension: &'a ModelRecommendation,
) -> Option<(&'a str, &'a str)> {
    let is_key = |column: &str| fact.dimension_keys.iter().any(|k| k == column);

    let foreign_key = erd.foreign_keys_of(&fact.source_table).find(|fk| {
        fk.referenced_table == dimension.source_table
            && is_key(fk.foreign_key_column.as_str())
            && dimension.column(&fk.referenced_column).is_some()
    });
    if let Some(fk) = foreign_key {
        return Some((fk.foreign_key_column.as_str(), fk.referenced_column.as_str()));
    }

    let targets = dimension.join_targets();
    relationship_map
        .get(&TablePair::new(&fact.source_table, &dimension.source_table))?
        .iter()
        .filter_map(|rel| {
            let fact_column = rel.column_for(&fact.source_table)?;
            let dim_column = rel.column_for(&dimension.source_table)?;
            if !is_key(fact_column) || !targets.contains(&dim_column) {
                return None;
            }
            let rank = (
                !rel.is_key_on(&dimension.source_table),
                !names_match(fact_column, dim_column),
            );
            Some((rank, fact_column, dim_column))
        })
        .min_by_key(|(rank, _, _)| *rank)
        .map(|(_, fact_column, dim_column)| (fact_column, dim_column))
}

fn plan_k_table(
    fact: &ModelRecommendation,
    dimensions: &[ModelRecommendation],
    erd: &ErdModel,
) -> KTablePlan {
    let relationship_map = erd.relationship_map();

    // Related dimensions: via relationships, else by key name, else all of them.
    let mut candidates: Vec<&ModelRecommendation> = dimensions
        .iter()
        .filter(|d| {
            d.source_table != fact.source_table
                && relationship_join(erd, &relationship_map, fact, d).is_some()
        })
        .collect();
    if candidates.is_empty() {
        candidates = dimensions
            .iter()
            .filter(|d| d.source_table != fact.source_table && name_matched_join(fact, d).is_some())
            .collect();
    }
    if candidates.is_empty() {
        debug!(fact = %fact.recommended_name, "no related dimensions found, considering all");
        candidates = dimensions
            .iter()
            .filter(|d| d.source_table != fact.source_table)
            .collect();
    }

    let mut joins: Vec<(JoinKey, &ModelRecommendation)> = Vec::new();
    let mut skipped_dimensions = Vec::new();

    for dim in candidates {
        let resolved = relationship_join(erd, &relationship_map, fact, dim)
            .map(|(fact_column, dim_column)| (fact_column, dim_column, JoinResolution::Relationship))
            .or_else(|| {
                name_matched_join(fact, dim)
                    .map(|(fact_column, dim_column)| (fact_column, dim_column, JoinResolution::NameMatch))
            });

        match resolved {
            Some((fact_column, dimension_column, resolved_by)) => joins.push((
                JoinKey {
                    fact_column: fact_column.to_string(),
                    dimension: dim.recommended_name.clone(),
                    dimension_table: dim.source_table.clone(),
                    dimension_column: dimension_column.to_string(),
                    resolved_by,
                },
                dim,
            )),
            None => {
                warn!(
                    fact = %fact.recommended_name,
                    dimension = %dim.recommended_name,
                    "no join key for dimension, leaving it out of the K-table"
                );
                skipped_dimensions.push(dim.recommended_name.clone());
            }
        }
    }

    let unresolved_keys: Vec<String> = fact
        .dimension_keys
        .iter()
        .filter(|key| has_key_marker(key) || is_identifier_name(key))
        .filter(|key| joins.iter().all(|(j, _)| &j.fact_column != *key))
        .cloned()
        .collect();
    for key in &unresolved_keys {
        warn!(fact = %fact.recommended_name, key = %key, "fact key joins no dimension");
    }

    let name = match fact.recommended_name.strip_suffix("_fact") {
        Some(base) => format!("{base}_k"),
        None => format!("{}_k", fact.recommended_name),
    };

    let mut columns = fact.columns.clone();
    for (_, dim) in &joins {
        columns.extend(dim.columns.iter().map(|c| {
            let prefixed = format!("{}_{}", dim.recommended_name, c.name);
            let description = describe_column(&ColumnContext {
                table: &name,
                column: &prefixed,
                column_type: c.data_type,
                table_type: TableType::Fact,
                role: ColumnRole::DimensionAttribute,
                is_primary_key: false,
                denormalized_from: Some(&dim.recommended_name),
            });
            RecommendedColumn {
                name: prefixed,
                data_type: c.data_type,
                role: ColumnRole::DimensionAttribute,
                description,
            }
        }));
    }

    KTablePlan {
        name,
        columns,
        joins: joins.into_iter().map(|(j, _)| j).collect(),
        skipped_dimensions,
        unresolved_keys,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_match() {
        assert!(names_match("customer_id", "customer_id"));
        assert!(names_match("store", "store_id"));
        assert!(names_match("Region_Code", "region"));
        assert!(!names_match("product_id", "customer_id"));
    }

    fn column(name: &str, data_type: ColumnType, role: ColumnRole) -> RecommendedColumn {
        RecommendedColumn {
            name: name.into(),
            data_type,
            role,
            description: String::new(),
        }
    }

    fn dimension(name: &str, table: &str, key: &str, attribute: &str) -> ModelRecommendation {
        ModelRecommendation {
            table_type: TableType::Dimension,
            recommended_name: name.into(),
            source_table: table.into(),
            columns: vec![
                column(attribute, ColumnType::String, ColumnRole::DimensionAttribute),
                column(key, ColumnType::Integer, ColumnRole::DimensionKey),
            ],
            primary_column: Some(key.into()),
            dimension_keys: Vec::new(),
            hierarchy: vec![attribute.into(), key.into()],
            k_table: None,
        }
    }

    fn relationship(fact_column: &str, table: &str, column: &str) -> Relationship {
        Relationship {
            table1: table.into(),
            column1: column.into(),
            table2: "sales".into(),
            column2: fact_column.into(),
            overlap_count: 50,
            cardinality1: 50,
            cardinality2: 50,
            confidence: 1.0,
            relationship_type: crate::schema::RelationshipType::OneToMany,
            is_pk1: true,
            is_pk2: false,
        }
    }

    #[test]
    fn test_k_table_skips_unresolved_key() {
        let fact = ModelRecommendation {
            table_type: TableType::Fact,
            recommended_name: "fact1_fact".into(),
            source_table: "sales".into(),
            columns: vec![
                column("customer_ref", ColumnType::Integer, ColumnRole::DimensionKey),
                column("store_ref", ColumnType::Integer, ColumnRole::DimensionKey),
                column("promo_id", ColumnType::Integer, ColumnRole::DimensionKey),
                column("amount", ColumnType::Decimal, ColumnRole::FactMeasure),
            ],
            primary_column: None,
            dimension_keys: vec!["customer_ref".into(), "store_ref".into(), "promo_id".into()],
            hierarchy: Vec::new(),
            k_table: None,
        };
        let dimensions = vec![
            dimension("dimension1_dim", "customers", "cust_no", "segment"),
            dimension("dimension2_dim", "stores", "store_no", "region"),
        ];
        let relationships = vec![
            relationship("customer_ref", "customers", "cust_no"),
            relationship("store_ref", "stores", "store_no"),
        ];
        let erd = ErdModel::from_analysis(&[], &relationships, &RecommenderConfig::default());
        assert_eq!(erd.foreign_keys.len(), 2);

        let plan = plan_k_table(&fact, &dimensions, &erd);

        assert_eq!(plan.name, "fact1_k");
        assert_eq!(plan.joins.len(), 2);
        assert!(plan.joins.iter().all(|j| j.resolved_by == JoinResolution::Relationship));
        assert_eq!(plan.joins[0].fact_column, "customer_ref");
        assert_eq!(plan.joins[0].dimension_column, "cust_no");
        assert_eq!(plan.joins[1].fact_column, "store_ref");
        assert!(plan.skipped_dimensions.is_empty());
        assert_eq!(plan.unresolved_keys, vec!["promo_id"]);

        let names: Vec<&str> = plan.columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "customer_ref",
                "store_ref",
                "promo_id",
                "amount",
                "dimension1_dim_segment",
                "dimension1_dim_cust_no",
                "dimension2_dim_region",
                "dimension2_dim_store_no",
            ]
        );
    }

    #[test]
    fn test_k_table_ignores_relationships_off_join_targets() {
        let fact = ModelRecommendation {
            table_type: TableType::Fact,
            recommended_name: "fact1_fact".into(),
            source_table: "sales".into(),
            columns: vec![
                column("quantity", ColumnType::Integer, ColumnRole::FactMeasure),
                column("customer_id", ColumnType::Integer, ColumnRole::DimensionKey),
                column("channel", ColumnType::String, ColumnRole::DimensionKey),
            ],
            primary_column: None,
            dimension_keys: vec!["customer_id".into(), "channel".into()],
            hierarchy: Vec::new(),
            k_table: None,
        };
        let mut customers = dimension("dimension1_dim", "customers", "customer_id", "loyalty_tier");
        customers.columns.push(column(
            "segment",
            ColumnType::String,
            ColumnRole::DimensionAttribute,
        ));
        let dimensions = vec![customers];

        // Neither side is a key, and the catalog lists the spurious matches first.
        let loose = |fact_column: &str, column: &str| Relationship {
            is_pk1: false,
            ..relationship(fact_column, "customers", column)
        };
        let erd = ErdModel {
            relationships: vec![
                loose("quantity", "loyalty_tier"),
                loose("channel", "segment"),
                loose("customer_id", "customer_id"),
            ],
            ..ErdModel::default()
        };

        let plan = plan_k_table(&fact, &dimensions, &erd);

        assert_eq!(plan.joins.len(), 1);
        assert_eq!(plan.joins[0].resolved_by, JoinResolution::Relationship);
        assert_eq!(plan.joins[0].fact_column, "customer_id");
        assert_eq!(plan.joins[0].dimension_column, "customer_id");
        assert!(plan.unresolved_keys.is_empty());
        assert_eq!(plan.columns[0].role, ColumnRole::FactMeasure);
    }

    #[test]
    fn test_k_table_name_match_fallback() {
        let fact = ModelRecommendation {
            table_type: TableType::Fact,
            recommended_name: "fact1_fact".into(),
            source_table: "sales".into(),
            columns: vec![column("store_no", ColumnType::Integer, ColumnRole::DimensionKey)],
            primary_column: None,
            dimension_keys: vec!["store_no".into()],
            hierarchy: Vec::new(),
            k_table: None,
        };
        let dimensions = vec![
            dimension("dimension1_dim", "stores", "store_no", "region"),
            dimension("dimension2_dim", "products", "sku", "category"),
        ];

        let plan = plan_k_table(&fact, &dimensions, &ErdModel::default());

        assert_eq!(plan.joins.len(), 1);
        assert_eq!(plan.joins[0].resolved_by, JoinResolution::NameMatch);
        assert_eq!(plan.joins[0].dimension, "dimension1_dim");
        assert!(plan.unresolved_keys.is_empty());
    }

    #[test]
    fn test_join_targets_deduplicated() {
        let dim = ModelRecommendation {
            table_type: TableType::Dimension,
            recommended_name: "dimension1_dim".into(),
            source_table: "stores".into(),
            columns: Vec::new(),
            primary_column: Some("store_id".into()),
            dimension_keys: Vec::new(),
            hierarchy: vec!["region".into(), "city".into(), "store_id".into()],
            k_table: None,
        };
        assert_eq!(dim.join_targets(), vec!["region", "store_id"]);
    }
}
