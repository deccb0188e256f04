//! Root-to-leaf hierarchy construction.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::similarity::{SIBLING_SIMILARITY_THRESHOLD, cardinality_bucket, name_similarity};
use crate::schema::ColumnProfile;

/// Position of a level within its hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelRole {
    Root,
    Intermediate,
    Leaf,
}

/// A same-magnitude column with a similar name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sibling {
    pub column: String,
    pub similarity: f64,
}

/// One level of an attribute hierarchy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HierarchyLevel {
    pub column: String,
    pub cardinality: usize,
    /// 0 at the root.
    pub level: usize,
    pub role: LevelRole,
    /// Column of the previous level.
    pub parent: Option<String>,
    /// Column of the next level.
    pub children: Vec<String>,
    pub siblings: Vec<Sibling>,
}

/// Dimension columns of one table ordered from coarsest to finest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy {
    pub table: String,
    /// Root first, leaf last; cardinality never decreases.
    pub levels: Vec<HierarchyLevel>,
    pub total_levels: usize,
}

impl Hierarchy {
    pub fn root(&self) -> Option<&HierarchyLevel> {
        self.levels.first()
    }

    pub fn leaf(&self) -> Option<&HierarchyLevel> {
        self.levels.last()
    }

    /// Levels strictly between root and leaf.
    pub fn intermediate(&self) -> &[HierarchyLevel] {
        if self.levels.len() <= 2 {
            &[]
        } else {
            &self.levels[1..self.levels.len() - 1]
        }
    }

    pub fn level(&self, column: &str) -> Option<&HierarchyLevel> {
        self.levels.iter().find(|l| l.column == column)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.level(column).is_some()
    }

    /// Column names root to leaf.
    pub fn column_names(&self) -> Vec<&str> {
        self.levels.iter().map(|l| l.column.as_str()).collect()
    }
}

/// Builds hierarchies from a table's dimension-column profiles.
#[derive(Debug, Clone, Default)]
pub struct HierarchyBuilder;

impl HierarchyBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Order the columns by ascending cardinality into a hierarchy.
    ///
    /// Returns `None` with fewer than two columns. Columns of equal
    /// cardinality keep their input order.
    pub fn build(&self, table: &str, dimension_columns: &[ColumnProfile]) -> Option<Hierarchy> {
        if dimension_columns.len() < 2 {
            debug!(table, columns = dimension_columns.len(), "too few dimension columns for a hierarchy");
            return None;
        }

        let mut sorted: Vec<&ColumnProfile> = dimension_columns.iter().collect();
        sorted.sort_by_key(|p| p.cardinality);

        let last = sorted.len() - 1;
        let mut levels: Vec<HierarchyLevel> = sorted
            .iter()
            .enumerate()
            .map(|(i, profile)| HierarchyLevel {
                column: profile.column.clone(),
                cardinality: profile.cardinality,
                level: i,
                role: match i {
                    0 => LevelRole::Root,
                    i if i == last => LevelRole::Leaf,
                    _ => LevelRole::Intermediate,
                },
                parent: (i > 0).then(|| sorted[i - 1].column.clone()),
                children: sorted
                    .get(i + 1)
                    .map(|next| vec![next.column.clone()])
                    .unwrap_or_default(),
                siblings: Vec::new(),
            })
            .collect();

        attach_siblings(&mut levels);

        debug!(table, levels = levels.len(), "built hierarchy");
        Some(Hierarchy {
            table: table.to_string(),
            total_levels: levels.len(),
            levels,
        })
    }
}

/// Fill each level's siblings from columns in the same magnitude bucket.
fn attach_siblings(levels: &mut [HierarchyLevel]) {
    let snapshot: Vec<(String, u32)> = levels
        .iter()
        .map(|l| (l.column.clone(), cardinality_bucket(l.cardinality)))
        .collect();

    for (i, level) in levels.iter_mut().enumerate() {
        let bucket = snapshot[i].1;
        level.siblings = snapshot
            .iter()
            .enumerate()
            .filter(|&(j, (_, other_bucket))| j != i && *other_bucket == bucket)
            .filter_map(|(_, (column, _))| {
                let similarity = name_similarity(&level.column, column);
                (similarity > SIBLING_SIMILARITY_THRESHOLD).then(|| Sibling {
                    column: column.clone(),
                    similarity,
                })
            })
            .collect();
    }
}
