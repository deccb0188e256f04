//! Discovered join relationships.

use serde::{Deserialize, Serialize};

use crate::schema::{ColumnType, RelationshipType};

/// A candidate join between columns of two different tables.
///
/// The pair is undirected in meaning; `(table1, column1)` is the side that
/// comes first in catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    pub table1: String,
    pub column1: String,
    pub table2: String,
    pub column2: String,
    /// Distinct values present in both columns.
    pub overlap_count: usize,
    /// Distinct non-null values in `column1`.
    pub cardinality1: usize,
    /// Distinct non-null values in `column2`.
    pub cardinality2: usize,
    /// `overlap / min(cardinality1, cardinality2)`.
    pub confidence: f64,
    pub relationship_type: RelationshipType,
    pub is_pk1: bool,
    pub is_pk2: bool,
}

impl Relationship {
    /// Whether the relationship touches `table`.
    pub fn involves(&self, table: &str) -> bool {
        self.table1 == table || self.table2 == table
    }

    /// Column on `table`'s side, if it participates.
    pub fn column_for(&self, table: &str) -> Option<&str> {
        if self.table1 == table {
            Some(&self.column1)
        } else if self.table2 == table {
            Some(&self.column2)
        } else {
            None
        }
    }

    /// Whether `table`'s side is a primary key candidate.
    pub fn is_key_on(&self, table: &str) -> bool {
        (self.table1 == table && self.is_pk1) || (self.table2 == table && self.is_pk2)
    }

    /// The table and column opposite to `table`.
    pub fn other_side(&self, table: &str) -> Option<(&str, &str)> {
        if self.table1 == table {
            Some((&self.table2, &self.column2))
        } else if self.table2 == table {
            Some((&self.table1, &self.column1))
        } else {
            None
        }
    }
}

/// Cardinality of a join given both sides' distinct counts and key status.
pub fn relationship_type(
    overlap: usize,
    count1: usize,
    count2: usize,
    is_pk1: bool,
    is_pk2: bool,
) -> RelationshipType {
    if is_pk1 && is_pk2 && overlap == count1 && overlap == count2 {
        RelationshipType::OneToOne
    } else if overlap == count1.min(count2) {
        RelationshipType::OneToMany
    } else {
        RelationshipType::ManyToMany
    }
}

/// Whether two declared store types can be joined.
///
/// Exact matches (ignoring `Nullable(...)`), any two numeric types, or any
/// two string types are compatible.
pub fn types_compatible(type1: &str, type2: &str) -> bool {
    let normalize = |t: &str| t.to_lowercase().replace("nullable(", "").replace(')', "");
    let (t1, t2) = (normalize(type1), normalize(type2));

    if t1 == t2 {
        return true;
    }
    if ColumnType::from_declared(&t1).is_numeric() && ColumnType::from_declared(&t2).is_numeric() {
        return true;
    }
    t1.contains("string") && t2.contains("string")
}
