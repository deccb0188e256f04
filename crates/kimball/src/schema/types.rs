//! Core type definitions for schema and model representation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Semantic type inferred from a column's string values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InferredType {
    /// Calendar dates, datetimes, or timestamps.
    Date,
    /// Numeric measures.
    Numeric,
    /// Anything else.
    String,
}

impl InferredType {
    pub fn as_str(&self) -> &'static str {
        match self {
            InferredType::Date => "date",
            InferredType::Numeric => "numeric",
            InferredType::String => "string",
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column data type used for classification, key detection, and join typing.
///
/// Covers both declared store types (`Int64`, `Nullable(String)`, ...) and
/// refined inference results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Whole numbers.
    Integer,
    /// Fixed or floating point numbers.
    Decimal,
    /// Numeric, precision unknown.
    Numeric,
    /// Text values.
    String,
    /// Boolean values.
    Boolean,
    /// Date only.
    Date,
    /// Date and time.
    DateTime,
    /// Unable to determine type.
    Unknown,
}

impl ColumnType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ColumnType::Integer | ColumnType::Decimal | ColumnType::Numeric
        )
    }

    /// Returns true if this type is temporal.
    pub fn is_temporal(&self) -> bool {
        matches!(self, ColumnType::Date | ColumnType::DateTime)
    }

    /// Types that can back a primary key.
    pub fn is_key_type(&self) -> bool {
        matches!(
            self,
            ColumnType::String | ColumnType::Integer | ColumnType::Date | ColumnType::DateTime
        )
    }

    /// Map a declared store type name onto a column type.
    ///
    /// Wrappers such as `Nullable(...)` and `LowCardinality(...)` are ignored.
    pub fn from_declared(raw_type: &str) -> Self {
        let lower = raw_type.to_lowercase();
        let inner = lower
            .replace("nullable(", "")
            .replace("lowcardinality(", "")
            .replace(')', "");
        let inner = inner.trim();

        if inner.starts_with("datetime") || inner.starts_with("timestamp") {
            ColumnType::DateTime
        } else if inner.starts_with("date") {
            ColumnType::Date
        } else if inner.starts_with("bool") {
            ColumnType::Boolean
        } else if inner.starts_with("int") || inner.starts_with("uint") || inner == "bigint" {
            ColumnType::Integer
        } else if inner.starts_with("float")
            || inner.starts_with("decimal")
            || inner.starts_with("double")
            || inner == "real"
        {
            ColumnType::Decimal
        } else if inner.starts_with("numeric") {
            ColumnType::Numeric
        } else if inner.contains("string") || inner.contains("char") || inner == "text" {
            ColumnType::String
        } else {
            ColumnType::Unknown
        }
    }

    /// Refine an inferred type into a column type using the sampled values.
    ///
    /// Numeric inferences become `Integer` when every non-empty sample parses
    /// as a whole number, `Decimal` otherwise.
    pub fn refine(inferred: InferredType, samples: &[String]) -> Self {
        match inferred {
            InferredType::Date => ColumnType::Date,
            InferredType::String => ColumnType::String,
            InferredType::Numeric => {
                let mut seen = false;
                let all_integers = samples
                    .iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .all(|s| {
                        seen = true;
                        s.parse::<i64>().is_ok()
                    });
                if seen && all_integers {
                    ColumnType::Integer
                } else {
                    ColumnType::Decimal
                }
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::Decimal => "decimal",
            ColumnType::Numeric => "numeric",
            ColumnType::String => "string",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Unknown => "unknown",
        }
    }
}

impl Default for ColumnType {
    fn default() -> Self {
        ColumnType::Unknown
    }
}

impl From<InferredType> for ColumnType {
    fn from(inferred: InferredType) -> Self {
        match inferred {
            InferredType::Date => ColumnType::Date,
            InferredType::Numeric => ColumnType::Numeric,
            InferredType::String => ColumnType::String,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Dimensional-modeling role of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Numeric measure.
    Fact,
    /// Descriptive attribute.
    Dimension,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Fact => "fact",
            Classification::Dimension => "dimension",
        }
    }
}

/// Cardinality of a discovered join.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipType {
    OneToOne,
    OneToMany,
    ManyToMany,
}

impl RelationshipType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipType::OneToOne => "one_to_one",
            RelationshipType::OneToMany => "one_to_many",
            RelationshipType::ManyToMany => "many_to_many",
        }
    }
}

/// Kind of table in a dimensional model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableType {
    Fact,
    Dimension,
}

impl TableType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableType::Fact => "fact",
            TableType::Dimension => "dimension",
        }
    }
}

/// Role of a column inside a recommended table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Additive measure of a fact table.
    FactMeasure,
    /// Join key (foreign key in a fact, primary column in a dimension).
    DimensionKey,
    /// Descriptive attribute of a dimension.
    DimensionAttribute,
}
