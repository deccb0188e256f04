//! Generated one-line descriptions for recommended columns.

use crate::schema::{ColumnRole, ColumnType, TableType};

/// What is known about a column when describing it.
#[derive(Debug, Clone, Copy)]
pub struct ColumnContext<'a> {
    pub table: &'a str,
    pub column: &'a str,
    pub column_type: ColumnType,
    pub table_type: TableType,
    pub role: ColumnRole,
    pub is_primary_key: bool,
    /// Column of a denormalized K-table, prefixed with its dimension's name.
    pub denormalized_from: Option<&'a str>,
}

/// Describe a column in a sentence or two.
pub fn describe_column(ctx: &ColumnContext<'_>) -> String {
    let name = ctx.column.to_lowercase();
    let mut parts: Vec<String> = Vec::new();

    if ctx.is_primary_key {
        parts.push("Primary key candidate".to_string());
    }

    match ctx.role {
        ColumnRole::FactMeasure => parts.push("Fact measure".to_string()),
        ColumnRole::DimensionKey if ctx.table_type == TableType::Fact => {
            if let Some(target) = foreign_key_target(&name) {
                parts.push(format!("Foreign key to {target} dimension"));
            } else {
                parts.push("Dimension key".to_string());
            }
        }
        ColumnRole::DimensionKey | ColumnRole::DimensionAttribute => {}
    }

    if let Some(dimension) = ctx.denormalized_from {
        parts.push(format!("Denormalized attribute from {dimension}"));
    }

    if ctx.column_type.is_temporal() || name.contains("date") || name.contains("time") {
        if ctx.table_type == TableType::Dimension {
            parts.push("Date attribute for time dimension".to_string());
        } else {
            parts.push("Date/timestamp field".to_string());
        }
    }

    if name.contains("name") {
        parts.push("Descriptive name attribute".to_string());
    }

    if parts.is_empty() && ctx.role == ColumnRole::DimensionAttribute {
        parts.push("Dimension attribute".to_string());
    }

    if parts.is_empty() {
        return format!("{} column in {} table.", ctx.column_type, ctx.table);
    }

    let mut description = parts.join(". ");
    description.push('.');
    description
}

/// `customer_id` -> `customer`, `store_key` -> `store`.
fn foreign_key_target(name: &str) -> Option<&str> {
    name.strip_suffix("_id")
        .or_else(|| name.strip_suffix("_key"))
        .filter(|stem| !stem.is_empty())
}
