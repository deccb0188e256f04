//! Schema types for column profiles, analysis results, and model vocabulary.

mod column;
mod table;
mod types;

pub use column::{ColumnAnalysis, ColumnInfo, ColumnProfile};
pub use table::{SchemaSummary, TableAnalysis, TableSummary};
pub use types::{
    Classification, ColumnRole, ColumnType, InferredType, RelationshipType, TableType,
};
