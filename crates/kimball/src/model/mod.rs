//! Dimensional model recommendation.
//!
//! The [`ErdModel`] types each analyzed table as a fact or dimension table.
//! The [`DimensionalModelRecommender`] then turns that metadata and the
//! per-table hierarchies into named fact and dimension recommendations, each
//! fact carrying a denormalized K-table plan.

pub mod definitions;
mod erd;
mod recommender;

pub use definitions::{ColumnContext, describe_column};
pub use erd::{ErdModel, ErdTable, ForeignKeyCandidate, TablePair, is_fact_column};
pub use recommender::{
    DimensionalModelRecommender, JoinKey, JoinResolution, KTablePlan, ModelRecommendation,
    RecommendedColumn, RecommenderConfig,
};
