//! KIMBALL: schema inference and dimensional modeling for untyped tables.
//!
//! KIMBALL takes bronze-layer tables, where every column is an untyped
//! string, and recommends a star schema for them. Each column's type is
//! inferred from sampled values, the column is classified as a fact measure
//! or a dimension attribute, joins are discovered by comparing distinct-value
//! sets, and per-table attribute hierarchies are ordered by cardinality.
//!
//! # Core Principles
//!
//! - **Total**: the engine never fails on bad data; low confidence is reported instead
//! - **Store-agnostic**: all data access goes through the [`ProfileStore`] trait
//! - **Correctable**: inference learns from corrections fed back to the engine
//!
//! # Example
//!
//! ```no_run
//! use kimball::{BronzeStore, Kimball, StoreConfig};
//!
//! let store = BronzeStore::from_dir("bronze/", StoreConfig::default()).unwrap();
//! let build = Kimball::new().build(&store);
//!
//! println!("Stage: {}", build.stage);
//! println!("Relationships: {}", build.relationships.len());
//! println!("Recommendations: {}", build.recommendations.len());
//! ```

pub mod classification;
pub mod error;
pub mod hierarchy;
pub mod inference;
pub mod input;
pub mod model;
pub mod quality;
pub mod relationship;
pub mod schema;

mod kimball;
mod parallel;

pub use crate::kimball::{BuildStage, Kimball, KimballConfig, ModelBuild};
pub use classification::{ClassificationResult, ColumnClassifier};
pub use error::{KimballError, Result};
pub use hierarchy::{Hierarchy, HierarchyBuilder, HierarchyLevel};
pub use inference::{TypeInferenceEngine, TypeInferenceResult};
pub use input::{BronzeStore, DataTable, ProfileStore, SourceMetadata, StoreConfig};
pub use model::{DimensionalModelRecommender, ErdModel, KTablePlan, ModelRecommendation};
pub use quality::{QualityAssessor, QualityReport};
pub use relationship::{Relationship, RelationshipDiscoverer};
pub use schema::{
    Classification, ColumnAnalysis, ColumnProfile, ColumnRole, ColumnType, InferredType,
    RelationshipType, TableAnalysis, TableType,
};
