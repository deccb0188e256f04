//! Attribute hierarchies built from dimension-column cardinality.

mod builder;
mod similarity;

pub use builder::{Hierarchy, HierarchyBuilder, HierarchyLevel, LevelRole, Sibling};
pub use similarity::{SIBLING_SIMILARITY_THRESHOLD, cardinality_bucket, name_similarity};
