//! Column classification into facts and dimensions.

mod classifier;
pub mod names;

pub use classifier::{ClassificationResult, ClassifierConfig, ColumnClassifier};
