//! Data-quality assessment over profiled tables.

mod assessor;
mod issue;

pub use assessor::{QualityAssessor, QualityConfig, QualityReport, TableQuality};
pub use issue::{IssueType, QualityIssue, QualityRecommendation, RecommendationKind, Severity};
