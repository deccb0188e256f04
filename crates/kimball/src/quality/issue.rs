//! Quality issue and recommendation types.

use serde::{Deserialize, Serialize};

/// Kind of column-level quality issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// More than half the rows are null.
    HighNulls,
    /// Dimension column with very few distinct values.
    LowCardinality,
    /// Quality score below the poor-quality bound.
    PoorQuality,
    /// Complete, high-cardinality dimension column not flagged as a key.
    PotentialPrimaryKey,
}

impl IssueType {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            IssueType::HighNulls => "High Nulls",
            IssueType::LowCardinality => "Low Cardinality",
            IssueType::PoorQuality => "Poor Quality",
            IssueType::PotentialPrimaryKey => "Potential Primary Key",
        }
    }
}

/// Severity of an issue, or priority of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// A quality problem found on one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub table: String,
    pub column: String,
    pub message: String,
}

impl QualityIssue {
    pub fn new(
        issue_type: IssueType,
        severity: Severity,
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            issue_type,
            severity,
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }
}

/// Area a recommendation addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    OverallQuality,
    NullValues,
    PrimaryKeys,
    Cardinality,
}

/// Suggested follow-up for a class of issues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityRecommendation {
    #[serde(rename = "type")]
    pub kind: RecommendationKind,
    pub priority: Severity,
    pub title: String,
    pub description: String,
    pub actions: Vec<String>,
}

impl QualityRecommendation {
    pub(crate) fn new(
        kind: RecommendationKind,
        priority: Severity,
        title: &str,
        description: String,
        actions: &[&str],
    ) -> Self {
        Self {
            kind,
            priority,
            title: title.to_string(),
            description,
            actions: actions.iter().map(|a| a.to_string()).collect(),
        }
    }
}
