//! Catalog-wide quality assessment.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::issue::{
    IssueType, QualityIssue, QualityRecommendation, RecommendationKind, Severity,
};
use crate::schema::{ColumnAnalysis, TableAnalysis};

/// Bounds used by [`QualityAssessor`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Null percentage above which a column has too many nulls.
    pub high_null_percentage: f64,
    /// Cardinality below which a dimension column is flagged.
    pub low_cardinality: usize,
    /// Quality score below which a column is poor.
    pub poor_quality_score: f64,
    /// Cardinality above which a dimension column may be a key.
    pub key_min_cardinality: usize,
    /// Null percentage below which a dimension column may be a key.
    pub key_max_null_percentage: f64,
    /// Overall score below which overall quality is flagged.
    pub low_overall_score: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            high_null_percentage: 50.0,
            low_cardinality: 10,
            poor_quality_score: 0.3,
            key_min_cardinality: 100,
            key_max_null_percentage: 5.0,
            low_overall_score: 0.5,
        }
    }
}

/// Quality of a single table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableQuality {
    pub table: String,
    /// Mean column quality score, 0 for a table without columns.
    pub score: f64,
    pub column_count: usize,
    pub row_count: usize,
    pub issue_count: usize,
}

/// Result of assessing every successfully profiled table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Mean table score.
    pub overall_score: f64,
    /// Tables scoring above 0.8.
    pub high_quality_tables: usize,
    /// Tables scoring above 0.5 and at most 0.8.
    pub medium_quality_tables: usize,
    pub low_quality_tables: usize,
    pub table_scores: IndexMap<String, TableQuality>,
    /// Issues ordered from most to least severe.
    pub issues: Vec<QualityIssue>,
    pub recommendations: Vec<QualityRecommendation>,
}

impl QualityReport {
    /// Issues of one kind.
    pub fn issues_of(&self, issue_type: IssueType) -> impl Iterator<Item = &QualityIssue> {
        self.issues.iter().filter(move |i| i.issue_type == issue_type)
    }
}

/// Flags column quality problems and summarises them per table.
#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    config: QualityConfig,
}

impl QualityAssessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: QualityConfig) -> Self {
        Self { config }
    }

    /// Assess the tables. Tables that failed profiling are left out.
    pub fn assess(&self, tables: &[TableAnalysis]) -> QualityReport {
        let mut report = QualityReport::default();

        for table in tables.iter().filter(|t| t.is_ok()) {
            let mut table_issues: Vec<QualityIssue> = table
                .columns
                .iter()
                .flat_map(|c| self.column_issues(&table.table, c))
                .collect();

            let score = if table.columns.is_empty() {
                0.0
            } else {
                table
                    .columns
                    .iter()
                    .map(|c| c.classification.quality_score)
                    .sum::<f64>()
                    / table.columns.len() as f64
            };

            if score > 0.8 {
                report.high_quality_tables += 1;
            } else if score > 0.5 {
                report.medium_quality_tables += 1;
            } else {
                report.low_quality_tables += 1;
            }

            report.table_scores.insert(
                table.table.clone(),
                TableQuality {
                    table: table.table.clone(),
                    score,
                    column_count: table.columns.len(),
                    row_count: table.row_count,
                    issue_count: table_issues.len(),
                },
            );
            report.issues.append(&mut table_issues);
        }

        if !report.table_scores.is_empty() {
            report.overall_score = report.table_scores.values().map(|t| t.score).sum::<f64>()
                / report.table_scores.len() as f64;
        }

        report.issues.sort_by(|a, b| b.severity.cmp(&a.severity));
        report.recommendations = self.recommendations(&report);

        info!(
            overall_score = report.overall_score,
            issues = report.issues.len(),
            "quality assessment complete"
        );
        report
    }

    fn column_issues(&self, table: &str, column: &ColumnAnalysis) -> Vec<QualityIssue> {
        let name = column.name();
        let null_percentage = column.profile.null_percentage();
        let cardinality = column.profile.cardinality;
        let score = column.classification.quality_score;
        let mut issues = Vec::new();

        if null_percentage > self.config.high_null_percentage {
            issues.push(QualityIssue::new(
                IssueType::HighNulls,
                Severity::High,
                table,
                name,
                format!("Column {name} has {null_percentage:.1}% null values"),
            ));
        }

        if column.is_dimension() && cardinality < self.config.low_cardinality {
            issues.push(QualityIssue::new(
                IssueType::LowCardinality,
                Severity::Medium,
                table,
                name,
                format!("Dimension column {name} has very low cardinality ({cardinality})"),
            ));
        }

        if score < self.config.poor_quality_score {
            issues.push(QualityIssue::new(
                IssueType::PoorQuality,
                Severity::High,
                table,
                name,
                format!("Column {name} has very low quality score ({score:.2})"),
            ));
        }

        if column.is_dimension()
            && !column.is_primary_key_candidate()
            && cardinality > self.config.key_min_cardinality
            && null_percentage < self.config.key_max_null_percentage
        {
            issues.push(QualityIssue::new(
                IssueType::PotentialPrimaryKey,
                Severity::Low,
                table,
                name,
                format!("Column {name} might be a good primary key candidate"),
            ));
        }

        issues
    }

    fn recommendations(&self, report: &QualityReport) -> Vec<QualityRecommendation> {
        let mut recommendations = Vec::new();

        if report.overall_score < self.config.low_overall_score {
            recommendations.push(QualityRecommendation::new(
                RecommendationKind::OverallQuality,
                Severity::High,
                "Improve Overall Data Quality",
                "The overall data quality is low. Focus on addressing null values and data completeness."
                    .to_string(),
                &[
                    "Review and fix null value patterns",
                    "Implement data validation rules",
                    "Consider data cleansing processes",
                ],
            ));
        }

        let high_nulls = report.issues_of(IssueType::HighNulls).count();
        if high_nulls > 0 {
            recommendations.push(QualityRecommendation::new(
                RecommendationKind::NullValues,
                Severity::High,
                "Address High Null Percentages",
                format!("Found {high_nulls} columns with high null percentages."),
                &[
                    "Investigate null value patterns",
                    "Consider default values or data imputation",
                    "Review data collection processes",
                ],
            ));
        }

        let keys = report.issues_of(IssueType::PotentialPrimaryKey).count();
        if keys > 0 {
            recommendations.push(QualityRecommendation::new(
                RecommendationKind::PrimaryKeys,
                Severity::Medium,
                "Review Primary Key Candidates",
                format!("Found {keys} potential primary key candidates."),
                &[
                    "Validate primary key candidates",
                    "Implement proper primary keys",
                    "Review table relationships",
                ],
            ));
        }

        let low_cardinality = report.issues_of(IssueType::LowCardinality).count();
        if low_cardinality > 0 {
            recommendations.push(QualityRecommendation::new(
                RecommendationKind::Cardinality,
                Severity::Medium,
                "Review Low Cardinality Columns",
                format!("Found {low_cardinality} columns with very low cardinality."),
                &[
                    "Review if low cardinality is expected",
                    "Consider data aggregation strategies",
                    "Validate data collection completeness",
                ],
            ));
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::ClassificationResult;
    use crate::inference::TypeInferenceResult;
    use crate::schema::{Classification, ColumnProfile, ColumnType, InferredType};

    fn column(
        name: &str,
        classification: Classification,
        cardinality: usize,
        nulls: usize,
        quality: f64,
        is_key: bool,
    ) -> ColumnAnalysis {
        ColumnAnalysis {
            profile: ColumnProfile::new("t", name, "String", cardinality, nulls, 1000),
            column_type: ColumnType::String,
            inference: TypeInferenceResult {
                inferred_type: InferredType::String,
                confidence: 0.9,
                pattern_matched: None,
                reasoning: String::new(),
                sample_values: Vec::new(),
            },
            classification: ClassificationResult {
                classification,
                confidence: 0.8,
                reasoning: Vec::new(),
                is_primary_key_candidate: is_key,
                quality_score: quality,
                cardinality_ratio: cardinality as f64 / 1000.0,
            },
        }
    }

    #[test]
    fn test_column_issues() {
        let assessor = QualityAssessor::new();
        let table = TableAnalysis::new(
            "t",
            vec![
                column("mostly_empty", Classification::Fact, 500, 600, 0.45, false),
                column("flag", Classification::Dimension, 3, 0, 0.5, false),
                column("noise", Classification::Fact, 1, 0, 0.2, false),
                column("customer_code", Classification::Dimension, 900, 10, 0.9, false),
                column("customer_id", Classification::Dimension, 1000, 0, 1.0, true),
            ],
        );

        let report = assessor.assess(&[table]);
        let kinds: Vec<(IssueType, &str)> = report
            .issues
            .iter()
            .map(|i| (i.issue_type, i.column.as_str()))
            .collect();

        assert_eq!(
            kinds,
            vec![
                (IssueType::HighNulls, "mostly_empty"),
                (IssueType::PoorQuality, "noise"),
                (IssueType::LowCardinality, "flag"),
                (IssueType::PotentialPrimaryKey, "customer_code"),
            ]
        );
        assert_eq!(report.issues[0].message, "Column mostly_empty has 60.0% null values");
    }

    #[test]
    fn test_scores_and_recommendations() {
        let assessor = QualityAssessor::new();
        let good = TableAnalysis::new(
            "good",
            vec![column("id", Classification::Dimension, 1000, 0, 1.0, true)],
        );
        let poor = TableAnalysis::new(
            "poor",
            vec![
                column("a", Classification::Fact, 50, 0, 0.4, false),
                column("b", Classification::Fact, 50, 0, 0.2, false),
            ],
        );
        let failed = TableAnalysis::failed("broken", "unreadable");

        let report = assessor.assess(&[good, poor, failed]);

        assert_eq!(report.table_scores.len(), 2);
        assert!((report.table_scores["poor"].score - 0.3).abs() < 1e-9);
        assert!((report.overall_score - 0.65).abs() < 1e-9);
        assert_eq!(report.high_quality_tables, 1);
        assert_eq!(report.low_quality_tables, 1);

        assert!(report.recommendations.is_empty());
    }

    #[test]
    fn test_empty_catalog() {
        let report = QualityAssessor::new().assess(&[]);
        assert_eq!(report.overall_score, 0.0);
        assert_eq!(report.recommendations.len(), 1);
        assert_eq!(report.recommendations[0].kind, RecommendationKind::OverallQuality);
    }
}
