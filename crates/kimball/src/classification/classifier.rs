//! Fact/dimension classification, key candidacy, and quality scoring.

use serde::{Deserialize, Serialize};

use super::names::{is_identifier_name, is_measure_name};
use crate::schema::{Classification, ColumnProfile, ColumnType};

/// Values accepted as boolean when a text column has at most two of them.
const BOOLEAN_TOKENS: &[&str] = &["true", "false", "yes", "no", "y", "n", "t", "f", "0", "1"];

/// Classification of a single column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub classification: Classification,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Every rule that fired, in evaluation order.
    pub reasoning: Vec<String>,
    pub is_primary_key_candidate: bool,
    /// Quality in `[0, 1]`: cardinality richness averaged with completeness.
    pub quality_score: f64,
    /// `cardinality / total_rows`, 0 for an empty table.
    pub cardinality_ratio: f64,
}

/// Thresholds used by [`ColumnClassifier`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Ratio above which a numeric column is strongly a measure.
    pub high_cardinality_ratio: f64,
    /// Ratio below which a text column is a dimension.
    pub low_cardinality_ratio: f64,
    /// Minimum uniqueness for a primary key candidate.
    pub key_min_ratio: f64,
    /// Minimum distinct values for a primary key candidate.
    pub key_min_cardinality: usize,
    /// Cardinality at which the richness term of the quality score saturates.
    pub quality_cardinality_scale: f64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            high_cardinality_ratio: 0.8,
            low_cardinality_ratio: 0.1,
            key_min_ratio: 0.8,
            key_min_cardinality: 100,
            quality_cardinality_scale: 1000.0,
        }
    }
}

/// Rule-based column classifier.
#[derive(Debug, Clone, Default)]
pub struct ColumnClassifier {
    config: ClassifierConfig,
}

impl ColumnClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ClassifierConfig) -> Self {
        Self { config }
    }

    /// Classify a column with no known nulls.
    pub fn classify<S: AsRef<str>>(
        &self,
        column_name: &str,
        column_type: ColumnType,
        cardinality: usize,
        sample_values: &[S],
        total_rows: usize,
    ) -> ClassificationResult {
        self.classify_with_nulls(column_name, column_type, cardinality, sample_values, total_rows, 0)
    }

    /// Classify a profiled column.
    pub fn classify_profile(
        &self,
        profile: &ColumnProfile,
        column_type: ColumnType,
    ) -> ClassificationResult {
        self.classify_with_nulls(
            &profile.column,
            column_type,
            profile.cardinality,
            &profile.sample_values,
            profile.total_rows,
            profile.null_count,
        )
    }

    fn classify_with_nulls<S: AsRef<str>>(
        &self,
        column_name: &str,
        column_type: ColumnType,
        cardinality: usize,
        sample_values: &[S],
        total_rows: usize,
        null_count: usize,
    ) -> ClassificationResult {
        let cardinality_ratio = if total_rows > 0 {
            cardinality as f64 / total_rows as f64
        } else {
            0.0
        };

        let column_type = if looks_boolean(column_type, cardinality, sample_values) {
            ColumnType::Boolean
        } else {
            column_type
        };

        let is_identifier = is_identifier_name(column_name);
        let high_cardinality = cardinality_ratio > self.config.high_cardinality_ratio;
        let low_cardinality = cardinality_ratio < self.config.low_cardinality_ratio;

        let mut reasoning = Vec::new();
        let mut classification = None;

        // Rule 1: numeric measures
        if column_type.is_numeric() {
            classification = Some(Classification::Fact);
            reasoning.push(format!("{column_type} type suggests a measure"));
            if high_cardinality {
                reasoning.push(format!("high cardinality ratio ({cardinality_ratio:.2})"));
            }
            if is_measure_name(column_name) {
                reasoning.push("measure-style column name".to_string());
            }
        }

        // Rules 2 and 3: temporal and boolean attributes
        if column_type.is_temporal() {
            classification.get_or_insert(Classification::Dimension);
            reasoning.push(format!("{column_type} type is a dimension attribute"));
        }
        if column_type == ColumnType::Boolean {
            classification.get_or_insert(Classification::Dimension);
            reasoning.push("boolean values are a dimension attribute".to_string());
        }

        // Rule 4: identifiers override the numeric default
        if is_identifier {
            classification = Some(Classification::Dimension);
            reasoning.push("identifier-style column name".to_string());
        }

        // Rule 5: low-cardinality text
        let low_cardinality_text = !column_type.is_numeric() && low_cardinality;
        if low_cardinality_text {
            classification.get_or_insert(Classification::Dimension);
            reasoning.push(format!("low cardinality ratio ({cardinality_ratio:.2})"));
        }

        let classification = classification.unwrap_or_else(|| {
            reasoning.push(format!("{column_type} type defaults to dimension"));
            Classification::Dimension
        });

        let mut confidence: f64 = 0.5;
        match classification {
            Classification::Fact => {
                confidence += 0.3;
                if high_cardinality {
                    confidence += 0.2;
                }
                if !is_identifier {
                    confidence += 0.1;
                }
            }
            Classification::Dimension => {
                if column_type.is_temporal() || column_type == ColumnType::Boolean {
                    confidence += 0.3;
                }
                if is_identifier {
                    confidence += 0.2;
                }
                if low_cardinality_text {
                    confidence += 0.1;
                }
            }
        }

        let is_primary_key_candidate = classification == Classification::Dimension
            && null_count == 0
            && cardinality_ratio >= self.config.key_min_ratio
            && cardinality >= self.config.key_min_cardinality
            && column_type.is_key_type();

        ClassificationResult {
            classification,
            confidence: confidence.clamp(0.0, 1.0),
            reasoning,
            is_primary_key_candidate,
            quality_score: self.quality_score(cardinality, null_count, total_rows),
            cardinality_ratio,
        }
    }

    /// Average of cardinality richness and completeness, 0 for an empty table.
    pub fn quality_score(&self, cardinality: usize, null_count: usize, total_rows: usize) -> f64 {
        if total_rows == 0 {
            return 0.0;
        }
        let richness = (cardinality as f64 / self.config.quality_cardinality_scale).min(1.0);
        let completeness = 1.0 - (null_count as f64 / total_rows as f64);
        ((richness + completeness) / 2.0).clamp(0.0, 1.0)
    }
}

/// Text columns holding at most two boolean tokens.
fn looks_boolean<S: AsRef<str>>(column_type: ColumnType, cardinality: usize, samples: &[S]) -> bool {
    column_type == ColumnType::String
        && (1..=2).contains(&cardinality)
        && !samples.is_empty()
        && samples.iter().all(|s| {
            let lower = s.as_ref().trim().to_lowercase();
            BOOLEAN_TOKENS.contains(&lower.as_str())
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_SAMPLES: [&str; 0] = [];

    #[test]
    fn test_numeric_measure_is_fact() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("unit_price", ColumnType::Decimal, 950, &NO_SAMPLES, 1000);
        assert_eq!(result.classification, Classification::Fact);
        assert_eq!(result.confidence, 1.0);
        assert!(result.reasoning.iter().any(|r| r.contains("measure-style")));
        assert!(!result.is_primary_key_candidate);
    }

    #[test]
    fn test_low_cardinality_numeric_fact() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("discount", ColumnType::Integer, 5, &NO_SAMPLES, 1000);
        assert_eq!(result.classification, Classification::Fact);
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_identifier_overrides_numeric() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("customer_id", ColumnType::Integer, 500, &NO_SAMPLES, 500);
        assert_eq!(result.classification, Classification::Dimension);
        assert!((result.confidence - 0.7).abs() < 1e-9);
        assert!(result.is_primary_key_candidate);
    }

    #[test]
    fn test_dates_are_dimensions() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("order_date", ColumnType::Date, 365, &NO_SAMPLES, 10_000);
        assert_eq!(result.classification, Classification::Dimension);
        // date +0.3, low cardinality text +0.1
        assert!((result.confidence - 0.9).abs() < 1e-9);
    }

    #[test]
    fn test_boolean_text_detected() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("active", ColumnType::String, 2, &["Yes", "No"], 50);
        assert_eq!(result.classification, Classification::Dimension);
        assert!(result.reasoning.iter().any(|r| r.contains("boolean")));
    }

    #[test]
    fn test_high_cardinality_text_fallback() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("comment", ColumnType::String, 90, &NO_SAMPLES, 100);
        assert_eq!(result.classification, Classification::Dimension);
        assert_eq!(result.confidence, 0.5);
        assert_eq!(result.reasoning, vec!["string type defaults to dimension"]);
    }

    #[test]
    fn test_primary_key_requires_no_nulls() {
        let classifier = ColumnClassifier::new();
        let profile = ColumnProfile::new("customers", "customer_code", "String", 990, 10, 1000);
        let result = classifier.classify_profile(&profile, ColumnType::String);
        assert_eq!(result.classification, Classification::Dimension);
        assert!(!result.is_primary_key_candidate);

        let profile = ColumnProfile::new("customers", "customer_code", "String", 1000, 0, 1000);
        assert!(classifier.classify_profile(&profile, ColumnType::String).is_primary_key_candidate);
    }

    #[test]
    fn test_small_tables_have_no_key_candidates() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("region_code", ColumnType::String, 50, &NO_SAMPLES, 50);
        assert!(!result.is_primary_key_candidate);
    }

    #[test]
    fn test_quality_score() {
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.quality_score(10, 0, 0), 0.0);
        assert!((classifier.quality_score(2000, 0, 100) - 1.0).abs() < 1e-9);
        assert!((classifier.quality_score(500, 50, 100) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_empty_table() {
        let classifier = ColumnClassifier::new();
        let result = classifier.classify("x", ColumnType::String, 0, &NO_SAMPLES, 0);
        assert_eq!(result.cardinality_ratio, 0.0);
        assert_eq!(result.quality_score, 0.0);
        assert!((0.0..=1.0).contains(&result.confidence));
    }
}
