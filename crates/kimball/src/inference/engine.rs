//! Type inference engine combining the date and numeric detectors.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::schema::InferredType;

use super::cache::{CacheKey, InferenceCache, PerformanceStats};
use super::date::DatePatternDetector;
use super::numeric::{NUMERIC_PATTERN, NumericMeasureDetector};

/// Result of inferring a column's semantic type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeInferenceResult {
    pub inferred_type: InferredType,
    /// Confidence in `[0, 1]`.
    pub confidence: f64,
    /// Pattern id, e.g. `YYYY-MM-DD` or `numeric_measure`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern_matched: Option<String>,
    pub reasoning: String,
    /// Up to three of the input values.
    pub sample_values: Vec<String>,
}

impl TypeInferenceResult {
    fn empty() -> Self {
        Self {
            inferred_type: InferredType::String,
            confidence: 0.0,
            pattern_matched: None,
            reasoning: "No values to analyze".to_string(),
            sample_values: Vec::new(),
        }
    }
}

/// Configuration for type inference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    /// Maximum values examined by each detector.
    pub sample_size: usize,
    /// Date confidence required to report a date.
    pub date_threshold: f64,
    /// Numeric confidence required to report a numeric measure.
    pub numeric_threshold: f64,
    /// Leading values hashed into the cache key.
    pub cache_key_values: usize,
    /// Values echoed back in the result.
    pub result_sample_values: usize,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            sample_size: 100,
            date_threshold: 0.7,
            numeric_threshold: 0.6,
            cache_key_values: 5,
            result_sample_values: 3,
        }
    }
}

/// Infers date/numeric/string types from string values.
///
/// Results are memoized per column and value fingerprint; corrections fed
/// through [`learn_from_correction`](Self::learn_from_correction) adjust the
/// detectors and drop the column's cached results.
pub struct TypeInferenceEngine {
    config: InferenceConfig,
    date_detector: DatePatternDetector,
    numeric_detector: NumericMeasureDetector,
    cache: InferenceCache,
}

impl TypeInferenceEngine {
    /// Create an engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(InferenceConfig::default())
    }

    /// Create with custom configuration.
    pub fn with_config(config: InferenceConfig) -> Self {
        Self {
            config,
            date_detector: DatePatternDetector::new(),
            numeric_detector: NumericMeasureDetector::new(),
            cache: InferenceCache::new(),
        }
    }

    pub fn config(&self) -> &InferenceConfig {
        &self.config
    }

    /// Infer the semantic type of a column from its values.
    pub fn infer<S: AsRef<str>>(&self, values: &[S], column_name: &str) -> TypeInferenceResult {
        if values.is_empty() {
            return TypeInferenceResult::empty();
        }

        let key = CacheKey::new(column_name, values, self.config.cache_key_values);
        if let Some(cached) = self.cache.get(&key) {
            return cached;
        }

        let result = self.compute(values);
        debug!(
            column = column_name,
            inferred_type = %result.inferred_type,
            confidence = result.confidence,
            "inferred column type"
        );
        self.cache.insert(key, result)
    }

    fn compute<S: AsRef<str>>(&self, values: &[S]) -> TypeInferenceResult {
        let sample_size = self.config.sample_size;
        let (date_pattern, date_confidence) = self.date_detector.detect(values, sample_size);
        let numeric = self.numeric_detector.detect(values, sample_size);

        let sample_values = values
            .iter()
            .take(self.config.result_sample_values)
            .map(|v| v.as_ref().to_string())
            .collect();

        if let Some(pattern) = date_pattern.filter(|_| date_confidence > self.config.date_threshold)
        {
            return TypeInferenceResult {
                inferred_type: InferredType::Date,
                confidence: date_confidence,
                pattern_matched: Some(pattern.to_string()),
                reasoning: format!(
                    "Detected {pattern} date pattern with {date_confidence:.2} confidence"
                ),
                sample_values,
            };
        }

        if numeric.confidence > self.config.numeric_threshold {
            return TypeInferenceResult {
                inferred_type: InferredType::Numeric,
                confidence: numeric.confidence,
                pattern_matched: Some(NUMERIC_PATTERN.to_string()),
                reasoning: format!(
                    "Detected numeric pattern with {:.2} confidence",
                    numeric.confidence
                ),
                sample_values,
            };
        }

        TypeInferenceResult {
            inferred_type: InferredType::String,
            confidence: (1.0 - date_confidence.max(numeric.confidence)).max(0.1),
            pattern_matched: None,
            reasoning: format!(
                "No strong pattern detected. Date: {date_confidence:.2}, Numeric: {:.2}",
                numeric.confidence
            ),
            sample_values,
        }
    }

    /// Feed back a user correction for a column.
    ///
    /// Cached predictions for the column update the counters of the pattern
    /// that produced them, then the column's cache entries are dropped.
    pub fn learn_from_correction(
        &self,
        column: &str,
        predicted: InferredType,
        actual: InferredType,
        confidence: f64,
    ) {
        let was_correct = predicted == actual;

        // One outcome per distinct pattern, however many fingerprints are cached.
        if predicted == InferredType::Date {
            let patterns: BTreeSet<String> = self
                .cache
                .results_for(column)
                .into_iter()
                .filter(|cached| cached.inferred_type == InferredType::Date)
                .filter_map(|cached| cached.pattern_matched)
                .collect();
            for pattern in &patterns {
                self.date_detector.record_outcome(pattern, was_correct);
            }
        } else if predicted == InferredType::Numeric {
            self.numeric_detector.record_outcome(was_correct);
        }

        let invalidated = self.cache.invalidate_column(column);
        info!(
            column,
            predicted = %predicted,
            actual = %actual,
            confidence,
            invalidated,
            "applied type correction"
        );
    }

    /// Cache usage counters.
    pub fn performance_stats(&self) -> PerformanceStats {
        self.cache.stats()
    }

    pub fn date_detector(&self) -> &DatePatternDetector {
        &self.date_detector
    }

    pub fn numeric_detector(&self) -> &NumericMeasureDetector {
        &self.numeric_detector
    }
}

impl Default for TypeInferenceEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_date_column() {
        let engine = TypeInferenceEngine::new();
        let result = engine.infer(&["20210926", "20210927", "20210928"], "sales_date");
        assert_eq!(result.inferred_type, InferredType::Date);
        assert_eq!(result.pattern_matched.as_deref(), Some("YYYYMMDD"));
        assert!(result.confidence > 0.7);
        assert_eq!(
            result.reasoning,
            "Detected YYYYMMDD date pattern with 0.90 confidence"
        );
    }

    #[test]
    fn test_infer_numeric_column() {
        let engine = TypeInferenceEngine::new();
        let result = engine.infer(&["10336.48", "205.10", "9999.99"], "amount_sales");
        assert_eq!(result.inferred_type, InferredType::Numeric);
        assert_eq!(result.pattern_matched.as_deref(), Some("numeric_measure"));
        assert!(result.reasoning.starts_with("Detected numeric pattern"));
    }

    #[test]
    fn test_infer_string_column() {
        let engine = TypeInferenceEngine::new();
        let result = engine.infer(&["Alice", "Bob", "Charlie", "Dana"], "customer_name");
        assert_eq!(result.inferred_type, InferredType::String);
        assert!(result.confidence >= 0.1);
        assert!(result.reasoning.starts_with("No strong pattern detected."));
        assert_eq!(result.sample_values, vec!["Alice", "Bob", "Charlie"]);
    }

    #[test]
    fn test_empty_values() {
        let engine = TypeInferenceEngine::new();
        let empty: [&str; 0] = [];
        let result = engine.infer(&empty, "anything");
        assert_eq!(result.inferred_type, InferredType::String);
        assert_eq!(result.confidence, 0.0);
        assert_eq!(result.reasoning, "No values to analyze");
        assert_eq!(engine.performance_stats().total_requests, 0);
    }

    #[test]
    fn test_repeated_inference_hits_cache() {
        let engine = TypeInferenceEngine::new();
        let values = ["2024-01-01", "2024-01-02"];
        let first = engine.infer(&values, "order_date");
        let second = engine.infer(&values, "order_date");
        assert_eq!(first, second);

        let stats = engine.performance_stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        assert_eq!(stats.cached_results, 1);
    }

    #[test]
    fn test_correction_invalidates_and_learns() {
        let engine = TypeInferenceEngine::new();
        let values = ["20210926", "20210927"];
        engine.infer(&values, "batch_code");

        engine.learn_from_correction("batch_code", InferredType::Date, InferredType::String, 0.9);
        assert_eq!(engine.performance_stats().cached_results, 0);

        let stats = engine.date_detector().pattern_stats("YYYYMMDD").unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.success, 0);

        // Reduced weight: 0.9 * 0.8 = 0.72, still above the date threshold
        let again = engine.infer(&values, "batch_code");
        assert!((again.confidence - 0.72).abs() < 1e-9);
    }

    #[test]
    fn test_correction_counts_once_per_pattern() {
        let engine = TypeInferenceEngine::new();
        engine.infer(&["20210926", "20210927"], "batch_code");
        engine.infer(&["20220101", "20220102"], "batch_code");
        engine.infer(&["1.5", "2.5"], "qty");
        engine.infer(&["3.5", "4.5"], "qty");
        assert_eq!(engine.performance_stats().cached_results, 4);

        engine.learn_from_correction("batch_code", InferredType::Date, InferredType::Date, 0.9);
        let stats = engine.date_detector().pattern_stats("YYYYMMDD").unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.success, 1);

        engine.learn_from_correction("qty", InferredType::Numeric, InferredType::String, 0.8);
        let stats = engine.numeric_detector().pattern_stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.success, 0);
    }

    #[test]
    fn test_non_ascii_digits_fall_back_to_string() {
        let engine = TypeInferenceEngine::new();
        let result = engine.infer(&["२०२१०९२६", "२०२१०९२७"], "d");
        assert_eq!(result.inferred_type, InferredType::String);
        assert!((0.0..=1.0).contains(&result.confidence));
    }

    #[test]
    fn test_numeric_correction_without_cache() {
        let engine = TypeInferenceEngine::new();
        engine.learn_from_correction("qty", InferredType::Numeric, InferredType::Numeric, 0.8);
        let stats = engine.numeric_detector().pattern_stats();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.success, 1);
    }

    #[test]
    fn test_custom_thresholds() {
        let engine = TypeInferenceEngine::with_config(InferenceConfig {
            date_threshold: 0.95,
            ..InferenceConfig::default()
        });
        // 0.9 is not above 0.95, so the column falls through to numeric
        let result = engine.infer(&["20210926", "20210927", "20210928"], "d");
        assert_ne!(result.inferred_type, InferredType::Date);
    }
}
