//! Numeric measure detection from weighted value features.

use std::sync::{PoisonError, RwLock};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::{PatternStats, stratified_sample};

/// Key under which numeric learning counters are recorded.
pub const NUMERIC_PATTERN: &str = "numeric_measure";

static DECIMAL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+\.[0-9]+$").unwrap());

// Evaluated in order; a value counts toward the first pattern it matches.
static NUMERIC_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    vec![
        ("decimal", DECIMAL.clone()),
        ("integer", Regex::new(r"^[0-9]+$").unwrap()),
        ("currency", Regex::new(r"^\$?[0-9]+(?:,[0-9]{3})*(?:\.[0-9]{2})?$").unwrap()),
        ("percentage", Regex::new(r"^[0-9]+(?:\.[0-9]+)?%$").unwrap()),
        ("scientific", Regex::new(r"^[0-9]+(?:\.[0-9]+)?[eE][+-]?[0-9]+$").unwrap()),
        ("negative", Regex::new(r"^-[0-9]+(?:\.[0-9]+)?$").unwrap()),
    ]
});

const PATTERN_MATCH_WEIGHT: f64 = 0.4;
const DECIMAL_WEIGHT: f64 = 0.2;
const LENGTH_WEIGHT: f64 = 0.1;
const RANGE_WEIGHT: f64 = 0.2;
const PARSE_WEIGHT: f64 = 0.1;

/// Confidence above which a column is considered numeric on its own.
const NUMERIC_CUTOFF: f64 = 0.7;

/// Feature scores behind a numeric confidence, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NumericFeatures {
    /// Share of values matching any numeric pattern.
    pub pattern_match_ratio: f64,
    /// Share of values matching the plain decimal pattern.
    pub decimal_ratio: f64,
    /// Uniformity of string lengths.
    pub length_consistency: f64,
    /// Inverse coefficient of variation of the parsed values.
    pub range_consistency: f64,
    /// Share of values that parse as finite numbers.
    pub parse_ratio: f64,
}

impl NumericFeatures {
    /// Weighted sum, capped at 1.
    pub fn weighted_score(&self) -> f64 {
        let score = self.pattern_match_ratio * PATTERN_MATCH_WEIGHT
            + self.decimal_ratio * DECIMAL_WEIGHT
            + self.length_consistency * LENGTH_WEIGHT
            + self.range_consistency * RANGE_WEIGHT
            + self.parse_ratio * PARSE_WEIGHT;
        score.min(1.0)
    }
}

/// Outcome of numeric detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericDetection {
    pub is_numeric: bool,
    pub confidence: f64,
    pub features: NumericFeatures,
}

/// Detects whether a column's values are numeric measures.
pub struct NumericMeasureDetector {
    stats: RwLock<PatternStats>,
}

impl NumericMeasureDetector {
    pub fn new() -> Self {
        Self {
            stats: RwLock::new(PatternStats::default()),
        }
    }

    /// Score the values as a numeric measure.
    pub fn detect<S: AsRef<str>>(&self, values: &[S], sample_size: usize) -> NumericDetection {
        if values.is_empty() {
            return NumericDetection {
                is_numeric: false,
                confidence: 0.0,
                features: NumericFeatures::default(),
            };
        }

        let sample: Vec<&str> = stratified_sample(values, sample_size)
            .into_iter()
            .map(str::trim)
            .collect();
        let features = extract_features(&sample);

        let factor = self
            .stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .adjustment_factor();
        let confidence = (features.weighted_score() * factor).clamp(0.0, 1.0);

        NumericDetection {
            is_numeric: confidence > NUMERIC_CUTOFF,
            confidence,
            features,
        }
    }

    /// Record whether a numeric prediction turned out to be correct.
    pub fn record_outcome(&self, was_correct: bool) {
        self.stats
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .record(was_correct);
    }

    /// Current learning counters.
    pub fn pattern_stats(&self) -> PatternStats {
        *self.stats.read().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for NumericMeasureDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn extract_features(sample: &[&str]) -> NumericFeatures {
    let n = sample.len() as f64;

    let mut pattern_matches = 0usize;
    let mut decimal_count = 0usize;
    for value in sample {
        if let Some((name, _)) = NUMERIC_PATTERNS.iter().find(|(_, re)| re.is_match(value)) {
            pattern_matches += 1;
            if *name == "decimal" {
                decimal_count += 1;
            }
        }
    }

    let lengths: Vec<f64> = sample.iter().map(|v| v.chars().count() as f64).collect();
    let (mean_len, std_len) = mean_and_std(&lengths);
    let length_consistency = 1.0 / (1.0 + std_len / mean_len.max(1.0));

    let parsed: Vec<f64> = sample.iter().filter_map(|v| parse_number(v)).collect();
    let range_consistency = if parsed.len() > 1 {
        let (_, std) = mean_and_std(&parsed);
        let mean_abs = parsed.iter().map(|v| v.abs()).sum::<f64>() / parsed.len() as f64;
        if std > 0.0 && mean_abs > 0.0 {
            1.0 / (1.0 + std / mean_abs)
        } else {
            0.0
        }
    } else {
        0.0
    };

    NumericFeatures {
        pattern_match_ratio: pattern_matches as f64 / n,
        decimal_ratio: decimal_count as f64 / n,
        length_consistency,
        range_consistency,
        parse_ratio: parsed.len() as f64 / n,
    }
}

/// Parse a value after stripping grouping, currency, and percent symbols.
fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | '%'))
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Population mean and standard deviation.
fn mean_and_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, variance.sqrt())
}
