//! Date pattern detection with per-pattern confidence and learned weighting.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

use super::{PatternStats, stratified_sample};

/// A named date format with its matcher and semantic validator.
struct DatePattern {
    name: &'static str,
    regex: Regex,
    base_confidence: f64,
    validator: fn(&str) -> bool,
}

// Order matters for ties: the first pattern with the best score wins.
static DATE_PATTERNS: Lazy<Vec<DatePattern>> = Lazy::new(|| {
    vec![
        DatePattern {
            name: "YYYYMMDD",
            regex: Regex::new(r"^[0-9]{8}$").unwrap(),
            base_confidence: 0.9,
            validator: validate_yyyymmdd,
        },
        DatePattern {
            name: "YYYY-MM-DD",
            regex: Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").unwrap(),
            base_confidence: 0.95,
            validator: validate_iso_date,
        },
        DatePattern {
            name: "MM/DD/YYYY",
            regex: Regex::new(r"^[0-9]{1,2}/[0-9]{1,2}/[0-9]{4}$").unwrap(),
            base_confidence: 0.9,
            validator: validate_mm_dd_yyyy,
        },
        DatePattern {
            name: "DD-MM-YYYY",
            regex: Regex::new(r"^[0-9]{1,2}-[0-9]{1,2}-[0-9]{4}$").unwrap(),
            base_confidence: 0.9,
            validator: validate_dd_mm_yyyy,
        },
        DatePattern {
            name: "Unix Timestamp",
            regex: Regex::new(r"^[0-9]{10}$").unwrap(),
            base_confidence: 0.8,
            validator: validate_unix_timestamp,
        },
        DatePattern {
            name: "ISO DateTime",
            regex: Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}T[0-9]{2}:[0-9]{2}:[0-9]{2}").unwrap(),
            base_confidence: 0.95,
            validator: validate_iso_datetime,
        },
    ]
});

/// Upper bound for plausible Unix timestamps (2100-01-01T00:00:00Z).
const MAX_UNIX_TIMESTAMP: i64 = 4_102_444_800;

/// Detects which date format, if any, a column's values follow.
///
/// Each pattern is scored as
/// `base_confidence * match_ratio * validation_ratio`, then weighted by the
/// pattern's historical success rate once corrections have been recorded.
pub struct DatePatternDetector {
    stats: RwLock<HashMap<&'static str, PatternStats>>,
}

impl DatePatternDetector {
    pub fn new() -> Self {
        let stats = DATE_PATTERNS
            .iter()
            .map(|p| (p.name, PatternStats::default()))
            .collect();
        Self {
            stats: RwLock::new(stats),
        }
    }

    /// Find the best matching date pattern.
    ///
    /// Returns `(None, 0.0)` when no pattern matches any sampled value.
    pub fn detect<S: AsRef<str>>(
        &self,
        values: &[S],
        sample_size: usize,
    ) -> (Option<&'static str>, f64) {
        if values.is_empty() {
            return (None, 0.0);
        }

        let sample = stratified_sample(values, sample_size);
        let stats = self.stats.read().unwrap_or_else(PoisonError::into_inner);

        let mut best: Option<(&'static str, f64)> = None;
        for pattern in DATE_PATTERNS.iter() {
            let mut matches = 0usize;
            let mut valid_matches = 0usize;

            for value in &sample {
                let value = value.trim();
                if pattern.regex.is_match(value) {
                    matches += 1;
                    if (pattern.validator)(value) {
                        valid_matches += 1;
                    }
                }
            }

            if matches == 0 {
                continue;
            }

            let match_ratio = matches as f64 / sample.len() as f64;
            let validation_ratio = valid_matches as f64 / matches as f64;
            let raw_confidence = pattern.base_confidence * match_ratio * validation_ratio;
            let factor = stats
                .get(pattern.name)
                .map(PatternStats::adjustment_factor)
                .unwrap_or(1.0);
            let confidence = (raw_confidence * factor).clamp(0.0, 1.0);

            if best.is_none_or(|(_, c)| confidence > c) {
                best = Some((pattern.name, confidence));
            }
        }

        match best {
            Some((name, confidence)) => (Some(name), confidence),
            None => (None, 0.0),
        }
    }

    /// Record whether a reported pattern turned out to be correct.
    ///
    /// Unknown pattern names are ignored.
    pub fn record_outcome(&self, pattern: &str, was_correct: bool) {
        let mut stats = self.stats.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(entry) = stats.get_mut(pattern) {
            entry.record(was_correct);
        }
    }

    /// Current learning counters for a pattern.
    pub fn pattern_stats(&self, pattern: &str) -> Option<PatternStats> {
        self.stats
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(pattern)
            .copied()
    }
}

impl Default for DatePatternDetector {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_yyyymmdd(value: &str) -> bool {
    let (Some(year), Some(month), Some(day)) = (
        value.get(..4).and_then(|y| y.parse::<i32>().ok()),
        value.get(4..6).and_then(|m| m.parse::<u32>().ok()),
        value.get(6..8).and_then(|d| d.parse::<u32>().ok()),
    ) else {
        return false;
    };
    (1900..=2100).contains(&year) && NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn validate_iso_date(value: &str) -> bool {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}

/// Parse three separated numeric parts into a calendar date.
fn ymd_from_parts(value: &str, separator: char, order: [usize; 3]) -> bool {
    let parts: Vec<&str> = value.split(separator).collect();
    if parts.len() != 3 {
        return false;
    }
    let [y, m, d] = order;
    let (Ok(year), Ok(month), Ok(day)) = (
        parts[y].parse::<i32>(),
        parts[m].parse::<u32>(),
        parts[d].parse::<u32>(),
    ) else {
        return false;
    };
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn validate_mm_dd_yyyy(value: &str) -> bool {
    ymd_from_parts(value, '/', [2, 0, 1])
}

fn validate_dd_mm_yyyy(value: &str) -> bool {
    ymd_from_parts(value, '-', [2, 1, 0])
}

fn validate_unix_timestamp(value: &str) -> bool {
    match value.parse::<i64>() {
        Ok(ts) => (0..=MAX_UNIX_TIMESTAMP).contains(&ts) && DateTime::from_timestamp(ts, 0).is_some(),
        Err(_) => false,
    }
}

fn validate_iso_datetime(value: &str) -> bool {
    let normalized = match value.strip_suffix('Z') {
        Some(stripped) => format!("{stripped}+00:00"),
        None => value.to_string(),
    };
    DateTime::parse_from_rfc3339(&normalized).is_ok()
        || DateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f%:z").is_ok()
        || NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
}
