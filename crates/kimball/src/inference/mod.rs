//! Type inference for bronze-layer string columns.

mod cache;
mod date;
mod engine;
mod numeric;

use serde::{Deserialize, Serialize};

pub use cache::{CacheKey, InferenceCache, PerformanceStats};
pub use date::DatePatternDetector;
pub use engine::{InferenceConfig, TypeInferenceEngine, TypeInferenceResult};
pub use numeric::{NUMERIC_PATTERN, NumericDetection, NumericFeatures, NumericMeasureDetector};

/// Success counters for one detector pattern.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternStats {
    pub success: u64,
    pub total: u64,
}

impl PatternStats {
    pub fn record(&mut self, was_correct: bool) {
        self.total += 1;
        if was_correct {
            self.success += 1;
        }
    }

    /// Confidence multiplier: 1.0 without history, `0.8 + 0.2 * success_rate` after.
    pub fn adjustment_factor(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            0.8 + 0.2 * (self.success as f64 / self.total as f64)
        }
    }
}

/// Pick up to `max` values at evenly spaced indices across the whole input.
pub(crate) fn stratified_sample<S: AsRef<str>>(values: &[S], max: usize) -> Vec<&str> {
    let len = values.len();
    if len <= max {
        return values.iter().map(AsRef::as_ref).collect();
    }
    (0..max).map(|i| values[i * len / max].as_ref()).collect()
}
