//! Memoization of inference results keyed by column and value fingerprint.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::TypeInferenceResult;

/// Cache key: column name plus a digest of the leading values.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub column: String,
    pub fingerprint: String,
}

impl CacheKey {
    /// Build a key from the first `prefix_len` values.
    pub fn new<S: AsRef<str>>(column: &str, values: &[S], prefix_len: usize) -> Self {
        let joined = values
            .iter()
            .take(prefix_len)
            .map(AsRef::as_ref)
            .collect::<Vec<_>>()
            .join("|");
        let digest = Sha256::digest(joined.as_bytes());
        let fingerprint = digest[..8].iter().map(|b| format!("{b:02x}")).collect();
        Self {
            column: column.to_string(),
            fingerprint,
        }
    }
}

/// Cache usage counters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceStats {
    pub cache_hit_rate: f64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub total_requests: u64,
    pub cached_results: usize,
}

/// Thread-safe result cache shared by all callers of one engine.
#[derive(Default)]
pub struct InferenceCache {
    entries: RwLock<HashMap<CacheKey, TypeInferenceResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl InferenceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a result, counting the hit or miss.
    pub fn get(&self, key: &CacheKey) -> Option<TypeInferenceResult> {
        let found = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();
        match found {
            Some(_) => self.hits.fetch_add(1, Ordering::Relaxed),
            None => self.misses.fetch_add(1, Ordering::Relaxed),
        };
        found
    }

    /// Store a result unless another caller already did; returns the stored value.
    pub fn insert(&self, key: CacheKey, result: TypeInferenceResult) -> TypeInferenceResult {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key)
            .or_insert(result)
            .clone()
    }

    /// Cached results for a column.
    pub fn results_for(&self, column: &str) -> Vec<TypeInferenceResult> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|(k, _)| k.column == column)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// Drop every entry for a column. Returns the number removed.
    pub fn invalidate_column(&self, column: &str) -> usize {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|k, _| k.column != column);
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> PerformanceStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;
        PerformanceStats {
            cache_hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            cache_hits: hits,
            cache_misses: misses,
            total_requests: total,
            cached_results: self.len(),
        }
    }
}
