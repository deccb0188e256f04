//! Name similarity and cardinality bucketing for sibling detection.

use std::collections::HashSet;

/// Similarity above which two same-bucket columns are siblings.
pub const SIBLING_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Order-of-magnitude bucket: `floor(log10(cardinality))`, with 0 for 0.
pub fn cardinality_bucket(cardinality: usize) -> u32 {
    cardinality.checked_ilog10().unwrap_or(0)
}

/// Jaccard similarity of the lowercase word sets of two names.
///
/// Words are split on whitespace, `_` and `-`.
pub fn name_similarity(name1: &str, name2: &str) -> f64 {
    let words1 = tokenize(name1);
    let words2 = tokenize(name2);

    let union = words1.union(&words2).count();
    if union == 0 {
        return 0.0;
    }
    words1.intersection(&words2).count() as f64 / union as f64
}

fn tokenize(name: &str) -> HashSet<String> {
    name.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '_' || c == '-')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
