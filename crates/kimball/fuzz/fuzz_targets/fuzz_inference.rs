//! Fuzz target for type inference.
//!
//! Pattern detection must never panic and confidences stay in `[0, 1]`
//! for any column of values.

#![no_main]

use arbitrary::Arbitrary;
use kimball::{ColumnClassifier, ColumnType, TypeInferenceEngine};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Column {
    name: String,
    values: Vec<String>,
}

fuzz_target!(|column: Column| {
    if column.values.len() > 1_000 {
        return;
    }

    let engine = TypeInferenceEngine::new();
    let result = engine.infer(&column.values, &column.name);
    assert!((0.0..=1.0).contains(&result.confidence));

    let column_type = ColumnType::refine(result.inferred_type, &result.sample_values);
    let classification = ColumnClassifier::new().classify(
        &column.name,
        column_type,
        column.values.len(),
        &column.values,
        column.values.len(),
    );
    assert!((0.0..=1.0).contains(&classification.confidence));
});
