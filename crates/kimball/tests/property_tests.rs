//! Property-based tests for the modeling engine.
//!
//! These tests use proptest to generate random inputs and verify that
//! the engine's invariants hold under all of them.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p kimball --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p kimball --test property_tests
//! ```

use proptest::prelude::*;

use kimball::hierarchy::{LevelRole, cardinality_bucket, name_similarity};
use kimball::input::Parser;
use kimball::relationship::relationship_type;
use kimball::schema::ColumnProfile;
use kimball::{
    BronzeStore, Classification, ColumnClassifier, ColumnType, DataTable, HierarchyBuilder,
    InferredType, Kimball, RelationshipDiscoverer, RelationshipType, TypeInferenceEngine,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Arbitrary cell text, including empty strings and punctuation.
fn cell() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_\\-\\.,/:$% ]{0,24}"
}

/// Text in any script, including digits outside ASCII.
fn unicode_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,24}",
        "[०-९]{4,10}",
        "[٠-٩]{4,10}",
        "[0-9०-९٠-٩]{1,8}(\\.[0-9٠-٩]{1,2})?",
    ]
}

fn any_cell() -> impl Strategy<Value = String> {
    prop_oneof![cell(), unicode_cell()]
}

/// Cells that look like numbers or dates.
fn numeric_or_date_cell() -> impl Strategy<Value = String> {
    prop_oneof![
        "[0-9]{1,6}",
        "[0-9]{1,5}\\.[0-9]{2}",
        "-[0-9]{1,4}",
        "\\$[0-9]{1,3}(,[0-9]{3})?",
        "(19|20)[0-9]{2}(0[1-9]|1[0-2])(0[1-9]|1[0-9]|2[0-8])",
        "(19|20)[0-9]{2}-(0[1-9]|1[0-2])-(0[1-9]|1[0-9]|2[0-8])",
        "1[0-9]{9}",
    ]
}

fn column_type() -> impl Strategy<Value = ColumnType> {
    prop_oneof![
        Just(ColumnType::String),
        Just(ColumnType::Integer),
        Just(ColumnType::Decimal),
        Just(ColumnType::Date),
        Just(ColumnType::DateTime),
        Just(ColumnType::Boolean),
    ]
}

fn column_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(_[a-z]{1,8}){0,2}"
}

// =============================================================================
// Type Inference Properties
// =============================================================================

proptest! {
    #[test]
    fn inference_confidence_in_range(values in prop::collection::vec(any_cell(), 0..50), name in column_name()) {
        let engine = TypeInferenceEngine::new();
        let result = engine.infer(&values, &name);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!(result.sample_values.len() <= 3);
    }

    #[test]
    fn inference_is_deterministic(values in prop::collection::vec(numeric_or_date_cell(), 1..40)) {
        let first = TypeInferenceEngine::new().infer(&values, "col");
        let second = TypeInferenceEngine::new().infer(&values, "col");
        prop_assert_eq!(first, second);
    }

    #[test]
    fn cached_result_matches_fresh(values in prop::collection::vec(numeric_or_date_cell(), 1..40)) {
        let engine = TypeInferenceEngine::new();
        let fresh = engine.infer(&values, "col");
        let cached = engine.infer(&values, "col");
        prop_assert_eq!(fresh, cached);
        prop_assert_eq!(engine.performance_stats().cache_hits, 1);
    }

    #[test]
    fn string_fallback_never_zero(values in prop::collection::vec(any_cell(), 1..30)) {
        let result = TypeInferenceEngine::new().infer(&values, "col");
        if result.inferred_type == InferredType::String {
            prop_assert!(result.confidence >= 0.1);
        }
    }

    #[test]
    fn non_ascii_digits_never_date(values in prop::collection::vec(unicode_cell(), 1..30)) {
        let result = TypeInferenceEngine::new().infer(&values, "col");
        if values.iter().all(|v| !v.bytes().any(|b| b.is_ascii_digit())) {
            prop_assert_ne!(result.inferred_type, InferredType::Date);
            prop_assert_ne!(result.inferred_type, InferredType::Numeric);
        }
    }

    #[test]
    fn dates_carry_a_pattern(values in prop::collection::vec(numeric_or_date_cell(), 1..30)) {
        let result = TypeInferenceEngine::new().infer(&values, "col");
        if result.inferred_type == InferredType::Date {
            prop_assert!(result.pattern_matched.is_some());
            prop_assert!(result.confidence > 0.7);
        }
    }
}

// =============================================================================
// Classification Properties
// =============================================================================

proptest! {
    #[test]
    fn classification_scores_in_range(
        name in column_name(),
        column_type in column_type(),
        cardinality in 0usize..5000,
        nulls in 0usize..5000,
        rows in 0usize..5000,
    ) {
        let nulls = nulls.min(rows);
        let cardinality = cardinality.min(rows);
        let profile = ColumnProfile::new("t", &name, "String", cardinality, nulls, rows);
        let result = ColumnClassifier::new().classify_profile(&profile, column_type);

        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!((0.0..=1.0).contains(&result.quality_score));
        prop_assert!(!result.reasoning.is_empty());
        if rows == 0 {
            prop_assert_eq!(result.cardinality_ratio, 0.0);
        }
        if result.is_primary_key_candidate {
            prop_assert_eq!(nulls, 0);
            prop_assert_eq!(result.classification, Classification::Dimension);
        }
    }
}

// =============================================================================
// Relationship Properties
// =============================================================================

proptest! {
    #[test]
    fn one_to_one_requires_both_keys(
        count1 in 1usize..1000,
        count2 in 1usize..1000,
        overlap_share in 0.0f64..=1.0,
        pk1: bool,
        pk2: bool,
    ) {
        let overlap = ((count1.min(count2) as f64) * overlap_share).round() as usize;
        let kind = relationship_type(overlap, count1, count2, pk1, pk2);
        if kind == RelationshipType::OneToOne {
            prop_assert!(pk1 && pk2);
            prop_assert_eq!(count1, count2);
        }
        if overlap == count1.min(count2) && !(pk1 && pk2 && count1 == count2) {
            prop_assert_eq!(kind, RelationshipType::OneToMany);
        }
    }
}

fn key_column(values: &[u32]) -> Vec<Vec<String>> {
    values.iter().map(|v| vec![format!("K{v:03}")]).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn discovered_relationships_meet_threshold(
        left in prop::collection::vec(0u32..60, 2..80),
        right in prop::collection::vec(0u32..60, 2..80),
        threshold in 0.0f64..=1.0,
    ) {
        let mut store = BronzeStore::new();
        store.insert_table("left", DataTable::new(vec!["left_key".into()], key_column(&left)));
        store.insert_table("right", DataTable::new(vec!["right_key".into()], key_column(&right)));

        let tables = Kimball::new().build(&store).tables;
        let discovery = RelationshipDiscoverer::new().discover(&store, &tables, threshold);

        prop_assert!(discovery.relationships.len() <= 1);
        for rel in &discovery.relationships {
            prop_assert!(rel.confidence >= threshold);
            prop_assert!(rel.confidence <= 1.0);
            prop_assert!(rel.overlap_count > 0);
        }
    }
}

// =============================================================================
// Hierarchy Properties
// =============================================================================

proptest! {
    #[test]
    fn hierarchy_cardinality_non_decreasing(cardinalities in prop::collection::vec(0usize..100_000, 0..12)) {
        let profiles: Vec<ColumnProfile> = cardinalities
            .iter()
            .enumerate()
            .map(|(i, &c)| ColumnProfile::new("t", format!("col_{i}"), "String", c, 0, 100_000))
            .collect();

        match HierarchyBuilder::new().build("t", &profiles) {
            None => prop_assert!(profiles.len() < 2),
            Some(hierarchy) => {
                prop_assert_eq!(hierarchy.total_levels, profiles.len());
                prop_assert!(hierarchy.levels.windows(2).all(|w| w[0].cardinality <= w[1].cardinality));

                let root = hierarchy.root().unwrap();
                prop_assert!(root.parent.is_none());
                prop_assert_eq!(root.role, LevelRole::Root);

                let leaf = hierarchy.leaf().unwrap();
                prop_assert!(leaf.children.is_empty());
                prop_assert_eq!(leaf.role, LevelRole::Leaf);

                for (i, level) in hierarchy.levels.iter().enumerate() {
                    prop_assert_eq!(level.level, i);
                }
            }
        }
    }

    #[test]
    fn name_similarity_symmetric(a in column_name(), b in column_name()) {
        let ab = name_similarity(&a, &b);
        prop_assert!((0.0..=1.0).contains(&ab));
        prop_assert_eq!(ab, name_similarity(&b, &a));
        prop_assert_eq!(name_similarity(&a, &a), 1.0);
    }

    #[test]
    fn cardinality_bucket_monotonic(a in 0usize..10_000_000, b in 0usize..10_000_000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(cardinality_bucket(low) <= cardinality_bucket(high));
    }
}

// =============================================================================
// Parser Properties
// =============================================================================

proptest! {
    #[test]
    fn parser_never_panics(text in "[a-z0-9,;|\t\"\n ]{0,200}") {
        let _ = Parser::new().parse_str(&text);
    }

    #[test]
    fn parsed_rows_match_header_width(rows in prop::collection::vec(prop::collection::vec("[a-z0-9]{0,6}", 1..6), 1..20)) {
        let text: String = rows.iter().map(|r| r.join(",") + "\n").collect();
        if let Ok(table) = Parser::new().parse_str(&text) {
            let width = table.column_count();
            prop_assert!(table.rows.iter().all(|r| r.len() == width));
        }
    }
}
