//! End-to-end checks of the canonical modeling scenarios.

use kimball::model::JoinResolution;
use kimball::schema::ColumnProfile;
use kimball::{
    BronzeStore, Classification, ColumnClassifier, ColumnRole, ColumnType, DataTable,
    HierarchyBuilder, InferredType, Kimball, RelationshipType, TypeInferenceEngine,
};

fn table(headers: &[&str], rows: Vec<Vec<String>>) -> DataTable {
    DataTable::new(headers.iter().map(|h| h.to_string()).collect(), rows)
}

fn customer_ids(count: usize, repeat: usize) -> Vec<Vec<String>> {
    (0..count * repeat)
        .map(|i| vec![format!("C{:04}", i % count)])
        .collect()
}

// =============================================================================
// Type Inference
// =============================================================================

#[test]
fn test_compact_date_column() {
    let engine = TypeInferenceEngine::new();
    let result = engine.infer(&["20210926", "20210927", "20210928"], "sales_date");

    assert_eq!(result.inferred_type, InferredType::Date);
    assert_eq!(result.pattern_matched.as_deref(), Some("YYYYMMDD"));
    assert!(result.confidence > 0.7);
}

#[test]
fn test_decimal_measure_column() {
    let engine = TypeInferenceEngine::new();
    let values = ["10336.48", "205.10", "9999.99"];
    let result = engine.infer(&values, "amount_sales");
    assert_eq!(result.inferred_type, InferredType::Numeric);

    let samples: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let column_type = ColumnType::refine(result.inferred_type, &samples);
    assert_eq!(column_type, ColumnType::Decimal);

    let classification = ColumnClassifier::new().classify("amount_sales", column_type, 3, &values, 3);
    assert_eq!(classification.classification, Classification::Fact);
}

// =============================================================================
// Relationship Discovery
// =============================================================================

#[test]
fn test_contained_keys_one_to_one() {
    let mut store = BronzeStore::new();
    store.insert_table("customers", table(&["customer_id"], customer_ids(500, 1)));
    store.insert_table("orders", table(&["customer_id"], customer_ids(500, 1)));

    let build = Kimball::new().build(&store);
    assert_eq!(build.relationships.len(), 1);

    let rel = &build.relationships[0];
    assert_eq!(rel.confidence, 1.0);
    assert!(rel.is_pk1 && rel.is_pk2);
    assert_eq!(rel.relationship_type, RelationshipType::OneToOne);
}

#[test]
fn test_contained_keys_one_to_many() {
    let mut store = BronzeStore::new();
    store.insert_table("customers", table(&["customer_id"], customer_ids(500, 1)));
    store.insert_table("orders", table(&["customer_id"], customer_ids(500, 2)));

    let build = Kimball::new().build(&store);
    assert_eq!(build.relationships.len(), 1);

    let rel = &build.relationships[0];
    assert_eq!(rel.confidence, 1.0);
    assert_eq!(rel.overlap_count, 500);
    assert_eq!(rel.relationship_type, RelationshipType::OneToMany);
}

// =============================================================================
// Hierarchies
// =============================================================================

#[test]
fn test_three_level_hierarchy() {
    let columns = vec![
        ColumnProfile::new("geo", "country", "String", 5, 0, 10_000),
        ColumnProfile::new("geo", "city", "String", 5000, 0, 10_000),
        ColumnProfile::new("geo", "state", "String", 50, 0, 10_000),
    ];
    let hierarchy = HierarchyBuilder::new().build("geo", &columns).unwrap();

    assert_eq!(hierarchy.root().unwrap().column, "country");
    assert_eq!(hierarchy.root().unwrap().level, 0);
    assert_eq!(hierarchy.leaf().unwrap().column, "city");
    assert_eq!(hierarchy.leaf().unwrap().level, 2);
    assert_eq!(hierarchy.intermediate().len(), 1);
    assert_eq!(hierarchy.intermediate()[0].column, "state");
}

// =============================================================================
// K-table Planning
// =============================================================================

#[test]
fn test_k_table_with_unmatched_key() {
    let customers = (0..50)
        .map(|i| vec![format!("C{i:03}"), ["retail", "wholesale"][i % 2].to_string()])
        .collect();
    let products = (0..40)
        .map(|i| vec![format!("P{i:03}"), format!("category_{}", i % 4)])
        .collect();
    let sales = (0..300)
        .map(|i| {
            vec![
                format!("C{:03}", i % 50),
                format!("P{:03}", i % 40),
                format!("X{:02}", i % 6),
                format!("{}", i % 12 + 1),
                format!("{}.{:02}", 3 + i % 20, i % 100),
                format!("{}.{:02}", 40 + (i * 31) % 700, (i * 3) % 100),
                format!("{}.{:02}", 10 + (i * 17) % 300, (i * 11) % 100),
            ]
        })
        .collect();

    let mut store = BronzeStore::new();
    store.insert_table("customers", table(&["customer_id", "segment"], customers));
    store.insert_table("products", table(&["product_id", "category"], products));
    store.insert_table(
        "sales",
        table(
            &[
                "customer_id",
                "product_id",
                "promo_id",
                "quantity",
                "unit_price",
                "amount",
                "total_cost",
            ],
            sales,
        ),
    );

    let build = Kimball::new().build(&store);
    assert!(build.is_complete());

    let fact = build.fact_recommendations().next().expect("fact recommendation");
    assert_eq!(fact.source_table, "sales");
    assert_eq!(fact.dimension_keys, vec!["customer_id", "product_id", "promo_id"]);

    let k_table = fact.k_table.as_ref().unwrap();
    assert_eq!(k_table.joins.len(), 2);
    assert!(
        k_table
            .joins
            .iter()
            .all(|j| j.resolved_by == JoinResolution::Relationship)
    );
    let joined: Vec<&str> = k_table.joins.iter().map(|j| j.fact_column.as_str()).collect();
    assert_eq!(joined, vec!["customer_id", "product_id"]);
    assert!(k_table.skipped_dimensions.is_empty());
    assert_eq!(k_table.unresolved_keys, vec!["promo_id"]);
    assert_eq!(k_table.columns.len(), 7 + 2 + 2);
}

#[test]
fn test_k_table_joins_on_key_despite_measure_overlap() {
    let customers = (0..50)
        .map(|i| {
            vec![
                format!("{}", i % 3 + 1),
                format!("C{i:03}"),
                ["retail", "wholesale"][i % 2].to_string(),
            ]
        })
        .collect();
    let sales = (0..300)
        .map(|i| {
            vec![
                format!("{}", i % 12 + 1),
                format!("C{:03}", i % 50),
                format!("{}.{:02}", 40 + (i * 31) % 700, (i * 3) % 100),
            ]
        })
        .collect();

    let mut store = BronzeStore::new();
    store.insert_table(
        "customers",
        table(&["loyalty_tier", "customer_id", "segment"], customers),
    );
    store.insert_table("sales", table(&["quantity", "customer_id", "amount"], sales));

    let build = Kimball::new().build(&store);
    assert!(build.is_complete());
    assert!(
        build
            .relationships
            .iter()
            .any(|r| r.column_for("sales") == Some("quantity"))
    );

    let fact = build.fact_recommendations().next().expect("fact recommendation");
    assert_eq!(fact.dimension_keys, vec!["customer_id"]);
    assert_eq!(fact.column("quantity").unwrap().role, ColumnRole::FactMeasure);

    let k_table = fact.k_table.as_ref().unwrap();
    assert_eq!(k_table.joins.len(), 1);
    assert_eq!(k_table.joins[0].resolved_by, JoinResolution::Relationship);
    assert_eq!(k_table.joins[0].fact_column, "customer_id");
    assert_eq!(k_table.joins[0].dimension_column, "customer_id");
    assert!(k_table.unresolved_keys.is_empty());
}
