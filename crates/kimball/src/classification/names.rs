//! Column and table name heuristics.

use once_cell::sync::Lazy;
use regex::Regex;

static IDENTIFIER_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(^|_)(id|key|code|num|no|name)$").unwrap());

static MEASURE_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(^|_)(amount|cost|price|value|quantity|qty|count|total|sum|avg|rate)$")
        .unwrap()
});

static DIMENSION_TABLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(calendar|time|date|dim)").unwrap());

const KEY_MARKERS: &[&str] = &["_id", "_key", "id_", "key_"];

const NUMERIC_ATTRIBUTE_MARKERS: &[&str] = &[
    "_num", "_code", "_flag", "is_", "has_", "working", "_year", "_day", "_month", "_qtr",
    "_week",
];

const MEASURE_MARKERS: &[&str] = &[
    "amount", "total", "sum", "quantity", "count", "value", "price", "cost", "revenue",
];

/// Names ending in an identifier token (`customer_id`, `zip_code`, `name`).
pub fn is_identifier_name(name: &str) -> bool {
    IDENTIFIER_SUFFIX.is_match(name)
}

/// Names ending in a measure token (`unit_price`, `order_total`, `qty`).
pub fn is_measure_name(name: &str) -> bool {
    MEASURE_SUFFIX.is_match(name)
}

/// Tables whose names mark them as dimensions (`dim_store`, `calendar`).
pub fn is_dimension_table_name(table: &str) -> bool {
    DIMENSION_TABLE.is_match(table)
}

/// Names containing a key marker anywhere (`customer_id_hash`, `id_customer`).
pub fn has_key_marker(name: &str) -> bool {
    let lower = name.to_lowercase();
    KEY_MARKERS.iter().any(|m| lower.contains(m))
}

/// Numeric columns that describe rather than measure (`fiscal_year`, `is_active`).
pub fn is_numeric_attribute_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    NUMERIC_ATTRIBUTE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Names containing a measure word anywhere (`sales_amount_usd`).
pub fn has_measure_marker(name: &str) -> bool {
    let lower = name.to_lowercase();
    MEASURE_MARKERS.iter().any(|m| lower.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_names() {
        assert!(is_identifier_name("customer_id"));
        assert!(is_identifier_name("ID"));
        assert!(is_identifier_name("zip_code"));
        assert!(is_identifier_name("product_name"));
        assert!(!is_identifier_name("valid"));
        assert!(!is_identifier_name("amount"));
    }

    #[test]
    fn test_measure_names() {
        assert!(is_measure_name("unit_price"));
        assert!(is_measure_name("QTY"));
        assert!(is_measure_name("order_total"));
        assert!(!is_measure_name("amount_sales"));
        assert!(!is_measure_name("pricing_tier"));
    }

    #[test]
    fn test_substring_markers() {
        assert!(has_key_marker("store_key"));
        assert!(has_key_marker("id_customer"));
        assert!(!has_key_marker("identity"));
        assert!(is_numeric_attribute_name("fiscal_year"));
        assert!(is_numeric_attribute_name("is_active"));
        assert!(has_measure_marker("amount_sales"));
        assert!(is_dimension_table_name("dim_store"));
        assert!(is_dimension_table_name("Calendar"));
        assert!(!is_dimension_table_name("sales"));
    }
}
