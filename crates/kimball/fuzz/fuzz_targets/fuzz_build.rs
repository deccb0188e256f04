//! Fuzz target for the full model build.
//!
//! Arbitrary small tables run through every stage without panicking.

#![no_main]

use arbitrary::Arbitrary;
use kimball::{BronzeStore, DataTable, Kimball};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Table {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fuzz_target!(|tables: Vec<Table>| {
    if tables.len() > 6 || tables.iter().any(|t| t.rows.len() > 200 || t.headers.len() > 16) {
        return;
    }

    let mut store = BronzeStore::new();
    for table in tables {
        store.insert_table(table.name, DataTable::new(table.headers, table.rows));
    }

    let build = Kimball::new().build(&store);
    if build.is_complete() {
        assert!(build.quality.is_some());
    }
});
