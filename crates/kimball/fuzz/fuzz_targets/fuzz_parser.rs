//! Fuzz target for the bronze file parser.
//!
//! Malformed delimited input must produce an error or a rectangular table,
//! never a panic.

#![no_main]

use kimball::input::Parser;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    if data.len() > 100_000 {
        return;
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            if let Ok((table, metadata)) = Parser::new().parse_file(temp_file.path()) {
                assert!(table.rows.iter().all(|r| r.len() == table.column_count()));
                assert_eq!(metadata.row_count, table.row_count());
            }
        }
    }
});
