//! Fuzz target for the result-table parser.
//!
//! The CSV/TSV parser must never panic on malformed input, whether it reads
//! from a file or from memory.

#![no_main]

use degscope::Parser;
use libfuzzer_sys::fuzz_target;
use std::io::Write;

fuzz_target!(|data: &[u8]| {
    // Only process reasonable-sized inputs to avoid OOM
    if data.len() > 100_000 {
        return;
    }

    let parser = Parser::new();
    if let Ok(table) = parser.parse_bytes(data) {
        for row in table.rows() {
            assert_eq!(row.len(), table.column_count());
        }
    }

    if let Ok(mut temp_file) = tempfile::NamedTempFile::new() {
        if temp_file.write_all(data).is_ok() {
            let _ = parser.parse_file(temp_file.path());
        }
    }
});
