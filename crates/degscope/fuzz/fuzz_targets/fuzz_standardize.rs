//! Fuzz target for standardization.
//!
//! Parses arbitrary bytes, maps the headers and standardizes; the only
//! acceptable failures are reported errors.

#![no_main]

use degscope::{map_columns, standardize, DatasetKind, Parser};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 50_000 {
        return;
    }

    let Ok(table) = Parser::new().parse_bytes(data) else {
        return;
    };

    for kind in [DatasetKind::DifferentialExpression, DatasetKind::GOAnalysis] {
        let proposal = map_columns(table.columns(), kind);
        if let Ok((standardized, _)) = standardize(&table, &proposal.mapping, kind) {
            assert_eq!(standardized.row_count(), table.row_count());
        }
    }
});
