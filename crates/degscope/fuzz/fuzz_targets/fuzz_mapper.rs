//! Fuzz target for the column mapper.
//!
//! Arbitrary header sets must map without panicking, and no source column may
//! be claimed by two canonical columns.

#![no_main]

use std::collections::HashSet;

use degscope::{map_columns, DatasetKind};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|headers: Vec<String>| {
    if headers.len() > 256 {
        return;
    }

    for kind in [DatasetKind::DifferentialExpression, DatasetKind::GOAnalysis] {
        let proposal = map_columns(&headers, kind);

        let mut claimed = HashSet::new();
        for (_, source) in proposal.mapping.iter() {
            assert!(claimed.insert(source.to_string()), "source claimed twice: {}", source);
        }

        // Same input, same answer
        let again = map_columns(&headers, kind);
        assert_eq!(proposal.mapping, again.mapping);
    }
});
