//! Statistical analysis of datasets and gene lists.
//!
//! All routines are pure: they read datasets and return new result values.
//! Degenerate inputs (empty lists, empty contingency margins) produce `NaN`
//! or `1.0` sentinels instead of errors.

mod compare;
mod enrichment;
mod fisher;
mod math;
mod overlap;

pub use compare::{compare_datasets, ComparisonResult, GeneStatus};
pub use enrichment::{gsea_lite, EnrichmentDirection, GseaResult};
pub use fisher::{fisher_exact_test, Contingency, FisherResult};
pub use overlap::{overlap_significance, OverlapResult};
