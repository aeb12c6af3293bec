//! Property-based tests for Degscope.
//!
//! These tests use proptest to generate random headers, tables and gene sets
//! and verify that mapping, filtering and the statistics keep their invariants.
//!
//! # Testing Philosophy
//!
//! Property-based tests verify:
//! 1. **No panics**: Mapping and standardization never crash on any input
//! 2. **Determinism**: Same input always produces same output
//! 3. **Invariants**: Filters only remove rows and p-values stay in [0, 1]
//!
//! # Running Property Tests
//!
//! ```bash
//! # Run all property tests
//! cargo test -p degscope --test property_tests
//!
//! # Run with more cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p degscope --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use degscope::{
    gsea_lite, map_columns, overlap_significance, standardize, ColumnMapping, Contingency,
    Dataset, DatasetKind, DegscopeError, FilterCriteria, SignificanceCutoffs, StandardColumn,
    Table,
};

// =============================================================================
// Test Strategies
// =============================================================================

/// Generate header-like strings
fn header_like() -> impl Strategy<Value = String> {
    prop_oneof![
        // Known tool spellings
        Just("log2FoldChange".to_string()),
        Just("padj".to_string()),
        Just("logFC".to_string()),
        Just("adj.P.Val".to_string()),
        Just("p.adjust".to_string()),
        Just("geneID".to_string()),
        Just("".to_string()),
        // Random identifiers
        "[a-zA-Z0-9_\\.\\- ]{0,20}",
    ]
}

/// One differential-expression row: log2FC and adjusted p-value, either possibly missing.
fn de_row() -> impl Strategy<Value = (Option<f64>, Option<f64>)> {
    (
        prop::option::weighted(0.9, -8.0f64..8.0),
        prop::option::weighted(0.9, 0.0f64..=1.0),
    )
}

fn fmt_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "NA".to_string())
}

/// Build a canonical-named DE dataset with genes G0, G1, ...
fn de_dataset(rows: &[(Option<f64>, Option<f64>)]) -> Dataset {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .enumerate()
        .map(|(i, (lfc, padj))| vec![format!("G{}", i), fmt_cell(*lfc), fmt_cell(*padj)])
        .collect();
    let table = Table::from_strings(&["gene_id".to_string(), "log2fc".into(), "adj_pvalue".into()], &cells);
    let mapping = ColumnMapping::identity([
        StandardColumn::GeneId,
        StandardColumn::Log2fc,
        StandardColumn::AdjPvalue,
    ]);
    Dataset::build("random", DatasetKind::DifferentialExpression, &table, &mapping)
        .expect("canonical table must build")
}

/// Tool header rows, several spelling canonical names in another case.
const TOOL_HEADERS: &[(DatasetKind, &[&str])] = &[
    (DatasetKind::DifferentialExpression, &["gene_id", "logFC", "logCPM", "PValue", "FDR"]),
    (DatasetKind::DifferentialExpression, &["Symbol", "GENE_ID", "LOG2FC", "Padj", "BaseMean"]),
    (DatasetKind::DifferentialExpression, &["Geneid", "log2FoldChange", "lfcSE", "stat", "pvalue", "padj"]),
    (DatasetKind::GOAnalysis, &["ID", "Description", "GeneRatio", "p.adjust", "qvalue", "geneID", "Count"]),
    (DatasetKind::GOAnalysis, &["Term_ID", "DESCRIPTION", "FDR", "Genes"]),
];

fn tool_headers() -> impl Strategy<Value = (DatasetKind, Vec<&'static str>)> {
    prop::sample::select(TOOL_HEADERS.to_vec())
        .prop_flat_map(|(kind, headers)| (Just(kind), Just(headers.to_vec()).prop_shuffle()))
}

fn gene_set() -> impl Strategy<Value = HashSet<u16>> {
    prop::collection::hash_set(0u16..200, 0..60)
}

// =============================================================================
// Mapping Properties
// =============================================================================

mod mapping_tests {
    use super::*;

    proptest! {
        /// Mapping never panics and never claims a source twice.
        #[test]
        fn one_source_per_canonical(headers in prop::collection::vec(header_like(), 0..15)) {
            for kind in [DatasetKind::DifferentialExpression, DatasetKind::GOAnalysis] {
                let proposal = map_columns(&headers, kind);
                let mut seen = HashSet::new();
                for (_, source) in proposal.mapping.iter() {
                    prop_assert!(seen.insert(source.to_string()), "'{}' claimed twice", source);
                    prop_assert!(headers.iter().any(|h| h == source));
                }
            }
        }

        /// Mapping is deterministic.
        #[test]
        fn mapping_is_deterministic(headers in prop::collection::vec(header_like(), 0..15)) {
            let first = map_columns(&headers, DatasetKind::DifferentialExpression);
            let second = map_columns(&headers, DatasetKind::DifferentialExpression);
            prop_assert_eq!(first.mapping, second.mapping);
            prop_assert_eq!(first.unmapped_required, second.unmapped_required);
        }

        /// Column order does not change how DESeq2 headers map.
        #[test]
        fn deseq2_headers_map_in_any_order(
            headers in Just(vec![
                "gene", "baseMean", "log2FoldChange", "lfcSE", "stat", "pvalue", "padj",
            ]).prop_shuffle()
        ) {
            let proposal = map_columns(&headers, DatasetKind::DifferentialExpression);
            prop_assert!(proposal.is_complete());
            prop_assert_eq!(proposal.mapping.get(StandardColumn::GeneId), Some("gene"));
            prop_assert_eq!(proposal.mapping.get(StandardColumn::Log2fc), Some("log2FoldChange"));
            prop_assert_eq!(proposal.mapping.get(StandardColumn::AdjPvalue), Some("padj"));
            prop_assert_eq!(proposal.mapping.get(StandardColumn::LfcSe), Some("lfcSE"));
        }

        /// A standardized table maps every canonical column onto itself.
        #[test]
        fn standardized_headers_remap_to_identity((kind, headers) in tool_headers()) {
            let row = vec!["1"; headers.len()];
            let table = Table::from_strings(&headers, &[row]);
            let proposal = map_columns(&headers, kind);
            prop_assert!(proposal.is_complete());

            let (standardized, _) = standardize(&table, &proposal.mapping, kind).unwrap();
            let remapped = map_columns(standardized.columns(), kind);
            for (canonical, _) in proposal.mapping.iter() {
                prop_assert_eq!(remapped.mapping.get(canonical), Some(canonical.as_str()));
            }
        }

        /// Building fails with a schema error exactly when a required column is unmapped.
        #[test]
        fn schema_error_iff_required_missing(
            has_gene in any::<bool>(),
            has_lfc in any::<bool>(),
            has_padj in any::<bool>(),
        ) {
            let mut pairs = Vec::new();
            if has_gene { pairs.push((StandardColumn::GeneId, "gene_id")); }
            if has_lfc { pairs.push((StandardColumn::Log2fc, "log2fc")); }
            if has_padj { pairs.push((StandardColumn::AdjPvalue, "adj_pvalue")); }
            let mapping = ColumnMapping::from_pairs(pairs);

            let table = Table::from_strings(&["gene_id", "log2fc", "adj_pvalue"], &[vec!["A", "1", "0.01"]]);
            let result = Dataset::build("t", DatasetKind::DifferentialExpression, &table, &mapping);

            if has_gene && has_lfc && has_padj {
                prop_assert!(result.is_ok());
            } else {
                let is_schema = matches!(result, Err(DegscopeError::Schema { .. }));
                prop_assert!(is_schema, "expected a schema error");
            }
        }
    }
}

// =============================================================================
// Filter Properties
// =============================================================================

mod filter_tests {
    use super::*;

    proptest! {
        /// Empty criteria keep every row unchanged.
        #[test]
        fn empty_criteria_is_identity(rows in prop::collection::vec(de_row(), 0..40)) {
            let dataset = de_dataset(&rows);
            let kept = dataset.filter(&FilterCriteria::new()).unwrap();
            prop_assert_eq!(&kept, dataset.table());
        }

        /// Filtering only removes rows, and every kept row passes every bound.
        #[test]
        fn kept_rows_satisfy_bounds(
            rows in prop::collection::vec(de_row(), 0..40),
            padj_max in 0.0f64..=1.0,
            lfc_min in 0.0f64..4.0,
        ) {
            let dataset = de_dataset(&rows);
            let criteria = FilterCriteria::new()
                .with_adj_pvalue_max(padj_max)
                .with_log2fc_min(lfc_min);
            let kept = dataset.filter(&criteria).unwrap();

            prop_assert!(kept.row_count() <= dataset.table().row_count());
            for i in 0..kept.row_count() {
                let padj = kept.value(i, "adj_pvalue").and_then(|v| v.as_f64());
                let lfc = kept.value(i, "log2fc").and_then(|v| v.as_f64());
                prop_assert!(padj.is_some_and(|p| p <= padj_max));
                prop_assert!(lfc.is_some_and(|l| l.abs() >= lfc_min));
            }
        }

        /// The significant count agrees with filtering by the same cutoffs.
        #[test]
        fn significant_count_matches_filter(rows in prop::collection::vec(de_row(), 0..40)) {
            let dataset = de_dataset(&rows);
            let cutoffs = SignificanceCutoffs::default();
            let criteria = FilterCriteria::new()
                .with_adj_pvalue_max(cutoffs.adj_pvalue_max)
                .with_log2fc_min(cutoffs.abs_log2fc_min);
            let kept = dataset.filter(&criteria).unwrap();
            prop_assert_eq!(dataset.summary().significant_count, Some(kept.row_count()));
        }
    }
}

// =============================================================================
// Statistics Properties
// =============================================================================

mod statistics_tests {
    use super::*;

    proptest! {
        /// Fisher p-values are probabilities; the odds ratio is never negative.
        #[test]
        fn fisher_pvalue_in_unit_interval(
            a in 0u64..40, b in 0u64..40, c in 0u64..40, d in 0u64..40,
        ) {
            let table = Contingency::new(a, b, c, d);
            let p = table.pvalue().unwrap();
            prop_assert!((0.0..=1.0).contains(&p), "p = {}", p);
            let odds = table.odds_ratio();
            prop_assert!(odds.is_nan() || odds >= 0.0);
            if table.has_empty_margin() {
                prop_assert_eq!(p, 1.0);
            }
        }

        /// Overlap results are bounded and symmetric in the two sets.
        #[test]
        fn overlap_is_bounded_and_symmetric(a in gene_set(), b in gene_set(), extra in 0usize..500) {
            let union = a.union(&b).count();
            let background = union + extra;

            let ab = overlap_significance(a.iter().copied(), b.iter().copied(), background).unwrap();
            let ba = overlap_significance(b.iter().copied(), a.iter().copied(), background).unwrap();

            prop_assert!(ab.overlap_size <= ab.set_a_size.min(ab.set_b_size));
            prop_assert_eq!(ab.overlap_size, ba.overlap_size);
            if ab.expected > 0.0 {
                prop_assert!((0.0..=1.0).contains(&ab.pvalue));
                prop_assert!((ab.pvalue - ba.pvalue).abs() < 1e-9);
            } else {
                prop_assert_eq!(ab.pvalue, 1.0);
                prop_assert!(ab.fold_enrichment.is_nan());
            }
        }

        /// A background smaller than the union is rejected.
        #[test]
        fn small_background_is_rejected(a in gene_set(), b in gene_set()) {
            let union = a.union(&b).count();
            prop_assume!(union > 0);
            let result = overlap_significance(a, b, union - 1);
            prop_assert!(matches!(result, Err(DegscopeError::Computation(_))));
        }

        /// The GSEA-lite mean lies between the smallest and largest fold change used.
        #[test]
        fn gsea_mean_within_range(
            rows in prop::collection::vec(de_row(), 1..40),
            picks in prop::collection::vec(0usize..40, 1..10),
        ) {
            let dataset = de_dataset(&rows);
            let genes: Vec<String> = picks.iter().map(|i| format!("G{}", i)).collect();
            let result = gsea_lite(&genes, &dataset, 0.1);

            let used: Vec<f64> = picks
                .iter()
                .collect::<HashSet<_>>()
                .into_iter()
                .filter_map(|&i| rows.get(i).and_then(|r| r.0))
                .collect();

            prop_assert_eq!(result.values_used, used.len());
            if used.is_empty() {
                prop_assert!(result.mean_log2fc.is_nan());
            } else {
                let min = used.iter().cloned().fold(f64::INFINITY, f64::min);
                let max = used.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                prop_assert!(result.mean_log2fc >= min - 1e-9 && result.mean_log2fc <= max + 1e-9);
                prop_assert!(result.median_log2fc >= min - 1e-9 && result.median_log2fc <= max + 1e-9);
            }
        }
    }
}
