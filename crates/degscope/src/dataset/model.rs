//! Standardized datasets.

use std::collections::HashSet;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::config::SignificanceCutoffs;
use crate::error::{DegscopeError, Result};
use crate::input::{SourceMetadata, Table, Value};
use crate::mapping::ColumnMapping;
use crate::schema::{DatasetKind, StandardColumn};
use crate::transform::{StandardizeReport, Standardizer};

use super::filter::FilterCriteria;

/// Summary metadata computed once when a dataset is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub row_count: usize,
    /// Distinct identifiers (DE) or distinct genes across `gene_symbols` lists (GO).
    pub gene_count: usize,
    /// Rows passing the significance cutoffs. Only set for differential expression.
    pub significant_count: Option<usize>,
    /// Significant rows with positive log2FC.
    pub up_count: Option<usize>,
    /// Significant rows with negative log2FC.
    pub down_count: Option<usize>,
}

/// A standardized table together with its frozen mapping and summary.
///
/// A dataset is immutable once built; filtering and the statistics all
/// produce new values.
///
/// # Example
///
/// ```no_run
/// # use degscope::{Dataset, DatasetKind, Parser, map_columns};
/// # fn example() -> degscope::Result<()> {
/// let (table, _) = Parser::new().parse_file("results.csv")?;
/// let proposal = map_columns(table.columns(), DatasetKind::DifferentialExpression);
/// let dataset = Dataset::build("treated", DatasetKind::DifferentialExpression, &table, &proposal.mapping)?;
/// println!("{} significant genes", dataset.summary().significant_count.unwrap_or(0));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    pub(super) name: String,
    pub(super) kind: DatasetKind,
    pub(super) table: Table,
    pub(super) mapping: ColumnMapping,
    pub(super) summary: DatasetSummary,
    pub(super) report: StandardizeReport,
    pub(super) source: Option<SourceMetadata>,
}

impl Dataset {
    /// Standardize `table` with `mapping` and compute the summary with the default cutoffs.
    pub fn build(
        name: impl Into<String>,
        kind: DatasetKind,
        table: &Table,
        mapping: &ColumnMapping,
    ) -> Result<Self> {
        Self::build_with(
            name,
            kind,
            table,
            mapping,
            &Standardizer::new(),
            SignificanceCutoffs::default(),
        )
    }

    /// Like [`Dataset::build`] with an explicit standardizer and summary cutoffs.
    pub fn build_with(
        name: impl Into<String>,
        kind: DatasetKind,
        table: &Table,
        mapping: &ColumnMapping,
        standardizer: &Standardizer,
        cutoffs: SignificanceCutoffs,
    ) -> Result<Self> {
        let name = name.into();
        let (table, report) = standardizer.standardize(table, mapping, kind)?;
        let dataset = Self::from_parts(name, kind, table, report.realized_mapping.clone(), report, cutoffs)?;

        log::info!(
            "Built {} dataset '{}': {} rows, {} genes",
            kind,
            dataset.name,
            dataset.summary.row_count,
            dataset.summary.gene_count
        );
        Ok(dataset)
    }

    /// Assemble a dataset from an already standardized table.
    pub(crate) fn from_parts(
        name: String,
        kind: DatasetKind,
        table: Table,
        mapping: ColumnMapping,
        report: StandardizeReport,
        cutoffs: SignificanceCutoffs,
    ) -> Result<Self> {
        let missing: Vec<StandardColumn> = crate::schema::required_columns(kind)
            .iter()
            .copied()
            .filter(|c| !table.has_column(c.as_str()))
            .collect();
        if !missing.is_empty() {
            return Err(DegscopeError::Schema { kind, missing });
        }

        let mut dataset = Self {
            name,
            kind,
            table,
            mapping,
            summary: DatasetSummary {
                row_count: 0,
                gene_count: 0,
                significant_count: None,
                up_count: None,
                down_count: None,
            },
            report,
            source: None,
        };
        dataset.summary = dataset.compute_summary(cutoffs);
        Ok(dataset)
    }

    /// Attach the metadata of the file this dataset was loaded from.
    pub fn with_source(mut self, source: SourceMetadata) -> Self {
        self.source = Some(source);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    /// The standardized table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The mapping that was applied.
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn summary(&self) -> &DatasetSummary {
        &self.summary
    }

    pub fn report(&self) -> &StandardizeReport {
        &self.report
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }

    fn column_index(&self, column: StandardColumn) -> Option<usize> {
        self.table.column_index(column.as_str())
    }

    /// Numeric value of a canonical column in `row`.
    pub(crate) fn numeric(&self, row: &[Value], column: StandardColumn) -> Option<f64> {
        self.column_index(column)
            .and_then(|idx| row.get(idx))
            .and_then(Value::as_f64)
    }

    /// Identifier columns for this dataset, `None` when neither is present.
    pub(crate) fn identifier_columns(&self) -> Option<IdentifierColumns> {
        let (primary, fallback) = match self.kind {
            DatasetKind::DifferentialExpression => (
                self.column_index(StandardColumn::Symbol),
                self.column_index(StandardColumn::GeneId),
            ),
            DatasetKind::GOAnalysis => (self.column_index(StandardColumn::TermId), None),
        };
        if primary.is_none() && fallback.is_none() {
            return None;
        }
        Some(IdentifierColumns { primary, fallback })
    }

    /// Identifier of a row: `symbol` when non-empty, else `gene_id`. GO rows use `term_id`.
    pub fn identifier(&self, row: usize) -> Option<String> {
        let columns = self.identifier_columns()?;
        self.table.rows().get(row).and_then(|r| columns.identifier(r))
    }

    /// Distinct identifiers in first-appearance order.
    pub fn gene_universe(&self) -> IndexSet<String> {
        match self.identifier_columns() {
            Some(columns) => self
                .table
                .rows()
                .iter()
                .filter_map(|row| columns.identifier(row))
                .collect(),
            None => IndexSet::new(),
        }
    }

    /// Whether a row passes `cutoffs`.
    ///
    /// Differential expression rows test `adj_pvalue` and `|log2fc|`; GO rows only
    /// test `fdr` against the adjusted p-value cutoff.
    pub(crate) fn row_passes(&self, row: &[Value], cutoffs: SignificanceCutoffs) -> bool {
        match self.kind {
            DatasetKind::DifferentialExpression => cutoffs.passes(
                self.numeric(row, StandardColumn::AdjPvalue),
                self.numeric(row, StandardColumn::Log2fc),
            ),
            DatasetKind::GOAnalysis => self
                .numeric(row, StandardColumn::Fdr)
                .is_some_and(|fdr| fdr <= cutoffs.adj_pvalue_max),
        }
    }

    /// Identifiers with at least one row passing `cutoffs`.
    pub fn significant_genes(&self, cutoffs: SignificanceCutoffs) -> HashSet<String> {
        let Some(columns) = self.identifier_columns() else {
            return HashSet::new();
        };
        self.table
            .rows()
            .iter()
            .filter(|row| self.row_passes(row, cutoffs))
            .filter_map(|row| columns.identifier(row))
            .collect()
    }

    fn compute_summary(&self, cutoffs: SignificanceCutoffs) -> DatasetSummary {
        let row_count = self.table.row_count();

        match self.kind {
            DatasetKind::DifferentialExpression => {
                let mut significant = 0;
                let mut up = 0;
                let mut down = 0;
                for row in self.table.rows() {
                    if self.row_passes(row, cutoffs) {
                        significant += 1;
                        match self.numeric(row, StandardColumn::Log2fc) {
                            Some(lfc) if lfc > 0.0 => up += 1,
                            Some(lfc) if lfc < 0.0 => down += 1,
                            _ => {}
                        }
                    }
                }
                DatasetSummary {
                    row_count,
                    gene_count: self.gene_universe().len(),
                    significant_count: Some(significant),
                    up_count: Some(up),
                    down_count: Some(down),
                }
            }
            DatasetKind::GOAnalysis => {
                let genes: HashSet<String> = match self.column_index(StandardColumn::GeneSymbols) {
                    Some(idx) => self
                        .table
                        .column_values(idx)
                        .filter_map(Value::as_identifier)
                        .flat_map(|cell| split_gene_list(&cell).map(str::to_string).collect::<Vec<_>>())
                        .collect(),
                    None => HashSet::new(),
                };
                DatasetSummary {
                    row_count,
                    gene_count: genes.len(),
                    significant_count: None,
                    up_count: None,
                    down_count: None,
                }
            }
        }
    }

    /// Rows matching every present criterion, as a new table.
    ///
    /// An empty criteria set returns the full table unchanged. A numeric criterion on a
    /// column this dataset does not have fails with [`DegscopeError::Validation`].
    pub fn filter(&self, criteria: &FilterCriteria) -> Result<Table> {
        criteria.validate()?;
        if criteria.is_empty() {
            return Ok(self.table.clone());
        }

        let mut bounds = Vec::new();
        for (column, bound) in criteria.bounds() {
            let idx = self.column_index(column).ok_or_else(|| {
                DegscopeError::Validation(format!(
                    "Cannot filter on '{}': dataset '{}' has no such column",
                    column, self.name
                ))
            })?;
            bounds.push((idx, bound));
        }

        let gene_symbols = match self.kind {
            DatasetKind::GOAnalysis => self.column_index(StandardColumn::GeneSymbols),
            DatasetKind::DifferentialExpression => None,
        };
        let identifiers = self.identifier_columns();

        let filtered = self.table.filter_rows(|_, row| {
            let numeric_ok = bounds
                .iter()
                .all(|(idx, bound)| bound.admits(row.get(*idx).and_then(Value::as_f64)));
            if !numeric_ok {
                return false;
            }
            let Some(genes) = &criteria.gene_list else {
                return true;
            };
            match gene_symbols {
                Some(idx) => row
                    .get(idx)
                    .and_then(Value::as_identifier)
                    .is_some_and(|cell| split_gene_list(&cell).any(|g| genes.contains(g))),
                None => identifiers
                    .and_then(|columns| columns.identifier(row))
                    .is_some_and(|id| genes.contains(&id)),
            }
        });

        log::debug!(
            "Filtered dataset '{}': {} of {} rows kept",
            self.name,
            filtered.row_count(),
            self.table.row_count()
        );
        Ok(filtered)
    }
}

/// Column positions used to resolve a row identifier.
#[derive(Debug, Clone, Copy)]
pub(crate) struct IdentifierColumns {
    primary: Option<usize>,
    fallback: Option<usize>,
}

impl IdentifierColumns {
    pub(crate) fn identifier(&self, row: &[Value]) -> Option<String> {
        self.primary
            .and_then(|idx| row.get(idx))
            .and_then(Value::as_identifier)
            .or_else(|| {
                self.fallback
                    .and_then(|idx| row.get(idx))
                    .and_then(Value::as_identifier)
            })
    }
}

/// Split a gene list cell such as `TP53/BRCA1/EGFR` into trimmed, non-empty genes.
pub fn split_gene_list(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(['/', ',', ';'])
        .map(str::trim)
        .filter(|gene| !gene.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn de_table() -> Table {
        Table::from_strings(
            &["Geneid", "symbol", "log2FoldChange", "padj", "baseMean"],
            &[
                vec!["ENSG1", "TP53", "2.5", "0.001", "500"],
                vec!["ENSG2", "", "-1.5", "0.01", "20"],
                vec!["ENSG3", "EGFR", "0.5", "0.001", "300"],
                vec!["ENSG4", "MYC", "3.0", "0.2", "5"],
                vec!["ENSG5", "TP53", "-4.0", "NA", "50"],
            ],
        )
    }

    fn de_mapping() -> ColumnMapping {
        ColumnMapping::from_pairs([
            (StandardColumn::GeneId, "Geneid"),
            (StandardColumn::Symbol, "symbol"),
            (StandardColumn::Log2fc, "log2FoldChange"),
            (StandardColumn::AdjPvalue, "padj"),
            (StandardColumn::BaseMean, "baseMean"),
        ])
    }

    fn de_dataset() -> Dataset {
        Dataset::build("treated", DatasetKind::DifferentialExpression, &de_table(), &de_mapping())
            .unwrap()
    }

    fn go_dataset() -> Dataset {
        let table = Table::from_strings(
            &["ID", "Description", "p.adjust", "geneID", "Count"],
            &[
                vec!["GO:0006915", "apoptotic process", "0.001", "TP53/BAX/CASP3", "3"],
                vec!["GO:0008283", "cell population proliferation", "0.03", "MYC/EGFR", "2"],
                vec!["GO:0007049", "cell cycle", "0.2", "TP53/CDK1", "2"],
            ],
        );
        let mapping = ColumnMapping::from_pairs([
            (StandardColumn::TermId, "ID"),
            (StandardColumn::Description, "Description"),
            (StandardColumn::Fdr, "p.adjust"),
            (StandardColumn::GeneSymbols, "geneID"),
            (StandardColumn::GeneCount, "Count"),
        ]);
        Dataset::build("go", DatasetKind::GOAnalysis, &table, &mapping).unwrap()
    }

    #[test]
    fn test_de_summary() {
        let dataset = de_dataset();
        let summary = dataset.summary();
        assert_eq!(summary.row_count, 5);
        // TP53 twice, ENSG2 falls back to its gene id
        assert_eq!(summary.gene_count, 4);
        assert_eq!(summary.significant_count, Some(2));
        assert_eq!(summary.up_count, Some(1));
        assert_eq!(summary.down_count, Some(1));
    }

    #[test]
    fn test_go_summary_counts_distinct_genes() {
        let summary = *go_dataset().summary();
        assert_eq!(summary.row_count, 3);
        assert_eq!(summary.gene_count, 6);
        assert_eq!(summary.significant_count, None);
    }

    #[test]
    fn test_identifier_falls_back_to_gene_id() {
        let dataset = de_dataset();
        assert_eq!(dataset.identifier(0).as_deref(), Some("TP53"));
        assert_eq!(dataset.identifier(1).as_deref(), Some("ENSG2"));
        assert_eq!(dataset.identifier(99), None);

        let universe: Vec<String> = dataset.gene_universe().into_iter().collect();
        assert_eq!(universe, vec!["TP53", "ENSG2", "EGFR", "MYC"]);
    }

    #[test]
    fn test_build_requires_mapping() {
        let mut mapping = de_mapping();
        mapping.remove(StandardColumn::GeneId);
        let err = Dataset::build("x", DatasetKind::DifferentialExpression, &de_table(), &mapping)
            .unwrap_err();
        assert!(matches!(err, DegscopeError::Schema { .. }));
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let dataset = de_dataset();
        assert_eq!(&dataset.filter(&FilterCriteria::default()).unwrap(), dataset.table());
    }

    #[test]
    fn test_filter_conjunction() {
        let dataset = de_dataset();
        let criteria = FilterCriteria::new()
            .with_adj_pvalue_max(0.05)
            .with_log2fc_min(1.0);
        let filtered = dataset.filter(&criteria).unwrap();
        assert_eq!(filtered.row_count(), 2);
        assert_eq!(filtered.value(0, "gene_id"), Some(&Value::from("ENSG1")));
        assert_eq!(filtered.value(1, "gene_id"), Some(&Value::from("ENSG2")));

        let criteria = FilterCriteria::new().with_base_mean_min(100.0);
        assert_eq!(dataset.filter(&criteria).unwrap().row_count(), 2);
    }

    #[test]
    fn test_filter_missing_value_fails_bound() {
        let dataset = de_dataset();
        let filtered = dataset
            .filter(&FilterCriteria::new().with_adj_pvalue_max(1.0))
            .unwrap();
        assert_eq!(filtered.row_count(), 4);
    }

    #[test]
    fn test_filter_gene_list_is_case_sensitive() {
        let dataset = de_dataset();
        let filtered = dataset
            .filter(&FilterCriteria::new().with_gene_list(["TP53", "egfr", "ENSG2"]))
            .unwrap();
        assert_eq!(filtered.row_count(), 3);
        assert!(filtered.column("symbol").unwrap().iter().all(|v| v.as_text() != Some("EGFR")));
    }

    #[test]
    fn test_filter_unknown_column_is_validation_error() {
        let dataset = de_dataset();
        let err = dataset
            .filter(&FilterCriteria::new().with_fdr_max(0.05))
            .unwrap_err();
        assert!(matches!(err, DegscopeError::Validation(_)));
    }

    #[test]
    fn test_go_filter_matches_gene_symbols() {
        let dataset = go_dataset();
        let filtered = dataset
            .filter(&FilterCriteria::new().with_gene_list(["TP53"]).with_fdr_max(0.05))
            .unwrap();
        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.value(0, "term_id"), Some(&Value::from("GO:0006915")));
    }

    #[test]
    fn test_significant_genes() {
        let dataset = de_dataset();
        let genes = dataset.significant_genes(SignificanceCutoffs::default());
        assert_eq!(genes, HashSet::from(["TP53".to_string(), "ENSG2".to_string()]));
    }

    #[test]
    fn test_split_gene_list() {
        let genes: Vec<&str> = split_gene_list(" TP53 / BAX;CASP3,,").collect();
        assert_eq!(genes, vec!["TP53", "BAX", "CASP3"]);
    }

    #[test]
    fn test_numeric_looking_identifiers_are_kept_verbatim() {
        let data = b"ID,Description,p.adjust,geneID\n04110,Cell cycle,1e-3,CDK1/CCNB1\n00010,Glycolysis,0.02,1e3/HK2\n";
        let table = crate::input::Parser::new().parse_bytes(data).unwrap();
        let mapping = ColumnMapping::from_pairs([
            (StandardColumn::TermId, "ID"),
            (StandardColumn::Description, "Description"),
            (StandardColumn::Fdr, "p.adjust"),
            (StandardColumn::GeneSymbols, "geneID"),
        ]);
        let dataset = Dataset::build("kegg", DatasetKind::GOAnalysis, &table, &mapping).unwrap();

        let universe: Vec<String> = dataset.gene_universe().into_iter().collect();
        assert_eq!(universe, vec!["04110", "00010"]);
        assert_eq!(dataset.table().value(0, "fdr"), Some(&Value::Number(0.001)));

        let filtered = dataset
            .filter(&FilterCriteria::new().with_gene_list(["1e3"]))
            .unwrap();
        assert_eq!(filtered.row_count(), 1);
        assert_eq!(filtered.value(0, "term_id"), Some(&Value::from("00010")));
    }
}
