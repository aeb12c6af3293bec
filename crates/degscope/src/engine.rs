//! Main Degscope struct and public API.

use std::collections::HashSet;
use std::path::Path;

use crate::analysis::{self, ComparisonResult, FisherResult, GseaResult, OverlapResult};
use crate::config::{DegscopeConfig, SignificanceCutoffs};
use crate::dataset::{Dataset, FilterCriteria};
use crate::error::Result;
use crate::input::{Parser, SourceMetadata, Table};
use crate::mapping::{ColumnMapper, ColumnMapping, MappingProposal};
use crate::progress::{Milestone, NoProgress, ProgressSink};
use crate::schema::DatasetKind;
use crate::transform::{StandardizeReport, Standardizer};

/// The main analysis engine.
///
/// Holds the configuration and the components built from it; every operation
/// reads its inputs and returns new values.
#[derive(Debug, Clone)]
pub struct Degscope {
    config: DegscopeConfig,
    parser: Parser,
    mapper: ColumnMapper,
    standardizer: Standardizer,
}

impl Degscope {
    /// Create a new engine with default configuration.
    pub fn new() -> Self {
        Self::with_config(DegscopeConfig::default())
    }

    /// Create an engine with custom configuration.
    pub fn with_config(config: DegscopeConfig) -> Self {
        let parser = Parser::with_config(config.parser.clone());
        let standardizer = Standardizer::new().with_max_cell_audits(config.max_cell_audits);

        Self {
            config,
            parser,
            mapper: ColumnMapper::new(),
            standardizer,
        }
    }

    pub fn config(&self) -> &DegscopeConfig {
        &self.config
    }

    /// Default significance cutoffs from the configuration.
    pub fn cutoffs(&self) -> SignificanceCutoffs {
        self.config.cutoffs
    }

    /// Read a CSV/TSV file into a raw table.
    pub fn load_table(&self, path: impl AsRef<Path>) -> Result<(Table, SourceMetadata)> {
        self.parser.parse_file(path)
    }

    /// Propose a mapping for the given source column names.
    pub fn map_columns<S: AsRef<str>>(&self, columns: &[S], kind: DatasetKind) -> MappingProposal {
        self.mapper.map_columns(columns, kind)
    }

    pub fn standardize(
        &self,
        table: &Table,
        mapping: &ColumnMapping,
        kind: DatasetKind,
    ) -> Result<(Table, StandardizeReport)> {
        self.standardizer.standardize(table, mapping, kind)
    }

    pub fn build_dataset(
        &self,
        name: impl Into<String>,
        kind: DatasetKind,
        table: &Table,
        mapping: &ColumnMapping,
    ) -> Result<Dataset> {
        Dataset::build_with(name, kind, table, mapping, &self.standardizer, self.config.cutoffs)
    }

    /// Load a file, map its columns, apply `overrides` on top of the proposal, and
    /// build a dataset. The dataset name defaults to the file stem.
    pub fn load_dataset(
        &self,
        path: impl AsRef<Path>,
        name: Option<&str>,
        kind: DatasetKind,
        overrides: &ColumnMapping,
    ) -> Result<Dataset> {
        self.load_dataset_with_progress(path, name, kind, overrides, &NoProgress)
    }

    pub fn load_dataset_with_progress(
        &self,
        path: impl AsRef<Path>,
        name: Option<&str>,
        kind: DatasetKind,
        overrides: &ColumnMapping,
        progress: &dyn ProgressSink,
    ) -> Result<Dataset> {
        let path = path.as_ref();
        progress.report(Milestone::Loading {
            path: path.to_path_buf(),
        });

        let (table, source) = self.load_table(path)?;
        progress.report(Milestone::Parsed {
            rows: table.row_count(),
            columns: table.column_count(),
        });

        let proposal = self.map_columns(table.columns(), kind);
        let mut mapping = proposal.mapping;
        mapping.merge(overrides);
        let unmapped_required = mapping.missing_required(kind);
        if !unmapped_required.is_empty() {
            log::warn!(
                "{}: no column found for {}",
                source.file,
                unmapped_required
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        progress.report(Milestone::Mapped {
            mapped: mapping.len(),
            unmapped_required: unmapped_required.len(),
        });

        let name = name.map(str::to_string).unwrap_or_else(|| source.stem());
        let dataset = self.build_dataset(name, kind, &table, &mapping)?.with_source(source);
        progress.report(Milestone::Standardized {
            rows: dataset.summary().row_count,
            values_coerced: dataset.report().values_coerced(),
        });
        progress.report(Milestone::DatasetBuilt {
            name: dataset.name().to_string(),
        });

        Ok(dataset)
    }

    pub fn filter_dataset(&self, dataset: &Dataset, criteria: &FilterCriteria) -> Result<Table> {
        dataset.filter(criteria)
    }

    /// Fisher's exact test at the configured significance level.
    pub fn fisher_exact_test<S: AsRef<str>>(
        &self,
        genes: &[S],
        dataset: &Dataset,
        cutoffs: SignificanceCutoffs,
    ) -> Result<FisherResult> {
        analysis::fisher_exact_test(genes, dataset, cutoffs, self.config.fisher_alpha)
    }

    /// GSEA-lite with the configured direction threshold.
    pub fn gsea_lite<S: AsRef<str>>(&self, genes: &[S], dataset: &Dataset) -> GseaResult {
        analysis::gsea_lite(genes, dataset, self.config.direction_threshold)
    }

    pub fn overlap_significance<T, A, B>(&self, a: A, b: B, background_size: usize) -> Result<OverlapResult>
    where
        T: Eq + std::hash::Hash,
        A: IntoIterator<Item = T>,
        B: IntoIterator<Item = T>,
    {
        analysis::overlap_significance(a, b, background_size)
    }

    pub fn compare_datasets(
        &self,
        datasets: &[Dataset],
        gene_list: Option<&HashSet<String>>,
        cutoffs: SignificanceCutoffs,
    ) -> Result<ComparisonResult> {
        self.compare_datasets_with_progress(datasets, gene_list, cutoffs, &NoProgress)
    }

    pub fn compare_datasets_with_progress(
        &self,
        datasets: &[Dataset],
        gene_list: Option<&HashSet<String>>,
        cutoffs: SignificanceCutoffs,
        progress: &dyn ProgressSink,
    ) -> Result<ComparisonResult> {
        progress.report(Milestone::Computing {
            operation: "comparison",
        });
        let result = analysis::compare_datasets(datasets, gene_list, cutoffs)?;
        progress.report(Milestone::Finished {
            operation: "comparison",
        });
        Ok(result)
    }
}

impl Default for Degscope {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::schema::StandardColumn;

    fn deseq2_file() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ",baseMean,log2FoldChange,lfcSE,stat,pvalue,padj").unwrap();
        writeln!(file, "ENSG1,100,2.5,0.3,8.1,1e-10,1e-8").unwrap();
        writeln!(file, "ENSG2,50,-1.2,0.4,-3.0,0.001,0.02").unwrap();
        writeln!(file, "ENSG3,10,0.1,0.5,0.2,0.8,0.9").unwrap();
        file
    }

    #[test]
    fn test_load_dataset_with_override() {
        let file = deseq2_file();
        let engine = Degscope::new();

        // The blank first header cannot be mapped automatically
        let overrides = ColumnMapping::from_pairs([(StandardColumn::GeneId, "Unnamed: 0")]);
        let dataset = engine
            .load_dataset(file.path(), Some("deseq2"), DatasetKind::DifferentialExpression, &overrides)
            .unwrap();

        assert_eq!(dataset.name(), "deseq2");
        assert_eq!(dataset.summary().row_count, 3);
        assert_eq!(dataset.summary().significant_count, Some(2));
        assert_eq!(dataset.mapping().get(StandardColumn::Log2fc), Some("log2FoldChange"));
        assert!(dataset.source().is_some());
    }

    #[test]
    fn test_load_dataset_without_identifier_fails() {
        let file = deseq2_file();
        let err = Degscope::new()
            .load_dataset(
                file.path(),
                None,
                DatasetKind::DifferentialExpression,
                &ColumnMapping::new(),
            )
            .unwrap_err();
        assert!(matches!(err, crate::DegscopeError::Schema { .. }));
    }

    #[test]
    fn test_load_reports_milestones() {
        let file = deseq2_file();
        let seen = RefCell::new(Vec::new());
        let sink = |m: Milestone| seen.borrow_mut().push(m);

        let overrides = ColumnMapping::from_pairs([(StandardColumn::GeneId, "Unnamed: 0")]);
        Degscope::new()
            .load_dataset_with_progress(
                file.path(),
                None,
                DatasetKind::DifferentialExpression,
                &overrides,
                &sink,
            )
            .unwrap();

        let seen = seen.into_inner();
        assert!(matches!(seen.first(), Some(Milestone::Loading { .. })));
        assert!(matches!(seen.last(), Some(Milestone::DatasetBuilt { .. })));
    }

    #[test]
    fn test_fisher_uses_configured_alpha() {
        let file = deseq2_file();
        let overrides = ColumnMapping::from_pairs([(StandardColumn::GeneId, "Unnamed: 0")]);
        let config = DegscopeConfig {
            fisher_alpha: 1.0,
            ..DegscopeConfig::default()
        };
        let engine = Degscope::with_config(config);
        let dataset = engine
            .load_dataset(file.path(), None, DatasetKind::DifferentialExpression, &overrides)
            .unwrap();

        let result = engine
            .fisher_exact_test(&["ENSG1", "ENSG3"], &dataset, engine.cutoffs())
            .unwrap();
        assert!(result.pvalue <= 1.0);
        // alpha = 1 marks any p-value below one as significant
        assert_eq!(result.significant, result.pvalue < 1.0);
    }
}
