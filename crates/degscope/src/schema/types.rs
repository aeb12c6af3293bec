//! Core type definitions for the standard schema.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Kind of result table a dataset holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Differential-expression results (DESeq2, edgeR, limma).
    DifferentialExpression,
    /// GO/KEGG enrichment results.
    #[serde(rename = "go_analysis")]
    GOAnalysis,
}

impl DatasetKind {
    /// Short identifier used in file names and on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::DifferentialExpression => "deg",
            DatasetKind::GOAnalysis => "go",
        }
    }

    /// Parse a kind from its short or long name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "deg" | "de" | "differential_expression" | "differentialexpression" => {
                Some(DatasetKind::DifferentialExpression)
            }
            "go" | "kegg" | "go_analysis" | "goanalysis" | "enrichment" => {
                Some(DatasetKind::GOAnalysis)
            }
            _ => None,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetKind::DifferentialExpression => write!(f, "Differential expression"),
            DatasetKind::GOAnalysis => write!(f, "GO/KEGG enrichment"),
        }
    }
}

/// How values of a canonical column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Gene or term identifier, kept verbatim.
    Identifier,
    /// Floating-point statistic; cells are parsed as numbers.
    Numeric,
    /// Free text.
    Text,
    /// Delimited list of gene symbols (e.g. `TP53/MDM2/CDKN1A`).
    GeneList,
}

impl ValueType {
    /// Returns true if this type is numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueType::Numeric)
    }
}

/// Canonical column names shared by every dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardColumn {
    GeneId,
    Symbol,
    Log2fc,
    AdjPvalue,
    Pvalue,
    BaseMean,
    LfcSe,
    Stat,
    TermId,
    Description,
    Category,
    GeneCount,
    GeneRatio,
    BgRatio,
    Fdr,
    Qvalue,
    GeneSymbols,
    ClusterId,
}

impl StandardColumn {
    /// Every canonical column, in registry order.
    pub const ALL: [StandardColumn; 18] = [
        StandardColumn::GeneId,
        StandardColumn::Symbol,
        StandardColumn::Log2fc,
        StandardColumn::AdjPvalue,
        StandardColumn::Pvalue,
        StandardColumn::BaseMean,
        StandardColumn::LfcSe,
        StandardColumn::Stat,
        StandardColumn::TermId,
        StandardColumn::Description,
        StandardColumn::Category,
        StandardColumn::GeneCount,
        StandardColumn::GeneRatio,
        StandardColumn::BgRatio,
        StandardColumn::Fdr,
        StandardColumn::Qvalue,
        StandardColumn::GeneSymbols,
        StandardColumn::ClusterId,
    ];

    /// The canonical column name as it appears in standardized tables.
    pub fn as_str(&self) -> &'static str {
        match self {
            StandardColumn::GeneId => "gene_id",
            StandardColumn::Symbol => "symbol",
            StandardColumn::Log2fc => "log2fc",
            StandardColumn::AdjPvalue => "adj_pvalue",
            StandardColumn::Pvalue => "pvalue",
            StandardColumn::BaseMean => "base_mean",
            StandardColumn::LfcSe => "lfc_se",
            StandardColumn::Stat => "stat",
            StandardColumn::TermId => "term_id",
            StandardColumn::Description => "description",
            StandardColumn::Category => "category",
            StandardColumn::GeneCount => "gene_count",
            StandardColumn::GeneRatio => "gene_ratio",
            StandardColumn::BgRatio => "bg_ratio",
            StandardColumn::Fdr => "fdr",
            StandardColumn::Qvalue => "qvalue",
            StandardColumn::GeneSymbols => "gene_symbols",
            StandardColumn::ClusterId => "cluster_id",
        }
    }

    /// Look up a canonical column by its exact canonical name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == name)
    }

    /// Human-readable label for tables and mapping editors.
    pub fn display_label(&self) -> &'static str {
        match self {
            StandardColumn::GeneId => "Gene ID",
            StandardColumn::Symbol => "Gene Symbol",
            StandardColumn::Log2fc => "log2 Fold Change",
            StandardColumn::AdjPvalue => "Adjusted P-value",
            StandardColumn::Pvalue => "P-value",
            StandardColumn::BaseMean => "Base Mean",
            StandardColumn::LfcSe => "log2FC Standard Error",
            StandardColumn::Stat => "Test Statistic",
            StandardColumn::TermId => "Term ID",
            StandardColumn::Description => "Description",
            StandardColumn::Category => "Ontology / Category",
            StandardColumn::GeneCount => "Gene Count",
            StandardColumn::GeneRatio => "Gene Ratio",
            StandardColumn::BgRatio => "Background Ratio",
            StandardColumn::Fdr => "FDR",
            StandardColumn::Qvalue => "Q-value",
            StandardColumn::GeneSymbols => "Genes",
            StandardColumn::ClusterId => "Cluster",
        }
    }

    /// How cells of this column are interpreted during standardization.
    pub fn value_type(&self) -> ValueType {
        match self {
            StandardColumn::GeneId | StandardColumn::Symbol | StandardColumn::TermId => {
                ValueType::Identifier
            }
            StandardColumn::Log2fc
            | StandardColumn::AdjPvalue
            | StandardColumn::Pvalue
            | StandardColumn::BaseMean
            | StandardColumn::LfcSe
            | StandardColumn::Stat
            | StandardColumn::GeneCount
            | StandardColumn::Fdr
            | StandardColumn::Qvalue => ValueType::Numeric,
            StandardColumn::Description
            | StandardColumn::Category
            | StandardColumn::GeneRatio
            | StandardColumn::BgRatio
            | StandardColumn::ClusterId => ValueType::Text,
            StandardColumn::GeneSymbols => ValueType::GeneList,
        }
    }
}

impl fmt::Display for StandardColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
