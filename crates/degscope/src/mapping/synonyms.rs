//! Known spellings of canonical columns and token heuristics.
//!
//! Synonyms are lowercase and compared against trimmed, lowercased source names.
//! They cover the exports of DESeq2, edgeR, limma, clusterProfiler, DAVID and
//! g:Profiler.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::schema::{DatasetKind, StandardColumn};

/// Exact synonyms for `column` when loading a table of `kind`.
pub fn synonyms(column: StandardColumn, kind: DatasetKind) -> &'static [&'static str] {
    use DatasetKind::*;
    use StandardColumn::*;

    match (column, kind) {
        (GeneId, _) => &[
            "gene_id", "geneid", "gene id", "gene", "ensembl", "ensembl_id",
            "ensembl_gene_id", "ensembl id", "id", "feature_id", "row.names",
        ],
        (Symbol, _) => &[
            "symbol", "gene_symbol", "genesymbol", "gene symbol", "gene_name",
            "genename", "gene name", "external_gene_name", "hgnc_symbol", "mgi_symbol",
            "name",
        ],
        (Log2fc, _) => &[
            "log2foldchange", "log2fc", "log2_fold_change", "log2 fold change", "logfc",
            "log2fold", "lfc", "log2(fc)", "log2_fc", "fold_change_log2",
        ],
        (AdjPvalue, _) => &[
            "padj", "p.adj", "p_adj", "adj.p.val", "adj_p_val", "adj.pval", "adj_pval",
            "adjusted_pvalue", "adjusted p-value", "adjusted.p.value", "p.adjust", "fdr",
        ],
        (Pvalue, _) => &[
            "pvalue", "p.value", "p_value", "p-value", "pval", "p.val", "p_val", "p",
        ],
        (BaseMean, _) => &[
            "basemean", "base_mean", "base mean", "aveexpr", "mean_expression", "avg_expr",
        ],
        (LfcSe, _) => &["lfcse", "lfc_se", "log2foldchange_se", "se"],
        (Stat, _) => &["stat", "statistic", "t", "wald_stat", "lr", "f"],
        (TermId, _) => &[
            "term_id", "id", "go_id", "goid", "go id", "go.id", "kegg_id", "pathway_id",
            "term id",
        ],
        (Description, _) => &[
            "description", "term", "term_name", "term name", "pathway", "pathway_name",
            "name",
        ],
        (Category, _) => &["category", "ontology", "ont", "namespace", "source"],
        (GeneCount, _) => &["count", "gene_count", "genecount", "n_genes", "size", "overlap"],
        (GeneRatio, _) => &["generatio", "gene_ratio"],
        (BgRatio, _) => &["bgratio", "bg_ratio", "background_ratio"],
        (Fdr, GOAnalysis) => &[
            "p.adjust", "fdr", "padj", "adj_pvalue", "adjusted_pvalue", "adj.p.val",
            "fdr_bh", "benjamini",
        ],
        (Fdr, DifferentialExpression) => &[],
        (Qvalue, _) => &["qvalue", "q.value", "q_value", "qval"],
        (GeneSymbols, _) => &[
            "geneid", "genes", "gene_symbols", "symbols", "gene_list", "overlapping_genes",
            "intersections", "core_enrichment",
        ],
        (ClusterId, _) => &["cluster", "cluster_id", "module"],
    }
}

/// Token rule used when no exact or synonym match exists.
pub(crate) struct HeuristicRule {
    pub column: StandardColumn,
    include: Regex,
    exclude: Option<Regex>,
}

impl HeuristicRule {
    fn new(column: StandardColumn, include: &str, exclude: Option<&str>) -> Self {
        let compile = |pattern: &str| Regex::new(&pattern.replace("{SEP}", SEP)).unwrap();
        Self {
            column,
            include: compile(include),
            exclude: exclude.map(compile),
        }
    }

    /// Whether a lowercased source name matches this rule.
    pub fn matches(&self, normalized: &str) -> bool {
        self.include.is_match(normalized)
            && !self
                .exclude
                .as_ref()
                .is_some_and(|exclude| exclude.is_match(normalized))
    }
}

// Separator class substituted for `{SEP}` in every rule pattern.
const SEP: &str = r"[\s._-]*";

static HEURISTICS: Lazy<Vec<HeuristicRule>> = Lazy::new(|| {
    use StandardColumn::*;

    vec![
        HeuristicRule::new(
            GeneId,
            r"ensembl|entrez|gene{SEP}id|^gene$|^gene{SEP}[a-z]*id",
            Some(r"symbol|name|count|ratio|list|ids$|genes"),
        ),
        HeuristicRule::new(Symbol, r"symbol|gene{SEP}name|hgnc", Some(r"symbols|list|names")),
        HeuristicRule::new(
            Log2fc,
            r"log2?{SEP}(fold|fc)|lfc|fold{SEP}change",
            Some(r"se$|stderr|error|pval|padj|p\.adj"),
        ),
        HeuristicRule::new(
            AdjPvalue,
            r"adj|adjusted|corrected|fdr|q{SEP}val|bonferroni|holm|\bbh\b",
            None,
        ),
        HeuristicRule::new(
            Pvalue,
            r"^p{SEP}val|p{SEP}value|pval",
            Some(r"adj|fdr|corrected|log|q\.?val"),
        ),
        HeuristicRule::new(
            BaseMean,
            r"base{SEP}mean|ave{SEP}expr|mean{SEP}expr|avg{SEP}expr|logcpm",
            None,
        ),
        HeuristicRule::new(
            LfcSe,
            r"lfc{SEP}se|(fold|fc){SEP}(se|stderr|std{SEP}err)$|std{SEP}err",
            None,
        ),
        HeuristicRule::new(Stat, r"test{SEP}stat|wald|^t{SEP}stat", None),
        HeuristicRule::new(
            TermId,
            r"(go|kegg|term|pathway|reactome){SEP}(id|accession)",
            Some(r"gene"),
        ),
        HeuristicRule::new(
            Description,
            r"desc|term{SEP}name|pathway{SEP}name|^term$",
            None,
        ),
        HeuristicRule::new(Category, r"ontology|categor|namespace|aspect", None),
        HeuristicRule::new(
            GeneCount,
            r"count|^size$|num{SEP}genes|^n{SEP}genes$",
            Some(r"ratio|genes{SEP}list"),
        ),
        HeuristicRule::new(GeneRatio, r"gene{SEP}ratio", None),
        HeuristicRule::new(BgRatio, r"(bg|background){SEP}ratio", None),
        HeuristicRule::new(
            Fdr,
            r"adj|adjusted|corrected|fdr|bonferroni|benjamini|\bbh\b",
            Some(r"q{SEP}val"),
        ),
        HeuristicRule::new(Qvalue, r"q{SEP}val", None),
        HeuristicRule::new(
            GeneSymbols,
            r"genes|gene{SEP}(symbols|list|names)|symbols|leading{SEP}edge|core{SEP}enrich",
            Some(r"count|ratio|^n{SEP}genes$|num"),
        ),
        HeuristicRule::new(ClusterId, r"cluster|module", None),
    ]
});

/// Heuristic rules for the columns of `kind`, in registry order.
pub(crate) fn heuristics_for(kind: DatasetKind) -> impl Iterator<Item = &'static HeuristicRule> {
    let columns = crate::schema::all_columns(kind);
    columns
        .into_iter()
        .filter_map(|col| HEURISTICS.iter().find(|rule| rule.column == col))
}
