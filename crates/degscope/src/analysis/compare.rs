//! Multi-dataset comparison.

use std::collections::HashSet;
use std::fmt;

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

use crate::config::SignificanceCutoffs;
use crate::dataset::{Dataset, FilterCriteria};
use crate::error::{DegscopeError, Result};
use crate::input::{Table, Value};
use crate::schema::{DatasetKind, StandardColumn};

/// How many datasets a gene was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneStatus {
    /// Found in every compared dataset.
    Common,
    /// Found in more than one but not all.
    Shared,
    /// Found in exactly one.
    Unique,
}

impl GeneStatus {
    fn classify(found_in: usize, datasets: usize) -> Self {
        if found_in == datasets {
            GeneStatus::Common
        } else if found_in == 1 {
            GeneStatus::Unique
        } else {
            GeneStatus::Shared
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneStatus::Common => "Common",
            GeneStatus::Shared => "Shared",
            GeneStatus::Unique => "Unique",
        }
    }
}

impl fmt::Display for GeneStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ComparisonResult {
    /// Names of the compared datasets, made unique.
    pub dataset_names: Vec<String>,
    /// Genes present in every dataset, in first-appearance order.
    pub common_genes: IndexSet<String>,
    /// Per dataset, the genes no other dataset has.
    pub unique_genes: IndexMap<String, IndexSet<String>>,
    /// One row per gene: `Gene`, `{name}_log2FC` and `{name}_padj` per dataset,
    /// then `Found_in`, `Significant_in` and `Status`.
    pub comparison_table: Table,
}

/// Per-gene values taken from the first row carrying the gene.
struct GeneEntry {
    log2fc: Value,
    padj: Value,
    significant: bool,
}

struct Universe {
    name: String,
    genes: IndexMap<String, GeneEntry>,
}

/// Compare the gene universes of two or more datasets.
///
/// With a `gene_list`, each universe is restricted to the rows the list keeps
/// (see [`Dataset::filter`]). Datasets without an identifier column are skipped.
pub fn compare_datasets(
    datasets: &[Dataset],
    gene_list: Option<&HashSet<String>>,
    cutoffs: SignificanceCutoffs,
) -> Result<ComparisonResult> {
    if datasets.len() < 2 {
        return Err(DegscopeError::Comparison(format!(
            "At least 2 datasets are required, got {}",
            datasets.len()
        )));
    }
    cutoffs.validate()?;

    let names = unique_names(datasets.iter().map(|d| d.name()));
    let mut universes = Vec::with_capacity(datasets.len());
    for (dataset, name) in datasets.iter().zip(names) {
        match universe(dataset, name, gene_list, cutoffs)? {
            Some(universe) => universes.push(universe),
            None => log::warn!(
                "Skipping dataset '{}': no gene identifier column",
                dataset.name()
            ),
        }
    }
    if universes.is_empty() {
        return Err(DegscopeError::Comparison(
            "None of the datasets has a gene identifier column".to_string(),
        ));
    }

    let all_genes: IndexSet<&str> = universes
        .iter()
        .flat_map(|u| u.genes.keys().map(|g| g.as_str()))
        .collect();

    let common_genes: IndexSet<String> = all_genes
        .iter()
        .filter(|g| universes.iter().all(|u| u.genes.contains_key(**g)))
        .map(|g| g.to_string())
        .collect();

    let unique_genes: IndexMap<String, IndexSet<String>> = universes
        .iter()
        .enumerate()
        .map(|(i, universe)| {
            let unique = universe
                .genes
                .keys()
                .filter(|g| {
                    universes
                        .iter()
                        .enumerate()
                        .all(|(j, other)| i == j || !other.genes.contains_key(*g))
                })
                .cloned()
                .collect();
            (universe.name.clone(), unique)
        })
        .collect();

    let mut headers = vec!["Gene".to_string()];
    for universe in &universes {
        headers.push(format!("{}_log2FC", universe.name));
        headers.push(format!("{}_padj", universe.name));
    }
    headers.extend(["Found_in", "Significant_in", "Status"].map(String::from));

    let mut comparison_table = Table::new(headers, Vec::new());
    for gene in &all_genes {
        let mut row = vec![Value::from(*gene)];
        let mut found_in = Vec::new();
        let mut significant_in = Vec::new();
        for universe in &universes {
            match universe.genes.get(*gene) {
                Some(entry) => {
                    row.push(entry.log2fc.clone());
                    row.push(entry.padj.clone());
                    found_in.push(universe.name.as_str());
                    if entry.significant {
                        significant_in.push(universe.name.as_str());
                    }
                }
                None => {
                    row.push(Value::Missing);
                    row.push(Value::Missing);
                }
            }
        }
        let status = GeneStatus::classify(found_in.len(), universes.len());
        row.push(Value::from(found_in.join(", ")));
        row.push(if significant_in.is_empty() {
            Value::Missing
        } else {
            Value::from(significant_in.join(", "))
        });
        row.push(Value::from(status.as_str()));
        comparison_table.push_row(row);
    }

    log::debug!(
        "Compared {} datasets: {} genes, {} common",
        universes.len(),
        all_genes.len(),
        common_genes.len()
    );

    Ok(ComparisonResult {
        dataset_names: universes.into_iter().map(|u| u.name).collect(),
        common_genes,
        unique_genes,
        comparison_table,
    })
}

fn universe(
    dataset: &Dataset,
    name: String,
    gene_list: Option<&HashSet<String>>,
    cutoffs: SignificanceCutoffs,
) -> Result<Option<Universe>> {
    let Some(columns) = dataset.identifier_columns() else {
        return Ok(None);
    };

    let filtered;
    let table = match gene_list {
        Some(genes) => {
            filtered = dataset.filter(&FilterCriteria::new().with_gene_list(genes.iter().cloned()))?;
            &filtered
        }
        None => dataset.table(),
    };

    let padj_column = match dataset.kind() {
        DatasetKind::DifferentialExpression => StandardColumn::AdjPvalue,
        DatasetKind::GOAnalysis => StandardColumn::Fdr,
    };

    let mut genes: IndexMap<String, GeneEntry> = IndexMap::new();
    for row in table.rows() {
        let Some(id) = columns.identifier(row) else {
            continue;
        };
        let significant = dataset.row_passes(row, cutoffs);
        genes
            .entry(id)
            .and_modify(|entry| entry.significant |= significant)
            .or_insert_with(|| GeneEntry {
                log2fc: dataset.numeric(row, StandardColumn::Log2fc).into(),
                padj: dataset.numeric(row, padj_column).into(),
                significant,
            });
    }

    Ok(Some(Universe { name, genes }))
}

/// Disambiguate repeated names as `name (2)`, `name (3)`, ...
fn unique_names<'a>(names: impl Iterator<Item = &'a str>) -> Vec<String> {
    let names: Vec<&str> = names.collect();
    let mut taken: HashSet<String> = HashSet::new();
    let mut out = Vec::with_capacity(names.len());

    for name in &names {
        let mut candidate = name.to_string();
        let mut n = 2;
        while taken.contains(&candidate) {
            candidate = format!("{} ({})", name, n);
            n += 1;
        }
        taken.insert(candidate.clone());
        out.push(candidate);
    }
    out
}
