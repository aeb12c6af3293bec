//! GSEA-lite: mean and median fold change of a gene set.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::schema::StandardColumn;

/// Overall direction of a gene set's fold changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrichmentDirection {
    Up,
    Down,
    None,
}

impl EnrichmentDirection {
    /// Classify a mean log2FC. `NaN` is `None`.
    pub fn classify(mean: f64, threshold: f64) -> Self {
        if mean > threshold {
            EnrichmentDirection::Up
        } else if mean < -threshold {
            EnrichmentDirection::Down
        } else {
            EnrichmentDirection::None
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EnrichmentDirection::Up => "up",
            EnrichmentDirection::Down => "down",
            EnrichmentDirection::None => "none",
        }
    }
}

impl fmt::Display for EnrichmentDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GseaResult {
    /// `NaN` when no query gene has a log2FC value.
    pub mean_log2fc: f64,
    pub median_log2fc: f64,
    pub enrichment_direction: EnrichmentDirection,
    /// Distinct query genes that contributed at least one value.
    pub genes_used: usize,
    /// Number of log2FC values averaged (a gene may have several rows).
    pub values_used: usize,
    pub genes_not_found: Vec<String>,
}

/// Summarize the fold changes of `genes` in `dataset`.
///
/// Genes absent from the dataset are left out, never counted as zero. Every row
/// whose identifier is in the query contributes its log2FC.
pub fn gsea_lite<S: AsRef<str>>(genes: &[S], dataset: &Dataset, direction_threshold: f64) -> GseaResult {
    let query: IndexSet<&str> = genes.iter().map(|g| g.as_ref()).collect();
    let universe = dataset.gene_universe();

    let mut values = Vec::new();
    let mut used: HashSet<String> = HashSet::new();
    if let Some(columns) = dataset.identifier_columns() {
        for row in dataset.table().rows() {
            let Some(id) = columns.identifier(row) else {
                continue;
            };
            if !query.contains(id.as_str()) {
                continue;
            }
            if let Some(lfc) = dataset.numeric(row, StandardColumn::Log2fc) {
                values.push(lfc);
                used.insert(id);
            }
        }
    }

    let genes_not_found: Vec<String> = query
        .iter()
        .filter(|g| !universe.contains(**g))
        .map(|g| g.to_string())
        .collect();

    let mean_log2fc = mean(&values);
    let median_log2fc = median(&mut values);
    let direction = EnrichmentDirection::classify(mean_log2fc, direction_threshold);

    log::debug!(
        "GSEA-lite on '{}': {} of {} genes used, mean log2FC {}",
        dataset.name(),
        used.len(),
        query.len(),
        mean_log2fc
    );

    GseaResult {
        mean_log2fc,
        median_log2fc,
        enrichment_direction: direction,
        genes_used: used.len(),
        values_used: values.len(),
        genes_not_found,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}
