//! Fisher's exact test of a gene list against a dataset's significant genes.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::config::SignificanceCutoffs;
use crate::dataset::Dataset;
use crate::error::{DegscopeError, Result};

use super::math;

/// 2x2 table of {in list, not in list} x {significant, not significant}.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contingency {
    pub in_list_significant: u64,
    pub in_list_not_significant: u64,
    pub not_in_list_significant: u64,
    pub not_in_list_not_significant: u64,
}

impl Contingency {
    pub fn new(a: u64, b: u64, c: u64, d: u64) -> Self {
        Self {
            in_list_significant: a,
            in_list_not_significant: b,
            not_in_list_significant: c,
            not_in_list_not_significant: d,
        }
    }

    pub fn total(&self) -> u64 {
        self.in_list_significant
            + self.in_list_not_significant
            + self.not_in_list_significant
            + self.not_in_list_not_significant
    }

    /// Whether any row or column sums to zero.
    pub fn has_empty_margin(&self) -> bool {
        let (a, b, c, d) = self.cells();
        a + b == 0 || c + d == 0 || a + c == 0 || b + d == 0
    }

    fn cells(&self) -> (u64, u64, u64, u64) {
        (
            self.in_list_significant,
            self.in_list_not_significant,
            self.not_in_list_significant,
            self.not_in_list_not_significant,
        )
    }

    /// `(a*d)/(b*c)`. `NaN` when a margin is empty, `+inf` when `b*c == 0`.
    pub fn odds_ratio(&self) -> f64 {
        if self.has_empty_margin() {
            return f64::NAN;
        }
        let (a, b, c, d) = self.cells();
        if b == 0 || c == 0 {
            return f64::INFINITY;
        }
        (a as f64 * d as f64) / (b as f64 * c as f64)
    }

    /// Two-sided exact p-value. `1.0` when a margin is empty.
    pub fn pvalue(&self) -> Result<f64> {
        if self.has_empty_margin() {
            return Ok(1.0);
        }
        let (a, b, c, _) = self.cells();
        math::two_sided(self.total(), a + c, a + b, a)
    }
}

/// Outcome of [`fisher_exact_test`].
#[derive(Debug, Clone, Serialize)]
pub struct FisherResult {
    pub pvalue: f64,
    pub odds_ratio: f64,
    pub contingency: Contingency,
    /// `pvalue < alpha`.
    pub significant: bool,
    /// Query genes that are not in the dataset and were left out of the table.
    pub genes_not_found: Vec<String>,
}

/// Test whether `genes` are over- or under-represented among the dataset's
/// significant genes.
///
/// The universe is the dataset's distinct identifiers. Query genes outside the
/// universe are excluded from the table rather than counted as not significant.
pub fn fisher_exact_test<S: AsRef<str>>(
    genes: &[S],
    dataset: &Dataset,
    cutoffs: SignificanceCutoffs,
    alpha: f64,
) -> Result<FisherResult> {
    cutoffs.validate()?;
    if !(0.0..=1.0).contains(&alpha) {
        return Err(DegscopeError::Validation(format!(
            "Significance level must be within [0, 1], got {}",
            alpha
        )));
    }

    let universe = dataset.gene_universe();
    let significant = dataset.significant_genes(cutoffs);

    let query: IndexSet<&str> = genes.iter().map(|g| g.as_ref()).collect();
    let (in_list, not_found): (Vec<&str>, Vec<&str>) =
        query.into_iter().partition(|g| universe.contains(*g));

    let a = in_list.iter().filter(|g| significant.contains(**g)).count() as u64;
    let b = in_list.len() as u64 - a;
    let c = significant.len() as u64 - a;
    let d = universe.len() as u64 - a - b - c;
    let contingency = Contingency::new(a, b, c, d);

    let pvalue = contingency.pvalue()?;
    let odds_ratio = contingency.odds_ratio();

    log::debug!(
        "Fisher test on '{}': table [{}, {}; {}, {}], {} genes not found, p = {}",
        dataset.name(),
        a,
        b,
        c,
        d,
        not_found.len(),
        pvalue
    );

    Ok(FisherResult {
        pvalue,
        odds_ratio,
        contingency,
        significant: pvalue < alpha,
        genes_not_found: not_found.into_iter().map(String::from).collect(),
    })
}
