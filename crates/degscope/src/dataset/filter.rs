//! Row filter criteria.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{DegscopeError, Result};
use crate::schema::StandardColumn;

/// Conjunctive row filter over a dataset.
///
/// Every field is optional; an all-absent criteria set keeps every row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterCriteria {
    /// Keep rows with `adj_pvalue <= adj_pvalue_max`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub adj_pvalue_max: Option<f64>,
    /// Keep rows with `|log2fc| >= log2fc_min`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log2fc_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pvalue_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_mean_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fdr_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_count_min: Option<f64>,
    /// Keep rows whose identifier is in this set. Matching is exact and case-sensitive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gene_list: Option<BTreeSet<String>>,
}

/// A single numeric row predicate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Bound {
    AtMost(f64),
    AtLeast(f64),
    AbsAtLeast(f64),
}

impl Bound {
    /// Missing values never pass a bound.
    pub(crate) fn admits(self, value: Option<f64>) -> bool {
        match (self, value) {
            (_, None) => false,
            (Bound::AtMost(max), Some(v)) => v <= max,
            (Bound::AtLeast(min), Some(v)) => v >= min,
            (Bound::AbsAtLeast(min), Some(v)) => v.abs() >= min,
        }
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_adj_pvalue_max(mut self, max: f64) -> Self {
        self.adj_pvalue_max = Some(max);
        self
    }

    pub fn with_log2fc_min(mut self, min: f64) -> Self {
        self.log2fc_min = Some(min);
        self
    }

    pub fn with_pvalue_max(mut self, max: f64) -> Self {
        self.pvalue_max = Some(max);
        self
    }

    pub fn with_base_mean_min(mut self, min: f64) -> Self {
        self.base_mean_min = Some(min);
        self
    }

    pub fn with_fdr_max(mut self, max: f64) -> Self {
        self.fdr_max = Some(max);
        self
    }

    pub fn with_gene_count_min(mut self, min: f64) -> Self {
        self.gene_count_min = Some(min);
        self
    }

    pub fn with_gene_list<I, S>(mut self, genes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.gene_list = Some(genes.into_iter().map(Into::into).collect());
        self
    }

    /// True when no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.bounds().is_empty() && self.gene_list.is_none()
    }

    /// Reject negative or non-finite bounds and p-value bounds above 1.
    pub fn validate(&self) -> Result<()> {
        let probabilities = [
            ("adj_pvalue_max", self.adj_pvalue_max),
            ("pvalue_max", self.pvalue_max),
            ("fdr_max", self.fdr_max),
        ];
        let magnitudes = [
            ("log2fc_min", self.log2fc_min),
            ("base_mean_min", self.base_mean_min),
            ("gene_count_min", self.gene_count_min),
        ];

        for (key, bound) in probabilities.iter().chain(magnitudes.iter()) {
            if let Some(v) = bound {
                if !v.is_finite() || *v < 0.0 {
                    return Err(DegscopeError::Validation(format!(
                        "{} must be a non-negative number, got {}",
                        key, v
                    )));
                }
            }
        }
        for (key, bound) in probabilities {
            if let Some(v) = bound {
                if v > 1.0 {
                    return Err(DegscopeError::Validation(format!(
                        "{} must not exceed 1, got {}",
                        key, v
                    )));
                }
            }
        }
        Ok(())
    }

    /// Numeric predicates paired with the canonical column they test.
    pub(crate) fn bounds(&self) -> Vec<(StandardColumn, Bound)> {
        use StandardColumn::*;

        [
            (AdjPvalue, self.adj_pvalue_max.map(Bound::AtMost)),
            (Log2fc, self.log2fc_min.map(Bound::AbsAtLeast)),
            (Pvalue, self.pvalue_max.map(Bound::AtMost)),
            (BaseMean, self.base_mean_min.map(Bound::AtLeast)),
            (Fdr, self.fdr_max.map(Bound::AtMost)),
            (GeneCount, self.gene_count_min.map(Bound::AtLeast)),
        ]
        .into_iter()
        .filter_map(|(column, bound)| bound.map(|b| (column, b)))
        .collect()
    }

    /// Key-value form, in field order, containing only the present criteria.
    pub fn to_map(&self) -> IndexMap<String, serde_json::Value> {
        let mut map = IndexMap::new();
        let numeric = [
            ("adj_pvalue_max", self.adj_pvalue_max),
            ("log2fc_min", self.log2fc_min),
            ("pvalue_max", self.pvalue_max),
            ("base_mean_min", self.base_mean_min),
            ("fdr_max", self.fdr_max),
            ("gene_count_min", self.gene_count_min),
        ];
        for (key, bound) in numeric {
            if let Some(v) = bound {
                map.insert(key.to_string(), json!(v));
            }
        }
        if let Some(genes) = &self.gene_list {
            map.insert("gene_list".to_string(), json!(genes));
        }
        map
    }

    /// Parse criteria from their key-value form. Unknown keys and malformed values are
    /// rejected; the result is validated.
    pub fn from_map(map: &IndexMap<String, serde_json::Value>) -> Result<Self> {
        let object: serde_json::Map<String, serde_json::Value> =
            map.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let criteria: FilterCriteria = serde_json::from_value(serde_json::Value::Object(object))
            .map_err(|e| DegscopeError::Validation(format!("Invalid filter criteria: {}", e)))?;
        criteria.validate()?;
        Ok(criteria)
    }
}
