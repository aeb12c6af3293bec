//! Canonical-to-source column mapping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{DegscopeError, Result};
use crate::schema::{required_columns, DatasetKind, StandardColumn};

/// Maps canonical columns to the source column that feeds them.
///
/// Produced by [`ColumnMapper`](super::ColumnMapper) as a proposal, optionally edited,
/// then frozen into a [`Dataset`](crate::dataset::Dataset).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColumnMapping {
    entries: IndexMap<StandardColumn, String>,
}

impl ColumnMapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mapping from `(canonical, source)` pairs. Later pairs win.
    pub fn from_pairs<S: Into<String>>(pairs: impl IntoIterator<Item = (StandardColumn, S)>) -> Self {
        let mut mapping = Self::new();
        for (canonical, source) in pairs {
            mapping.insert(canonical, source);
        }
        mapping
    }

    /// Mapping where every given canonical column feeds from itself.
    pub fn identity(columns: impl IntoIterator<Item = StandardColumn>) -> Self {
        Self::from_pairs(columns.into_iter().map(|c| (c, c.as_str())))
    }

    /// Point `canonical` at `source`, returning the previous source if any.
    pub fn insert(&mut self, canonical: StandardColumn, source: impl Into<String>) -> Option<String> {
        self.entries.insert(canonical, source.into())
    }

    pub fn remove(&mut self, canonical: StandardColumn) -> Option<String> {
        self.entries.shift_remove(&canonical)
    }

    /// Source column feeding `canonical`.
    pub fn get(&self, canonical: StandardColumn) -> Option<&str> {
        self.entries.get(&canonical).map(|s| s.as_str())
    }

    pub fn contains(&self, canonical: StandardColumn) -> bool {
        self.entries.contains_key(&canonical)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StandardColumn, &str)> {
        self.entries.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Required columns of `kind` with no entry, in registry order.
    pub fn missing_required(&self, kind: DatasetKind) -> Vec<StandardColumn> {
        required_columns(kind)
            .iter()
            .copied()
            .filter(|c| !self.contains(*c))
            .collect()
    }

    /// Overlay `other` on top of this mapping.
    pub fn merge(&mut self, other: &ColumnMapping) {
        for (canonical, source) in other.iter() {
            self.insert(canonical, source);
        }
    }

    /// Parse a `canonical=source` override, e.g. `log2fc=log2FoldChange`.
    pub fn parse_override(pair: &str) -> Result<(StandardColumn, String)> {
        let (canonical, source) = pair.split_once('=').ok_or_else(|| {
            DegscopeError::Validation(format!(
                "Mapping override '{}' must look like canonical=source",
                pair
            ))
        })?;

        let canonical = StandardColumn::from_name(canonical.trim()).ok_or_else(|| {
            DegscopeError::Validation(format!("Unknown canonical column '{}'", canonical.trim()))
        })?;

        Ok((canonical, source.to_string()))
    }
}

impl<S: Into<String>> FromIterator<(StandardColumn, S)> for ColumnMapping {
    fn from_iter<I: IntoIterator<Item = (StandardColumn, S)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
