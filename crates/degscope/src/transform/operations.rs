//! Audit records produced by standardization.

use serde::{Deserialize, Serialize};

use crate::mapping::ColumnMapping;
use crate::schema::{DatasetKind, StandardColumn};

/// What happened to the canonical column when a mapping entry was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameAction {
    /// A new canonical column was appended next to the original.
    Added,
    /// An existing column with the canonical name was overwritten.
    Replaced,
    /// The source already carried the canonical name; values were normalized in place.
    InPlace,
}

/// One applied mapping entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRename {
    pub canonical: StandardColumn,
    /// Source column as named in the mapping.
    pub source: String,
    pub action: RenameAction,
    /// Number of non-missing source cells that could not be read as numbers.
    pub values_coerced: usize,
    /// Per-cell audit for coerced values.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cell_audits: Vec<CellAudit>,
}

/// Audit information for a single cell that was set to missing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellAudit {
    /// Row index (0-based).
    pub row: usize,
    /// Original value before coercion.
    pub original_value: String,
    /// Reason for the change.
    pub reason: String,
}

/// Header fix applied before mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFix {
    pub position: usize,
    pub original: String,
    pub renamed: String,
}

/// Result of standardizing a table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardizeReport {
    pub kind: DatasetKind,
    /// Mapping entries actually applied, canonical to source.
    pub realized_mapping: ColumnMapping,
    pub renames: Vec<ColumnRename>,
    /// Blank or duplicate headers that received placeholder names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_fixes: Vec<HeaderFix>,
}

impl StandardizeReport {
    pub(crate) fn new(kind: DatasetKind) -> Self {
        Self {
            kind,
            realized_mapping: ColumnMapping::new(),
            renames: Vec::new(),
            header_fixes: Vec::new(),
        }
    }

    /// Total number of cells set to missing during numeric coercion.
    pub fn values_coerced(&self) -> usize {
        self.renames.iter().map(|r| r.values_coerced).sum()
    }

    /// Canonical columns that were appended as new columns.
    pub fn added_columns(&self) -> impl Iterator<Item = StandardColumn> + '_ {
        self.renames
            .iter()
            .filter(|r| r.action == RenameAction::Added)
            .map(|r| r.canonical)
    }
}
