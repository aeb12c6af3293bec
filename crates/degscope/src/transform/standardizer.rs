//! Rewrites a table's columns to canonical names.

use std::collections::HashSet;

use crate::error::{DegscopeError, Result};
use crate::input::{Table, Value};
use crate::mapping::ColumnMapping;
use crate::schema::{DatasetKind, ValueType};

use super::operations::{CellAudit, ColumnRename, HeaderFix, RenameAction, StandardizeReport};

/// Default cap on per-cell audit records kept for one column.
const DEFAULT_MAX_CELL_AUDITS: usize = 50;

/// Applies a confirmed [`ColumnMapping`] to a table.
///
/// Standardization is non-destructive: original columns stay in place and each
/// mapped canonical column is added next to them (or normalized in place when the
/// source already carries the canonical name).
#[derive(Debug, Clone)]
pub struct Standardizer {
    max_cell_audits: usize,
}

impl Standardizer {
    /// Create a new standardizer.
    pub fn new() -> Self {
        Self {
            max_cell_audits: DEFAULT_MAX_CELL_AUDITS,
        }
    }

    /// Limit the number of coerced-cell audit records kept per column.
    pub fn with_max_cell_audits(mut self, max: usize) -> Self {
        self.max_cell_audits = max;
        self
    }

    /// Standardize `table` with `mapping`.
    ///
    /// Fails with [`DegscopeError::Schema`] when a required column of `kind` has no
    /// mapping entry, and with [`DegscopeError::Mapping`] when an entry names a
    /// column the table does not have.
    pub fn standardize(
        &self,
        table: &Table,
        mapping: &ColumnMapping,
        kind: DatasetKind,
    ) -> Result<(Table, StandardizeReport)> {
        let missing = mapping.missing_required(kind);
        if !missing.is_empty() {
            return Err(DegscopeError::Schema { kind, missing });
        }

        let mut report = StandardizeReport::new(kind);

        let headers = sanitize_headers(table.columns());
        for (position, (original, renamed)) in table.columns().iter().zip(&headers).enumerate() {
            if original != renamed {
                report.header_fixes.push(HeaderFix {
                    position,
                    original: original.clone(),
                    renamed: renamed.clone(),
                });
            }
        }
        let source = table.clone().with_columns(headers);

        // Resolve every entry before writing so a bad mapping leaves nothing half-applied
        let mut resolved = Vec::with_capacity(mapping.len());
        for (canonical, source_name) in mapping.iter() {
            let index = table
                .column_index(source_name)
                .or_else(|| source.column_index(source_name))
                .ok_or_else(|| DegscopeError::Mapping {
                    canonical,
                    source_column: source_name.to_string(),
                })?;
            resolved.push((canonical, source_name, index));
        }

        let mut output = source.clone();
        for (canonical, source_name, index) in resolved {
            let target = canonical.as_str();
            let action = if source.columns()[index] == target {
                RenameAction::InPlace
            } else if output.has_column(target) {
                RenameAction::Replaced
            } else {
                RenameAction::Added
            };

            let mut values_coerced = 0;
            let mut cell_audits = Vec::new();
            let values: Vec<Value> = source
                .column_values(index)
                .enumerate()
                .map(|(row, value)| match canonical.value_type() {
                    ValueType::Numeric => {
                        let numeric = value.to_numeric();
                        if numeric.is_missing() && !value.is_missing() {
                            values_coerced += 1;
                            if cell_audits.len() < self.max_cell_audits {
                                cell_audits.push(CellAudit {
                                    row,
                                    original_value: value.to_string(),
                                    reason: format!("'{}' is not a number", value),
                                });
                            }
                        }
                        numeric
                    }
                    ValueType::Identifier | ValueType::Text | ValueType::GeneList => value.clone(),
                })
                .collect();

            if values_coerced > 0 {
                log::warn!(
                    "{} of {} values in '{}' are not numeric and were set to missing",
                    values_coerced,
                    source.row_count(),
                    source_name
                );
            }

            output.set_column(target, values)?;
            report.realized_mapping.insert(canonical, source_name);
            report.renames.push(ColumnRename {
                canonical,
                source: source_name.to_string(),
                action,
                values_coerced,
                cell_audits,
            });
        }

        Ok((output, report))
    }
}

impl Default for Standardizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_blank_header(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan")
}

/// Standardize with the default settings.
pub fn standardize(
    table: &Table,
    mapping: &ColumnMapping,
    kind: DatasetKind,
) -> Result<(Table, StandardizeReport)> {
    Standardizer::new().standardize(table, mapping, kind)
}

/// Give blank headers a placeholder name and de-duplicate repeated ones.
///
/// Blank or `NaN` headers become `Unnamed: {position}`; the second and later
/// copies of a name get `.1`, `.2`, ... suffixes. Already-unique headers are
/// returned unchanged.
pub fn sanitize_headers(columns: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = columns.iter().filter(|c| !is_blank_header(c)).cloned().collect();
    let mut seen: HashSet<&str> = HashSet::new();

    columns
        .iter()
        .enumerate()
        .map(|(position, name)| {
            if is_blank_header(name) {
                let mut placeholder = format!("Unnamed: {}", position);
                let mut n = 1;
                while used.contains(&placeholder) {
                    placeholder = format!("Unnamed: {}.{}", position, n);
                    n += 1;
                }
                used.insert(placeholder.clone());
                return placeholder;
            }

            if seen.insert(name.as_str()) {
                return name.clone();
            }

            let mut n = 1;
            let mut candidate = format!("{}.{}", name, n);
            while used.contains(&candidate) {
                n += 1;
                candidate = format!("{}.{}", name, n);
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}
