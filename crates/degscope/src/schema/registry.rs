//! Static registry of canonical columns per dataset kind.

use super::types::{DatasetKind, StandardColumn};

const DE_REQUIRED: &[StandardColumn] = &[
    StandardColumn::GeneId,
    StandardColumn::Log2fc,
    StandardColumn::AdjPvalue,
];

const DE_OPTIONAL: &[StandardColumn] = &[
    StandardColumn::Symbol,
    StandardColumn::Pvalue,
    StandardColumn::BaseMean,
    StandardColumn::LfcSe,
    StandardColumn::Stat,
];

const GO_REQUIRED: &[StandardColumn] = &[
    StandardColumn::TermId,
    StandardColumn::Description,
    StandardColumn::Fdr,
];

const GO_OPTIONAL: &[StandardColumn] = &[
    StandardColumn::Category,
    StandardColumn::GeneCount,
    StandardColumn::GeneRatio,
    StandardColumn::BgRatio,
    StandardColumn::Pvalue,
    StandardColumn::Qvalue,
    StandardColumn::GeneSymbols,
    StandardColumn::ClusterId,
];

/// Canonical columns a table of this kind must provide.
pub fn required_columns(kind: DatasetKind) -> &'static [StandardColumn] {
    match kind {
        DatasetKind::DifferentialExpression => DE_REQUIRED,
        DatasetKind::GOAnalysis => GO_REQUIRED,
    }
}

/// Canonical columns a table of this kind may provide.
pub fn optional_columns(kind: DatasetKind) -> &'static [StandardColumn] {
    match kind {
        DatasetKind::DifferentialExpression => DE_OPTIONAL,
        DatasetKind::GOAnalysis => GO_OPTIONAL,
    }
}

/// Full canonical column set for a kind: required first, then optional.
pub fn all_columns(kind: DatasetKind) -> Vec<StandardColumn> {
    required_columns(kind)
        .iter()
        .chain(optional_columns(kind))
        .copied()
        .collect()
}

/// Whether `column` is part of the schema for `kind`.
pub fn belongs_to(kind: DatasetKind, column: StandardColumn) -> bool {
    required_columns(kind).contains(&column) || optional_columns(kind).contains(&column)
}
