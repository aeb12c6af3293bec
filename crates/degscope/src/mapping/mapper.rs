//! Heuristic column mapper.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::schema::{all_columns, required_columns, DatasetKind, StandardColumn};

use super::column_mapping::ColumnMapping;
use super::synonyms::{heuristics_for, synonyms};

/// How a canonical column was matched to its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMethod {
    /// Source name equals the canonical name.
    Exact,
    /// Source name is a known synonym.
    Synonym,
    /// Source name contains a canonical keyword.
    Heuristic,
}

impl MatchMethod {
    /// Confidence attached to matches found by this method.
    pub fn confidence(&self) -> f64 {
        match self {
            MatchMethod::Exact => 1.0,
            MatchMethod::Synonym => 0.95,
            MatchMethod::Heuristic => 0.7,
        }
    }
}

/// One proposed canonical/source pairing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnMatch {
    pub canonical: StandardColumn,
    pub source: String,
    pub method: MatchMethod,
}

/// Output of the mapper: the proposed mapping plus what still needs a decision.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingProposal {
    pub kind: DatasetKind,
    /// Best-effort mapping; canonical columns without a confident match are absent.
    pub mapping: ColumnMapping,
    /// How each entry of `mapping` was found, in mapping order.
    pub matches: Vec<ColumnMatch>,
    /// Required canonical columns that must be resolved by hand.
    pub unmapped_required: Vec<StandardColumn>,
    /// Optional canonical columns with no match.
    pub unmapped_optional: Vec<StandardColumn>,
    /// Source columns not claimed by any canonical column.
    pub unused_sources: Vec<String>,
}

impl MappingProposal {
    /// True when every required column has a source.
    pub fn is_complete(&self) -> bool {
        self.unmapped_required.is_empty()
    }
}

/// A source column eligible for matching.
struct Candidate<'a> {
    raw: &'a str,
    normalized: String,
}

/// Proposes canonical column mappings from source column names.
///
/// Matching runs in three passes (canonical name, synonym, keyword heuristic); each
/// pass walks canonical columns in registry order and claims the first unclaimed
/// source column that matches, so one source feeds at most one canonical column.
/// There is no positional fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct ColumnMapper;

impl ColumnMapper {
    /// Create a new column mapper.
    pub fn new() -> Self {
        Self
    }

    /// Propose a mapping for the given source column names.
    pub fn map_columns<S: AsRef<str>>(&self, columns: &[S], kind: DatasetKind) -> MappingProposal {
        let candidates = Self::candidates(columns);
        let canonical_columns = all_columns(kind);

        let mut claimed: HashSet<usize> = HashSet::new();
        let mut matches: Vec<ColumnMatch> = Vec::new();

        let mut claim = |canonical: StandardColumn,
                         method: MatchMethod,
                         matches: &mut Vec<ColumnMatch>,
                         is_match: &dyn Fn(&Candidate) -> bool| {
            if matches.iter().any(|m| m.canonical == canonical) {
                return;
            }
            let found = candidates
                .iter()
                .enumerate()
                .find(|(i, c)| !claimed.contains(i) && is_match(*c));
            if let Some((i, candidate)) = found {
                claimed.insert(i);
                log::debug!(
                    "Mapped {} <- '{}' ({:?})",
                    canonical,
                    candidate.raw,
                    method
                );
                matches.push(ColumnMatch {
                    canonical,
                    source: candidate.raw.to_string(),
                    method,
                });
            }
        };

        // Byte-identical names first, so a standardized table re-maps onto its
        // canonical columns rather than on the case variants it was built from
        for &canonical in &canonical_columns {
            claim(canonical, MatchMethod::Exact, &mut matches, &|c: &Candidate| {
                c.raw == canonical.as_str()
            });
        }

        for &canonical in &canonical_columns {
            claim(canonical, MatchMethod::Exact, &mut matches, &|c: &Candidate| {
                c.normalized == canonical.as_str()
            });
        }

        for &canonical in &canonical_columns {
            let known = synonyms(canonical, kind);
            claim(canonical, MatchMethod::Synonym, &mut matches, &|c: &Candidate| {
                known.contains(&c.normalized.as_str())
            });
        }

        for rule in heuristics_for(kind) {
            claim(rule.column, MatchMethod::Heuristic, &mut matches, &|c: &Candidate| {
                rule.matches(&c.normalized)
            });
        }

        // Present matches in registry order regardless of the pass that found them
        matches.sort_by_key(|m| canonical_columns.iter().position(|c| *c == m.canonical));

        let mapping: ColumnMapping = matches
            .iter()
            .map(|m| (m.canonical, m.source.clone()))
            .collect();

        let unmapped_required: Vec<StandardColumn> = mapping.missing_required(kind);
        let unmapped_optional: Vec<StandardColumn> = canonical_columns
            .iter()
            .copied()
            .filter(|c| !mapping.contains(*c) && !required_columns(kind).contains(c))
            .collect();

        let unused_sources: Vec<String> = columns
            .iter()
            .map(|c| c.as_ref())
            .filter(|c| !matches.iter().any(|m| m.source == *c))
            .map(String::from)
            .collect();

        if !unmapped_required.is_empty() {
            log::debug!("Unmapped required columns for {}: {:?}", kind, unmapped_required);
        }

        MappingProposal {
            kind,
            mapping,
            matches,
            unmapped_required,
            unmapped_optional,
            unused_sources,
        }
    }

    /// Columns eligible for matching: named, and the first occurrence of each name.
    fn candidates<S: AsRef<str>>(columns: &[S]) -> Vec<Candidate<'_>> {
        let mut seen: HashSet<&str> = HashSet::new();
        columns
            .iter()
            .map(|c| c.as_ref())
            .filter(|raw| seen.insert(*raw))
            .filter(|raw| !is_missing_name(raw))
            .map(|raw| Candidate {
                raw,
                normalized: raw.trim().to_lowercase(),
            })
            .collect()
    }
}

/// Headers that stand for "no name": blank, NaN, or a placeholder we assigned.
pub(crate) fn is_missing_name(name: &str) -> bool {
    let trimmed = name.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.to_ascii_lowercase().starts_with("unnamed:")
}

/// Propose a mapping with the default mapper.
pub fn map_columns<S: AsRef<str>>(columns: &[S], kind: DatasetKind) -> MappingProposal {
    ColumnMapper::new().map_columns(columns, kind)
}
