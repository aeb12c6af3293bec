//! Significance of the overlap between two gene sets.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};

use crate::error::{DegscopeError, Result};

use super::math;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverlapResult {
    pub overlap_size: usize,
    pub set_a_size: usize,
    pub set_b_size: usize,
    pub background_size: usize,
    /// `|A| * |B| / background_size`.
    pub expected: f64,
    /// `overlap_size / expected`, `NaN` when nothing is expected.
    pub fold_enrichment: f64,
    /// P(overlap >= observed) under the hypergeometric null.
    pub pvalue: f64,
}

/// Test whether two sets overlap more than expected by chance in a universe of
/// `background_size` items. Duplicates within a set are ignored.
///
/// # Example
///
/// ```
/// use degscope::analysis::overlap_significance;
///
/// let result = overlap_significance(1..=50, 26..=75, 1000).unwrap();
/// assert_eq!(result.overlap_size, 25);
/// assert!(result.pvalue < 1e-10);
/// ```
pub fn overlap_significance<T, A, B>(a: A, b: B, background_size: usize) -> Result<OverlapResult>
where
    T: Eq + Hash,
    A: IntoIterator<Item = T>,
    B: IntoIterator<Item = T>,
{
    let a: HashSet<T> = a.into_iter().collect();
    let b: HashSet<T> = b.into_iter().collect();

    let overlap_size = a.intersection(&b).count();
    let union_size = a.len() + b.len() - overlap_size;
    if background_size < union_size {
        return Err(DegscopeError::Computation(format!(
            "Background size {} is smaller than the {} distinct genes in both sets",
            background_size, union_size
        )));
    }

    let expected = if background_size == 0 {
        0.0
    } else {
        a.len() as f64 * b.len() as f64 / background_size as f64
    };

    let (fold_enrichment, pvalue) = if expected == 0.0 {
        (f64::NAN, 1.0)
    } else {
        let pvalue = math::upper_tail(
            background_size as u64,
            a.len() as u64,
            b.len() as u64,
            overlap_size as u64,
        )?;
        (overlap_size as f64 / expected, pvalue)
    };

    log::debug!(
        "Overlap: |A| = {}, |B| = {}, observed {}, expected {:.3}, p = {}",
        a.len(),
        b.len(),
        overlap_size,
        expected,
        pvalue
    );

    Ok(OverlapResult {
        overlap_size,
        set_a_size: a.len(),
        set_b_size: b.len(),
        background_size,
        expected,
        fold_enrichment,
        pvalue,
    })
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_overlap_counts() {
        let result = overlap_significance(1..=50, 26..=75, 1000).unwrap();
        assert_eq!(result.overlap_size, 25);
        assert_relative_eq!(result.expected, 2.5);
        assert_relative_eq!(result.fold_enrichment, 10.0);
        assert!(result.pvalue < 1e-10);
    }

    #[test]
    fn test_empty_set_sentinels() {
        let result = overlap_significance(Vec::<&str>::new(), vec!["A", "B"], 100).unwrap();
        assert_eq!(result.overlap_size, 0);
        assert_eq!(result.expected, 0.0);
        assert!(result.fold_enrichment.is_nan());
        assert_eq!(result.pvalue, 1.0);
    }

    #[test]
    fn test_no_overlap_has_pvalue_one() {
        let result = overlap_significance(["A", "B"], ["C", "D"], 10).unwrap();
        assert_eq!(result.overlap_size, 0);
        assert_eq!(result.pvalue, 1.0);
        assert_relative_eq!(result.fold_enrichment, 0.0);
    }

    #[test]
    fn test_identical_sets_in_full_background() {
        // Every draw must land in the other set, so the overlap is certain
        let result = overlap_significance(0..10, 0..10, 10).unwrap();
        assert_relative_eq!(result.pvalue, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_background_too_small() {
        let err = overlap_significance(1..=50, 26..=75, 60).unwrap_err();
        assert!(matches!(err, DegscopeError::Computation(_)));
    }

    #[test]
    fn test_duplicates_ignored() {
        let result = overlap_significance(["A", "A", "B"], ["A"], 10).unwrap();
        assert_eq!(result.set_a_size, 2);
        assert_eq!(result.overlap_size, 1);
    }
}
