//! Hypergeometric helpers shared by the enrichment tests.

use statrs::distribution::{Discrete, DiscreteCDF, Hypergeometric};

use crate::error::{DegscopeError, Result};

/// Relative tolerance when comparing point probabilities for the two-sided test.
const RELATIVE_TOLERANCE: f64 = 1e-7;

fn hypergeometric(population: u64, successes: u64, draws: u64) -> Result<Hypergeometric> {
    Hypergeometric::new(population, successes, draws).map_err(|e| {
        DegscopeError::Computation(format!(
            "Invalid hypergeometric parameters (population {}, successes {}, draws {}): {}",
            population, successes, draws, e
        ))
    })
}

/// P(X >= observed) for X ~ Hypergeometric(population, successes, draws).
pub(crate) fn upper_tail(population: u64, successes: u64, draws: u64, observed: u64) -> Result<f64> {
    if observed == 0 {
        return Ok(1.0);
    }
    let hyper = hypergeometric(population, successes, draws)?;
    // sf gives P(X > x), so step back one to include the observed count
    Ok(hyper.sf(observed - 1).clamp(0.0, 1.0))
}

/// Two-sided p-value: the total probability of every outcome no more likely than
/// the observed one.
pub(crate) fn two_sided(population: u64, successes: u64, draws: u64, observed: u64) -> Result<f64> {
    let hyper = hypergeometric(population, successes, draws)?;
    let low = (successes + draws).saturating_sub(population);
    let high = successes.min(draws);

    let threshold = hyper.pmf(observed) * (1.0 + RELATIVE_TOLERANCE);
    let pvalue: f64 = (low..=high)
        .map(|x| hyper.pmf(x))
        .filter(|p| *p <= threshold)
        .sum();

    Ok(pvalue.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_upper_tail_of_zero_is_one() {
        assert_eq!(upper_tail(100, 10, 10, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_upper_tail_matches_direct_sum() {
        // Lady tasting tea: 8 cups, 4 with milk first, 4 picked, all correct
        assert_relative_eq!(upper_tail(8, 4, 4, 4).unwrap(), 1.0 / 70.0, epsilon = 1e-9);
        assert_relative_eq!(upper_tail(8, 4, 4, 3).unwrap(), 17.0 / 70.0, epsilon = 1e-9);
    }

    #[test]
    fn test_two_sided_tea_tasting() {
        assert_relative_eq!(two_sided(8, 4, 4, 4).unwrap(), 2.0 / 70.0, epsilon = 1e-9);
        assert_relative_eq!(two_sided(8, 4, 4, 2).unwrap(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(
            upper_tail(5, 10, 2, 1),
            Err(DegscopeError::Computation(_))
        ));
    }
}
