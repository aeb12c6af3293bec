//! Engine configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DegscopeError, Result};
use crate::input::ParserConfig;

/// Default adjusted p-value cutoff for calling a gene significant.
pub const DEFAULT_ADJ_PVALUE_CUTOFF: f64 = 0.05;
/// Default absolute log2 fold-change cutoff for calling a gene significant.
pub const DEFAULT_LOG2FC_CUTOFF: f64 = 1.0;
/// Default p-value threshold for the `significant` flag of Fisher's test.
pub const DEFAULT_FISHER_ALPHA: f64 = 0.05;
/// Default mean log2FC magnitude above which GSEA-lite reports a direction.
pub const DEFAULT_DIRECTION_THRESHOLD: f64 = 0.1;

/// Significance predicate: `adj_pvalue <= adj_pvalue_max AND |log2fc| >= abs_log2fc_min`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignificanceCutoffs {
    pub adj_pvalue_max: f64,
    pub abs_log2fc_min: f64,
}

impl SignificanceCutoffs {
    pub fn new(adj_pvalue_max: f64, abs_log2fc_min: f64) -> Self {
        Self {
            adj_pvalue_max,
            abs_log2fc_min,
        }
    }

    /// Whether a row with these statistics passes the cutoffs. Missing values never pass.
    pub fn passes(&self, adj_pvalue: Option<f64>, log2fc: Option<f64>) -> bool {
        match (adj_pvalue, log2fc) {
            (Some(p), Some(lfc)) => p <= self.adj_pvalue_max && lfc.abs() >= self.abs_log2fc_min,
            _ => false,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.adj_pvalue_max) {
            return Err(DegscopeError::Validation(format!(
                "Adjusted p-value cutoff must be within [0, 1], got {}",
                self.adj_pvalue_max
            )));
        }
        if !self.abs_log2fc_min.is_finite() || self.abs_log2fc_min < 0.0 {
            return Err(DegscopeError::Validation(format!(
                "log2FC cutoff must be a non-negative number, got {}",
                self.abs_log2fc_min
            )));
        }
        Ok(())
    }
}

impl Default for SignificanceCutoffs {
    fn default() -> Self {
        Self::new(DEFAULT_ADJ_PVALUE_CUTOFF, DEFAULT_LOG2FC_CUTOFF)
    }
}

/// Configuration for the [`Degscope`](crate::Degscope) engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DegscopeConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Cutoffs used for dataset summaries and as defaults for the statistics.
    pub cutoffs: SignificanceCutoffs,
    /// Fisher's exact test p-value threshold for the `significant` flag.
    pub fisher_alpha: f64,
    /// GSEA-lite mean log2FC threshold for calling a direction.
    pub direction_threshold: f64,
    /// Cap on per-cell audit records kept per standardized column.
    pub max_cell_audits: usize,
}

impl Default for DegscopeConfig {
    fn default() -> Self {
        Self {
            parser: ParserConfig::default(),
            cutoffs: SignificanceCutoffs::default(),
            fisher_alpha: DEFAULT_FISHER_ALPHA,
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
            max_cell_audits: 50,
        }
    }
}

impl DegscopeConfig {
    /// Load a configuration from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| DegscopeError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: DegscopeConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| DegscopeError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check that all thresholds are usable.
    pub fn validate(&self) -> Result<()> {
        self.cutoffs
            .validate()
            .map_err(|e| DegscopeError::Config(e.to_string()))?;
        if !(0.0..=1.0).contains(&self.fisher_alpha) {
            return Err(DegscopeError::Config(format!(
                "fisher_alpha must be within [0, 1], got {}",
                self.fisher_alpha
            )));
        }
        if !self.direction_threshold.is_finite() || self.direction_threshold < 0.0 {
            return Err(DegscopeError::Config(format!(
                "direction_threshold must be a non-negative number, got {}",
                self.direction_threshold
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_cutoffs_pass() {
        let cutoffs = SignificanceCutoffs::default();
        assert!(cutoffs.passes(Some(0.05), Some(-1.0)));
        assert!(!cutoffs.passes(Some(0.051), Some(3.0)));
        assert!(!cutoffs.passes(Some(0.01), Some(0.99)));
        assert!(!cutoffs.passes(None, Some(3.0)));
    }

    #[test]
    fn test_cutoffs_validate() {
        assert!(SignificanceCutoffs::new(-0.1, 1.0).validate().is_err());
        assert!(SignificanceCutoffs::new(0.05, -1.0).validate().is_err());
        assert!(SignificanceCutoffs::new(0.05, f64::NAN).validate().is_err());
        assert!(SignificanceCutoffs::new(0.1, 0.0).validate().is_ok());
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"cutoffs": {{"adj_pvalue_max": 0.01}}, "fisher_alpha": 0.01}}"#).unwrap();

        let config = DegscopeConfig::load(file.path()).unwrap();
        assert_eq!(config.cutoffs.adj_pvalue_max, 0.01);
        assert_eq!(config.cutoffs.abs_log2fc_min, DEFAULT_LOG2FC_CUTOFF);
        assert_eq!(config.fisher_alpha, 0.01);
        assert_eq!(config.direction_threshold, DEFAULT_DIRECTION_THRESHOLD);
    }

    #[test]
    fn test_load_rejects_bad_alpha() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"fisher_alpha": 2.0}}"#).unwrap();
        assert!(matches!(
            DegscopeConfig::load(file.path()),
            Err(DegscopeError::Config(_))
        ));
    }
}
