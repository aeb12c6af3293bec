//! Degscope: standardize and compare RNA-Seq result tables.
//!
//! Degscope reads the differential expression tables written by DESeq2, edgeR
//! or limma and the GO/KEGG enrichment tables written by clusterProfiler, DAVID
//! or g:Profiler, maps their columns onto one canonical schema, and runs a
//! small set of comparison statistics over the result.
//!
//! # Core Principles
//!
//! - **Non-destructive**: Standardization adds canonical columns next to the originals
//! - **Declarative mapping**: Unresolved columns are reported, never guessed by position
//! - **Sentinels over errors**: Degenerate statistics return `NaN` or `1.0`, not failures
//!
//! # Example
//!
//! ```no_run
//! use degscope::{ColumnMapping, DatasetKind, Degscope};
//!
//! let engine = Degscope::new();
//! let dataset = engine
//!     .load_dataset("deseq2_results.csv", None, DatasetKind::DifferentialExpression, &ColumnMapping::new())
//!     .unwrap();
//!
//! println!("Genes: {}", dataset.summary().gene_count);
//! let gsea = engine.gsea_lite(&["TP53", "CDKN1A", "MDM2"], &dataset);
//! println!("Direction: {}", gsea.enrichment_direction);
//! ```

pub mod analysis;
pub mod config;
pub mod dataset;
pub mod error;
pub mod input;
pub mod mapping;
pub mod progress;
pub mod schema;
pub mod transform;

mod engine;

pub use crate::engine::Degscope;
pub use analysis::{
    compare_datasets, fisher_exact_test, gsea_lite, overlap_significance, ComparisonResult,
    Contingency, EnrichmentDirection, FisherResult, GeneStatus, GseaResult, OverlapResult,
};
pub use config::{DegscopeConfig, SignificanceCutoffs};
pub use dataset::{Dataset, DatasetSummary, FilterCriteria};
pub use error::{DegscopeError, Result};
pub use input::{Parser, ParserConfig, SourceMetadata, Table, Value};
pub use mapping::{map_columns, ColumnMapper, ColumnMapping, MappingProposal, MatchMethod};
pub use progress::{spawn_task, Milestone, NoProgress, ProgressSink, TaskEvent, TaskHandle};
pub use schema::{DatasetKind, StandardColumn, ValueType};
pub use transform::{standardize, StandardizeReport, Standardizer};
