//! Datasets: standardized tables with summary metadata, filtering and persistence.

mod filter;
mod model;
mod persistence;

pub use filter::FilterCriteria;
pub use model::{split_gene_list, Dataset, DatasetSummary};
pub use persistence::snapshot_path;
