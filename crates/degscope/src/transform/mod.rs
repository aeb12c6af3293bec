//! Table standardization: rewriting source columns to canonical names.

mod operations;
mod standardizer;

pub use operations::{CellAudit, ColumnRename, HeaderFix, RenameAction, StandardizeReport};
pub use standardizer::{sanitize_headers, standardize, Standardizer};
