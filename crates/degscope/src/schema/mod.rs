//! Standard schema: canonical column names and the columns each dataset kind requires.

mod registry;
mod types;

pub use registry::{all_columns, belongs_to, optional_columns, required_columns};
pub use types::{DatasetKind, StandardColumn, ValueType};
