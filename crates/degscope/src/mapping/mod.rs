//! Column mapping: proposing which source column feeds each canonical column.

mod column_mapping;
mod mapper;
mod synonyms;

pub use column_mapping::ColumnMapping;
pub use mapper::{map_columns, ColumnMapper, ColumnMatch, MappingProposal, MatchMethod};
pub use synonyms::synonyms;
