//! Alignment of feature tables to a dendrogram leaf order

mod seq_id;
mod tables;

pub use seq_id::{AlignedLength, SeqIdMap};
pub use tables::{align_tables, AlignedMotif, AlignedTables, AlignmentReport};
