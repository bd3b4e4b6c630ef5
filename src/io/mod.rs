//! Input/Output operations for expression data, feature tables and results

mod bundle;
mod expression;
mod tables;

pub use bundle::{write_plot_bundle, ExpressionRow, PlotBundle};
pub use expression::{read_expression_matrix, read_gene_list, write_expression_csv};
pub use tables::{
    motif_sites_to_tsv, read_motif_associations, read_motif_markers, read_motif_sites,
    read_promoter_lengths, read_table, write_aligned_tables, write_table,
};
