//! tfbs_align: expression clustering and promoter motif table alignment
//!
//! Clusters a gene set by expression profile, exports the dendrogram as
//! Newick text, and reindexes promoter length, motif and expression tables to
//! the dendrogram leaf order so that a dendrogram, a heatmap and a motif
//! scatter can share one gene axis (`seq_id`).
//!
//! # Example
//!
//! ```ignore
//! use tfbs_align::prelude::*;
//!
//! let expression = read_expression_matrix("expression.tsv")?;
//! let lengths = read_promoter_lengths("lengths.tsv")?;
//! let markers = motif_markers(&read_motif_sites("motifs.tsv")?, &[]);
//!
//! let output = run_pipeline(expression, &lengths, &markers, None, &NewickOptions::default())?;
//! println!("{}", output.clustering.newick);
//! ```

pub mod align;
pub mod architecture;
pub mod cli;
pub mod cluster;
pub mod data;
pub mod error;
pub mod io;
pub mod session;
pub mod tree;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::align::{align_tables, AlignedLength, AlignedMotif, AlignedTables, SeqIdMap};
    pub use crate::architecture::{
        ArchitectureConfig, ArchitectureFlags, ArchitectureRequest, ArchitectureService,
        ScriptArchitecture,
    };
    pub use crate::cluster::{cluster_genes, leaf_order, LeafOrder, LinkageTree};
    pub use crate::data::{
        motif_markers, ExperimentSelection, ExpressionMatrix, MotifAssociation, MotifMarker,
        MotifSite, PromoterLength,
    };
    pub use crate::error::{Result, TfbsError};
    pub use crate::io::{
        read_expression_matrix, read_gene_list, read_motif_associations, read_motif_markers,
        read_motif_sites, read_promoter_lengths, write_aligned_tables, write_expression_csv,
        write_plot_bundle, PlotBundle,
    };
    pub use crate::session::AnalysisSession;
    pub use crate::tree::{parse_newick, to_newick, NewickOptions};
    pub use crate::{cluster_expression, run_pipeline, ClusterResult, PipelineOutput};
}

use prelude::*;

/// Clustering of one expression selection and everything derived from it
#[derive(Debug, Clone)]
pub struct ClusterResult {
    /// The clustered expression matrix (input row order)
    pub matrix: ExpressionMatrix,
    pub tree: LinkageTree,
    pub order: LeafOrder,
    /// Newick text of `tree`
    pub newick: String,
}

/// Output of the full clustering + alignment pipeline
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub clustering: ClusterResult,
    pub aligned: AlignedTables,
}

/// Cluster an expression matrix, extract its leaf order and serialize the tree
pub fn cluster_expression(matrix: ExpressionMatrix, options: &NewickOptions) -> Result<ClusterResult> {
    let tree = cluster_genes(&matrix)?;
    let order = leaf_order(&tree);
    let newick = to_newick(&tree, options);
    log::debug!("Leaf order: {}", order.genes().join(", "));

    Ok(ClusterResult {
        matrix,
        tree,
        order,
        newick,
    })
}

/// Run clustering, serialization and alignment in one go.
/// Any clustering error aborts before alignment starts.
pub fn run_pipeline(
    matrix: ExpressionMatrix,
    lengths: &[PromoterLength],
    motifs: &[MotifMarker],
    denovo: Option<&[MotifMarker]>,
    options: &NewickOptions,
) -> Result<PipelineOutput> {
    let clustering = cluster_expression(matrix, options)?;
    let aligned = align_tables(
        &clustering.order,
        lengths,
        motifs,
        &clustering.matrix,
        denovo,
    )?;

    Ok(PipelineOutput { clustering, aligned })
}
