//! Hierarchical clustering of genes by expression profile

mod distance;
mod linkage;
mod order;

pub use distance::{condensed_distances, euclidean};
pub use linkage::{cluster_genes, LinkageNode, LinkageTree};
pub use order::{leaf_order, LeafOrder};
