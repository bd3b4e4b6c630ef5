//! Portable tree text (Newick) writing and reading

mod newick;
mod parse;

pub use newick::{quote_label, to_newick, to_newick_with_labels, NewickOptions};
pub use parse::{internal_count, leaf_depths, leaf_names, leaf_nodes, parse_newick, unquote_label};
pub use ::newick::NewickTree;
