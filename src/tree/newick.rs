//! Newick serialization of linkage trees

use crate::cluster::LinkageTree;
use crate::error::{Result, TfbsError};

/// Characters that force a label to be quoted
const METACHARACTERS: &[char] = &['(', ')', '[', ']', '\'', ':', ';', ',', ' ', '\t', '\n', '\r'];

/// Newick output options
#[derive(Debug, Clone)]
pub struct NewickOptions {
    /// Decimal places for branch lengths
    pub precision: usize,
}

impl Default for NewickOptions {
    fn default() -> Self {
        Self { precision: 2 }
    }
}

/// Quote a label when it contains Newick metacharacters
pub fn quote_label(label: &str) -> String {
    if label.is_empty() || label.contains(METACHARACTERS) {
        format!("'{}'", label.replace('\'', "''"))
    } else {
        label.to_string()
    }
}

/// Serialize a linkage tree to Newick text using its own leaf labels
pub fn to_newick(tree: &LinkageTree, options: &NewickOptions) -> String {
    let mut out = String::new();
    write_subtree(tree, tree.labels(), tree.root(), None, options.precision, &mut out);
    out.push(';');
    out
}

/// Serialize a linkage tree with an explicit leaf index -> gene mapping
pub fn to_newick_with_labels(
    tree: &LinkageTree,
    labels: &[String],
    options: &NewickOptions,
) -> Result<String> {
    if labels.len() != tree.n_leaves() {
        return Err(TfbsError::DimensionMismatch {
            expected: format!("{} leaf labels", tree.n_leaves()),
            got: format!("{} leaf labels", labels.len()),
        });
    }
    let mut out = String::new();
    write_subtree(tree, labels, tree.root(), None, options.precision, &mut out);
    out.push(';');
    Ok(out)
}

/// Post-order emission: children as `(left,right)`, then `:<length>` unless root.
/// Branch length = parent merge distance - own merge distance (0 for leaves).
fn write_subtree(
    tree: &LinkageTree,
    labels: &[String],
    idx: usize,
    parent: Option<usize>,
    precision: usize,
    out: &mut String,
) {
    match tree.node(idx).children {
        Some((left, right)) => {
            out.push('(');
            write_subtree(tree, labels, left, Some(idx), precision, out);
            out.push(',');
            write_subtree(tree, labels, right, Some(idx), precision, out);
            out.push(')');
        }
        None => out.push_str(&quote_label(&labels[idx])),
    }

    if let Some(parent) = parent {
        let length = tree.branch_length(parent, idx);
        out.push_str(&format!(":{:.*}", precision, length));
    }
}
