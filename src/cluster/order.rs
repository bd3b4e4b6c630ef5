//! Leaf ordering of a linkage tree

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::linkage::LinkageTree;

/// Gene sequence in dendrogram leaf order.
///
/// This is the order in which a left-oriented dendrogram lists its leaves:
/// for every merge the left (lower-labelled) child comes first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafOrder {
    genes: Vec<String>,
}

impl LeafOrder {
    /// Build an order directly from gene identifiers
    pub fn from_genes(genes: Vec<String>) -> Self {
        Self { genes }
    }

    /// Gene identifiers in order
    pub fn genes(&self) -> &[String] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Gene -> zero-based rank
    pub fn ranks(&self) -> HashMap<&str, usize> {
        self.genes
            .iter()
            .enumerate()
            .map(|(rank, gene)| (gene.as_str(), rank))
            .collect()
    }

    pub fn into_genes(self) -> Vec<String> {
        self.genes
    }
}

/// Extract the leaf order of a linkage tree (left-first depth-first traversal)
pub fn leaf_order(tree: &LinkageTree) -> LeafOrder {
    let mut leaves = Vec::with_capacity(tree.n_leaves());
    let mut stack = vec![tree.root()];

    while let Some(idx) = stack.pop() {
        match tree.node(idx).children {
            Some((left, right)) => {
                stack.push(right);
                stack.push(left);
            }
            None => leaves.push(idx),
        }
    }

    let genes = leaves
        .iter()
        .map(|&leaf| tree.labels()[leaf].clone())
        .collect();

    LeafOrder { genes }
}
