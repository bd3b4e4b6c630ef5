//! Complete-linkage hierarchical clustering of expression profiles

use kodama::{linkage, Method};

use super::distance::condensed_distances;
use crate::data::ExpressionMatrix;
use crate::error::{Result, TfbsError};

/// One node of a linkage tree.
/// Leaves have no children and a merge distance of 0.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkageNode {
    /// Child node indices (left, right); `None` for leaves
    pub children: Option<(usize, usize)>,
    /// Merge distance (0 for leaves)
    pub distance: f64,
    /// Number of leaves below this node
    pub size: usize,
}

/// Binary hierarchical clustering tree stored as an arena.
///
/// Nodes `0..n` are the leaves in input order, node `n + i` is the cluster
/// formed by merge step `i`, and the last node is the root. Immutable once
/// built.
#[derive(Debug, Clone)]
pub struct LinkageTree {
    nodes: Vec<LinkageNode>,
    labels: Vec<String>,
}

impl LinkageTree {
    /// Build a tree from a merge list in linkage-matrix form.
    ///
    /// Each merge `(a, b, distance)` joins two existing clusters; merge `i`
    /// creates cluster `n + i`. The lower cluster label becomes the left child.
    pub fn from_merges(labels: Vec<String>, merges: &[(usize, usize, f64)]) -> Result<Self> {
        let n = labels.len();
        if n < 2 {
            return Err(TfbsError::InsufficientData {
                reason: format!("Need at least 2 genes to build a tree, got {}", n),
            });
        }
        if merges.len() != n - 1 {
            return Err(TfbsError::DimensionMismatch {
                expected: format!("{} merge steps", n - 1),
                got: format!("{} merge steps", merges.len()),
            });
        }

        let mut nodes: Vec<LinkageNode> = (0..n)
            .map(|_| LinkageNode {
                children: None,
                distance: 0.0,
                size: 1,
            })
            .collect();
        let mut merged = vec![false; 2 * n - 1];

        for (step, &(a, b, distance)) in merges.iter().enumerate() {
            let available = n + step;
            if a >= available || b >= available || a == b {
                return Err(TfbsError::InvalidInput {
                    reason: format!("Merge step {} joins invalid clusters {} and {}", step, a, b),
                });
            }
            if merged[a] || merged[b] {
                return Err(TfbsError::InvalidInput {
                    reason: format!("Merge step {} reuses an already merged cluster", step),
                });
            }
            if !distance.is_finite() || distance < 0.0 {
                return Err(TfbsError::InvalidInput {
                    reason: format!("Merge step {} has invalid distance {}", step, distance),
                });
            }
            merged[a] = true;
            merged[b] = true;

            let (left, right) = if a < b { (a, b) } else { (b, a) };
            nodes.push(LinkageNode {
                children: Some((left, right)),
                distance,
                size: nodes[left].size + nodes[right].size,
            });
        }

        Ok(Self { nodes, labels })
    }

    /// Number of leaves (genes)
    pub fn n_leaves(&self) -> usize {
        self.labels.len()
    }

    /// Index of the root node
    pub fn root(&self) -> usize {
        self.nodes.len() - 1
    }

    /// All nodes, leaves first
    pub fn nodes(&self) -> &[LinkageNode] {
        &self.nodes
    }

    pub fn node(&self, idx: usize) -> &LinkageNode {
        &self.nodes[idx]
    }

    /// Gene identifiers of the leaves, in input order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Length of the edge between `child` and its parent `parent`
    pub fn branch_length(&self, parent: usize, child: usize) -> f64 {
        self.nodes[parent].distance - self.nodes[child].distance
    }

    /// Merge steps in linkage-matrix form
    pub fn merges(&self) -> Vec<(usize, usize, f64)> {
        self.nodes[self.n_leaves()..]
            .iter()
            .filter_map(|node| node.children.map(|(l, r)| (l, r, node.distance)))
            .collect()
    }
}

/// Cluster genes by expression profile.
///
/// Euclidean distances between rows, agglomerated with complete linkage
/// (cluster distance = maximum pairwise member distance). The matrix must
/// contain at least two genes, at least one condition, and no missing values.
pub fn cluster_genes(matrix: &ExpressionMatrix) -> Result<LinkageTree> {
    let n = matrix.n_genes();
    if n < 2 {
        return Err(TfbsError::InsufficientData {
            reason: format!("Clustering needs at least 2 genes, got {}", n),
        });
    }
    if matrix.n_conditions() == 0 {
        return Err(TfbsError::InsufficientData {
            reason: "Expression matrix has no condition columns".to_string(),
        });
    }
    matrix.ensure_complete()?;

    log::info!(
        "Clustering {} genes over {} conditions (complete linkage, euclidean)",
        n,
        matrix.n_conditions()
    );

    let mut distances = condensed_distances(matrix.values());
    let dendrogram = linkage(&mut distances, n, Method::Complete);

    let merges: Vec<(usize, usize, f64)> = dendrogram
        .steps()
        .iter()
        .map(|step| (step.cluster1, step.cluster2, step.dissimilarity))
        .collect();

    for (i, &(a, b, d)) in merges.iter().enumerate() {
        log::debug!("merge {}: {} + {} -> {} at {:.6}", i, a, b, n + i, d);
    }

    LinkageTree::from_merges(matrix.gene_ids().to_vec(), &merges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn two_pairs() -> ExpressionMatrix {
        ExpressionMatrix::new(
            array![[0.0, 0.0], [1.0, 0.0], [10.0, 0.0], [12.0, 0.0]],
            ids(&["g1", "g2", "g3", "g4"]),
            ids(&["c1", "c2"]),
        )
        .unwrap()
    }

    #[test]
    fn test_two_pairs_complete_linkage() {
        let tree = cluster_genes(&two_pairs()).unwrap();
        assert_eq!(tree.n_leaves(), 4);
        assert_eq!(tree.nodes().len(), 7);

        let merges = tree.merges();
        assert_eq!((merges[0].0, merges[0].1), (0, 1));
        assert!((merges[0].2 - 1.0).abs() < 1e-12);
        assert_eq!((merges[1].0, merges[1].1), (2, 3));
        assert!((merges[1].2 - 2.0).abs() < 1e-12);
        assert_eq!((merges[2].0, merges[2].1), (4, 5));
        // complete linkage: farthest members g1 and g4
        assert!((merges[2].2 - 12.0).abs() < 1e-12);

        let root = tree.root();
        assert_eq!(tree.node(root).size, 4);
        assert!((tree.branch_length(root, 4) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn test_merge_distances_non_decreasing() {
        let matrix = ExpressionMatrix::new(
            array![
                [1.0, 5.0, 2.0],
                [1.2, 4.8, 2.1],
                [9.0, 0.5, 7.0],
                [3.0, 3.0, 3.0],
                [8.5, 0.7, 6.5],
                [0.0, 6.0, 1.0],
            ],
            ids(&["a", "b", "c", "d", "e", "f"]),
            ids(&["x", "y", "z"]),
        )
        .unwrap();
        let tree = cluster_genes(&matrix).unwrap();
        let merges = tree.merges();
        assert!(merges.windows(2).all(|w| w[0].2 <= w[1].2));
        for node in tree.nodes() {
            if let Some((l, r)) = node.children {
                assert!(l < r);
                assert!(tree.node(l).distance <= node.distance);
                assert!(tree.node(r).distance <= node.distance);
            }
        }
    }

    #[test]
    fn test_insufficient_genes() {
        let matrix = ExpressionMatrix::new(array![[1.0, 2.0]], ids(&["g1"]), ids(&["c1", "c2"])).unwrap();
        assert!(matches!(
            cluster_genes(&matrix),
            Err(TfbsError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_missing_value_rejected_before_clustering() {
        let matrix = ExpressionMatrix::new(
            array![[1.0, 2.0], [1.5, 2.5], [9.0, f64::NAN], [9.5, 8.0]],
            ids(&["g1", "g2", "g3", "g4"]),
            ids(&["A", "C"]),
        )
        .unwrap();
        match cluster_genes(&matrix) {
            Err(TfbsError::MissingValue { gene_id, condition }) => {
                assert_eq!(gene_id, "g3");
                assert_eq!(condition, "C");
            }
            other => panic!("expected MissingValue, got {:?}", other),
        }
    }

    #[test]
    fn test_from_merges_validation() {
        let labels = ids(&["a", "b", "c"]);
        assert!(LinkageTree::from_merges(labels.clone(), &[(0, 1, 1.0)]).is_err());
        assert!(LinkageTree::from_merges(labels.clone(), &[(0, 1, 1.0), (0, 2, 2.0)]).is_err());
        assert!(LinkageTree::from_merges(labels.clone(), &[(0, 1, 1.0), (2, 5, 2.0)]).is_err());
        assert!(LinkageTree::from_merges(labels.clone(), &[(0, 1, -1.0), (2, 3, 2.0)]).is_err());

        let tree = LinkageTree::from_merges(labels, &[(1, 0, 1.0), (3, 2, 2.0)]).unwrap();
        assert_eq!(tree.node(3).children, Some((0, 1)));
        assert_eq!(tree.node(4).children, Some((2, 3)));
    }
}
