//! Newick reading through the `newick` crate
//!
//! The crate keeps quoted labels verbatim (`'g 2'`); the helpers here strip
//! the quoting so names compare equal to the gene identifiers they encode.

use ::newick::{Newick, NewickTree};

use crate::error::{Result, TfbsError};

/// Parse a single Newick tree
pub fn parse_newick(text: &str) -> Result<NewickTree> {
    ::newick::one_from_string(text).map_err(|e| TfbsError::NewickParse {
        reason: e.to_string(),
    })
}

/// Undo Newick single-quote quoting (`'it''s'` -> `it's`)
pub fn unquote_label(label: &str) -> String {
    match label
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        Some(inner) => inner.replace("''", "'"),
        None => label.to_string(),
    }
}

/// Leaf nodes in left-to-right traversal order
pub fn leaf_nodes(tree: &NewickTree) -> Vec<usize> {
    let mut leaves = Vec::new();
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let children = tree[id].children();
        if children.is_empty() {
            leaves.push(id);
        } else {
            stack.extend(children.iter().rev().copied());
        }
    }
    leaves
}

/// Leaf labels in traversal order, unquoted (unnamed leaves give "")
pub fn leaf_names(tree: &NewickTree) -> Vec<String> {
    leaf_nodes(tree)
        .into_iter()
        .map(|id| {
            tree.name(id)
                .map(|name| unquote_label(name))
                .unwrap_or_default()
        })
        .collect()
}

/// Number of internal nodes, root included
pub fn internal_count(tree: &NewickTree) -> usize {
    let mut count = 0;
    let mut stack = vec![tree.root()];
    while let Some(id) = stack.pop() {
        let children = tree[id].children();
        if !children.is_empty() {
            count += 1;
            stack.extend(children.iter().copied());
        }
    }
    count
}

/// Sum of branch lengths from the root to each leaf, in traversal order.
/// Missing lengths count as 0.
pub fn leaf_depths(tree: &NewickTree) -> Vec<f64> {
    let mut depths = Vec::new();
    let mut stack = vec![(tree.root(), 0.0)];
    while let Some((id, depth)) = stack.pop() {
        let children = tree[id].children();
        if children.is_empty() {
            depths.push(depth);
            continue;
        }
        for &child in children.iter().rev() {
            let length = tree[child].branch().map(|&b| f64::from(b)).unwrap_or(0.0);
            stack.push((child, depth + length));
        }
    }
    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_tree() {
        let tree = parse_newick("((g1:1.00,g2:1.00):11.00,(g3:2.00,g4:2.00):10.00);").unwrap();
        assert_eq!(leaf_names(&tree), vec!["g1", "g2", "g3", "g4"]);
        assert_eq!(internal_count(&tree), 3);
        for depth in leaf_depths(&tree) {
            assert!((depth - 12.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_quoted_labels_are_unquoted() {
        let text = "(('it''s':1.00,'g 2':1.00):11.00,(SCBGLR1002A06.g:2.00,g4:2.00):10.00);";
        let tree = parse_newick(text).unwrap();
        assert_eq!(
            leaf_names(&tree),
            vec!["it's", "g 2", "SCBGLR1002A06.g", "g4"]
        );
    }

    #[test]
    fn test_unquote_label() {
        assert_eq!(unquote_label("'a:1'"), "a:1");
        assert_eq!(unquote_label("'it''s'"), "it's");
        assert_eq!(unquote_label("C_1"), "C_1");
        assert_eq!(unquote_label("'"), "'");
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            parse_newick("((a,b);"),
            Err(TfbsError::NewickParse { .. })
        ));
    }
}
