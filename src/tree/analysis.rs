// Structural statistics for a tree

use super::{TraversalOrder, Traversal, TreeNode};
use crate::snapshot::NodeId;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TreeStats {
    pub node_count: usize,
    pub height: u32,
    pub leaf_count: usize,
    pub internal_nodes: usize,
    /// Nodes with both children
    pub full_nodes: usize,
    pub min_value: Option<i64>,
    pub max_value: Option<i64>,
    /// Every node's balance factor is within [-1, 1]
    pub is_balanced: bool,
    /// Every node's balance factor is 0
    pub perfectly_balanced: bool,
    /// In-order values are non-decreasing
    pub is_bst: bool,
    /// (node, value, balance factor) in pre-order
    pub balance_factors: Vec<(NodeId, i64, i32)>,
}

/// Compute statistics from scratch; stored heights are not trusted
pub fn analyze(root: Option<&TreeNode>) -> TreeStats {
    let mut stats = TreeStats {
        is_balanced: true,
        perfectly_balanced: true,
        is_bst: true,
        ..TreeStats::default()
    };

    let Some(root) = root else {
        return stats;
    };
    stats.height = measure(root, &mut stats);

    let mut previous: Option<i64> = None;
    for node in Traversal::new(Some(root), TraversalOrder::Inorder) {
        if previous.is_some_and(|p| p > node.value) {
            stats.is_bst = false;
        }
        previous = Some(node.value);
    }

    stats
}

/// Pre-order walk returning the subtree height
fn measure(node: &TreeNode, stats: &mut TreeStats) -> u32 {
    stats.node_count += 1;
    if node.is_leaf() {
        stats.leaf_count += 1;
    } else {
        stats.internal_nodes += 1;
        if node.left.is_some() && node.right.is_some() {
            stats.full_nodes += 1;
        }
    }

    stats.min_value = Some(stats.min_value.map_or(node.value, |m| m.min(node.value)));
    stats.max_value = Some(stats.max_value.map_or(node.value, |m| m.max(node.value)));

    // Reserve this node's slot so balance factors stay in pre-order
    let index = stats.balance_factors.len();
    stats.balance_factors.push((node.id, node.value, 0));

    let left = node.left.as_deref().map_or(0, |n| measure(n, stats));
    let right = node.right.as_deref().map_or(0, |n| measure(n, stats));

    let balance = left as i32 - right as i32;
    stats.balance_factors[index].2 = balance;
    if balance.abs() > 1 {
        stats.is_balanced = false;
    }
    if balance != 0 {
        stats.perfectly_balanced = false;
    }

    1 + left.max(right)
}

#[cfg(test)]
mod tests {
    use super::super::TreeEngine;

    #[test]
    fn test_empty_tree() {
        let stats = TreeEngine::bst().analyze();
        assert_eq!(stats.node_count, 0);
        assert_eq!(stats.height, 0);
        assert!(stats.is_balanced);
        assert_eq!(stats.min_value, None);
    }

    #[test]
    fn test_degenerate_bst_is_unbalanced() {
        let mut tree = TreeEngine::bst();
        for v in [1, 2, 3, 4] {
            tree.insert(v);
        }
        let stats = tree.analyze();
        assert_eq!(stats.node_count, 4);
        assert_eq!(stats.height, 4);
        assert_eq!(stats.leaf_count, 1);
        assert_eq!(stats.internal_nodes, 3);
        assert_eq!(stats.full_nodes, 0);
        assert!(!stats.is_balanced);
        assert!(stats.is_bst);
        assert_eq!(stats.balance_factors[0].2, -3);
    }

    #[test]
    fn test_avl_counts() {
        let mut tree = TreeEngine::avl();
        for v in [1, 2, 3, 4] {
            tree.insert(v);
        }
        let stats = tree.analyze();
        assert!(stats.is_balanced);
        assert!(!stats.perfectly_balanced);
        assert_eq!(stats.min_value, Some(1));
        assert_eq!(stats.max_value, Some(4));
        assert_eq!(stats.full_nodes, 1);
        assert_eq!(stats.height, tree.root().unwrap().height);
    }
}
