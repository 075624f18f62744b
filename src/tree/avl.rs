//! AVL rebalancing
//!
//! After an insert the engine walks back up the insertion path. At each
//! ancestor whose balance factor leaves `[-1, 1]` one of four cases applies,
//! chosen from the balance factor and the inserted value:
//!
//! ```text
//! balance >  1, value <  left.value   left-left    rotate right
//! balance < -1, value >= right.value  right-right  rotate left
//! balance >  1, otherwise             left-right   rotate left child left, then right
//! balance < -1, otherwise             right-left   rotate right child right, then left
//! ```

use super::{Direction, TreeNode};
use crate::snapshot::NodeId;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rotation {
    Left,
    Right,
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rotation::Left => write!(f, "Left"),
            Rotation::Right => write!(f, "Right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    LeftLeft,
    RightRight,
    LeftRight,
    RightLeft,
}

impl Case {
    /// Rotations to apply, in order. `Some(direction)` rotates the child on
    /// that side, `None` rotates the unbalanced node itself.
    pub fn rotations(self) -> &'static [(Option<Direction>, Rotation)] {
        match self {
            Case::LeftLeft => &[(None, Rotation::Right)],
            Case::RightRight => &[(None, Rotation::Left)],
            Case::LeftRight => &[
                (Some(Direction::Left), Rotation::Left),
                (None, Rotation::Right),
            ],
            Case::RightLeft => &[
                (Some(Direction::Right), Rotation::Right),
                (None, Rotation::Left),
            ],
        }
    }
}

/// Which rotation case `node` is in after inserting `value` below it, if any.
/// `node`'s height must already be up to date.
pub fn classify(node: &TreeNode, value: i64) -> Option<Case> {
    let balance = node.balance_factor();
    if balance > 1 {
        let left = node.left.as_deref()?;
        if value < left.value {
            Some(Case::LeftLeft)
        } else {
            Some(Case::LeftRight)
        }
    } else if balance < -1 {
        let right = node.right.as_deref()?;
        if value >= right.value {
            Some(Case::RightRight)
        } else {
            Some(Case::RightLeft)
        }
    } else {
        None
    }
}

/// Result of one rotation, for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedRotation {
    pub rotation: Rotation,
    /// The node rotated at (moves down)
    pub pivot: NodeId,
    pub pivot_value: i64,
    /// The node that replaced it (moves up)
    pub new_root: NodeId,
}

pub fn rotate_right(mut y: Box<TreeNode>) -> Box<TreeNode> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

pub fn rotate_left(mut x: Box<TreeNode>) -> Box<TreeNode> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

/// Rotate the subtree in `slot` in place. Returns `None` when the slot is
/// empty or lacks the child the rotation needs.
pub fn rotate_slot(
    slot: &mut Option<Box<TreeNode>>,
    rotation: Rotation,
) -> Option<AppliedRotation> {
    let node = slot.take()?;
    let has_child = match rotation {
        Rotation::Left => node.right.is_some(),
        Rotation::Right => node.left.is_some(),
    };
    if !has_child {
        *slot = Some(node);
        return None;
    }

    let pivot = node.id;
    let pivot_value = node.value;
    let rotated = match rotation {
        Rotation::Left => rotate_left(node),
        Rotation::Right => rotate_right(node),
    };
    let new_root = rotated.id;
    *slot = Some(rotated);

    Some(AppliedRotation {
        rotation,
        pivot,
        pivot_value,
        new_root,
    })
}

#[cfg(test)]
mod tests {
    use super::super::TreeEngine;
    use super::*;

    fn shape(tree: &TreeEngine) -> (i64, Option<i64>, Option<i64>) {
        let root = tree.root().unwrap();
        (
            root.value,
            root.left.as_ref().map(|n| n.value),
            root.right.as_ref().map(|n| n.value),
        )
    }

    fn avl(values: &[i64]) -> TreeEngine {
        let mut tree = TreeEngine::avl();
        for &v in values {
            tree.insert(v);
        }
        tree
    }

    #[test]
    fn test_left_left_case() {
        let tree = avl(&[30, 20, 10]);
        assert_eq!(shape(&tree), (20, Some(10), Some(30)));
        assert_eq!(tree.rotation_history(), &["Right rotation at 30"]);
    }

    #[test]
    fn test_right_right_case() {
        let tree = avl(&[10, 20, 30]);
        assert_eq!(shape(&tree), (20, Some(10), Some(30)));
        assert_eq!(tree.rotation_history(), &["Left rotation at 10"]);
    }

    #[test]
    fn test_left_right_case() {
        let tree = avl(&[30, 10, 20]);
        assert_eq!(shape(&tree), (20, Some(10), Some(30)));
        assert_eq!(
            tree.rotation_history(),
            &["Left rotation at 10", "Right rotation at 30"]
        );
    }

    #[test]
    fn test_right_left_case() {
        let tree = avl(&[10, 30, 20]);
        assert_eq!(shape(&tree), (20, Some(10), Some(30)));
        assert_eq!(
            tree.rotation_history(),
            &["Right rotation at 30", "Left rotation at 10"]
        );
    }

    #[test]
    fn test_rotation_recomputes_heights() {
        let tree = avl(&[1, 2, 3, 4, 5, 6, 7]);
        let root = tree.root().unwrap();
        assert_eq!(root.value, 4);
        assert_eq!(root.height, 3);
        assert_eq!(root.left.as_ref().unwrap().height, 2);
        assert_eq!(root.right.as_ref().unwrap().height, 2);
    }

    #[test]
    fn test_rotation_step_highlights_pivot_and_new_root() {
        let mut tree = avl(&[10, 20]);
        tree.insert(30);
        let last = tree.replay_last_message();
        assert_eq!(last.0, "Left rotation at 10");
        assert_eq!(last.1.len(), 2);
    }

    #[test]
    fn test_rotate_slot_without_child_is_noop() {
        let mut slot = Some(Box::new(TreeNode::leaf(NodeId(0), 1)));
        assert!(rotate_slot(&mut slot, Rotation::Left).is_none());
        assert_eq!(slot.as_ref().unwrap().value, 1);
    }

    impl TreeEngine {
        fn replay_last_message(&self) -> (String, Vec<NodeId>) {
            use crate::snapshot::Traced;
            let step = self.replay().last().unwrap();
            (step.message.clone(), step.highlighted.clone())
        }
    }
}
