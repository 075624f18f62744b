//! Binary search tree and AVL tree engine
//!
//! Both variants share one node type and one insertion walk:
//! - [`TreeEngine::insert`] descends by comparison, recording one step per
//!   comparison, attaches a leaf and then unwinds the path bottom-up,
//!   recomputing heights. The AVL variant rebalances on the way up (see
//!   [`avl`]).
//! - [`TreeEngine::traverse`] records an animated in/pre/post-order visit.
//! - [`TreeEngine::iter`] is the lazy traversal underneath it.
//!
//! # Duplicates
//!
//! `value < node.value` goes left, anything else goes right, for both
//! variants. The AVL rotation cases are written against the same rule.
//!
//! # Ownership
//!
//! Children are `Option<Box<TreeNode>>` owned by their parent. The unwind
//! phase addresses nodes by their path of directions from the root instead of
//! holding references across mutations, so every recorded step can snapshot
//! the whole tree.

pub mod analysis;
pub mod avl;

use crate::constants::{TREE_INSERT_INTERVAL, TREE_TRAVERSAL_INTERVAL};
use crate::input::parse_number;
use crate::snapshot::{IdGen, NodeId, Replay, Trace, Traced};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

pub use analysis::TreeStats;

/// Which insertion discipline the engine follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TreeKind {
    Bst,
    Avl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraversalOrder {
    Inorder,
    Preorder,
    Postorder,
}

impl TraversalOrder {
    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "inorder" | "in" => Some(TraversalOrder::Inorder),
            "preorder" | "pre" => Some(TraversalOrder::Preorder),
            "postorder" | "post" => Some(TraversalOrder::Postorder),
            _ => None,
        }
    }
}

impl fmt::Display for TraversalOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraversalOrder::Inorder => write!(f, "inorder"),
            TraversalOrder::Preorder => write!(f, "preorder"),
            TraversalOrder::Postorder => write!(f, "postorder"),
        }
    }
}

/// Side of a parent a child hangs from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Left,
    Right,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Left => write!(f, "left"),
            Direction::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub value: i64,
    pub height: u32,
    pub left: Option<Box<TreeNode>>,
    pub right: Option<Box<TreeNode>>,
}

impl TreeNode {
    pub fn leaf(id: NodeId, value: i64) -> Self {
        TreeNode {
            id,
            value,
            height: 1,
            left: None,
            right: None,
        }
    }

    /// Height of an optional subtree; an empty subtree has height 0
    pub fn height_of(node: Option<&TreeNode>) -> u32 {
        node.map_or(0, |n| n.height)
    }

    /// height(left) - height(right)
    pub fn balance_factor(&self) -> i32 {
        Self::height_of(self.left.as_deref()) as i32 - Self::height_of(self.right.as_deref()) as i32
    }

    pub fn update_height(&mut self) {
        self.height = 1 + Self::height_of(self.left.as_deref())
            .max(Self::height_of(self.right.as_deref()));
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    pub fn child(&self, direction: Direction) -> Option<&TreeNode> {
        match direction {
            Direction::Left => self.left.as_deref(),
            Direction::Right => self.right.as_deref(),
        }
    }

    fn child_slot_mut(&mut self, direction: Direction) -> &mut Option<Box<TreeNode>> {
        match direction {
            Direction::Left => &mut self.left,
            Direction::Right => &mut self.right,
        }
    }
}

/// Follow `path` from `slot`, returning the slot at its end
fn slot_at<'a>(
    mut slot: &'a mut Option<Box<TreeNode>>,
    path: &[Direction],
) -> Option<&'a mut Option<Box<TreeNode>>> {
    for &direction in path {
        slot = match slot {
            Some(node) => node.child_slot_mut(direction),
            None => return None,
        };
    }
    Some(slot)
}

/// Snapshot recorded with every tree step
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeState {
    pub root: Option<TreeNode>,
    /// Values visited so far by the running traversal
    pub visited: Vec<i64>,
    /// Rotations performed since the tree was last cleared
    pub rotations: Vec<String>,
}

enum Frame<'a> {
    Expand(&'a TreeNode),
    Visit(&'a TreeNode),
}

/// Lazy depth-first traversal over a borrowed tree
pub struct Traversal<'a> {
    order: TraversalOrder,
    frames: Vec<Frame<'a>>,
}

impl<'a> Traversal<'a> {
    fn new(root: Option<&'a TreeNode>, order: TraversalOrder) -> Self {
        Traversal {
            order,
            frames: root.map(Frame::Expand).into_iter().collect(),
        }
    }
}

impl<'a> Iterator for Traversal<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(frame) = self.frames.pop() {
            let node = match frame {
                Frame::Visit(node) => return Some(node),
                Frame::Expand(node) => node,
            };

            // Frames are popped, so push in reverse visiting order
            let left = node.left.as_deref().map(Frame::Expand);
            let right = node.right.as_deref().map(Frame::Expand);
            let pending: [Option<Frame<'a>>; 3] = match self.order {
                TraversalOrder::Preorder => [right, left, Some(Frame::Visit(node))],
                TraversalOrder::Inorder => [right, Some(Frame::Visit(node)), left],
                TraversalOrder::Postorder => [Some(Frame::Visit(node)), right, left],
            };
            self.frames.extend(pending.into_iter().flatten());
        }
        None
    }
}

/// BST/AVL engine with step traces
#[derive(Debug, Clone)]
pub struct TreeEngine {
    kind: TreeKind,
    root: Option<Box<TreeNode>>,
    ids: IdGen,
    rotation_history: Vec<String>,
    traversal_history: Vec<i64>,
    replay: Replay<TreeState>,
}

impl TreeEngine {
    pub fn new(kind: TreeKind) -> Self {
        TreeEngine {
            kind,
            root: None,
            ids: IdGen::new(),
            rotation_history: Vec::new(),
            traversal_history: Vec::new(),
            replay: Replay::new(TREE_INSERT_INTERVAL),
        }
    }

    pub fn bst() -> Self {
        Self::new(TreeKind::Bst)
    }

    pub fn avl() -> Self {
        Self::new(TreeKind::Avl)
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn root(&self) -> Option<&TreeNode> {
        self.root.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn len(&self) -> usize {
        self.iter(TraversalOrder::Preorder).count()
    }

    pub fn rotation_history(&self) -> &[String] {
        &self.rotation_history
    }

    pub fn traversal_history(&self) -> &[i64] {
        &self.traversal_history
    }

    /// Lazily walk the tree in the given order
    pub fn iter(&self, order: TraversalOrder) -> Traversal<'_> {
        Traversal::new(self.root.as_deref(), order)
    }

    /// In-order values, non-decreasing for any tree this engine builds
    pub fn values(&self) -> Vec<i64> {
        self.iter(TraversalOrder::Inorder).map(|n| n.value).collect()
    }

    pub fn analyze(&self) -> TreeStats {
        analysis::analyze(self.root.as_deref())
    }

    fn state(&self) -> TreeState {
        TreeState {
            root: self.root.as_deref().cloned(),
            visited: self.traversal_history.clone(),
            rotations: self.rotation_history.clone(),
        }
    }

    /// Insert text typed by a user; non-numeric input is ignored
    pub fn insert_input(&mut self, text: &str) -> bool {
        match parse_number(text) {
            Some(value) => self.insert(value),
            None => {
                debug!(input = text, "tree insert ignored: not a number");
                false
            }
        }
    }

    /// Insert `value`, recording the comparison walk, the new leaf and any
    /// rotations. Returns false if an animation is still in flight.
    pub fn insert(&mut self, value: i64) -> bool {
        if self.replay.in_flight() {
            debug!(value, "tree insert ignored: operation in flight");
            return false;
        }

        let mut steps = Trace::new();
        let id = self.ids.next_id();

        // Descend to the empty slot, one step per comparison
        let mut path = Vec::new();
        let mut parent_value = None;
        let mut cursor = self.root.as_deref();
        while let Some(node) = cursor {
            let direction = if value < node.value {
                Direction::Left
            } else {
                Direction::Right
            };
            steps.push(
                self.state(),
                vec![node.id],
                format!(
                    "Compare {} with {}: go {}",
                    value, node.value, direction
                ),
            );
            path.push(direction);
            parent_value = Some(node.value);
            cursor = node.child(direction);
        }

        if let Some(slot) = slot_at(&mut self.root, &path) {
            *slot = Some(Box::new(TreeNode::leaf(id, value)));
        }
        let message = match (parent_value, path.last()) {
            (Some(parent), Some(direction)) => {
                format!("Insert {} as {} child of {}", value, direction, parent)
            }
            _ => format!("Insert {} as root", value),
        };
        steps.push(self.state(), vec![id], message);

        // Unwind: refresh heights bottom-up, rebalancing for AVL
        for depth in (0..path.len()).rev() {
            let ancestor = &path[..depth];
            let case = match slot_at(&mut self.root, ancestor) {
                Some(Some(node)) => {
                    node.update_height();
                    match self.kind {
                        TreeKind::Avl => avl::classify(node, value),
                        TreeKind::Bst => None,
                    }
                }
                _ => None,
            };

            let Some(case) = case else { continue };
            trace!(?case, value, depth, "avl rebalance");
            for &(at_child, rotation) in case.rotations() {
                let mut target = ancestor.to_vec();
                target.extend(at_child);
                let Some(applied) = slot_at(&mut self.root, &target)
                    .and_then(|slot| avl::rotate_slot(slot, rotation))
                else {
                    continue;
                };
                let message = format!("{} rotation at {}", applied.rotation, applied.pivot_value);
                self.rotation_history.push(message.clone());
                steps.push(
                    self.state(),
                    vec![applied.pivot, applied.new_root],
                    message,
                );
            }
        }

        debug!(kind = ?self.kind, value, steps = steps.len(), "tree insert");
        self.replay = Replay::new(TREE_INSERT_INTERVAL);
        self.replay.load(steps, false);
        true
    }

    /// Animate a traversal. Ignored on an empty tree or while another
    /// animation is in flight.
    pub fn traverse(&mut self, order: TraversalOrder) -> bool {
        if self.replay.in_flight() {
            debug!(%order, "tree traversal ignored: operation in flight");
            return false;
        }
        if self.root.is_none() {
            return false;
        }

        self.traversal_history.clear();
        let visits: Vec<(NodeId, i64)> = self.iter(order).map(|n| (n.id, n.value)).collect();

        let mut steps = Trace::new();
        steps.push(self.state(), Vec::new(), format!("Start {} traversal", order));
        for (id, value) in visits {
            self.traversal_history.push(value);
            steps.push(self.state(), vec![id], format!("Visit {}", value));
        }

        debug!(%order, steps = steps.len(), "tree traversal");
        self.replay = Replay::new(TREE_TRAVERSAL_INTERVAL);
        self.replay.load(steps, true);
        true
    }

    /// Reset to an empty tree and drop all history
    pub fn clear(&mut self) {
        self.root = None;
        self.ids.reset();
        self.rotation_history.clear();
        self.traversal_history.clear();
        self.replay = Replay::new(TREE_INSERT_INTERVAL);
    }
}

impl Traced for TreeEngine {
    type State = TreeState;
    type Key = NodeId;

    fn replay(&self) -> &Replay<TreeState> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<TreeState> {
        &mut self.replay
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(kind: TreeKind, values: &[i64]) -> TreeEngine {
        let mut tree = TreeEngine::new(kind);
        for &v in values {
            assert!(tree.insert(v));
        }
        tree
    }

    #[test]
    fn test_bst_shape() {
        let tree = build(TreeKind::Bst, &[50, 30, 70, 20, 40]);
        let root = tree.root().unwrap();
        assert_eq!(root.value, 50);
        assert_eq!(root.left.as_ref().unwrap().value, 30);
        assert_eq!(root.right.as_ref().unwrap().value, 70);
        assert_eq!(root.height, 3);
        assert_eq!(tree.values(), vec![20, 30, 40, 50, 70]);
    }

    #[test]
    fn test_duplicates_go_right() {
        let tree = build(TreeKind::Bst, &[5, 5]);
        let root = tree.root().unwrap();
        assert!(root.left.is_none());
        assert_eq!(root.right.as_ref().unwrap().value, 5);
    }

    #[test]
    fn test_traversal_orders() {
        let tree = build(TreeKind::Bst, &[4, 2, 6, 1, 3]);
        let collect = |order| tree.iter(order).map(|n| n.value).collect::<Vec<_>>();
        assert_eq!(collect(TraversalOrder::Inorder), vec![1, 2, 3, 4, 6]);
        assert_eq!(collect(TraversalOrder::Preorder), vec![4, 2, 1, 3, 6]);
        assert_eq!(collect(TraversalOrder::Postorder), vec![1, 3, 2, 6, 4]);
    }

    #[test]
    fn test_insert_records_comparisons() {
        let mut tree = build(TreeKind::Bst, &[10, 5]);
        assert!(tree.insert(7));
        let messages: Vec<&str> = tree
            .replay()
            .steps()
            .iter()
            .map(|s| s.message.as_str())
            .collect();
        assert_eq!(
            messages,
            vec![
                "Compare 7 with 10: go left",
                "Compare 7 with 5: go right",
                "Insert 7 as right child of 5",
            ]
        );
    }

    #[test]
    fn test_traversal_is_not_reentrant() {
        let mut tree = build(TreeKind::Avl, &[2, 1, 3]);
        assert!(tree.traverse(TraversalOrder::Inorder));
        assert!(tree.replay().in_flight());
        assert!(!tree.traverse(TraversalOrder::Preorder));
        assert!(!tree.insert(9));

        tree.settle();
        assert_eq!(tree.traversal_history(), &[1, 2, 3]);
        assert!(tree.traverse(TraversalOrder::Preorder));
        assert_eq!(tree.traversal_history(), &[2, 1, 3]);
    }

    #[test]
    fn test_insert_after_traversal_uses_insert_pace() {
        let mut tree = build(TreeKind::Bst, &[2, 1]);
        tree.traverse(TraversalOrder::Inorder);
        assert_eq!(tree.replay().interval(), TREE_TRAVERSAL_INTERVAL);
        tree.settle();

        assert!(tree.insert(3));
        assert_eq!(tree.replay().interval(), TREE_INSERT_INTERVAL);
    }

    #[test]
    fn test_traverse_empty_tree_is_noop() {
        let mut tree = TreeEngine::bst();
        assert!(!tree.traverse(TraversalOrder::Inorder));
        assert!(tree.replay().is_empty());
    }

    #[test]
    fn test_non_numeric_input_is_ignored() {
        let mut tree = TreeEngine::avl();
        assert!(!tree.insert_input("abc"));
        assert!(tree.is_empty());
        assert!(tree.insert_input(" 12 "));
        assert_eq!(tree.values(), vec![12]);
    }

    #[test]
    fn test_clear_resets_ids_and_history() {
        let mut tree = build(TreeKind::Avl, &[1, 2, 3]);
        assert!(!tree.rotation_history().is_empty());
        tree.clear();
        assert!(tree.is_empty());
        assert!(tree.rotation_history().is_empty());
        assert!(tree.replay().is_empty());
        tree.insert(8);
        assert_eq!(tree.root().unwrap().id, NodeId(0));
    }
}
