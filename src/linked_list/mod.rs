//! Linked list engine for four variants
//!
//! | kind | prev links | `tail.next` | `head.prev` |
//! |------|-----------|-------------|-------------|
//! | SLL  | no        | none        | none        |
//! | DLL  | yes       | none        | none        |
//! | CSLL | no        | head        | none        |
//! | CDLL | yes       | head        | tail        |
//!
//! The node table owns every node. `head`, `tail`, `next` and `prev` are ids
//! looked up in the table, so circular variants need no shared ownership.
//!
//! Every operation animates its trace and refuses to start while the
//! previous one is still playing.

use crate::constants::{LIST_INTERVAL, LIST_REVERSE_INTERVAL};
use crate::input::parse_number;
use crate::snapshot::{IdGen, NodeId, Replay, Trace, Traced};
use rustc_hash::FxHashMap;
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ListKind {
    Sll,
    Dll,
    Csll,
    Cdll,
}

impl ListKind {
    pub const ALL: [ListKind; 4] = [ListKind::Sll, ListKind::Dll, ListKind::Csll, ListKind::Cdll];

    pub fn has_prev(self) -> bool {
        matches!(self, ListKind::Dll | ListKind::Cdll)
    }

    pub fn is_circular(self) -> bool {
        matches!(self, ListKind::Csll | ListKind::Cdll)
    }

    pub fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "sll" | "singly" => Some(ListKind::Sll),
            "dll" | "doubly" => Some(ListKind::Dll),
            "csll" => Some(ListKind::Csll),
            "cdll" => Some(ListKind::Cdll),
            _ => None,
        }
    }
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Sll => write!(f, "SLL"),
            ListKind::Dll => write!(f, "DLL"),
            ListKind::Csll => write!(f, "CSLL"),
            ListKind::Cdll => write!(f, "CDLL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListNode {
    pub id: NodeId,
    pub value: i64,
    pub next: Option<NodeId>,
    pub prev: Option<NodeId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationKind {
    InsertFront,
    InsertBack,
    DeleteFront,
    DeleteBack,
    Reverse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub value: Option<i64>,
}

/// Pointer registers of an in-progress reversal
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReverseFrame {
    pub curr: Option<NodeId>,
    pub prev: Option<NodeId>,
    pub next: Option<NodeId>,
    /// Nodes whose `next` already points backwards
    pub reversed: Vec<NodeId>,
    /// Link being followed or flipped in this step, as (from, to)
    pub active_link: Option<(NodeId, NodeId)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListState {
    pub kind: ListKind,
    pub head: Option<NodeId>,
    pub tail: Option<NodeId>,
    /// The node table, ordered by id
    pub nodes: Vec<ListNode>,
    pub reverse: Option<ReverseFrame>,
}

impl ListState {
    pub fn node(&self, id: NodeId) -> Option<&ListNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

#[derive(Debug, Clone)]
pub struct LinkedListEngine {
    kind: ListKind,
    nodes: FxHashMap<NodeId, ListNode>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    ids: IdGen,
    operations: Vec<Operation>,
    replay: Replay<ListState>,
}

impl LinkedListEngine {
    pub fn new(kind: ListKind) -> Self {
        LinkedListEngine {
            kind,
            nodes: FxHashMap::default(),
            head: None,
            tail: None,
            ids: IdGen::new(),
            operations: Vec::new(),
            replay: Replay::new(LIST_INTERVAL),
        }
    }

    pub fn kind(&self) -> ListKind {
        self.kind
    }

    pub fn head(&self) -> Option<NodeId> {
        self.head
    }

    pub fn tail(&self) -> Option<NodeId> {
        self.tail
    }

    pub fn node(&self, id: NodeId) -> Option<&ListNode> {
        self.nodes.get(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// Node ids from head to tail
    pub fn order(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if order.len() == self.nodes.len() {
                break;
            }
            order.push(id);
            if Some(id) == self.tail {
                break;
            }
            cursor = self.nodes.get(&id).and_then(|n| n.next);
        }
        order
    }

    /// Values from head to tail
    pub fn values(&self) -> Vec<i64> {
        self.order()
            .into_iter()
            .filter_map(|id| self.nodes.get(&id).map(|n| n.value))
            .collect()
    }

    /// Every directed link as (from, to, is_prev), sorted
    pub fn links(&self) -> Vec<(NodeId, NodeId, bool)> {
        let mut links: Vec<_> = self
            .nodes
            .values()
            .flat_map(|n| {
                let next = n.next.map(|to| (n.id, to, false));
                let prev = n.prev.map(|to| (n.id, to, true));
                next.into_iter().chain(prev)
            })
            .collect();
        links.sort();
        links
    }

    /// Check the link invariants of this list's kind. Returns a description
    /// of the first violation found.
    pub fn check_links(&self) -> Result<(), String> {
        let (Some(head), Some(tail)) = (self.head, self.tail) else {
            if self.nodes.is_empty() && self.head.is_none() && self.tail.is_none() {
                return Ok(());
            }
            return Err("head and tail disagree with the node table".to_string());
        };
        let order = self.order();
        if order.len() != self.nodes.len() {
            return Err(format!(
                "walk from head reached {} of {} nodes",
                order.len(),
                self.nodes.len()
            ));
        }

        let get = |id: NodeId| self.nodes.get(&id).ok_or(format!("dangling id {}", id));
        let wrap_next = if self.kind.is_circular() { Some(head) } else { None };
        if get(tail)?.next != wrap_next {
            return Err(format!("tail.next should be {:?}", wrap_next));
        }

        for (i, &id) in order.iter().enumerate() {
            let node = get(id)?;
            if !self.kind.has_prev() {
                if node.prev.is_some() {
                    return Err(format!("{} has a prev link", id));
                }
                continue;
            }
            let expected = match i {
                0 if self.kind.is_circular() => Some(tail),
                0 => None,
                _ => Some(order[i - 1]),
            };
            if node.prev != expected {
                return Err(format!("{}.prev should be {:?}", id, expected));
            }
        }
        Ok(())
    }

    fn state(&self, reverse: Option<ReverseFrame>) -> ListState {
        let mut nodes: Vec<ListNode> = self.nodes.values().copied().collect();
        nodes.sort_by_key(|n| n.id);
        ListState {
            kind: self.kind,
            head: self.head,
            tail: self.tail,
            nodes,
            reverse,
        }
    }

    fn value_of(&self, id: Option<NodeId>) -> String {
        id.and_then(|id| self.nodes.get(&id))
            .map_or_else(|| "null".to_string(), |n| n.value.to_string())
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut ListNode> {
        self.nodes.get_mut(&id)
    }

    fn busy(&self, operation: &str) -> bool {
        if self.replay.in_flight() {
            debug!(operation, kind = %self.kind, "list operation ignored: operation in flight");
            return true;
        }
        false
    }

    fn play(&mut self, steps: Trace<ListState>, interval: Duration) {
        self.replay = Replay::new(interval);
        self.replay.load(steps, true);
    }

    /// Insert text typed by a user; non-numeric input is ignored
    pub fn insert_front_input(&mut self, text: &str) -> bool {
        parse_number(text).is_some_and(|v| self.insert_front(v))
    }

    pub fn insert_back_input(&mut self, text: &str) -> bool {
        parse_number(text).is_some_and(|v| self.insert_back(v))
    }

    /// Create a node for `value` and attach it as the only node. Returns
    /// `None` when the list already has nodes.
    fn insert_first(&mut self, value: i64, steps: &mut Trace<ListState>) -> Option<NodeId> {
        if self.head.is_some() {
            return None;
        }
        let id = self.ids.next_id();
        let link = self.kind.is_circular().then_some(id);
        self.nodes.insert(
            id,
            ListNode {
                id,
                value,
                next: link,
                prev: link.filter(|_| self.kind.has_prev()),
            },
        );
        self.head = Some(id);
        self.tail = Some(id);
        steps.push(self.state(None), vec![id], "Creating first node");
        Some(id)
    }

    fn create_detached(&mut self, value: i64, steps: &mut Trace<ListState>) -> NodeId {
        let id = self.ids.next_id();
        self.nodes.insert(
            id,
            ListNode {
                id,
                value,
                next: None,
                prev: None,
            },
        );
        steps.push(self.state(None), vec![id], "Creating new node");
        id
    }

    pub fn insert_front(&mut self, value: i64) -> bool {
        if self.busy("insert_front") {
            return false;
        }
        let mut steps = Trace::new();
        if self.insert_first(value, &mut steps).is_none() {
            let (Some(old_head), Some(tail)) = (self.head, self.tail) else {
                return false;
            };
            let id = self.create_detached(value, &mut steps);
            let kind = self.kind;

            if let Some(node) = self.node_mut(id) {
                node.next = Some(old_head);
                if kind == ListKind::Cdll {
                    node.prev = Some(tail);
                }
            }
            if kind.has_prev() {
                if let Some(node) = self.node_mut(old_head) {
                    node.prev = Some(id);
                }
            }
            if kind.is_circular() {
                if let Some(node) = self.node_mut(tail) {
                    node.next = Some(id);
                }
            }
            steps.push(self.state(None), vec![id, old_head], "Linking nodes");

            self.head = Some(id);
            steps.push(
                self.state(None),
                vec![id],
                format!("Insert {} at front", value),
            );
        }

        self.operations.push(Operation {
            kind: OperationKind::InsertFront,
            value: Some(value),
        });
        debug!(kind = %self.kind, value, steps = steps.len(), "list insert front");
        self.play(steps, LIST_INTERVAL);
        true
    }

    pub fn insert_back(&mut self, value: i64) -> bool {
        if self.busy("insert_back") {
            return false;
        }
        let mut steps = Trace::new();
        if self.insert_first(value, &mut steps).is_none() {
            let (Some(head), Some(old_tail)) = (self.head, self.tail) else {
                return false;
            };
            let id = self.create_detached(value, &mut steps);
            let kind = self.kind;

            if let Some(node) = self.node_mut(old_tail) {
                node.next = Some(id);
            }
            if let Some(node) = self.node_mut(id) {
                if kind.has_prev() {
                    node.prev = Some(old_tail);
                }
                if kind.is_circular() {
                    node.next = Some(head);
                }
            }
            if kind == ListKind::Cdll {
                if let Some(node) = self.node_mut(head) {
                    node.prev = Some(id);
                }
            }
            steps.push(self.state(None), vec![old_tail, id], "Linking nodes");

            self.tail = Some(id);
            steps.push(
                self.state(None),
                vec![id],
                format!("Insert {} at back", value),
            );
        }

        self.operations.push(Operation {
            kind: OperationKind::InsertBack,
            value: Some(value),
        });
        debug!(kind = %self.kind, value, steps = steps.len(), "list insert back");
        self.play(steps, LIST_INTERVAL);
        true
    }

    /// Remove the only node, if the list has exactly one
    fn remove_last_node(&mut self) -> bool {
        if self.head.is_none() || self.head != self.tail {
            return false;
        }
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        true
    }

    pub fn delete_front(&mut self) -> Option<i64> {
        if self.busy("delete_front") {
            return None;
        }
        let old_head = self.head?;
        let value = self.nodes.get(&old_head)?.value;
        let tail = self.tail?;

        let mut steps = Trace::new();
        steps.push(self.state(None), vec![old_head], "Removing front node");

        if !self.remove_last_node() {
            let new_head = self.nodes.get(&old_head)?.next?;
            let kind = self.kind;
            if kind.has_prev() {
                if let Some(node) = self.node_mut(new_head) {
                    node.prev = (kind == ListKind::Cdll).then_some(tail);
                }
            }
            if kind.is_circular() {
                if let Some(node) = self.node_mut(tail) {
                    node.next = Some(new_head);
                }
            }
            self.nodes.remove(&old_head);
            self.head = Some(new_head);
        }
        steps.push(
            self.state(None),
            self.head.into_iter().collect(),
            format!("Removed {} from front", value),
        );

        self.operations.push(Operation {
            kind: OperationKind::DeleteFront,
            value: None,
        });
        debug!(kind = %self.kind, value, steps = steps.len(), "list delete front");
        self.play(steps, LIST_INTERVAL);
        Some(value)
    }

    /// Remove the tail. The new tail is found by walking from the head.
    pub fn delete_back(&mut self) -> Option<i64> {
        if self.busy("delete_back") {
            return None;
        }
        let old_tail = self.tail?;
        let head = self.head?;
        let value = self.nodes.get(&old_tail)?.value;

        let mut steps = Trace::new();
        steps.push(self.state(None), vec![old_tail], "Removing back node");

        if !self.remove_last_node() {
            let mut cursor = head;
            let mut walked = 0;
            let new_tail = loop {
                let node = self.nodes.get(&cursor)?;
                steps.push(
                    self.state(None),
                    vec![cursor, old_tail],
                    format!("Checking whether {} links to the tail", node.value),
                );
                if node.next == Some(old_tail) {
                    break cursor;
                }
                walked += 1;
                if walked >= self.nodes.len() {
                    return None;
                }
                cursor = node.next?;
            };

            let kind = self.kind;
            if let Some(node) = self.node_mut(new_tail) {
                node.next = kind.is_circular().then_some(head);
            }
            if kind == ListKind::Cdll {
                if let Some(node) = self.node_mut(head) {
                    node.prev = Some(new_tail);
                }
            }
            self.nodes.remove(&old_tail);
            self.tail = Some(new_tail);
        }
        steps.push(
            self.state(None),
            self.tail.into_iter().collect(),
            format!("Removed {} from back", value),
        );

        self.operations.push(Operation {
            kind: OperationKind::DeleteBack,
            value: None,
        });
        debug!(kind = %self.kind, value, steps = steps.len(), "list delete back");
        self.play(steps, LIST_INTERVAL);
        Some(value)
    }

    fn reverse_step(
        &self,
        steps: &mut Trace<ListState>,
        frame: &ReverseFrame,
        active_link: Option<(NodeId, NodeId)>,
    ) {
        let highlighted = [frame.curr, frame.prev, frame.next]
            .into_iter()
            .flatten()
            .collect();
        let message = format!(
            "Current: {}, Next: {}, Prev: {}",
            self.value_of(frame.curr),
            self.value_of(frame.next),
            self.value_of(frame.prev)
        );
        let frame = ReverseFrame {
            active_link,
            ..frame.clone()
        };
        steps.push(self.state(Some(frame)), highlighted, message);
    }

    /// Reverse in place with the three-pointer walk, tracing every pointer
    /// move and link flip
    pub fn reverse(&mut self) -> bool {
        if self.busy("reverse") {
            return false;
        }
        let (Some(old_head), Some(old_tail)) = (self.head, self.tail) else {
            return false;
        };
        let kind = self.kind;
        let count = self.nodes.len();

        let mut steps = Trace::new();
        let mut frame = ReverseFrame {
            curr: Some(old_head),
            prev: None,
            next: None,
            reversed: Vec::new(),
            active_link: None,
        };
        self.reverse_step(&mut steps, &frame, None);

        for _ in 0..count {
            let Some(curr) = frame.curr else { break };
            // The tail's wrap link is not followed; the loop ends there
            let next = if curr == old_tail {
                None
            } else {
                self.nodes.get(&curr).and_then(|n| n.next)
            };
            frame.next = next;
            if let Some(next) = next {
                self.reverse_step(&mut steps, &frame, Some((curr, next)));
            }

            let prev = frame.prev;
            if let Some(node) = self.node_mut(curr) {
                node.next = prev;
                if kind.has_prev() {
                    node.prev = next;
                }
            }
            frame.reversed.push(curr);
            trace!(node = %curr, "list link flipped");
            if let Some(prev) = prev {
                self.reverse_step(&mut steps, &frame, Some((curr, prev)));
            }

            frame.prev = Some(curr);
            frame.curr = next;
            self.reverse_step(&mut steps, &frame, None);
        }

        self.head = Some(old_tail);
        self.tail = Some(old_head);
        if kind.is_circular() {
            if let Some(node) = self.node_mut(old_head) {
                node.next = Some(old_tail);
            }
            if kind == ListKind::Cdll {
                if let Some(node) = self.node_mut(old_tail) {
                    node.prev = Some(old_head);
                }
            }
        }
        steps.push(self.state(None), Vec::new(), "List reversed");

        self.operations.push(Operation {
            kind: OperationKind::Reverse,
            value: None,
        });
        debug!(kind = %self.kind, steps = steps.len(), "list reverse");
        self.play(steps, LIST_REVERSE_INTERVAL);
        true
    }

    /// Drop every node and the operation history
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.head = None;
        self.tail = None;
        self.ids.reset();
        self.operations.clear();
        self.replay = Replay::new(LIST_INTERVAL);
    }
}

impl Traced for LinkedListEngine {
    type State = ListState;
    type Key = NodeId;

    fn replay(&self) -> &Replay<ListState> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<ListState> {
        &mut self.replay
    }
}
