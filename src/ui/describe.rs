//! Text rendering of every engine state for the viewer

use super::recording::{Describe, Sketch};
use crate::dijkstra::DijkstraState;
use crate::expression::{format_number, join, ConversionState, EvaluationState};
use crate::heap::{tree_view, HeapNode, HeapState};
use crate::huffman::{HuffmanNode, HuffmanState};
use crate::linear::{LinearState, MessageQueueState};
use crate::linked_list::ListState;
use crate::polynomial::{PolynomialState, TermRef};
use crate::snapshot::NodeId;
use crate::tree::{TreeNode, TreeState};

/// Binary nodes drawn as an indented outline
trait Branching {
    fn label(&self) -> String;
    fn left(&self) -> Option<&Self>;
    fn right(&self) -> Option<&Self>;
}

impl Branching for TreeNode {
    fn label(&self) -> String {
        format!("{} (h{})", self.value, self.height)
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl Branching for HeapNode {
    fn label(&self) -> String {
        format!("{} [{}]", self.value, self.index)
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

impl Branching for HuffmanNode {
    fn label(&self) -> String {
        let name = match self.symbol {
            Some(c) => format!("'{}'", c),
            None => self.label.clone(),
        };
        match &self.code {
            Some(code) => format!("{} ({}) = {}", name, self.frequency, code),
            None => format!("{} ({})", name, self.frequency),
        }
    }

    fn left(&self) -> Option<&Self> {
        self.left.as_deref()
    }

    fn right(&self) -> Option<&Self> {
        self.right.as_deref()
    }
}

fn outline<N: Branching>(out: &mut Sketch, root: &N, marked: &impl Fn(&N) -> bool) {
    out.row_marked(root.label(), marked(root));
    outline_children(out, root, "", marked);
}

fn outline_children<N: Branching>(
    out: &mut Sketch,
    node: &N,
    prefix: &str,
    marked: &impl Fn(&N) -> bool,
) {
    let children: Vec<(&str, &N)> = [("L", node.left()), ("R", node.right())]
        .into_iter()
        .filter_map(|(side, child)| child.map(|c| (side, c)))
        .collect();
    let count = children.len();

    for (i, (side, child)) in children.into_iter().enumerate() {
        let (elbow, pad) = if i + 1 == count {
            ("└─", "   ")
        } else {
            ("├─", "│  ")
        };
        out.row_marked(
            format!("{}{}{} {}", prefix, elbow, side, child.label()),
            marked(child),
        );
        outline_children(out, child, &format!("{}{}", prefix, pad), marked);
    }
}

fn listing<T: ToString>(items: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = items.into_iter().map(|i| i.to_string()).collect();
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

fn link(id: Option<NodeId>) -> String {
    id.map_or_else(|| "null".to_string(), |id| id.to_string())
}

impl Describe<NodeId> for TreeState {
    fn describe(&self, highlighted: &[NodeId], out: &mut Sketch) {
        match &self.root {
            Some(root) => outline(out, root, &|n: &TreeNode| highlighted.contains(&n.id)),
            None => out.row("(empty tree)"),
        }
        if !self.visited.is_empty() {
            out.blank();
            out.row(format!("Visited: {}", listing(&self.visited)));
        }
        if !self.rotations.is_empty() {
            out.blank();
            out.row(format!("Rotations: {}", listing(&self.rotations)));
        }
    }
}

impl Describe<usize> for HeapState {
    fn describe(&self, highlighted: &[usize], out: &mut Sketch) {
        out.row(format!("{} {:?}", self.kind, self.items));
        out.blank();
        match tree_view(&self.items, 0) {
            Some(root) => outline(out, &root, &|n: &HeapNode| highlighted.contains(&n.index)),
            None => out.row("(empty heap)"),
        }
    }
}

impl Describe<NodeId> for HuffmanState {
    fn describe(&self, highlighted: &[NodeId], out: &mut Sketch) {
        let marked = |n: &HuffmanNode| highlighted.contains(&n.id);

        out.row(format!("Stage: {:?}", self.kind));
        if !self.queue.is_empty() {
            out.blank();
            out.row("Queue:");
            for entry in &self.queue {
                out.row_marked(
                    format!("  {} ({})", entry.label, entry.frequency),
                    marked(entry),
                );
            }
        }
        if let Some(tree) = &self.tree {
            out.blank();
            outline(out, tree, &marked);
        }
        if !self.codes.is_empty() {
            out.blank();
            out.row("Codes:");
            for (symbol, code) in &self.codes {
                out.row(format!("  '{}' = {}", symbol, code));
            }
        }
    }
}

impl Describe<String> for DijkstraState {
    fn describe(&self, highlighted: &[String], out: &mut Sketch) {
        out.row(format!(
            "Current: {}",
            self.current.as_deref().unwrap_or("-")
        ));
        out.blank();
        for (id, distance) in &self.distances {
            let shown = if distance.is_infinite() {
                "∞".to_string()
            } else {
                format_number(*distance)
            };
            let seen = if self.visited.contains(id) {
                " visited"
            } else {
                ""
            };
            out.row_marked(
                format!("{:<6} {:>6}{}", id, shown, seen),
                highlighted.contains(id),
            );
        }
        if !self.path.is_empty() {
            out.blank();
            out.row(format!("Path: {}", self.path.join(" -> ")));
        }
    }
}

impl Describe<usize> for ConversionState {
    fn describe(&self, highlighted: &[usize], out: &mut Sketch) {
        let token = match &self.current {
            Some(t) => format!("Token {}: {}", self.position, t),
            None => "Token: (end of input)".to_string(),
        };
        out.row_marked(token, !highlighted.is_empty());
        out.row(format!("Stack:  {}", join(&self.stack)));
        out.row(format!("Output: {}", join(&self.output)));
    }
}

impl Describe<usize> for EvaluationState {
    fn describe(&self, highlighted: &[usize], out: &mut Sketch) {
        let token = match &self.current {
            Some(t) => format!("Token {}: {}", self.position, t),
            None => format!("Token {}", self.position),
        };
        out.row_marked(token, !highlighted.is_empty());
        out.row(format!(
            "Stack: {}",
            listing(self.stack.iter().map(|v| format_number(*v)))
        ));
    }
}

impl Describe<NodeId> for ListState {
    fn describe(&self, highlighted: &[NodeId], out: &mut Sketch) {
        out.row(format!(
            "{}  head: {}  tail: {}",
            self.kind,
            link(self.head),
            link(self.tail)
        ));
        out.blank();
        if self.nodes.is_empty() {
            out.row("(empty list)");
        }
        for node in &self.nodes {
            let mut text = format!("{}  {:>5}  next: {}", node.id, node.value, link(node.next));
            if self.kind.has_prev() {
                text.push_str(&format!("  prev: {}", link(node.prev)));
            }
            out.row_marked(text, highlighted.contains(&node.id));
        }
        if let Some(frame) = &self.reverse {
            out.blank();
            out.row(format!(
                "curr: {}  prev: {}  next: {}",
                link(frame.curr),
                link(frame.prev),
                link(frame.next)
            ));
            out.row(format!("Reversed: {}", listing(&frame.reversed)));
        }
    }
}

impl Describe<usize> for LinearState {
    fn describe(&self, highlighted: &[usize], out: &mut Sketch) {
        for slot in 0..self.capacity {
            let value = self
                .items
                .get(slot)
                .map_or_else(|| "-".to_string(), |item| item.value.to_string());
            out.row_marked(
                format!("[{}] {}", slot, value),
                highlighted.contains(&slot),
            );
        }
    }
}

impl Describe<NodeId> for MessageQueueState {
    fn describe(&self, highlighted: &[NodeId], out: &mut Sketch) {
        for producer in &self.producers {
            out.row(format!("{}: {} sent", producer.name, producer.message_count));
        }
        out.blank();
        if self.queue.is_empty() {
            out.row("Queue: (empty)");
        }
        for message in &self.queue {
            out.row_marked(
                format!(
                    "Queue: {} \"{}\" ({})",
                    message.label(),
                    message.content,
                    message.status
                ),
                highlighted.contains(&message.id),
            );
        }
        out.blank();
        for consumer in &self.consumers {
            let (work, marked) = match &consumer.current {
                Some(message) => (
                    format!("{} {}", message.status, message.label()),
                    highlighted.contains(&message.id),
                ),
                None => ("idle".to_string(), false),
            };
            out.row_marked(
                format!(
                    "{}: {}, {} processed",
                    consumer.name, work, consumer.processed_count
                ),
                marked,
            );
        }
        for message in &self.processed {
            out.row_marked(
                format!("Done: {} ({})", message.label(), message.status),
                highlighted.contains(&message.id),
            );
        }
    }
}

impl Describe<TermRef> for PolynomialState {
    fn describe(&self, highlighted: &[TermRef], out: &mut Sketch) {
        let first = highlighted.iter().any(|r| matches!(r, TermRef::First(_)));
        let second = highlighted.iter().any(|r| matches!(r, TermRef::Second(_)));
        let result = highlighted.iter().any(|r| matches!(r, TermRef::Result(_)));

        out.row(format!("Stage: {:?}", self.kind));
        out.blank();
        out.row_marked(format!("Term 1:  {}", self.term1), first);
        out.row_marked(format!("Term 2:  {}", self.term2), second);
        if let Some(product) = self.product {
            out.row(format!("Product: {}", product));
        }
        let shown = if self.result.is_empty() {
            "0".to_string()
        } else {
            self.result.to_string()
        };
        out.row_marked(format!("Result:  {}", shown), result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::HeapKind;
    use crate::linear::MessageQueue;
    use crate::snapshot::Traced;

    #[test]
    fn test_tree_outline() {
        let mut engine = crate::tree::TreeEngine::bst();
        for v in [50, 30, 70] {
            engine.insert(v);
        }
        let state = TreeState {
            root: engine.root().cloned(),
            visited: vec![30],
            rotations: Vec::new(),
        };
        let mut out = Sketch::new();
        state.describe(&[NodeId(0)], &mut out);
        assert_eq!(out.rows()[0], "50 (h2)");
        assert_eq!(out.rows()[1], "├─L 30 (h1)");
        assert_eq!(out.rows()[2], "└─R 70 (h1)");
        assert_eq!(out.rows()[4], "Visited: 30");
        assert_eq!(out.marked(), [0]);
    }

    #[test]
    fn test_heap_marks_indices() {
        let state = HeapState {
            kind: HeapKind::Max,
            items: vec![9, 4, 7],
        };
        let mut out = Sketch::new();
        state.describe(&[2], &mut out);
        assert_eq!(out.rows()[0], "max-heap [9, 4, 7]");
        assert_eq!(out.rows()[4], "└─R 7 [2]");
        assert_eq!(out.marked(), [4]);
    }

    #[test]
    fn test_message_queue_marks_busy_consumer() {
        let mut mq = MessageQueue::new();
        mq.produce(0, "hi");
        mq.produce(1, "there");
        mq.process_next(0);
        let step = mq.replay().last().unwrap();
        let mut out = Sketch::new();
        step.state.describe(&step.highlighted, &mut out);

        assert_eq!(out.rows()[0], "Producer 1: 1 sent");
        assert_eq!(out.rows()[3], "Queue: msg-1 \"there\" (pending)");
        assert_eq!(out.rows()[5], "Consumer 1: processing msg-0, 0 processed");
        assert_eq!(out.marked(), [5]);
    }

    #[test]
    fn test_linear_slots() {
        let state = LinearState {
            items: Vec::new(),
            capacity: 2,
        };
        let mut out = Sketch::new();
        state.describe(&[0], &mut out);
        assert_eq!(out.rows(), ["[0] -", "[1] -"]);
        assert_eq!(out.marked(), [0]);
    }
}
