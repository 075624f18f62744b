//! Array-backed binary heap engine
//!
//! The backing array is the single source of truth. Index `i` has children at
//! `2i + 1` and `2i + 2`; the node-with-children view returned by
//! [`HeapEngine::tree_view`] is derived from the array on demand and never
//! mutated.
//!
//! Toggling between max and min order re-establishes heap order in place with
//! a bottom-up heapify (sift-down from the last internal node to the root).

use crate::constants::HEAP_INTERVAL;
use crate::input::{parse_list, parse_number};
use crate::snapshot::{Replay, Trace, Traced};
use serde::Serialize;
use std::fmt;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeapKind {
    Max,
    Min,
}

impl HeapKind {
    pub fn toggled(self) -> Self {
        match self {
            HeapKind::Max => HeapKind::Min,
            HeapKind::Min => HeapKind::Max,
        }
    }

    /// Whether `parent` must move below `child` under this ordering
    pub fn should_swap(self, parent: i64, child: i64) -> bool {
        match self {
            HeapKind::Max => parent < child,
            HeapKind::Min => parent > child,
        }
    }
}

impl fmt::Display for HeapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapKind::Max => write!(f, "max-heap"),
            HeapKind::Min => write!(f, "min-heap"),
        }
    }
}

/// Snapshot recorded with every heap step; highlights are array indices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeapState {
    pub kind: HeapKind,
    pub items: Vec<i64>,
}

/// Display-only tree projection of the backing array
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeapNode {
    pub index: usize,
    pub value: i64,
    pub left: Option<Box<HeapNode>>,
    pub right: Option<Box<HeapNode>>,
}

/// Project `items` onto a tree rooted at `index`
pub fn tree_view(items: &[i64], index: usize) -> Option<HeapNode> {
    let value = *items.get(index)?;
    Some(HeapNode {
        index,
        value,
        left: tree_view(items, 2 * index + 1).map(Box::new),
        right: tree_view(items, 2 * index + 2).map(Box::new),
    })
}

/// True when every parent dominates its children under `kind`
pub fn is_heap(items: &[i64], kind: HeapKind) -> bool {
    (1..items.len()).all(|i| !kind.should_swap(items[(i - 1) / 2], items[i]))
}

#[derive(Debug, Clone)]
pub struct HeapEngine {
    kind: HeapKind,
    items: Vec<i64>,
    replay: Replay<HeapState, usize>,
}

impl HeapEngine {
    pub fn new(kind: HeapKind) -> Self {
        HeapEngine {
            kind,
            items: Vec::new(),
            replay: Replay::new(HEAP_INTERVAL),
        }
    }

    pub fn kind(&self) -> HeapKind {
        self.kind
    }

    pub fn items(&self) -> &[i64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn peek(&self) -> Option<i64> {
        self.items.first().copied()
    }

    pub fn tree_view(&self) -> Option<HeapNode> {
        tree_view(&self.items, 0)
    }

    fn state(&self) -> HeapState {
        HeapState {
            kind: self.kind,
            items: self.items.clone(),
        }
    }

    fn busy(&self, operation: &str) -> bool {
        if self.replay.in_flight() {
            debug!(operation, "heap operation ignored: operation in flight");
            return true;
        }
        false
    }

    pub fn insert(&mut self, value: i64) -> bool {
        if self.busy("insert") {
            return false;
        }
        let mut steps = Trace::new();
        self.push_and_sift(value, &mut steps);
        debug!(value, kind = %self.kind, steps = steps.len(), "heap insert");
        self.replay.load(steps, false);
        true
    }

    pub fn insert_input(&mut self, text: &str) -> bool {
        match parse_number(text) {
            Some(value) => self.insert(value),
            None => false,
        }
    }

    /// Insert every number of a comma separated list in input order.
    /// Returns how many values were inserted.
    pub fn insert_many(&mut self, text: &str) -> usize {
        if self.busy("insert_many") {
            return 0;
        }
        let values = parse_list(text);
        if values.is_empty() {
            return 0;
        }

        let mut steps = Trace::new();
        for &value in &values {
            self.push_and_sift(value, &mut steps);
        }
        debug!(count = values.len(), steps = steps.len(), "heap insert many");
        self.replay.load(steps, false);
        values.len()
    }

    /// Flip between max and min order and heapify the existing array
    pub fn toggle_type(&mut self) -> bool {
        if self.busy("toggle_type") {
            return false;
        }
        self.kind = self.kind.toggled();

        let mut steps = Trace::new();
        steps.push(
            self.state(),
            Vec::new(),
            format!("Switch to {}, heapify from the last internal node", self.kind),
        );
        for index in (0..self.items.len() / 2).rev() {
            self.sift_down(index, &mut steps);
        }
        steps.push(self.state(), Vec::new(), format!("Array is a valid {}", self.kind));

        debug!(kind = %self.kind, steps = steps.len(), "heap toggle");
        self.replay.load(steps, false);
        true
    }

    /// Remove and return the root, moving the last element to the top and
    /// sifting it down
    pub fn extract(&mut self) -> Option<i64> {
        if self.busy("extract") || self.items.is_empty() {
            return None;
        }

        let mut steps = Trace::new();
        let root = self.items.swap_remove(0);
        steps.push(
            self.state(),
            if self.items.is_empty() { Vec::new() } else { vec![0] },
            format!("Remove root {}, move last element to the top", root),
        );
        if !self.items.is_empty() {
            self.sift_down(0, &mut steps);
        }

        debug!(root, steps = steps.len(), "heap extract");
        self.replay.load(steps, false);
        Some(root)
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.replay.clear();
    }

    fn push_and_sift(&mut self, value: i64, steps: &mut Trace<HeapState, usize>) {
        self.items.push(value);
        let index = self.items.len() - 1;
        steps.push(
            self.state(),
            vec![index],
            format!("Append {} at index {}", value, index),
        );
        self.sift_up(index, steps);
    }

    fn sift_up(&mut self, mut index: usize, steps: &mut Trace<HeapState, usize>) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if !self.kind.should_swap(self.items[parent], self.items[index]) {
                break;
            }
            self.items.swap(parent, index);
            trace!(from = index, to = parent, "heap sift up");
            steps.push(
                self.state(),
                vec![parent, index],
                format!(
                    "Swap {} at index {} with parent {} at index {}",
                    self.items[parent], index, self.items[index], parent
                ),
            );
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize, steps: &mut Trace<HeapState, usize>) {
        let len = self.items.len();
        loop {
            let mut top = index;
            for child in [2 * index + 1, 2 * index + 2] {
                if child < len && self.kind.should_swap(self.items[top], self.items[child]) {
                    top = child;
                }
            }
            if top == index {
                break;
            }
            self.items.swap(index, top);
            trace!(from = index, to = top, "heap sift down");
            steps.push(
                self.state(),
                vec![index, top],
                format!(
                    "Swap {} at index {} with child {} at index {}",
                    self.items[top], index, self.items[index], top
                ),
            );
            index = top;
        }
    }
}

impl Default for HeapEngine {
    fn default() -> Self {
        Self::new(HeapKind::Max)
    }
}

impl Traced for HeapEngine {
    type State = HeapState;
    type Key = usize;

    fn replay(&self) -> &Replay<HeapState, usize> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<HeapState, usize> {
        &mut self.replay
    }
}
