//! Bounded stack and queue engines
//!
//! Both hold at most [`LINEAR_CAPACITY`] items by default. Adding to a full
//! structure, removing from an empty one, or starting an operation while the
//! previous one is still animating is a silent no-op.
//!
//! [`messages`] builds a producer/consumer message queue on the same FIFO
//! discipline.

pub mod messages;

pub use messages::{Consumer, Message, MessageQueue, MessageQueueState, MessageStatus, Producer};

use crate::constants::{LINEAR_CAPACITY, LINEAR_INTERVAL};
use crate::input::parse_number;
use crate::snapshot::{IdGen, NodeId, Replay, Trace, Traced};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: NodeId,
    pub value: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Push,
    Pop,
    Enqueue,
    Dequeue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
    pub kind: OperationKind,
    pub value: i64,
}

/// Snapshot of the slots; highlights are slot indices
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinearState {
    pub items: Vec<Item>,
    pub capacity: usize,
}

/// Storage and trace shared by both engines
#[derive(Debug, Clone)]
struct Slots {
    items: Vec<Item>,
    capacity: usize,
    ids: IdGen,
    operations: Vec<Operation>,
    replay: Replay<LinearState, usize>,
}

impl Slots {
    fn new(capacity: usize) -> Self {
        Slots {
            items: Vec::new(),
            capacity,
            ids: IdGen::new(),
            operations: Vec::new(),
            replay: Replay::new(LINEAR_INTERVAL),
        }
    }

    fn state(&self) -> LinearState {
        LinearState {
            items: self.items.clone(),
            capacity: self.capacity,
        }
    }

    fn is_full(&self) -> bool {
        self.items.len() >= self.capacity
    }

    fn refuses(&self, operation: OperationKind) -> bool {
        if self.replay.in_flight() {
            debug!(?operation, "linear operation ignored: operation in flight");
            return true;
        }
        false
    }

    /// Append at the end (top of a stack, rear of a queue)
    fn add(&mut self, kind: OperationKind, value: i64, place: &str) -> bool {
        if self.refuses(kind) {
            return false;
        }
        if self.is_full() {
            debug!(?kind, value, capacity = self.capacity, "linear add ignored: full");
            return false;
        }

        let index = self.items.len();
        let mut steps = Trace::new();
        steps.push(
            self.state(),
            vec![index],
            format!("Prepare slot {} at the {}", index, place),
        );
        let id = self.ids.next_id();
        self.items.push(Item { id, value });
        steps.push(
            self.state(),
            vec![index],
            format!("{:?} {} at the {}", kind, value, place),
        );

        self.operations.push(Operation { kind, value });
        debug!(?kind, value, len = self.items.len(), "linear add");
        self.replay.load(steps, true);
        true
    }

    /// Remove the item at `index` (top of a stack, front of a queue)
    fn take(&mut self, kind: OperationKind, index: usize, place: &str) -> Option<i64> {
        if self.refuses(kind) {
            return None;
        }
        let value = self.items.get(index)?.value;

        let mut steps = Trace::new();
        steps.push(
            self.state(),
            vec![index],
            format!("{:?} {} from the {}", kind, value, place),
        );
        self.items.remove(index);
        steps.push(self.state(), Vec::new(), format!("Removed {}", value));

        self.operations.push(Operation { kind, value });
        debug!(?kind, value, len = self.items.len(), "linear take");
        self.replay.load(steps, true);
        Some(value)
    }

    fn clear(&mut self) {
        self.items.clear();
        self.ids.reset();
        self.operations.clear();
        self.replay.clear();
    }
}

/// Last in, first out
#[derive(Debug, Clone)]
pub struct BoundedStack {
    slots: Slots,
}

impl BoundedStack {
    pub fn new() -> Self {
        Self::with_capacity(LINEAR_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BoundedStack {
            slots: Slots::new(capacity),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.slots.items
    }

    pub fn operations(&self) -> &[Operation] {
        &self.slots.operations
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.items.is_empty()
    }

    pub fn peek(&self) -> Option<i64> {
        self.slots.items.last().map(|i| i.value)
    }

    pub fn push(&mut self, value: i64) -> bool {
        self.slots.add(OperationKind::Push, value, "top")
    }

    pub fn push_input(&mut self, text: &str) -> bool {
        parse_number(text).is_some_and(|v| self.push(v))
    }

    pub fn pop(&mut self) -> Option<i64> {
        let top = self.slots.items.len().checked_sub(1)?;
        self.slots.take(OperationKind::Pop, top, "top")
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl Default for BoundedStack {
    fn default() -> Self {
        Self::new()
    }
}

/// First in, first out
#[derive(Debug, Clone)]
pub struct BoundedQueue {
    slots: Slots,
}

impl BoundedQueue {
    pub fn new() -> Self {
        Self::with_capacity(LINEAR_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        BoundedQueue {
            slots: Slots::new(capacity),
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.slots.items
    }

    pub fn operations(&self) -> &[Operation] {
        &self.slots.operations
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity
    }

    pub fn is_full(&self) -> bool {
        self.slots.is_full()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.items.is_empty()
    }

    pub fn front(&self) -> Option<i64> {
        self.slots.items.first().map(|i| i.value)
    }

    pub fn enqueue(&mut self, value: i64) -> bool {
        self.slots.add(OperationKind::Enqueue, value, "rear")
    }

    pub fn enqueue_input(&mut self, text: &str) -> bool {
        parse_number(text).is_some_and(|v| self.enqueue(v))
    }

    pub fn dequeue(&mut self) -> Option<i64> {
        self.slots.take(OperationKind::Dequeue, 0, "front")
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl Default for BoundedQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for BoundedStack {
    type State = LinearState;
    type Key = usize;

    fn replay(&self) -> &Replay<LinearState, usize> {
        &self.slots.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<LinearState, usize> {
        &mut self.slots.replay
    }
}

impl Traced for BoundedQueue {
    type State = LinearState;
    type Key = usize;

    fn replay(&self) -> &Replay<LinearState, usize> {
        &self.slots.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<LinearState, usize> {
        &mut self.slots.replay
    }
}
