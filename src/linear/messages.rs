// Producer/consumer message queue built on a FIFO

use crate::constants::{
    LINEAR_INTERVAL, MESSAGE_CONSUMERS, MESSAGE_PROCESS_INTERVAL, MESSAGE_PRODUCERS,
};
use crate::snapshot::{IdGen, NodeId, Replay, Trace, Traced};
use serde::Serialize;
use std::collections::VecDeque;
use std::fmt;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Pending,
    Processing,
    Completed,
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Processing => "processing",
            MessageStatus::Completed => "completed",
        };
        write!(f, "{}", name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Message {
    pub id: NodeId,
    pub content: String,
    pub status: MessageStatus,
    /// Index of the producer that sent it
    pub producer: usize,
}

impl Message {
    /// `msg-0`, `msg-1`, ...
    pub fn label(&self) -> String {
        format!("msg-{}", self.id.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Producer {
    pub name: String,
    pub message_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Consumer {
    pub name: String,
    pub processed_count: usize,
    /// The message this consumer is working on
    pub current: Option<Message>,
}

impl Consumer {
    pub fn is_processing(&self) -> bool {
        self.current.is_some()
    }
}

/// Highlights are message ids
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageQueueState {
    pub queue: Vec<Message>,
    pub processed: Vec<Message>,
    pub producers: Vec<Producer>,
    pub consumers: Vec<Consumer>,
}

/// Producers append messages to a shared queue; each consumer takes the
/// front message, holds it while processing, then completes it.
///
/// A message moves pending -> processing -> completed. A consumer that is
/// still processing cannot take another message.
#[derive(Debug, Clone)]
pub struct MessageQueue {
    queue: VecDeque<Message>,
    processed: Vec<Message>,
    producers: Vec<Producer>,
    consumers: Vec<Consumer>,
    ids: IdGen,
    replay: Replay<MessageQueueState, NodeId>,
}

impl MessageQueue {
    pub fn new() -> Self {
        Self::with_workers(MESSAGE_PRODUCERS, MESSAGE_CONSUMERS)
    }

    pub fn with_workers(producers: usize, consumers: usize) -> Self {
        MessageQueue {
            queue: VecDeque::new(),
            processed: Vec::new(),
            producers: (1..=producers)
                .map(|n| Producer {
                    name: format!("Producer {}", n),
                    message_count: 0,
                })
                .collect(),
            consumers: (1..=consumers)
                .map(|n| Consumer {
                    name: format!("Consumer {}", n),
                    processed_count: 0,
                    current: None,
                })
                .collect(),
            ids: IdGen::new(),
            replay: Replay::new(LINEAR_INTERVAL),
        }
    }

    pub fn queue(&self) -> impl Iterator<Item = &Message> + '_ {
        self.queue.iter()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn processed(&self) -> &[Message] {
        &self.processed
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    pub fn consumers(&self) -> &[Consumer] {
        &self.consumers
    }

    fn state(&self) -> MessageQueueState {
        MessageQueueState {
            queue: self.queue.iter().cloned().collect(),
            processed: self.processed.clone(),
            producers: self.producers.clone(),
            consumers: self.consumers.clone(),
        }
    }

    /// Send `content` from producer `producer`. Blank content, an unknown
    /// producer or an operation in flight is ignored.
    pub fn produce(&mut self, producer: usize, content: &str) -> bool {
        if self.replay.in_flight() {
            debug!(producer, "produce ignored: operation in flight");
            return false;
        }
        let content = content.trim();
        if content.is_empty() {
            debug!(producer, "produce ignored: empty message");
            return false;
        }
        let Some(sender) = self.producers.get_mut(producer) else {
            debug!(producer, "produce ignored: unknown producer");
            return false;
        };
        sender.message_count += 1;
        let name = sender.name.clone();

        let message = Message {
            id: self.ids.next_id(),
            content: content.to_string(),
            status: MessageStatus::Pending,
            producer,
        };
        let id = message.id;
        let label = message.label();
        self.queue.push_back(message);

        let mut steps = Trace::new();
        steps.push(
            self.state(),
            vec![id],
            format!("{} sent \"{}\" as {}", name, content, label),
        );
        debug!(producer, pending = self.queue.len(), "message produced");
        self.replay = Replay::new(LINEAR_INTERVAL);
        self.replay.load(steps, false);
        true
    }

    /// Hand the front message to consumer `consumer` and start processing
    /// it. Ignored when the queue is empty or the consumer is busy.
    pub fn process_next(&mut self, consumer: usize) -> bool {
        if self.replay.in_flight() {
            debug!(consumer, "process ignored: operation in flight");
            return false;
        }
        match self.consumers.get(consumer) {
            Some(worker) if !worker.is_processing() => {}
            Some(_) => {
                debug!(consumer, "process ignored: consumer busy");
                return false;
            }
            None => {
                debug!(consumer, "process ignored: unknown consumer");
                return false;
            }
        }
        let Some(front) = self.queue.front() else {
            return false;
        };
        let id = front.id;
        let label = front.label();

        let mut steps = Trace::new();
        steps.push(
            self.state(),
            vec![id],
            format!("{} takes {} from the front", self.consumers[consumer].name, label),
        );

        let Some(mut message) = self.queue.pop_front() else {
            return false;
        };
        message.status = MessageStatus::Processing;
        let worker = &mut self.consumers[consumer];
        worker.current = Some(message);
        let name = worker.name.clone();
        steps.push(
            self.state(),
            vec![id],
            format!("{} is processing {}", name, label),
        );

        debug!(consumer, pending = self.queue.len(), "message processing");
        self.replay = Replay::new(MESSAGE_PROCESS_INTERVAL);
        self.replay.load(steps, true);
        true
    }

    /// Finish the message consumer `consumer` is holding
    pub fn complete(&mut self, consumer: usize) -> bool {
        if self.replay.in_flight() {
            debug!(consumer, "complete ignored: operation in flight");
            return false;
        }
        let Some(worker) = self.consumers.get_mut(consumer) else {
            return false;
        };
        let Some(mut message) = worker.current.take() else {
            debug!(consumer, "complete ignored: consumer idle");
            return false;
        };
        message.status = MessageStatus::Completed;
        worker.processed_count += 1;
        let name = worker.name.clone();
        let id = message.id;
        let label = message.label();
        self.processed.push(message);

        let mut steps = Trace::new();
        steps.push(self.state(), vec![id], format!("{} completed {}", name, label));
        debug!(consumer, processed = self.processed.len(), "message completed");
        self.replay = Replay::new(LINEAR_INTERVAL);
        self.replay.load(steps, false);
        true
    }

    /// Empty the queue, zero every counter and restart message ids
    pub fn clear(&mut self) {
        self.queue.clear();
        self.processed.clear();
        for producer in &mut self.producers {
            producer.message_count = 0;
        }
        for consumer in &mut self.consumers {
            consumer.processed_count = 0;
            consumer.current = None;
        }
        self.ids.reset();
        self.replay.clear();
    }
}

impl Default for MessageQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for MessageQueue {
    type State = MessageQueueState;
    type Key = NodeId;

    fn replay(&self) -> &Replay<MessageQueueState, NodeId> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<MessageQueueState, NodeId> {
        &mut self.replay
    }
}
