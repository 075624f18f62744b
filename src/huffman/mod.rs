//! Huffman coding engine
//!
//! An encode runs three phases, each leaving steps in the trace:
//!
//! 1. `BuildQueue`: count characters and sort the leaves by frequency.
//! 2. `MergeNodes`: repeatedly pop the two cheapest nodes and push their
//!    parent back. Two steps per merge (selection, then the new node).
//! 3. `AssignCodes`: pre-order walk from the root, `0` to the left and `1` to
//!    the right.
//!
//! # Tie-break
//!
//! The initial queue is a stable sort by frequency over first-occurrence
//! order. A merged node is inserted in front of the first queue entry whose
//! frequency is greater than or equal to its own. Equal-frequency runs
//! therefore build the same tree on every run.

use crate::constants::HUFFMAN_INTERVAL;
use crate::snapshot::{IdGen, NodeId, Replay, Trace, Traced};
use rustc_hash::FxHashMap;
use serde::Serialize;
use tracing::{debug, trace};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StepKind {
    BuildQueue,
    MergeNodes,
    AssignCodes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HuffmanNode {
    pub id: NodeId,
    /// Set on leaves only
    pub symbol: Option<char>,
    /// The character for a leaf, the frequency sum for a merged node
    pub label: String,
    pub frequency: usize,
    pub code: Option<String>,
    pub left: Option<Box<HuffmanNode>>,
    pub right: Option<Box<HuffmanNode>>,
}

impl HuffmanNode {
    fn leaf(id: NodeId, symbol: char, frequency: usize) -> Self {
        HuffmanNode {
            id,
            symbol: Some(symbol),
            label: symbol.to_string(),
            frequency,
            code: None,
            left: None,
            right: None,
        }
    }

    fn merged(id: NodeId, left: HuffmanNode, right: HuffmanNode) -> Self {
        let frequency = left.frequency + right.frequency;
        HuffmanNode {
            id,
            symbol: None,
            label: frequency.to_string(),
            frequency,
            code: None,
            left: Some(Box::new(left)),
            right: Some(Box::new(right)),
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HuffmanState {
    pub kind: StepKind,
    /// Priority queue, cheapest first; each entry carries its subtree
    pub queue: Vec<HuffmanNode>,
    /// The finished tree, once merging is done
    pub tree: Option<HuffmanNode>,
    /// Codes assigned so far, in assignment order
    pub codes: Vec<(char, String)>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompressionStats {
    pub original_bits: usize,
    pub compressed_bits: usize,
    /// compressed / original
    pub ratio: f64,
    /// Percentage of bits saved against 8 bits per character
    pub space_saving: f64,
    pub average_code_length: f64,
}

/// Character counts in first-occurrence order
pub fn frequencies(text: &str) -> Vec<(char, usize)> {
    let mut counts: FxHashMap<char, usize> = FxHashMap::default();
    let mut order = Vec::new();
    for c in text.chars() {
        let count = counts.entry(c).or_insert(0);
        if *count == 0 {
            order.push(c);
        }
        *count += 1;
    }
    order
        .into_iter()
        .map(|c| (c, counts.get(&c).copied().unwrap_or_default()))
        .collect()
}

#[derive(Debug, Clone)]
pub struct HuffmanEngine {
    ids: IdGen,
    text: String,
    frequencies: Vec<(char, usize)>,
    tree: Option<HuffmanNode>,
    codes: Vec<(char, String)>,
    replay: Replay<HuffmanState>,
}

impl HuffmanEngine {
    pub fn new() -> Self {
        HuffmanEngine {
            ids: IdGen::new(),
            text: String::new(),
            frequencies: Vec::new(),
            tree: None,
            codes: Vec::new(),
            replay: Replay::new(HUFFMAN_INTERVAL),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn frequencies(&self) -> &[(char, usize)] {
        &self.frequencies
    }

    pub fn tree(&self) -> Option<&HuffmanNode> {
        self.tree.as_ref()
    }

    /// Final code table in assignment (pre-order) order
    pub fn codes(&self) -> &[(char, String)] {
        &self.codes
    }

    pub fn code_for(&self, symbol: char) -> Option<&str> {
        self.codes
            .iter()
            .find(|(c, _)| *c == symbol)
            .map(|(_, code)| code.as_str())
    }

    /// Build the tree and code table for `text`. Empty or whitespace-only
    /// text is ignored.
    pub fn encode(&mut self, text: &str) -> bool {
        if text.trim().is_empty() {
            debug!("huffman encode ignored: blank input");
            return false;
        }
        if self.replay.in_flight() {
            debug!("huffman encode ignored: operation in flight");
            return false;
        }

        self.ids.reset();
        self.text = text.to_string();
        self.frequencies = frequencies(text);

        let mut steps = Trace::new();
        let mut queue: Vec<HuffmanNode> = self
            .frequencies
            .iter()
            .map(|&(c, f)| HuffmanNode::leaf(self.ids.next_id(), c, f))
            .collect();
        // Vec::sort_by_key is stable
        queue.sort_by_key(|n| n.frequency);

        steps.push(
            queue_state(StepKind::BuildQueue, &queue),
            queue.iter().map(|n| n.id).collect(),
            "Initial nodes with frequencies",
        );

        let root = self.merge(queue, &mut steps);
        let Some(mut root) = root else {
            return false;
        };

        let mut codes = Vec::new();
        assign_codes(&root, &root, String::new(), &mut codes, &mut steps);
        stamp_codes(&mut root, String::new());

        debug!(
            symbols = codes.len(),
            steps = steps.len(),
            "huffman encode"
        );
        self.tree = Some(root);
        self.codes = codes;
        self.replay.load(steps, false);
        true
    }

    fn merge(
        &mut self,
        mut queue: Vec<HuffmanNode>,
        steps: &mut Trace<HuffmanState>,
    ) -> Option<HuffmanNode> {
        while queue.len() > 1 {
            let left = queue.remove(0);
            let right = queue.remove(0);

            steps.push(
                queue_state(StepKind::MergeNodes, &queue),
                vec![left.id, right.id],
                format!(
                    "Selecting nodes with frequencies {} and {}",
                    left.frequency, right.frequency
                ),
            );

            let parent = HuffmanNode::merged(self.ids.next_id(), left, right);
            let (id, frequency) = (parent.id, parent.frequency);
            trace!(%id, frequency, "huffman merge");

            let at = queue
                .iter()
                .position(|n| n.frequency >= frequency)
                .unwrap_or(queue.len());
            queue.insert(at, parent);

            steps.push(
                queue_state(StepKind::MergeNodes, &queue),
                vec![id],
                format!("Created new node with frequency {}", frequency),
            );
        }
        queue.pop()
    }

    /// Concatenated codes for `text`; `None` if it uses a character the
    /// table has no code for
    pub fn encode_text(&self, text: &str) -> Option<String> {
        let mut bits = String::new();
        for c in text.chars() {
            bits.push_str(self.code_for(c)?);
        }
        Some(bits)
    }

    /// Greedy decode against the tree. `None` on a bit other than `0`/`1` or
    /// a trailing partial code.
    pub fn decode(&self, bits: &str) -> Option<String> {
        let root = self.tree.as_ref()?;
        let mut out = String::new();

        if root.is_leaf() {
            for bit in bits.chars() {
                if bit != '0' {
                    return None;
                }
                out.push(root.symbol?);
            }
            return Some(out);
        }

        let mut node = root;
        for bit in bits.chars() {
            let next = match bit {
                '0' => node.left.as_deref(),
                '1' => node.right.as_deref(),
                _ => None,
            }?;
            if next.is_leaf() {
                out.push(next.symbol?);
                node = root;
            } else {
                node = next;
            }
        }
        if node.id != root.id {
            return None;
        }
        Some(out)
    }

    pub fn compression_stats(&self) -> Option<CompressionStats> {
        if self.tree.is_none() {
            return None;
        }
        let characters: usize = self.frequencies.iter().map(|(_, f)| f).sum();
        let compressed_bits: usize = self
            .frequencies
            .iter()
            .map(|&(c, f)| f * self.code_for(c).map_or(0, str::len))
            .sum();
        let original_bits = characters * 8;
        let ratio = compressed_bits as f64 / original_bits as f64;

        Some(CompressionStats {
            original_bits,
            compressed_bits,
            ratio,
            space_saving: (1.0 - ratio) * 100.0,
            average_code_length: compressed_bits as f64 / characters as f64,
        })
    }

    pub fn reset(&mut self) {
        self.ids.reset();
        self.text.clear();
        self.frequencies.clear();
        self.tree = None;
        self.codes.clear();
        self.replay.clear();
    }
}

impl Default for HuffmanEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl Traced for HuffmanEngine {
    type State = HuffmanState;
    type Key = NodeId;

    fn replay(&self) -> &Replay<HuffmanState> {
        &self.replay
    }

    fn replay_mut(&mut self) -> &mut Replay<HuffmanState> {
        &mut self.replay
    }
}

fn queue_state(kind: StepKind, queue: &[HuffmanNode]) -> HuffmanState {
    HuffmanState {
        kind,
        queue: queue.to_vec(),
        tree: None,
        codes: Vec::new(),
    }
}

fn assign_codes(
    root: &HuffmanNode,
    node: &HuffmanNode,
    code: String,
    codes: &mut Vec<(char, String)>,
    steps: &mut Trace<HuffmanState>,
) {
    let snapshot = |codes: &Vec<(char, String)>| HuffmanState {
        kind: StepKind::AssignCodes,
        queue: Vec::new(),
        tree: Some(root.clone()),
        codes: codes.clone(),
    };

    if let Some(symbol) = node.symbol.filter(|_| node.is_leaf()) {
        // A lone leaf at the root has no path; give it a one-bit code
        let code = if code.is_empty() { "0".to_string() } else { code.clone() };
        codes.push((symbol, code.clone()));
        steps.push(
            snapshot(codes),
            vec![node.id],
            format!("Assigning code {} to character '{}'", code, symbol),
        );
    }
    if let Some(left) = node.left.as_deref() {
        steps.push(
            snapshot(codes),
            vec![node.id, left.id],
            format!("Going left (0) from {}", node.frequency),
        );
        assign_codes(root, left, format!("{}0", code), codes, steps);
    }
    if let Some(right) = node.right.as_deref() {
        steps.push(
            snapshot(codes),
            vec![node.id, right.id],
            format!("Going right (1) from {}", node.frequency),
        );
        assign_codes(root, right, format!("{}1", code), codes, steps);
    }
}

fn stamp_codes(node: &mut HuffmanNode, code: String) {
    if node.is_leaf() {
        node.code = Some(if code.is_empty() { "0".to_string() } else { code });
        return;
    }
    if let Some(left) = node.left.as_deref_mut() {
        stamp_codes(left, format!("{}0", code));
    }
    if let Some(right) = node.right.as_deref_mut() {
        stamp_codes(right, format!("{}1", code));
    }
}
