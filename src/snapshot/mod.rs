// Step traces and replay for the algorithm engines

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Identifier of a node created by an engine.
///
/// Ids are handed out by an [`IdGen`] owned by the engine instance, so two
/// engines never share a counter and tests never observe leaked state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Per-instance id generator
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: u32,
}

impl IdGen {
    pub fn new() -> Self {
        IdGen { next: 0 }
    }

    pub fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    pub fn reset(&mut self) {
        self.next = 0;
    }
}

/// One recorded state of an operation, with the ids to highlight and a
/// human readable description of what just happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step<S, K = NodeId> {
    pub state: S,
    pub highlighted: Vec<K>,
    pub message: String,
}

/// Append-only sequence of steps produced by one operation
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Trace<S, K = NodeId> {
    steps: Vec<Step<S, K>>,
}

impl<S, K> Trace<S, K> {
    pub fn new() -> Self {
        Trace { steps: Vec::new() }
    }

    /// Record a step
    pub fn push(&mut self, state: S, highlighted: Vec<K>, message: impl Into<String>) {
        self.steps.push(Step {
            state,
            highlighted,
            message: message.into(),
        });
    }

    pub fn steps(&self) -> &[Step<S, K>] {
        &self.steps
    }

    pub fn last(&self) -> Option<&Step<S, K>> {
        self.steps.last()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn into_steps(self) -> Vec<Step<S, K>> {
        self.steps
    }
}

impl<S, K> Default for Trace<S, K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Cursor over the trace of the most recent operation.
///
/// Navigation (`next_step`, `previous_step`, `rewind`, `finish`) only moves
/// the index; recorded history is never modified. While auto-play is active
/// the replay counts as an operation in flight, and engines refuse new
/// mutating commands until it reaches the last step or is finished.
#[derive(Debug, Clone)]
pub struct Replay<S, K = NodeId> {
    steps: Vec<Step<S, K>>,
    position: usize,
    playing: bool,
    interval: Duration,
    elapsed: Duration,
}

impl<S, K> Replay<S, K> {
    pub fn new(interval: Duration) -> Self {
        Replay {
            steps: Vec::new(),
            position: 0,
            playing: false,
            interval,
            elapsed: Duration::ZERO,
        }
    }

    /// Replace the history with a freshly recorded trace and move to its
    /// first step. With `animate` set the trace starts auto-playing.
    pub fn load(&mut self, trace: Trace<S, K>, animate: bool) {
        self.steps = trace.into_steps();
        self.position = 0;
        self.elapsed = Duration::ZERO;
        self.playing = animate && self.steps.len() > 1;
    }

    pub fn clear(&mut self) {
        self.steps.clear();
        self.position = 0;
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn steps(&self) -> &[Step<S, K>] {
        &self.steps
    }

    /// The step under the cursor
    pub fn current(&self) -> Option<&Step<S, K>> {
        self.steps.get(self.position)
    }

    pub fn last(&self) -> Option<&Step<S, K>> {
        self.steps.last()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_at_start(&self) -> bool {
        self.position == 0
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.steps.len()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Move one step forward. Returns false at the last step.
    pub fn next_step(&mut self) -> bool {
        if self.is_at_end() {
            return false;
        }
        self.position += 1;
        true
    }

    /// Move one step back. Returns false at the first step.
    pub fn previous_step(&mut self) -> bool {
        if self.position == 0 {
            return false;
        }
        self.position -= 1;
        true
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Jump to the last step and end any running animation
    pub fn finish(&mut self) {
        self.position = self.steps.len().saturating_sub(1);
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// True while an animated operation has not reached its last step
    pub fn in_flight(&self) -> bool {
        self.playing
    }

    /// Start auto-play; a replay sitting on its last step restarts from the
    /// beginning.
    pub fn start_auto_play(&mut self) {
        if self.steps.len() < 2 {
            return;
        }
        if self.is_at_end() {
            self.position = 0;
        }
        self.playing = true;
        self.elapsed = Duration::ZERO;
    }

    pub fn stop_auto_play(&mut self) {
        self.playing = false;
        self.elapsed = Duration::ZERO;
    }

    pub fn toggle_auto_play(&mut self) {
        if self.playing {
            self.stop_auto_play();
        } else {
            self.start_auto_play();
        }
    }

    /// Advance auto-play by `elapsed` wall time. Each full interval moves the
    /// cursor one step; reaching the last step stops playback. Returns the
    /// number of steps taken.
    pub fn tick(&mut self, elapsed: Duration) -> usize {
        if !self.playing {
            return 0;
        }
        self.elapsed += elapsed;
        let mut advanced = 0;
        while self.playing && self.elapsed >= self.interval {
            self.elapsed -= self.interval;
            if self.next_step() {
                advanced += 1;
            }
            if self.is_at_end() {
                self.stop_auto_play();
            }
        }
        advanced
    }
}

/// Engines expose their replay through this trait so a presentation layer
/// can drive any of them the same way.
pub trait Traced {
    type State: Clone;
    type Key: Clone;

    fn replay(&self) -> &Replay<Self::State, Self::Key>;
    fn replay_mut(&mut self) -> &mut Replay<Self::State, Self::Key>;

    /// Complete any animation in flight
    fn settle(&mut self) {
        self.replay_mut().finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trace_of(n: usize) -> Trace<usize, usize> {
        let mut trace = Trace::new();
        for i in 0..n {
            trace.push(i, vec![i], format!("step {}", i));
        }
        trace
    }

    #[test]
    fn test_id_gen_is_per_instance() {
        let mut a = IdGen::new();
        let mut b = IdGen::new();
        assert_eq!(a.next_id(), NodeId(0));
        assert_eq!(a.next_id(), NodeId(1));
        assert_eq!(b.next_id(), NodeId(0));
        a.reset();
        assert_eq!(a.next_id().to_string(), "node-0");
    }

    #[test]
    fn test_navigation_does_not_mutate_history() {
        let mut replay = Replay::new(Duration::from_millis(100));
        replay.load(trace_of(3), false);

        assert!(!replay.previous_step());
        assert!(replay.next_step());
        assert!(replay.next_step());
        assert!(!replay.next_step());
        assert_eq!(replay.current().map(|s| s.state), Some(2));
        assert!(replay.previous_step());
        assert_eq!(replay.current().map(|s| s.message.as_str()), Some("step 1"));
        assert_eq!(replay.len(), 3);
    }

    #[test]
    fn test_auto_play_stops_at_last_step() {
        let mut replay = Replay::new(Duration::from_millis(100));
        replay.load(trace_of(4), true);
        assert!(replay.in_flight());

        assert_eq!(replay.tick(Duration::from_millis(50)), 0);
        assert_eq!(replay.tick(Duration::from_millis(60)), 1);
        assert_eq!(replay.tick(Duration::from_millis(500)), 2);
        assert!(replay.is_at_end());
        assert!(!replay.is_playing());
        assert_eq!(replay.tick(Duration::from_secs(1)), 0);
    }

    #[test]
    fn test_start_auto_play_at_end_rewinds() {
        let mut replay = Replay::new(Duration::from_millis(10));
        replay.load(trace_of(3), false);
        replay.finish();
        replay.start_auto_play();
        assert_eq!(replay.position(), 0);
        assert!(replay.is_playing());
    }

    #[test]
    fn test_single_step_trace_never_plays() {
        let mut replay = Replay::new(Duration::from_millis(10));
        replay.load(trace_of(1), true);
        assert!(!replay.in_flight());
    }
}
