//! Text frames captured from an engine's replay
//!
//! The viewer never talks to an engine directly. [`Recording::capture`] walks
//! the engine's recorded steps once, asks each state to [`Describe`] itself as
//! plain text rows, and stores the result in a [`Replay`] of its own so the
//! viewer gets stepping and auto-play from the same cursor the engines use.

use crate::snapshot::{Replay, Trace, Traced};

/// Text rows for one step, plus the indices of rows that show a highlighted
/// element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sketch {
    rows: Vec<String>,
    marked: Vec<usize>,
}

impl Sketch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row(&mut self, text: impl Into<String>) {
        self.rows.push(text.into());
    }

    /// Add a row that is highlighted when `marked` is set
    pub fn row_marked(&mut self, text: impl Into<String>, marked: bool) {
        if marked {
            self.marked.push(self.rows.len());
        }
        self.rows.push(text.into());
    }

    pub fn blank(&mut self) {
        self.rows.push(String::new());
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    pub fn marked(&self) -> &[usize] {
        &self.marked
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// States that can draw themselves as text, given the keys the step
/// highlights.
pub trait Describe<K> {
    fn describe(&self, highlighted: &[K], out: &mut Sketch);
}

/// A titled sequence of text frames with its own replay cursor
#[derive(Debug, Clone)]
pub struct Recording {
    title: String,
    frames: Replay<Vec<String>, usize>,
}

impl Recording {
    /// Capture every step of `engine`'s current replay. The recording starts
    /// paused on its first frame and plays at the engine's own interval.
    pub fn capture<E>(title: impl Into<String>, engine: &E) -> Self
    where
        E: Traced,
        E::State: Describe<E::Key>,
    {
        let replay = engine.replay();
        let mut trace = Trace::new();
        for step in replay.steps() {
            let mut sketch = Sketch::new();
            step.state.describe(&step.highlighted, &mut sketch);
            if sketch.is_empty() {
                sketch.row("(empty)");
            }
            let Sketch { rows, marked } = sketch;
            trace.push(rows, marked, step.message.clone());
        }

        let mut frames = Replay::new(replay.interval());
        frames.load(trace, false);
        Recording {
            title: title.into(),
            frames,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn frames(&self) -> &Replay<Vec<String>, usize> {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut Replay<Vec<String>, usize> {
        &mut self.frames
    }

    /// Step messages in order, for the history pane
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.frames.steps().iter().map(|s| s.message.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::BoundedStack;

    #[test]
    fn test_sketch_tracks_marked_rows() {
        let mut sketch = Sketch::new();
        sketch.row("a");
        sketch.row_marked("b", true);
        sketch.row_marked("c", false);
        assert_eq!(sketch.rows(), ["a", "b", "c"]);
        assert_eq!(sketch.marked(), [1]);
    }

    #[test]
    fn test_capture_copies_messages_and_starts_paused() {
        let mut stack = BoundedStack::new();
        stack.push(7);

        let recording = Recording::capture("stack", &stack);
        let frames = recording.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames.position(), 0);
        assert!(!frames.is_playing());
        assert_eq!(frames.interval(), stack.replay().interval());
        assert_eq!(
            recording.messages().collect::<Vec<_>>(),
            vec!["Prepare slot 0 at the top", "Push 7 at the top"]
        );
    }

    #[test]
    fn test_capture_of_idle_engine_is_empty() {
        let stack = BoundedStack::new();
        let recording = Recording::capture("stack", &stack);
        assert!(recording.frames().is_empty());
        assert_eq!(recording.title(), "stack");
    }
}
