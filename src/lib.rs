//! # Introduction
//!
//! dsviz implements classic data structures and algorithms as step-tracing
//! engines. Every operation records a sequence of immutable snapshots, each
//! with the ids to highlight and a message describing what just happened.
//! The recorded history is then replayed forward and backward, manually or
//! on a timer, through a terminal viewer built with
//! [ratatui](https://docs.rs/ratatui).
//!
//! ## Pipeline
//!
//! ```text
//! Command → Engine → Trace → Replay → Recording → TUI
//! ```
//!
//! 1. Engines mutate their own structure and push a
//!    [`snapshot::Step`] after every visible change:
//!    [`tree`] (BST and AVL), [`heap`], [`huffman`], [`dijkstra`],
//!    [`expression`] (shunting-yard and postfix evaluation),
//!    [`linked_list`] (four variants), [`linear`] (bounded stack and queue)
//!    and [`polynomial`] multiplication.
//! 2. [`snapshot`] owns the trace model and the [`snapshot::Replay`] cursor
//!    shared by every engine, including the "operation in flight" guard that
//!    turns commands issued during an animation into no-ops.
//! 3. [`ui`] captures a replay as text frames and drives it interactively;
//!    not part of the stable library API.
//!
//! Input that cannot be parsed as a number is ignored by every engine. Only
//! expression conversion and evaluation fail loudly, with an
//! [`errors::EngineError`].

pub mod constants;
pub mod dijkstra;
pub mod errors;
pub mod expression;
pub mod heap;
pub mod huffman;
pub mod input;
pub mod linear;
pub mod linked_list;
pub mod polynomial;
pub mod snapshot;
pub mod tree;
pub mod ui;
