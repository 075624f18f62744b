//! Terminal replay viewer
//!
//! An engine scenario is captured once into a [`Recording`] of text frames;
//! [`App`] then steps through it, auto-plays it and renders it with ratatui.

pub mod app;
pub mod describe;
pub mod panes;
pub mod recording;
pub mod theme;

pub use app::App;
pub use recording::{Describe, Recording, Sketch};
