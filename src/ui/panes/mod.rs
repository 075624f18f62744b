//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`frame`]: the current step's state, with highlighted rows marked
//! - [`history`]: every step message of the recording, current one in view
//! - [`status`]: status bar with keybindings and playback state
//!
//! Each pane module exports one `render_*` function taking the frame, its
//! area and plain data; panes never hold a reference to an engine.

pub mod frame;
pub mod history;
pub mod status;

pub use frame::render_frame_pane;
pub use history::render_history_pane;
pub use status::render_status_bar;
