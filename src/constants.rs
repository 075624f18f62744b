// Pacing and capacity constants for the engines

use std::time::Duration;

/// Time each node stays highlighted during a tree traversal
pub const TREE_TRAVERSAL_INTERVAL: Duration = Duration::from_millis(800);

/// Tree inserts are recorded, not animated; this paces manual replay
pub const TREE_INSERT_INTERVAL: Duration = Duration::from_millis(500);

pub const HEAP_INTERVAL: Duration = Duration::from_millis(500);

pub const HUFFMAN_INTERVAL: Duration = Duration::from_millis(1000);

/// Auto-play interval for Dijkstra step replay
pub const DIJKSTRA_INTERVAL: Duration = Duration::from_millis(1000);

/// Shunting-yard and postfix evaluation advance one token per interval
pub const EXPRESSION_INTERVAL: Duration = Duration::from_millis(1000);

/// Insert and delete steps on linked lists
pub const LIST_INTERVAL: Duration = Duration::from_millis(500);

/// Pointer movements during in-place list reversal
pub const LIST_REVERSE_INTERVAL: Duration = Duration::from_millis(1000);

pub const LINEAR_INTERVAL: Duration = Duration::from_millis(500);

pub const POLYNOMIAL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default capacity of the bounded stack and queue
pub const LINEAR_CAPACITY: usize = 8;

/// Time a consumer spends taking a message off the queue
pub const MESSAGE_PROCESS_INTERVAL: Duration = Duration::from_millis(2000);

pub const MESSAGE_PRODUCERS: usize = 2;
pub const MESSAGE_CONSUMERS: usize = 2;

/// How often the viewer polls for key events
pub const VIEWER_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Key repeat guard for the play/pause toggle
pub const VIEWER_TOGGLE_DEBOUNCE: Duration = Duration::from_millis(200);
