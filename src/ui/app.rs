//! Replay viewer state and event loop

use super::recording::Recording;
use crate::constants::{VIEWER_POLL_INTERVAL, VIEWER_TOGGLE_DEBOUNCE};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// The main application state
pub struct App {
    /// Frames being replayed
    pub recording: Recording,

    /// Scroll offset of the frame pane
    pub frame_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Last time auto-play was advanced
    pub last_tick: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    pub fn new(recording: Recording) -> Self {
        App {
            recording,
            frame_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            last_tick: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            let now = Instant::now();
            self.advance(now.duration_since(self.last_tick));
            self.last_tick = now;

            // Poll with a timeout so auto-play keeps moving without input
            if event::poll(VIEWER_POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Feed wall time to auto-play
    fn advance(&mut self, elapsed: Duration) {
        let frames = self.recording.frames_mut();
        if !frames.is_playing() {
            return;
        }
        frames.tick(elapsed);
        if !frames.is_playing() {
            self.status_message = "Playback complete".to_string();
        }
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        let frames = self.recording.frames();
        let (rows, marked, message) = match frames.current() {
            Some(step) => (
                step.state.as_slice(),
                step.highlighted.as_slice(),
                step.message.as_str(),
            ),
            None => (&[][..], &[][..], ""),
        };

        super::panes::render_frame_pane(
            frame,
            columns[0],
            self.recording.title(),
            rows,
            marked,
            true,
            &mut self.frame_scroll,
        );

        super::panes::render_history_pane(
            frame,
            columns[1],
            self.recording.messages(),
            frames.position(),
            false,
        );

        let status = if message.is_empty() {
            self.status_message.clone()
        } else {
            format!("{} | {}", self.status_message, message)
        };
        super::panes::render_status_bar(
            frame,
            main_chunks[1],
            &status,
            frames.position(),
            frames.len(),
            frames.is_playing(),
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                let n = c.to_digit(10).unwrap_or(1) as usize;
                let frames = self.recording.frames_mut();
                frames.stop_auto_play();
                let stepped = (0..n).take_while(|_| frames.next_step()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
            }
            KeyCode::Left => {
                let frames = self.recording.frames_mut();
                frames.stop_auto_play();
                self.status_message = if frames.previous_step() {
                    "Stepped backward".to_string()
                } else {
                    "Already at the first step".to_string()
                };
            }
            KeyCode::Right => {
                let frames = self.recording.frames_mut();
                frames.stop_auto_play();
                self.status_message = if frames.next_step() {
                    "Stepped forward".to_string()
                } else {
                    "Already at the last step".to_string()
                };
            }
            KeyCode::Up => {
                self.frame_scroll = self.frame_scroll.saturating_sub(1);
            }
            KeyCode::Down => {
                self.frame_scroll = self.frame_scroll.saturating_add(1);
            }
            KeyCode::Char(' ') => {
                // Debounced to ignore key repeat
                if self.last_space_press.elapsed() >= VIEWER_TOGGLE_DEBOUNCE {
                    self.last_space_press = Instant::now();
                    self.toggle_play();
                }
            }
            KeyCode::Enter => {
                self.recording.frames_mut().finish();
                self.status_message = "Jumped to end".to_string();
            }
            KeyCode::Backspace => {
                let frames = self.recording.frames_mut();
                frames.stop_auto_play();
                frames.rewind();
                self.status_message = "Jumped to start".to_string();
            }
            _ => {}
        }
    }

    fn toggle_play(&mut self) {
        let frames = self.recording.frames_mut();
        frames.toggle_auto_play();
        self.status_message = if frames.is_playing() {
            self.last_tick = Instant::now();
            "Playing...".to_string()
        } else {
            "Paused".to_string()
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linear::BoundedQueue;
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn app() -> App {
        let mut queue = BoundedQueue::new();
        queue.enqueue(3);
        App::new(Recording::capture("queue", &queue))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_arrow_keys_step() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.recording.frames().position(), 1);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.status_message, "Already at the last step");
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.recording.frames().position(), 0);
        press(&mut app, KeyCode::Enter);
        assert!(app.recording.frames().is_at_end());
    }

    #[test]
    fn test_space_plays_to_the_end() {
        let mut app = app();
        press(&mut app, KeyCode::Char(' '));
        assert!(app.recording.frames().is_playing());
        app.advance(Duration::from_secs(60));
        assert!(app.recording.frames().is_at_end());
        assert_eq!(app.status_message, "Playback complete");
    }

    #[test]
    fn test_quit_and_render() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
