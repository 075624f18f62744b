//! Frame pane: the current step's state drawn as text
//!
//! Highlighted rows get an arrow indicator and the highlight colour, the same
//! way the current line is marked in a source listing.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the frame pane
pub fn render_frame_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[String],
    marked: &[usize],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    if rows.is_empty() {
        let paragraph = Paragraph::new("(nothing recorded)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if rows.len() > visible_height {
        *scroll_offset = (*scroll_offset).min(rows.len() - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let lines: Vec<Line> = rows
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(i, row)| {
            if marked.contains(&i) {
                Line::from(vec![
                    Span::styled(
                        "► ",
                        Style::default()
                            .fg(DEFAULT_THEME.highlight)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        row.as_str(),
                        Style::default()
                            .fg(DEFAULT_THEME.highlight)
                            .bg(DEFAULT_THEME.current_line_bg)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw("  "),
                    Span::styled(row.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
                ])
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
