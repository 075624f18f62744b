//! Step history pane: every recorded message, current step highlighted

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the step history pane, keeping the current step in view
pub fn render_history_pane<'a>(
    frame: &mut Frame,
    area: Rect,
    messages: impl Iterator<Item = &'a str>,
    current: usize,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Steps ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let all_items: Vec<ListItem> = messages
        .enumerate()
        .map(|(i, message)| {
            let text = format!("{:>3}  {}", i + 1, message);
            let style = if i == current {
                Style::default()
                    .fg(DEFAULT_THEME.message)
                    .bg(DEFAULT_THEME.current_line_bg)
                    .add_modifier(Modifier::BOLD)
            } else if i < current {
                Style::default().fg(DEFAULT_THEME.fg)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };
            ListItem::new(text).style(style)
        })
        .collect();

    if all_items.is_empty() {
        let paragraph = Paragraph::new("(no steps)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    let max_scroll = all_items.len().saturating_sub(visible_height);
    let scroll = (current + 1).saturating_sub(visible_height).min(max_scroll);

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
