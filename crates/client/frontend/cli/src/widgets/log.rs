//! Message log panel.

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use client_frontend_core::{MessageLevel, MessageLog};

pub fn render(frame: &mut Frame, area: Rect, messages: &MessageLog) {
    let visible = area.height.saturating_sub(2) as usize;
    let mut lines: Vec<Line> = messages
        .recent(visible)
        .map(|entry| {
            let style = match entry.level {
                MessageLevel::Info => Style::default().fg(Color::Gray),
                MessageLevel::Combat => Style::default().fg(Color::White),
                MessageLevel::Error => Style::default().fg(Color::Red),
            };
            Line::from(Span::styled(entry.text.clone(), style))
        })
        .collect();
    lines.reverse(); // oldest first

    let paragraph =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Log"));
    frame.render_widget(paragraph, area);
}
