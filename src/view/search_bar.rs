//! Search bar rendering

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{UiState, SEARCH_HINT};
use super::utils::border_style;

const CLEAR_GLYPH: &str = "✕";
const SUBMIT_GLYPH: &str = "⏎";

pub fn render_search_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let search = &ui_state.search;
    let focused = search.is_focused();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Search ")
        .padding(Padding::horizontal(1))
        .border_style(border_style(focused));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),    // Query
            Constraint::Length(7), // Clear + submit glyphs
        ])
        .split(inner);

    let query = if search.query().is_empty() {
        Span::styled(SEARCH_HINT, Style::default().fg(Color::DarkGray))
    } else if focused {
        Span::styled(format!("{}▏", search.query()), Style::default().fg(Color::Green))
    } else {
        Span::styled(search.query().to_string(), Style::default().fg(Color::White))
    };
    frame.render_widget(Paragraph::new(Line::from(query)), chunks[0]);

    let submit_style = if ui_state.search_in_progress {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::SLOW_BLINK)
    } else {
        Style::default().fg(Color::Cyan)
    };
    let mut glyphs = Vec::new();
    if !search.query().is_empty() {
        glyphs.push(Span::styled(CLEAR_GLYPH, Style::default().fg(Color::Red)));
        glyphs.push(Span::raw("  "));
    }
    glyphs.push(Span::styled(SUBMIT_GLYPH, submit_style));

    let buttons = Paragraph::new(Line::from(glyphs)).alignment(Alignment::Right);
    frame.render_widget(buttons, chunks[1]);
}
