//! Layout rendering (top bar, filter chips row)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, FeedPageState, UiState};
use super::search_bar::render_search_bar;
use super::utils::border_style;

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(28), // Server status
        ])
        .split(area);

    render_search_bar(frame, chunks[0], ui_state);

    let status = ui_state.status_message.as_deref().unwrap_or("Connecting...");
    let server = Paragraph::new(format!("📡 {}", status))
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL).title(" Server "));
    frame.render_widget(server, chunks[1]);
}

pub fn render_filter_chips(frame: &mut Frame, area: Rect, feed: &FeedPageState, ui_state: &UiState) {
    let is_focused = ui_state.active_section == ActiveSection::FilterChips;

    let line = match feed.filter_chips.as_deref() {
        Some(chips) if !chips.is_empty() => {
            let spans: Vec<Span> = chips
                .iter()
                .enumerate()
                .flat_map(|(i, chip)| {
                    let selected = feed.selected_filter_chip == Some(i);
                    let under_cursor = is_focused && ui_state.chip_cursor == i;

                    let mut style = if selected {
                        Style::default().fg(Color::Black).bg(Color::Green).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default().fg(Color::White)
                    };
                    if under_cursor {
                        style = style.add_modifier(Modifier::UNDERLINED);
                    }

                    vec![Span::styled(format!(" {} ", chip.text), style), Span::raw("  ")]
                })
                .collect();
            Line::from(spans)
        }
        _ => Line::from(Span::styled("No filters", Style::default().fg(Color::DarkGray))),
    };

    let chips = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Filters ")
            .padding(Padding::horizontal(1))
            .border_style(border_style(is_focused)),
    );
    frame.render_widget(chips, area);
}
