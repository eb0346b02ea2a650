//! Status bar rendering

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::model::{FeedLoadState, FeedPageState, ViewOptions};
use crate::settings::LayoutDensity;

pub fn render_status_bar(frame: &mut Frame, area: Rect, feed: &FeedPageState, options: ViewOptions) {
    let (state_text, state_color) = match feed.load_state {
        FeedLoadState::PreInit => (" Starting".to_string(), Color::DarkGray),
        FeedLoadState::Loading => (" ⟳ Loading feed".to_string(), Color::Yellow),
        FeedLoadState::Continuing => (" ⟳ Loading more".to_string(), Color::Yellow),
        FeedLoadState::Idle => match &feed.load_error {
            Some(error) => (format!(" ✕ {}", error.user_message()), Color::Red),
            None => {
                let rows = feed.layouts().map_or(0, <[_]>::len);
                let more = if feed.continuation.is_some() { " (more available)" } else { "" };
                (format!(" ✓ {} rows{}", rows, more), Color::Green)
            }
        },
    };

    let density = match options.density {
        LayoutDensity::Comfortable => "Comfortable",
        LayoutDensity::Compact => "Compact",
    };
    let artists = if options.show_artists_row { "Artists: On" } else { "Artists: Off" };
    let controls_info = format!(" {} | {} | h Help ", artists, density);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(controls_info.chars().count() as u16 + 2),
        ])
        .split(area);

    let status = Paragraph::new(Line::from(Span::styled(state_text, Style::default().fg(state_color))))
        .block(Block::default().borders(Borders::ALL).title(" Status "));
    frame.render_widget(status, chunks[0]);

    let controls = Paragraph::new(controls_info)
        .style(Style::default().fg(Color::Cyan))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(controls, chunks[1]);
}
