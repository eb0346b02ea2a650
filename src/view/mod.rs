//! View module - UI rendering
//!
//! This module handles all UI rendering for the application using ratatui.
//! It is organized into submodules by component type:
//!
//! - `utils`: Shared utility functions (truncation, scrolling, lists)
//! - `search_bar`: Search input with clear and submit glyphs
//! - `layout`: Top bar and filter chips row
//! - `content`: Feed rows and search results
//! - `status`: Load state and display settings bar
//! - `overlays`: Modal overlays (error, help)

mod utils;
mod search_bar;
mod layout;
mod content;
mod status;
mod overlays;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

use crate::model::{FeedPageState, UiState, ViewOptions};

pub struct AppView;

impl AppView {
    pub fn render(frame: &mut Frame, feed: &FeedPageState, ui_state: &UiState, options: ViewOptions) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search bar + server
                Constraint::Length(3), // Filter chips
                Constraint::Min(0),    // Feed
                Constraint::Length(3), // Status bar
            ])
            .split(frame.area());

        layout::render_top_bar(frame, chunks[0], ui_state);
        layout::render_filter_chips(frame, chunks[1], feed, ui_state);
        content::render_main_content(frame, chunks[2], feed, ui_state, options);
        status::render_status_bar(frame, chunks[3], feed, options);

        if ui_state.error_message.is_some() {
            overlays::render_error_notification(frame, ui_state);
        }

        if ui_state.show_help_popup {
            overlays::render_help_popup(frame);
        }
    }
}
