//! Main application model with UI state management

use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use super::types::{ActiveSection, SearchHit, UiState};

const ERROR_DISPLAY_DURATION: Duration = Duration::from_secs(5);

/// UI-side application state. Feed data lives in the feed controller.
pub struct AppModel {
    pub ui_state: Arc<Mutex<UiState>>,
    pub should_quit: Arc<Mutex<bool>>,
}

impl AppModel {
    pub fn new() -> Self {
        Self {
            ui_state: Arc::new(Mutex::new(UiState::default())),
            should_quit: Arc::new(Mutex::new(false)),
        }
    }

    pub async fn should_quit(&self) -> bool {
        *self.should_quit.lock().await
    }

    pub async fn set_should_quit(&self, quit: bool) {
        *self.should_quit.lock().await = quit;
    }

    pub async fn get_ui_state(&self) -> UiState {
        self.ui_state.lock().await.clone()
    }

    // ========================================================================
    // Sections & Focus
    // ========================================================================

    pub async fn cycle_section_forward(&self) {
        let mut state = self.ui_state.lock().await;
        let next = state.active_section.next();
        Self::focus_section(&mut state, next);
    }

    pub async fn cycle_section_backward(&self) {
        let mut state = self.ui_state.lock().await;
        let prev = state.active_section.prev();
        Self::focus_section(&mut state, prev);
    }

    pub async fn set_active_section(&self, section: ActiveSection) {
        let mut state = self.ui_state.lock().await;
        Self::focus_section(&mut state, section);
    }

    fn focus_section(state: &mut UiState, section: ActiveSection) {
        state.active_section = section;
        if section == ActiveSection::Search {
            state.search.focus();
        } else {
            state.search.blur();
        }
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub async fn append_to_search(&self, c: char) {
        self.ui_state.lock().await.search.insert(c);
    }

    pub async fn backspace_search(&self) {
        self.ui_state.lock().await.search.backspace();
    }

    /// Clear button: drops the query and any results shown for it
    pub async fn clear_search(&self) {
        let mut state = self.ui_state.lock().await;
        state.search.clear();
        state.search_results = None;
        state.search_selected = 0;
    }

    pub async fn set_search_in_progress(&self, in_progress: bool) {
        self.ui_state.lock().await.search_in_progress = in_progress;
    }

    pub async fn set_search_results(&self, hits: Vec<SearchHit>) {
        let mut state = self.ui_state.lock().await;
        state.search_results = Some(hits);
        state.search_selected = 0;
        state.search_in_progress = false;
    }

    pub async fn search_move_up(&self) {
        let mut state = self.ui_state.lock().await;
        state.search_selected = state.search_selected.saturating_sub(1);
    }

    pub async fn search_move_down(&self) {
        let mut state = self.ui_state.lock().await;
        let count = state.search_results.as_ref().map_or(0, Vec::len);
        if state.search_selected < count.saturating_sub(1) {
            state.search_selected += 1;
        }
    }

    /// Move the feed cursor onto the selected search hit
    pub async fn jump_to_search_hit(&self, row_offset: usize) -> Option<SearchHit> {
        let mut state = self.ui_state.lock().await;
        let hit = state.search_results.as_ref()?.get(state.search_selected)?.clone();
        state.feed_row = hit.layout_index + row_offset;
        state.feed_column = hit.item_index;
        Self::focus_section(&mut state, ActiveSection::Feed);
        Some(hit)
    }

    // ========================================================================
    // Filter Chips
    // ========================================================================

    pub async fn chip_move(&self, forward: bool, chip_count: usize) {
        let mut state = self.ui_state.lock().await;
        if forward {
            if state.chip_cursor < chip_count.saturating_sub(1) {
                state.chip_cursor += 1;
            }
        } else {
            state.chip_cursor = state.chip_cursor.saturating_sub(1);
        }
    }

    // ========================================================================
    // Feed Navigation
    // ========================================================================

    /// Move between rows; `row_lengths` holds the item count of each visible row
    pub async fn feed_move_vertical(&self, down: bool, row_lengths: &[usize]) {
        let mut state = self.ui_state.lock().await;
        if down {
            if state.feed_row < row_lengths.len().saturating_sub(1) {
                state.feed_row += 1;
            }
        } else {
            state.feed_row = state.feed_row.saturating_sub(1);
        }
        Self::clamp_feed_cursor(&mut state, row_lengths);
    }

    pub async fn feed_move_horizontal(&self, right: bool, row_lengths: &[usize]) {
        let mut state = self.ui_state.lock().await;
        let row_len = row_lengths.get(state.feed_row).copied().unwrap_or(0);
        if right {
            if state.feed_column < row_len.saturating_sub(1) {
                state.feed_column += 1;
            }
        } else {
            state.feed_column = state.feed_column.saturating_sub(1);
        }
    }

    /// Keep the cursor inside the rows after the feed changed
    pub async fn clamp_feed_selection(&self, row_lengths: &[usize]) {
        let mut state = self.ui_state.lock().await;
        Self::clamp_feed_cursor(&mut state, row_lengths);
    }

    fn clamp_feed_cursor(state: &mut UiState, row_lengths: &[usize]) {
        state.feed_row = state.feed_row.min(row_lengths.len().saturating_sub(1));
        let row_len = row_lengths.get(state.feed_row).copied().unwrap_or(0);
        state.feed_column = state.feed_column.min(row_len.saturating_sub(1));
    }

    pub async fn reset_feed_selection(&self) {
        let mut state = self.ui_state.lock().await;
        state.feed_row = 0;
        state.feed_column = 0;
    }

    // ========================================================================
    // Errors & Popups
    // ========================================================================

    pub async fn set_error(&self, message: String) {
        let mut state = self.ui_state.lock().await;
        state.error_message = Some(message);
        state.error_timestamp = Some(Instant::now());
    }

    pub async fn clear_error(&self) {
        let mut state = self.ui_state.lock().await;
        state.error_message = None;
        state.error_timestamp = None;
    }

    pub async fn set_status(&self, message: impl Into<String>) {
        self.ui_state.lock().await.status_message = Some(message.into());
    }

    pub async fn has_error(&self) -> bool {
        self.ui_state.lock().await.error_message.is_some()
    }

    pub async fn auto_clear_old_errors(&self) {
        let mut state = self.ui_state.lock().await;
        if let Some(timestamp) = state.error_timestamp {
            if timestamp.elapsed() > ERROR_DISPLAY_DURATION {
                state.error_message = None;
                state.error_timestamp = None;
            }
        }
    }

    pub async fn show_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = true;
    }

    pub async fn hide_help_popup(&self) {
        self.ui_state.lock().await.show_help_popup = false;
    }

    pub async fn is_help_popup_open(&self) -> bool {
        self.ui_state.lock().await.show_help_popup
    }
}

impl Default for AppModel {
    fn default() -> Self {
        Self::new()
    }
}
