//! Key event handling

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::model::ActiveSection;
use super::AppController;

/// Rows from the end of the feed at which the next page is requested
const CONTINUE_THRESHOLD: usize = 2;

impl AppController {
    pub async fn handle_key_event(&self, key: KeyEvent) -> Result<()> {
        if key.kind != KeyEventKind::Press {
            return Ok(());
        }

        let model = self.model.lock().await;

        // Handle error message first (blocks all other interactions)
        if model.has_error().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Enter => {
                    model.clear_error().await;
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        // Handle help popup
        if model.is_help_popup_open().await {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Char('H') => {
                    model.hide_help_popup().await;
                    Ok(())
                }
                _ => Ok(()),
            }
        }

        let ui_state = model.get_ui_state().await;
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        if ui_state.active_section == ActiveSection::Search {
            match key.code {
                KeyCode::Tab => {
                    if key.modifiers.contains(KeyModifiers::SHIFT) {
                        model.cycle_section_backward().await;
                    } else {
                        model.cycle_section_forward().await;
                    }
                    return Ok(());
                }
                KeyCode::BackTab => {
                    model.cycle_section_backward().await;
                    return Ok(());
                }
                // Keyboard search action
                KeyCode::Enter => {
                    if let Some(query) = ui_state.search.on_search_action(ui_state.search_in_progress) {
                        drop(model);
                        self.spawn_search(query);
                    }
                    return Ok(());
                }
                KeyCode::Up => {
                    model.search_move_up().await;
                    return Ok(());
                }
                KeyCode::Down => {
                    model.search_move_down().await;
                    return Ok(());
                }
                KeyCode::Right if ui_state.has_search_results() => {
                    let row_offset = self.artists_row_offset();
                    if let Some(hit) = model.jump_to_search_hit(row_offset).await {
                        tracing::debug!(item = hit.item.id(), "Jumped to search hit");
                    }
                    return Ok(());
                }
                KeyCode::Esc => {
                    model.clear_search().await;
                    return Ok(());
                }
                KeyCode::Backspace => {
                    model.backspace_search().await;
                    return Ok(());
                }
                KeyCode::Char(c) => {
                    // Q still quits even in search mode when Ctrl is pressed
                    if (c == 'q' || c == 'Q') && ctrl {
                        model.set_should_quit(true).await;
                        return Ok(());
                    }
                    // Submit button
                    if (c == 's' || c == 'S') && ctrl {
                        let query = ui_state.search.on_submit_button();
                        drop(model);
                        self.spawn_search(query);
                        return Ok(());
                    }
                    // Clear button
                    if (c == 'u' || c == 'U') && ctrl {
                        model.clear_search().await;
                        return Ok(());
                    }
                    model.append_to_search(c).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::FilterChips {
            let chip_count = self.feed.with_state(|state| state.filter_chips.as_ref().map_or(0, Vec::len));
            match key.code {
                KeyCode::Left => {
                    model.chip_move(false, chip_count).await;
                    return Ok(());
                }
                KeyCode::Right => {
                    model.chip_move(true, chip_count).await;
                    return Ok(());
                }
                KeyCode::Enter => {
                    if ui_state.chip_cursor < chip_count {
                        model.reset_feed_selection().await;
                        drop(model);
                        self.feed.select_filter_chip(Some(ui_state.chip_cursor));
                    }
                    return Ok(());
                }
                KeyCode::Esc => {
                    if self.feed.with_state(|state| state.selected_filter_chip.is_some()) {
                        model.reset_feed_selection().await;
                        drop(model);
                        self.feed.select_filter_chip(None);
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        if ui_state.active_section == ActiveSection::Feed {
            match key.code {
                KeyCode::Up => {
                    model.feed_move_vertical(false, &self.visible_row_lengths()).await;
                    return Ok(());
                }
                KeyCode::Down => {
                    let row_lengths = self.visible_row_lengths();
                    model.feed_move_vertical(true, &row_lengths).await;
                    let selected_row = model.get_ui_state().await.feed_row;
                    drop(model);
                    self.maybe_continue_feed(selected_row, row_lengths.len());
                    return Ok(());
                }
                KeyCode::Left => {
                    model.feed_move_horizontal(false, &self.visible_row_lengths()).await;
                    return Ok(());
                }
                KeyCode::Right => {
                    model.feed_move_horizontal(true, &self.visible_row_lengths()).await;
                    return Ok(());
                }
                _ => {}
            }
        }

        // Global keybindings
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                model.set_should_quit(true).await;
            }
            KeyCode::Tab => {
                if key.modifiers.contains(KeyModifiers::SHIFT) {
                    model.cycle_section_backward().await;
                } else {
                    model.cycle_section_forward().await;
                }
            }
            KeyCode::BackTab => {
                model.cycle_section_backward().await;
            }
            // Retry a failed load, otherwise reload
            KeyCode::Char('r') => {
                let can_retry = self.feed.with_state(|state| state.can_retry());
                model.reset_feed_selection().await;
                drop(model);
                if can_retry {
                    self.feed.retry();
                } else if self.feed.can_reload() && !self.feed.is_reloading() {
                    self.feed.on_reload();
                }
            }
            // Ask the server to rebuild the feed
            KeyCode::Char('R') => {
                drop(model);
                let controller = self.clone();
                tokio::spawn(async move {
                    controller.refresh_server_feed().await;
                });
            }
            // Load the next page
            KeyCode::Char('c') | KeyCode::Char('C') => {
                drop(model);
                if self.feed.with_state(|state| state.continuation.is_some()) {
                    self.feed.load_feed_detached(true);
                }
            }
            // Toggle the artists row
            KeyCode::Char('a') | KeyCode::Char('A') => {
                let show = !self.settings.show_artists_row.get();
                self.settings.show_artists_row.set(show);
                model.clamp_feed_selection(&self.visible_row_lengths()).await;
            }
            // Toggle layout density
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.settings.density.set(self.settings.density.get().toggled());
            }
            // Focus search
            KeyCode::Char('/') | KeyCode::Char('g') | KeyCode::Char('G') => {
                model.set_active_section(ActiveSection::Search).await;
            }
            // Focus filter chips
            KeyCode::Char('f') | KeyCode::Char('F') => {
                model.set_active_section(ActiveSection::FilterChips).await;
            }
            // Show help popup
            KeyCode::Char('h') | KeyCode::Char('H') => {
                model.show_help_popup().await;
            }
            _ => {}
        }
        Ok(())
    }

    fn spawn_search(&self, query: String) {
        let controller = self.clone();
        tokio::spawn(async move {
            controller.perform_search(query).await;
        });
    }

    fn artists_row_offset(&self) -> usize {
        let enabled = self.settings.show_artists_row.get();
        usize::from(self.feed.with_state(|state| state.shows_artists_row(enabled)))
    }

    /// Request the next page once the cursor nears the last loaded row
    fn maybe_continue_feed(&self, selected_row: usize, row_count: usize) {
        if selected_row + CONTINUE_THRESHOLD < row_count {
            return;
        }

        let can_continue = self
            .feed
            .with_state(|state| state.continuation.is_some() && state.load_state.can_start_load());
        if can_continue {
            tracing::debug!(selected_row, row_count, "Near end of feed, continuing");
            self.feed.load_feed_detached(true);
        }
    }
}
