//! Core type definitions for the feed page

use std::time::Instant;

use crate::settings::LayoutDensity;

use super::content::MediaItem;
use super::search::SearchBar;

/// Lifecycle of the feed loader.
///
/// `PreInit` and `Idle` are the only states a load may start from. Every load
/// attempt, successful or not, returns the page to `Idle`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum FeedLoadState {
    #[default]
    PreInit,
    Idle,
    Loading,
    Continuing,
}

impl FeedLoadState {
    pub fn can_start_load(self) -> bool {
        matches!(self, FeedLoadState::PreInit | FeedLoadState::Idle)
    }
}

/// Which part of the UI has keyboard focus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ActiveSection {
    Search,
    FilterChips,
    #[default]
    Feed,
}

impl ActiveSection {
    pub fn next(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::FilterChips,
            ActiveSection::FilterChips => ActiveSection::Feed,
            ActiveSection::Feed => ActiveSection::Search,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            ActiveSection::Search => ActiveSection::Feed,
            ActiveSection::FilterChips => ActiveSection::Search,
            ActiveSection::Feed => ActiveSection::FilterChips,
        }
    }
}

/// Preference values the view renders with
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewOptions {
    pub show_artists_row: bool,
    pub density: LayoutDensity,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            show_artists_row: true,
            density: LayoutDensity::default(),
        }
    }
}

/// An item matched by a feed search, with its position in the feed
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchHit {
    pub layout_index: usize,
    pub item_index: usize,
    pub item: MediaItem,
}

/// Everything the view needs that is not feed data
#[derive(Clone, Debug)]
pub struct UiState {
    pub active_section: ActiveSection,
    pub search: SearchBar,
    pub search_in_progress: bool,
    /// `None` until a search has run
    pub search_results: Option<Vec<SearchHit>>,
    pub search_selected: usize,
    pub chip_cursor: usize,
    /// Selected row among the visible feed rows (artists row included)
    pub feed_row: usize,
    pub feed_column: usize,
    pub error_message: Option<String>,
    pub error_timestamp: Option<Instant>,
    /// Informational line in the status bar
    pub status_message: Option<String>,
    pub show_help_popup: bool,
}

impl Default for UiState {
    fn default() -> Self {
        let mut search = SearchBar::default();
        let autofocus = SearchBar::should_autofocus(false, false);
        if autofocus {
            search.focus();
        }
        Self {
            active_section: if autofocus { ActiveSection::Search } else { ActiveSection::Feed },
            search,
            search_in_progress: false,
            search_results: None,
            search_selected: 0,
            chip_cursor: 0,
            feed_row: 0,
            feed_column: 0,
            error_message: None,
            error_timestamp: None,
            status_message: None,
            show_help_popup: false,
        }
    }
}

impl UiState {
    pub fn has_search_results(&self) -> bool {
        self.search_results.as_ref().is_some_and(|hits| !hits.is_empty())
    }
}
