//! Observable state of the song feed page

use crate::error::FeedError;

use super::artists::ArtistAggregator;
use super::content::{ArtistRef, ContentLayout, FilterChip, LayoutType, MediaItem};
use super::types::FeedLoadState;

/// Everything the UI reads about the feed.
///
/// `layouts` is only written through [`FeedPageState::set_layouts`] so the
/// derived artists row always matches it.
#[derive(Clone, Debug)]
pub struct FeedPageState {
    pub load_state: FeedLoadState,
    pub load_error: Option<FeedError>,
    /// Pagination cursor for the layouts currently loaded
    pub continuation: Option<String>,
    layouts: Option<Vec<ContentLayout>>,
    pub filter_chips: Option<Vec<FilterChip>>,
    pub selected_filter_chip: Option<usize>,
    artists_layout: ContentLayout,
}

impl Default for FeedPageState {
    fn default() -> Self {
        Self {
            load_state: FeedLoadState::PreInit,
            load_error: None,
            continuation: None,
            layouts: None,
            filter_chips: None,
            selected_filter_chip: None,
            artists_layout: ContentLayout {
                layout_type: LayoutType::Grid,
                ..ContentLayout::default()
            },
        }
    }
}

impl FeedPageState {
    /// `None` until a load has produced layouts
    pub fn layouts(&self) -> Option<&[ContentLayout]> {
        self.layouts.as_deref()
    }

    pub fn artists_layout(&self) -> &ContentLayout {
        &self.artists_layout
    }

    pub fn set_layouts(&mut self, layouts: Option<Vec<ContentLayout>>, aggregator: &ArtistAggregator) {
        self.layouts = layouts;
        self.refresh_artists(aggregator);
    }

    /// Append a continuation page, treating unloaded layouts as empty
    pub fn append_layouts(&mut self, layouts: Vec<ContentLayout>, aggregator: &ArtistAggregator) {
        self.layouts.get_or_insert_with(Vec::new).extend(layouts);
        self.refresh_artists(aggregator);
    }

    fn refresh_artists(&mut self, aggregator: &ArtistAggregator) {
        let artists: Vec<ArtistRef> = aggregator.aggregate(self.layouts.as_deref());
        self.artists_layout.items = artists.into_iter().map(MediaItem::Artist).collect();
    }

    /// Whether the artists row is drawn above the feed layouts
    pub fn shows_artists_row(&self, enabled: bool) -> bool {
        enabled && !self.artists_layout.items.is_empty()
    }

    /// Rows in display order: the artists row (when shown), then the layouts
    pub fn visible_rows(&self, show_artists_row: bool) -> Vec<&ContentLayout> {
        let artists = self
            .shows_artists_row(show_artists_row)
            .then_some(&self.artists_layout);
        artists.into_iter().chain(self.layouts.iter().flatten()).collect()
    }

    pub fn has_content(&self) -> bool {
        self.layouts.as_ref().is_some_and(|layouts| !layouts.is_empty())
    }

    pub fn selected_chip(&self) -> Option<&FilterChip> {
        let index = self.selected_filter_chip?;
        self.filter_chips.as_ref()?.get(index)
    }

    /// The retry affordance is offered once a failed load has settled
    pub fn can_retry(&self) -> bool {
        self.load_error.is_some() && self.load_state == FeedLoadState::Idle
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn song(id: &str, artist: &str) -> MediaItem {
        MediaItem::song(id, id, vec![ArtistRef::new(artist)])
    }

    #[test]
    fn starts_unloaded() {
        let state = FeedPageState::default();
        assert_eq!(state.load_state, FeedLoadState::PreInit);
        assert!(state.layouts().is_none());
        assert!(state.artists_layout().items.is_empty());
        assert!(!state.can_retry());
    }

    #[test]
    fn setting_layouts_recomputes_artists() {
        let mut state = FeedPageState::default();
        let aggregator = ArtistAggregator::default();

        state.set_layouts(
            Some(vec![ContentLayout::new("Row", vec![song("1", "a"), song("2", "a")])]),
            &aggregator,
        );
        assert_eq!(state.artists_layout().items, vec![MediaItem::Artist(ArtistRef::new("a"))]);

        state.set_layouts(None, &aggregator);
        assert!(state.artists_layout().items.is_empty());
    }

    #[test]
    fn retry_needs_error_and_idle() {
        let mut state = FeedPageState {
            load_error: Some(FeedError::Network("down".into())),
            load_state: FeedLoadState::Loading,
            ..FeedPageState::default()
        };
        assert!(!state.can_retry());
        state.load_state = FeedLoadState::Idle;
        assert!(state.can_retry());
    }

    #[test]
    fn artists_row_leads_visible_rows_when_enabled() {
        let mut state = FeedPageState::default();
        state.set_layouts(
            Some(vec![ContentLayout::new("Row", vec![song("1", "a")])]),
            &ArtistAggregator::default(),
        );

        let rows = state.visible_rows(true);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], state.artists_layout());

        assert_eq!(state.visible_rows(false).len(), 1);
    }

    #[test]
    fn empty_layouts_are_loaded_but_without_content() {
        let mut state = FeedPageState::default();
        state.set_layouts(Some(vec![]), &ArtistAggregator::default());
        assert!(state.layouts().is_some());
        assert!(!state.has_content());
    }
}
