//! Model module - Feed data and state
//!
//! - `app_model`: UI state (focus, search, cursor, errors)
//! - `types`: Core type definitions (load state, focus sections, UI state)
//! - `search`: Search bar input state
//! - `content`: Feed items, layouts, filter chips and cache records
//! - `feed_state`: Observable state of the song feed page
//! - `artists`: Frequently appearing artists row
//! - `cache`: On-disk feed snapshot
//! - `feed_client`: Feed endpoint trait and HTTP client

mod app_model;
mod types;
mod search;
mod content;
mod feed_state;
mod artists;
mod cache;
mod feed_client;

pub use app_model::AppModel;

pub use types::{ActiveSection, FeedLoadState, SearchHit, UiState, ViewOptions};

pub use search::{SearchBar, SEARCH_HINT};

pub use content::{
    ArtistRef, ContentLayout, FilterChip, LayoutType, MediaItem,
    SongFeedData, SongFeedLoadResult, FOR_ITEM_ARTIST_PREFIX,
};

pub use feed_state::FeedPageState;

pub use artists::{
    populate_artists_layout, ArtistAggregator, ArtistResolver, DefaultArtistResolver,
    ARTISTS_ROW_DEFAULT_MIN_OCCURRENCES, ARTISTS_ROW_MIN_ARTISTS,
};

pub use cache::{SongFeedCache, SONG_FEED_CACHE_FILE};

pub use feed_client::{
    HttpSongFeedClient, RefreshOutcome, ServerStatus, SongFeedEndpoint, NO_ROW_HINT,
};
