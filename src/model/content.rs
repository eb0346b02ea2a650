//! Feed content: items, layouts, filter chips and cached snapshots

use serde::{Deserialize, Serialize};

/// Id prefix of placeholder artists generated for a single item
pub const FOR_ITEM_ARTIST_PREFIX: &str = "FORITEM";

/// Lightweight reference to an artist channel
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtistRef {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl ArtistRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), name: None }
    }

    pub fn named(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
        }
    }

    /// Whether this is a placeholder standing in for the item itself
    pub fn is_for_item(&self) -> bool {
        self.id.starts_with(FOR_ITEM_ARTIST_PREFIX)
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// A single entry in a feed row.
///
/// `artists` is the artist list sent by the server; `artist` is a direct
/// association resolved locally and takes precedence when present.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MediaItem {
    Song {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        artists: Vec<ArtistRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        artist: Option<ArtistRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        playlist_id: Option<String>,
    },
    Playlist {
        id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        artists: Vec<ArtistRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        artist: Option<ArtistRef>,
    },
    Artist(ArtistRef),
}

impl MediaItem {
    pub fn song(id: impl Into<String>, title: impl Into<String>, artists: Vec<ArtistRef>) -> Self {
        MediaItem::Song {
            id: id.into(),
            title: Some(title.into()),
            artists,
            artist: None,
            playlist_id: None,
        }
    }

    pub fn playlist(id: impl Into<String>, title: impl Into<String>, artists: Vec<ArtistRef>) -> Self {
        MediaItem::Playlist {
            id: id.into(),
            title: Some(title.into()),
            artists,
            artist: None,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            MediaItem::Song { id, .. } | MediaItem::Playlist { id, .. } => id,
            MediaItem::Artist(artist) => &artist.id,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            MediaItem::Song { id, title, .. } | MediaItem::Playlist { id, title, .. } => {
                title.as_deref().unwrap_or(id)
            }
            MediaItem::Artist(artist) => artist.display_name(),
        }
    }

    /// Artist shown next to the title, if any
    pub fn artist_label(&self) -> Option<&str> {
        match self {
            MediaItem::Song { artists, artist, .. } | MediaItem::Playlist { artists, artist, .. } => {
                artist.as_ref().or(artists.first()).map(ArtistRef::display_name)
            }
            MediaItem::Artist(_) => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MediaItem::Song { .. } => "song",
            MediaItem::Playlist { .. } => "playlist",
            MediaItem::Artist(_) => "artist",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutType {
    #[default]
    Grid,
    List,
    Row,
}

/// A titled row of feed items
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContentLayout {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub layout_type: LayoutType,
    #[serde(default)]
    pub items: Vec<MediaItem>,
}

impl ContentLayout {
    pub fn new(title: impl Into<String>, items: Vec<MediaItem>) -> Self {
        Self {
            title: Some(title.into()),
            subtitle: None,
            layout_type: LayoutType::Grid,
            items,
        }
    }
}

/// A feed-scoping option offered by the server
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterChip {
    pub text: String,
    /// Opaque query parameters sent back when the chip is selected
    pub params: String,
}

/// One page of feed content as returned by the endpoint
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SongFeedLoadResult {
    pub layouts: Vec<ContentLayout>,
    #[serde(default)]
    pub filter_chips: Option<Vec<FilterChip>>,
    #[serde(default)]
    pub ctoken: Option<String>,
}

/// Snapshot written to the feed cache after an unfiltered first-page load
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongFeedData {
    pub layouts: Vec<ContentLayout>,
    #[serde(default)]
    pub filter_chips: Option<Vec<FilterChip>>,
    #[serde(default)]
    pub continuation_token: Option<String>,
    /// Unix timestamp of the save
    #[serde(default)]
    pub saved_at: Option<i64>,
}
