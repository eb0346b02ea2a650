//! "Frequently appearing artists" row derived from the loaded feed

use std::sync::Arc;

use indexmap::IndexMap;

use super::content::{ArtistRef, ContentLayout, MediaItem};

pub const ARTISTS_ROW_DEFAULT_MIN_OCCURRENCES: u32 = 2;
pub const ARTISTS_ROW_MIN_ARTISTS: usize = 4;

/// Resolves the artist an item should be counted under. `None` leaves the
/// item out of the count.
pub trait ArtistResolver: Send + Sync {
    fn primary_artist(&self, item: &MediaItem) -> Option<ArtistRef>;
}

/// Uses the item's direct artist association, else its first listed artist.
/// A direct association to a placeholder artist skips the item.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultArtistResolver;

impl ArtistResolver for DefaultArtistResolver {
    fn primary_artist(&self, item: &MediaItem) -> Option<ArtistRef> {
        match item {
            MediaItem::Song { artist, artists, .. } | MediaItem::Playlist { artist, artists, .. } => {
                match artist {
                    Some(direct) if direct.is_for_item() => None,
                    Some(direct) => Some(direct.clone()),
                    None => artists.first().cloned(),
                }
            }
            MediaItem::Artist(_) => None,
        }
    }
}

/// Everything needed to recompute the artists row from a set of layouts
#[derive(Clone)]
pub struct ArtistAggregator {
    own_channel_id: Option<String>,
    resolver: Arc<dyn ArtistResolver>,
}

impl ArtistAggregator {
    pub fn new(own_channel_id: Option<String>, resolver: Arc<dyn ArtistResolver>) -> Self {
        Self {
            own_channel_id,
            resolver,
        }
    }

    pub fn aggregate(&self, layouts: Option<&[ContentLayout]>) -> Vec<ArtistRef> {
        populate_artists_layout(layouts, self.own_channel_id.as_deref(), self.resolver.as_ref())
    }
}

impl Default for ArtistAggregator {
    fn default() -> Self {
        Self::new(None, Arc::new(DefaultArtistResolver))
    }
}

/// Rank the artists that recur across the feed.
///
/// Artists that appear as items themselves are never counted, nor is the
/// user's own channel. The occurrence threshold starts at
/// [`ARTISTS_ROW_DEFAULT_MIN_OCCURRENCES`] and is lowered until at least
/// [`ARTISTS_ROW_MIN_ARTISTS`] artists qualify or every candidate does.
pub fn populate_artists_layout(
    layouts: Option<&[ContentLayout]>,
    own_channel_id: Option<&str>,
    resolver: &dyn ArtistResolver,
) -> Vec<ArtistRef> {
    // None marks an artist that is excluded from counting
    let mut artists: IndexMap<String, (Option<u32>, ArtistRef)> = IndexMap::new();

    for item in layouts.unwrap_or_default().iter().flat_map(|layout| layout.items.iter()) {
        if let MediaItem::Artist(artist) = item {
            artists.insert(artist.id.clone(), (None, artist.clone()));
            continue;
        }

        let Some(artist) = resolver.primary_artist(item) else {
            continue;
        };
        if own_channel_id == Some(artist.id.as_str()) {
            continue;
        }

        match artists.get_mut(&artist.id) {
            Some((Some(count), _)) => *count += 1,
            Some((None, _)) => {}
            None => {
                artists.insert(artist.id.clone(), (Some(1), artist));
            }
        }
    }

    let candidates: Vec<(u32, ArtistRef)> = artists
        .into_values()
        .filter_map(|(count, artist)| count.map(|count| (count, artist)))
        .collect();

    let counts: Vec<u32> = candidates.iter().map(|(count, _)| *count).collect();
    let min_occurrences = minimum_occurrences(&counts);

    let mut ranked: Vec<(u32, ArtistRef)> = candidates
        .into_iter()
        .filter(|(count, _)| *count >= min_occurrences)
        .collect();
    ranked.sort_by(|a, b| b.0.cmp(&a.0));

    ranked.into_iter().map(|(_, artist)| artist).collect()
}

fn minimum_occurrences(counts: &[u32]) -> u32 {
    let mut min_occurrences = ARTISTS_ROW_DEFAULT_MIN_OCCURRENCES;
    loop {
        let qualifying = counts.iter().filter(|count| **count >= min_occurrences).count();
        if qualifying >= ARTISTS_ROW_MIN_ARTISTS || qualifying == counts.len() || min_occurrences == 0 {
            return min_occurrences;
        }
        min_occurrences -= 1;
    }
}
