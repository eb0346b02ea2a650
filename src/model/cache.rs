//! On-disk cache of the last unfiltered feed page

use std::path::{Path, PathBuf};

use crate::error::FeedError;

use super::content::{ContentLayout, FilterChip, SongFeedData};

pub const SONG_FEED_CACHE_FILE: &str = "song_feed.json";

/// Snapshot store for the feed, read back when a cached load is allowed
#[derive(Clone, Debug)]
pub struct SongFeedCache {
    path: PathBuf,
}

impl SongFeedCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Cache file inside `dir`
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(SONG_FEED_CACHE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load_feed_layouts(&self) -> Result<Option<SongFeedData>, FeedError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(FeedError::Cache(e.to_string())),
        };

        let data: SongFeedData =
            serde_json::from_str(&content).map_err(|e| FeedError::Cache(e.to_string()))?;
        Ok(Some(data))
    }

    pub async fn save_feed_layouts(
        &self,
        layouts: &[ContentLayout],
        filter_chips: Option<&[FilterChip]>,
        ctoken: Option<&str>,
    ) -> Result<(), FeedError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| FeedError::Cache(e.to_string()))?;
            }
        }

        let data = SongFeedData {
            layouts: layouts.to_vec(),
            filter_chips: filter_chips.map(<[FilterChip]>::to_vec),
            continuation_token: ctoken.map(str::to_string),
            saved_at: Some(chrono::Utc::now().timestamp()),
        };
        let content = serde_json::to_string(&data).map_err(|e| FeedError::Cache(e.to_string()))?;
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| FeedError::Cache(e.to_string()))?;

        tracing::debug!(layouts = layouts.len(), path = %self.path.display(), "Feed cache saved");
        Ok(())
    }

    pub async fn clear(&self) -> Result<(), FeedError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FeedError::Cache(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ArtistRef, MediaItem};

    #[tokio::test]
    async fn missing_file_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SongFeedCache::in_dir(dir.path());
        assert_eq!(cache.load_feed_layouts().await.unwrap(), None);
    }

    #[tokio::test]
    async fn saved_snapshot_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SongFeedCache::in_dir(dir.path().join("cache"));
        let layouts = vec![ContentLayout::new(
            "Quick picks",
            vec![MediaItem::song("s1", "One", vec![ArtistRef::named("UC1", "Band")])],
        )];
        let chips = vec![FilterChip { text: "Relax".into(), params: "ggMPOg1".into() }];

        cache.save_feed_layouts(&layouts, Some(&chips), Some("CT1")).await.unwrap();
        let data = cache.load_feed_layouts().await.unwrap().unwrap();

        assert_eq!(data.layouts, layouts);
        assert_eq!(data.filter_chips, Some(chips));
        assert_eq!(data.continuation_token.as_deref(), Some("CT1"));
        assert!(data.saved_at.is_some());
    }

    #[tokio::test]
    async fn corrupt_file_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SongFeedCache::in_dir(dir.path());
        tokio::fs::write(cache.path(), "{not json").await.unwrap();
        assert!(matches!(cache.load_feed_layouts().await, Err(FeedError::Cache(_))));
    }

    #[tokio::test]
    async fn clear_removes_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = SongFeedCache::in_dir(dir.path());
        cache.save_feed_layouts(&[], None, None).await.unwrap();
        cache.clear().await.unwrap();
        cache.clear().await.unwrap();
        assert_eq!(cache.load_feed_layouts().await.unwrap(), None);
    }
}
