//! Local search over the loaded feed

use crate::model::{ContentLayout, SearchHit};
use super::AppController;

/// Case-insensitive match on item titles and artist names, in feed order.
pub fn search_feed(layouts: &[ContentLayout], query: &str) -> Vec<SearchHit> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    layouts
        .iter()
        .enumerate()
        .flat_map(|(layout_index, layout)| {
            layout.items.iter().enumerate().map(move |(item_index, item)| (layout_index, item_index, item))
        })
        .filter(|(_, _, item)| {
            item.title().to_lowercase().contains(&needle)
                || item.artist_label().is_some_and(|artist| artist.to_lowercase().contains(&needle))
        })
        .map(|(layout_index, item_index, item)| SearchHit {
            layout_index,
            item_index,
            item: item.clone(),
        })
        .collect()
}

impl AppController {
    /// Search action behind both the keyboard action and the submit button
    pub async fn perform_search(&self, query: String) {
        tracing::debug!(query, "Performing feed search");
        {
            let model = self.model.lock().await;
            model.set_search_in_progress(true).await;
        }

        let layouts = self.feed.with_state(|state| state.layouts().map(<[ContentLayout]>::to_vec));
        let Some(layouts) = layouts else {
            let model = self.model.lock().await;
            model.set_search_in_progress(false).await;
            model.set_error("The feed has not loaded yet.".to_string()).await;
            return;
        };

        let search_query = query.clone();
        let hits = tokio::task::spawn_blocking(move || search_feed(&layouts, &search_query)).await;

        let model = self.model.lock().await;
        match hits {
            Ok(hits) => {
                tracing::info!(query, hits = hits.len(), "Feed search completed");
                model.set_search_results(hits).await;
            }
            Err(e) => {
                tracing::error!(query, error = %e, "Feed search failed");
                model.set_search_in_progress(false).await;
                model.set_error(Self::format_error(&anyhow::Error::new(e))).await;
            }
        }
    }
}
