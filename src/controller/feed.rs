//! Song feed loading: cache-first load, pagination and filter chips

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::FeedError;
use crate::model::{
    ArtistAggregator, ArtistResolver, DefaultArtistResolver, FeedLoadState, FeedPageState,
    SongFeedCache, SongFeedEndpoint, SongFeedLoadResult, NO_ROW_HINT,
};
use crate::settings::DEFAULT_INITIAL_ROWS;
use crate::sync::{read, write};

use super::single_flight::SingleFlight;

/// Settings the feed controller reads
#[derive(Clone, Debug)]
pub struct FeedConfig {
    /// Row-count hint for a first page
    pub initial_rows: i32,
    /// Channel of the signed-in user, left out of the artists row
    pub own_channel_id: Option<String>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            initial_rows: DEFAULT_INITIAL_ROWS,
            own_channel_id: None,
        }
    }
}

/// Owns the feed page state and every load that writes to it.
///
/// Loads are serialised by `load_lock`; the page state itself sits behind a
/// short-lived lock so the UI can read it at any time.
#[derive(Clone)]
pub struct SongFeedController {
    endpoint: Arc<dyn SongFeedEndpoint>,
    cache: SongFeedCache,
    config: FeedConfig,
    aggregator: ArtistAggregator,
    state: Arc<RwLock<FeedPageState>>,
    load_lock: Arc<Mutex<()>>,
    launcher: Arc<SingleFlight>,
    retrying: Arc<AtomicBool>,
}

/// Returns the page to `Idle` however the load exits
struct IdleOnDrop<'a> {
    state: &'a RwLock<FeedPageState>,
}

impl Drop for IdleOnDrop<'_> {
    fn drop(&mut self) {
        write(self.state).load_state = FeedLoadState::Idle;
    }
}

impl SongFeedController {
    pub fn new(endpoint: Arc<dyn SongFeedEndpoint>, cache: SongFeedCache, config: FeedConfig) -> Self {
        Self::with_resolver(endpoint, cache, config, Arc::new(DefaultArtistResolver))
    }

    pub fn with_resolver(
        endpoint: Arc<dyn SongFeedEndpoint>,
        cache: SongFeedCache,
        config: FeedConfig,
        resolver: Arc<dyn ArtistResolver>,
    ) -> Self {
        let aggregator = ArtistAggregator::new(config.own_channel_id.clone(), resolver);
        Self {
            endpoint,
            cache,
            config,
            aggregator,
            state: Arc::new(RwLock::new(FeedPageState::default())),
            load_lock: Arc::new(Mutex::new(())),
            launcher: Arc::new(SingleFlight::new()),
            retrying: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Snapshot of the page state
    pub fn state(&self) -> FeedPageState {
        read(&self.state).clone()
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&FeedPageState) -> R) -> R {
        f(&read(&self.state))
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn reset_feed(&self) {
        let mut state = write(&self.state);
        state.set_layouts(None, &self.aggregator);
        state.filter_chips = None;
        state.selected_filter_chip = None;
    }

    /// Toggle a chip (selecting the selected chip clears it) and reload.
    pub fn select_filter_chip(&self, chip: Option<usize>) -> JoinHandle<()> {
        {
            let mut state = write(&self.state);
            state.selected_filter_chip = if chip == state.selected_filter_chip { None } else { chip };
            tracing::debug!(chip = ?state.selected_filter_chip, "Filter chip selected");
        }
        self.load_feed_detached(false)
    }

    /// Fire-and-forget load using the current chip; supersedes any pending one.
    pub fn load_feed_detached(&self, continue_feed: bool) -> JoinHandle<()> {
        let controller = self.clone();
        self.launcher.launch(move |cancel| async move {
            let filter_chip = controller.with_state(|state| state.selected_filter_chip);
            if let Err(e) = controller
                .load_feed_cancellable(false, continue_feed, filter_chip, &cancel)
                .await
            {
                tracing::debug!(error = %e, continue_feed, "Detached feed load ended with error");
            }
        })
    }

    /// Load the first page if nothing is shown yet
    pub fn open_page(&self) -> Option<JoinHandle<()>> {
        if self.with_state(FeedPageState::has_content) {
            return None;
        }
        Some(self.launch_initial_load())
    }

    /// Reload from the network, skipping the cache for this attempt
    pub fn retry(&self) -> JoinHandle<()> {
        self.retrying.store(true, Ordering::SeqCst);
        self.launch_initial_load()
    }

    fn launch_initial_load(&self) -> JoinHandle<()> {
        // Taken at launch so a superseded task cannot clear a newer retry
        let allow_cached = !self.retrying.swap(false, Ordering::SeqCst);
        let controller = self.clone();
        self.launcher.launch(move |cancel| async move {
            if let Err(e) = controller.load_feed_cancellable(allow_cached, false, None, &cancel).await {
                tracing::debug!(error = %e, allow_cached, "Initial feed load ended with error");
            }
        })
    }

    pub fn can_reload(&self) -> bool {
        true
    }

    pub fn is_reloading(&self) -> bool {
        self.with_state(|state| state.load_state == FeedLoadState::Loading)
    }

    pub fn on_reload(&self) -> JoinHandle<()> {
        self.load_feed_detached(false)
    }

    pub async fn load_feed(
        &self,
        allow_cached: bool,
        continue_feed: bool,
        filter_chip: Option<usize>,
    ) -> Result<(), FeedError> {
        self.load_feed_cancellable(allow_cached, continue_feed, filter_chip, &CancellationToken::new())
            .await
    }

    /// Load a feed page.
    ///
    /// A cached snapshot is used when `allow_cached` is set for an unfiltered
    /// first page. When the fetch fails, `allow_cached` also allows falling back
    /// to that snapshot; the error is still returned and kept in `load_error`.
    pub async fn load_feed_cancellable(
        &self,
        allow_cached: bool,
        continue_feed: bool,
        filter_chip: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<(), FeedError> {
        let _load_guard = tokio::select! {
            _ = cancel.cancelled() => return Err(FeedError::Cancelled),
            guard = self.load_lock.lock() => guard,
        };
        let _idle = IdleOnDrop { state: &self.state };

        {
            let mut state = write(&self.state);
            state.selected_filter_chip = filter_chip;
            state.load_error = None;
        }

        let result = self
            .load_feed_locked(allow_cached, continue_feed, filter_chip, cancel)
            .await;

        match &result {
            Ok(()) => tracing::info!(continue_feed, "Song feed loaded"),
            Err(e) if e.is_cancellation() => tracing::debug!(continue_feed, "Song feed load cancelled"),
            Err(e) => {
                tracing::error!(error = %e, continue_feed, "Song feed load failed");
                write(&self.state).load_error = Some(e.clone());
            }
        }
        result
    }

    async fn load_feed_locked(
        &self,
        allow_cached: bool,
        continue_feed: bool,
        filter_chip: Option<usize>,
        cancel: &CancellationToken,
    ) -> Result<(), FeedError> {
        let current = self.with_state(|state| state.load_state);
        if !current.can_start_load() {
            return Err(FeedError::IllegalState { state: current });
        }

        if allow_cached && !continue_feed && filter_chip.is_none() && self.adopt_cached_feed().await {
            return Ok(());
        }

        let (filter_params, continuation) = {
            let mut state = write(&self.state);
            // Chip indices come from the loaded chip list; a bad index is a bug
            let filter_params = filter_chip
                .map(|index| state.filter_chips.as_deref().unwrap_or_default()[index].params.clone());
            state.load_state = if continue_feed {
                FeedLoadState::Continuing
            } else {
                FeedLoadState::Loading
            };
            (filter_params, state.continuation.clone())
        };

        let (min_rows, ctoken) = match (continue_feed, continuation) {
            (true, Some(token)) => (NO_ROW_HINT, Some(token)),
            _ => (self.config.initial_rows, None),
        };

        tracing::info!(
            continue_feed,
            min_rows,
            filtered = filter_params.is_some(),
            "Loading song feed"
        );

        let result = tokio::select! {
            _ = cancel.cancelled() => Err(FeedError::Cancelled),
            result = self.fetch_feed_layouts(min_rows, filter_params.as_deref(), ctoken.as_deref()) => result,
        };

        match result {
            Ok(data) => {
                let snapshot = (!continue_feed && filter_chip.is_none()).then(|| data.clone());
                {
                    let mut state = write(&self.state);
                    if continue_feed {
                        state.append_layouts(data.layouts, &self.aggregator);
                    } else {
                        state.set_layouts(Some(data.layouts), &self.aggregator);
                        state.filter_chips = data.filter_chips;
                    }
                    state.continuation = data.ctoken;
                }

                if let Some(snapshot) = snapshot {
                    if let Err(e) = self
                        .cache
                        .save_feed_layouts(&snapshot.layouts, snapshot.filter_chips.as_deref(), snapshot.ctoken.as_deref())
                        .await
                    {
                        tracing::warn!(error = %e, "Failed to save song feed cache");
                    }
                }
                Ok(())
            }
            Err(error) if error.is_cancellation() => Err(error),
            Err(error) => {
                if allow_cached {
                    if self.adopt_cached_feed().await {
                        tracing::info!("Showing cached song feed after failed load");
                    }
                } else {
                    let mut state = write(&self.state);
                    state.set_layouts(None, &self.aggregator);
                    state.filter_chips = None;
                    state.continuation = None;
                }
                Err(error)
            }
        }
    }

    async fn fetch_feed_layouts(
        &self,
        min_rows: i32,
        params: Option<&str>,
        continuation: Option<&str>,
    ) -> Result<SongFeedLoadResult, FeedError> {
        let mut result = self.endpoint.get_song_feed(min_rows, params, continuation).await?;
        result.layouts.retain(|layout| !layout.items.is_empty());
        Ok(result)
    }

    /// Adopt the cached snapshot if it holds any layouts
    async fn adopt_cached_feed(&self) -> bool {
        let cached = match self.cache.load_feed_layouts().await {
            Ok(cached) => cached,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read song feed cache");
                return false;
            }
        };

        let Some(cached) = cached.filter(|data| !data.layouts.is_empty()) else {
            tracing::debug!("Song feed cache miss");
            return false;
        };

        tracing::info!(layouts = cached.layouts.len(), saved_at = ?cached.saved_at, "Using cached song feed");
        let mut state = write(&self.state);
        state.set_layouts(Some(cached.layouts), &self.aggregator);
        state.filter_chips = cached.filter_chips;
        state.continuation = cached.continuation_token;
        true
    }

    #[cfg(test)]
    pub(crate) fn force_load_state(&self, load_state: FeedLoadState) {
        write(&self.state).load_state = load_state;
    }
}
