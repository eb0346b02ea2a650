//! Controller module - Application logic and event handling
//!
//! This module contains the application controller that handles user input,
//! coordinates between the model and view, and drives feed loading.
//! It is organized into submodules by responsibility:
//!
//! - `feed`: Song feed loading (cache, pagination, filter chips)
//! - `single_flight`: Last-request-wins task launcher
//! - `search`: Local search over the loaded feed
//! - `input`: Key event handling
//! - `server`: Feed server status and refresh requests

mod feed;
mod input;
mod search;
mod server;
mod single_flight;

pub use feed::{FeedConfig, SongFeedController};
pub use search::search_feed;
pub use single_flight::SingleFlight;

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::error::FeedError;
use crate::model::{AppModel, HttpSongFeedClient, ViewOptions};
use crate::settings::{FeedSettingsKey, LayoutDensity, PreferenceStore, SettingsEnumState, SettingsState};

/// Display preferences the UI can change at runtime
pub struct ViewSettings {
    pub show_artists_row: SettingsState<bool>,
    pub density: SettingsEnumState<LayoutDensity>,
}

impl ViewSettings {
    pub fn new(prefs: &PreferenceStore) -> Self {
        Self {
            show_artists_row: SettingsState::new(FeedSettingsKey::ShowArtistsRow, prefs),
            density: SettingsEnumState::new(FeedSettingsKey::LayoutDensity, prefs),
        }
    }

    pub fn options(&self) -> ViewOptions {
        ViewOptions {
            show_artists_row: self.show_artists_row.get(),
            density: self.density.get(),
        }
    }
}

#[derive(Clone)]
pub struct AppController {
    pub(crate) model: Arc<Mutex<AppModel>>,
    pub(crate) feed: SongFeedController,
    pub(crate) settings: Arc<ViewSettings>,
    server: Option<HttpSongFeedClient>,
}

impl AppController {
    pub fn new(model: Arc<Mutex<AppModel>>, feed: SongFeedController, settings: Arc<ViewSettings>) -> Self {
        Self {
            model,
            feed,
            settings,
            server: None,
        }
    }

    /// Enable the server status and refresh actions
    pub fn with_server(mut self, server: HttpSongFeedClient) -> Self {
        self.server = Some(server);
        self
    }

    pub fn feed(&self) -> &SongFeedController {
        &self.feed
    }

    pub fn view_options(&self) -> ViewOptions {
        self.settings.options()
    }

    /// Item counts of the rows the feed view currently shows
    pub(crate) fn visible_row_lengths(&self) -> Vec<usize> {
        let show_artists_row = self.settings.show_artists_row.get();
        self.feed.with_state(|state| {
            state
                .visible_rows(show_artists_row)
                .iter()
                .map(|row| row.items.len())
                .collect()
        })
    }

    pub(crate) fn format_error(error: &anyhow::Error) -> String {
        if let Some(feed_error) = error.downcast_ref::<FeedError>() {
            return feed_error.user_message();
        }

        let error_str = error.to_string();
        if error_str.contains("timed out") {
            "The feed server took too long to answer.".to_string()
        } else {
            format!("Error: {}", error_str)
        }
    }
}
