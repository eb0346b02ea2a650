//! Application configuration from the environment

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::controller::FeedConfig;
use crate::settings::{FeedSettingsKey, PreferenceStore};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3232";
const APP_DIR_NAME: &str = "songfeed-rs";
const PREFERENCES_FILE: &str = "preferences.json";
const LOG_DIR_NAME: &str = "logs";

const SERVER_URL_VAR: &str = "SONGFEED_SERVER_URL";
const API_KEY_VAR: &str = "SONGFEED_API_KEY";
const CHANNEL_ID_VAR: &str = "SONGFEED_CHANNEL_ID";
const DATA_DIR_VAR: &str = "SONGFEED_DATA_DIR";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub server_url: String,
    pub api_key: Option<String>,
    /// Channel of the signed-in user
    pub own_channel_id: Option<String>,
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build the config from any variable source. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let data_dir = match var(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => dirs::data_dir()
                .context("Could not determine a data directory; set SONGFEED_DATA_DIR")?
                .join(APP_DIR_NAME),
        };

        Ok(Self {
            server_url: var(SERVER_URL_VAR).unwrap_or_else(|| DEFAULT_SERVER_URL.to_string()),
            api_key: var(API_KEY_VAR),
            own_channel_id: var(CHANNEL_ID_VAR),
            data_dir,
        })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.data_dir.join(PREFERENCES_FILE)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join(LOG_DIR_NAME)
    }

    /// Feed settings from this config plus the stored row-count preference
    pub fn feed_config(&self, prefs: &PreferenceStore) -> FeedConfig {
        FeedConfig {
            initial_rows: prefs.get_setting(&FeedSettingsKey::InitialRows),
            own_channel_id: self.own_channel_id.clone(),
        }
    }
}
