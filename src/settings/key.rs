//! Settings keys and their defaults

use serde_json::{Value, json};

use super::state::SettingsEnum;

/// Row count the feed server recommends for the first page.
pub const DEFAULT_INITIAL_ROWS: i32 = 10;

/// A named entry in the preference store
pub trait SettingsKey: Send + Sync + 'static {
    fn name(&self) -> &'static str;
    fn default_value(&self) -> Value;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedSettingsKey {
    /// Row-count hint for the first feed page
    InitialRows,
    ShowArtistsRow,
    /// Stored as the ordinal of [`LayoutDensity`]
    LayoutDensity,
}

impl SettingsKey for FeedSettingsKey {
    fn name(&self) -> &'static str {
        match self {
            FeedSettingsKey::InitialRows => "FEED_INITIAL_ROWS",
            FeedSettingsKey::ShowArtistsRow => "FEED_SHOW_ARTISTS_ROW",
            FeedSettingsKey::LayoutDensity => "FEED_LAYOUT_DENSITY",
        }
    }

    fn default_value(&self) -> Value {
        match self {
            FeedSettingsKey::InitialRows => json!(DEFAULT_INITIAL_ROWS),
            FeedSettingsKey::ShowArtistsRow => json!(true),
            FeedSettingsKey::LayoutDensity => json!(LayoutDensity::default().ordinal()),
        }
    }
}

/// How many lines each feed item takes in the content view
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LayoutDensity {
    #[default]
    Comfortable,
    Compact,
}

impl LayoutDensity {
    pub fn toggled(self) -> Self {
        match self {
            LayoutDensity::Comfortable => LayoutDensity::Compact,
            LayoutDensity::Compact => LayoutDensity::Comfortable,
        }
    }
}

impl SettingsEnum for LayoutDensity {
    const VARIANTS: &'static [Self] = &[LayoutDensity::Comfortable, LayoutDensity::Compact];

    fn ordinal(self) -> usize {
        self as usize
    }
}
