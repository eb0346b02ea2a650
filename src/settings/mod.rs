//! Settings module - persisted user preferences
//!
//! - `store`: JSON-backed key-value store with change listeners
//! - `key`: Settings keys and their defaults
//! - `state`: Cells that keep a UI value and a preference key in sync

mod key;
mod state;
mod store;

pub use key::{DEFAULT_INITIAL_ROWS, FeedSettingsKey, LayoutDensity, SettingsKey};
pub use state::{JsonCodec, OrdinalCodec, SettingCodec, SettingsEnum, SettingsEnumState, SettingsState};
pub use store::{ListenerId, PreferenceListener, PreferenceStore, PreferenceSubscription};
