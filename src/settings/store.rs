//! JSON-file preference store with change listeners

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::sync::{lock, read, write};

use super::key::SettingsKey;

/// Callback invoked with the store and the name of the key that changed
pub type PreferenceListener = Arc<dyn Fn(&PreferenceStore, &str) + Send + Sync>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

struct StoreInner {
    values: RwLock<BTreeMap<String, Value>>,
    listeners: Mutex<BTreeMap<ListenerId, PreferenceListener>>,
    next_listener_id: AtomicU64,
    path: Option<PathBuf>,
}

/// Key-value preference store shared by every settings cell.
///
/// Cloning is cheap; all clones see the same values and listeners.
#[derive(Clone)]
pub struct PreferenceStore {
    inner: Arc<StoreInner>,
}

impl PreferenceStore {
    pub fn in_memory() -> Self {
        Self::with_values(BTreeMap::new(), None)
    }

    /// Open a store persisted at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let values = if path.exists() {
            let content = fs::read_to_string(path)
                .with_context(|| format!("Failed to read preferences at {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse preferences at {}", path.display()))?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = %path.display(), "Preferences opened");
        Ok(Self::with_values(values, Some(path.to_path_buf())))
    }

    fn with_values(values: BTreeMap<String, Value>, path: Option<PathBuf>) -> Self {
        Self {
            inner: Arc::new(StoreInner {
                values: RwLock::new(values),
                listeners: Mutex::new(BTreeMap::new()),
                next_listener_id: AtomicU64::new(0),
                path,
            }),
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        read(&self.inner.values).get(key).cloned()
    }

    /// Typed read of a settings key, falling back to the key's default.
    pub fn get_setting<T: DeserializeOwned + Default>(&self, key: &dyn SettingsKey) -> T {
        if let Some(value) = self.get(key.name()) {
            match serde_json::from_value(value) {
                Ok(decoded) => return decoded,
                Err(e) => {
                    tracing::warn!(key = key.name(), error = %e, "Stored preference has the wrong type, using default");
                }
            }
        }
        serde_json::from_value(key.default_value()).unwrap_or_default()
    }

    pub fn set(&self, key: &str, value: Value) {
        {
            let mut values = write(&self.inner.values);
            values.insert(key.to_string(), value);
        }
        self.persist();
        self.notify(key);
    }

    pub fn remove(&self, key: &str) {
        let removed = write(&self.inner.values).remove(key).is_some();
        if removed {
            self.persist();
            self.notify(key);
        }
    }

    pub fn add_listener(&self, listener: PreferenceListener) -> ListenerId {
        let id = ListenerId(self.inner.next_listener_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.inner.listeners).insert(id, listener);
        id
    }

    pub fn remove_listener(&self, id: ListenerId) {
        lock(&self.inner.listeners).remove(&id);
    }

    /// Register a listener for as long as the returned guard lives.
    pub fn subscribe<F>(&self, listener: F) -> PreferenceSubscription
    where
        F: Fn(&PreferenceStore, &str) + Send + Sync + 'static,
    {
        let id = self.add_listener(Arc::new(listener));
        PreferenceSubscription {
            store: self.clone(),
            id,
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.inner.listeners).len()
    }

    /// Write the current values to disk. No-op for in-memory stores.
    pub fn flush(&self) -> Result<()> {
        let Some(path) = &self.inner.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(&*read(&self.inner.values))?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write preferences to {}", path.display()))?;
        Ok(())
    }

    fn persist(&self) {
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "Failed to persist preferences");
        }
    }

    fn notify(&self, key: &str) {
        // Listeners run without the lock held so they can read back or re-register
        let listeners: Vec<PreferenceListener> = lock(&self.inner.listeners).values().cloned().collect();
        for listener in listeners {
            listener(self, key);
        }
    }
}

/// Listener registration that is removed when dropped
pub struct PreferenceSubscription {
    store: PreferenceStore,
    id: ListenerId,
}

impl PreferenceSubscription {
    pub fn id(&self) -> ListenerId {
        self.id
    }
}

impl Drop for PreferenceSubscription {
    fn drop(&mut self) {
        self.store.remove_listener(self.id);
    }
}
