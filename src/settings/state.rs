//! Preference-backed cells that mirror one settings key in both directions

use std::marker::PhantomData;
use std::sync::{Arc, Mutex};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::sync::lock;

use super::key::SettingsKey;
use super::store::{PreferenceStore, PreferenceSubscription};

/// Converts between a cell value and its stored representation
pub trait SettingCodec<T>: 'static {
    fn decode(value: &Value) -> Option<T>;
    fn encode(value: &T) -> Value;
}

/// Stores the value as its serde JSON form
pub struct JsonCodec;

impl<T: Serialize + DeserializeOwned> SettingCodec<T> for JsonCodec {
    fn decode(value: &Value) -> Option<T> {
        serde_json::from_value(value.clone()).ok()
    }

    fn encode(value: &T) -> Value {
        serde_json::to_value(value).unwrap_or(Value::Null)
    }
}

/// An enum whose variants have a fixed order
pub trait SettingsEnum: Copy + PartialEq + Send + 'static {
    const VARIANTS: &'static [Self];

    fn ordinal(self) -> usize;
}

/// Stores an enum as its ordinal.
///
/// Decoding an ordinal outside `E::VARIANTS` panics.
pub struct OrdinalCodec;

impl<E: SettingsEnum> SettingCodec<E> for OrdinalCodec {
    fn decode(value: &Value) -> Option<E> {
        let ordinal = value.as_u64()?;
        Some(E::VARIANTS[ordinal as usize])
    }

    fn encode(value: &E) -> Value {
        Value::from(value.ordinal())
    }
}

struct Cell<T> {
    value: T,
    /// Last value known to be in the store
    set_to: T,
}

/// A UI-side value bound to a preference key.
///
/// Changes made through [`SettingsState::set`] are written to the store once;
/// external changes to the bound key are read back into the cell. The store
/// listener lives exactly as long as the cell.
pub struct SettingsState<T, C = JsonCodec> {
    key: Arc<dyn SettingsKey>,
    prefs: PreferenceStore,
    cell: Arc<Mutex<Cell<T>>>,
    subscription: PreferenceSubscription,
    _codec: PhantomData<C>,
}

pub type SettingsEnumState<E> = SettingsState<E, OrdinalCodec>;

impl<T, C> SettingsState<T, C>
where
    T: Clone + PartialEq + Default + Send + 'static,
    C: SettingCodec<T>,
{
    pub fn new(key: impl SettingsKey, prefs: &PreferenceStore) -> Self {
        let key: Arc<dyn SettingsKey> = Arc::new(key);
        let initial = read_value::<T, C>(prefs, key.as_ref());
        let cell = Arc::new(Mutex::new(Cell {
            value: initial.clone(),
            set_to: initial,
        }));
        let subscription = subscribe::<T, C>(prefs, key.clone(), cell.clone());

        Self {
            key,
            prefs: prefs.clone(),
            cell,
            subscription,
            _codec: PhantomData,
        }
    }

    pub fn get(&self) -> T {
        lock(&self.cell).value.clone()
    }

    pub fn key_name(&self) -> &'static str {
        self.key.name()
    }

    pub fn set(&self, value: T) {
        let changed = {
            let mut cell = lock(&self.cell);
            cell.value = value.clone();
            if cell.value != cell.set_to {
                cell.set_to = value.clone();
                true
            } else {
                false
            }
        };

        if changed {
            tracing::debug!(key = self.key.name(), "Writing setting");
            self.prefs.set(self.key.name(), C::encode(&value));
        }
    }

    /// Bind the cell to a different key, re-reading its value immediately.
    pub fn rebind(&mut self, key: impl SettingsKey) {
        let key: Arc<dyn SettingsKey> = Arc::new(key);
        let value = read_value::<T, C>(&self.prefs, key.as_ref());
        {
            let mut cell = lock(&self.cell);
            cell.set_to = value.clone();
            cell.value = value;
        }

        // Old registration is dropped (and removed) by the assignment
        self.subscription = subscribe::<T, C>(&self.prefs, key.clone(), self.cell.clone());
        self.key = key;
    }
}

fn read_value<T, C>(prefs: &PreferenceStore, key: &dyn SettingsKey) -> T
where
    T: Default,
    C: SettingCodec<T>,
{
    match prefs.get(key.name()).as_ref().and_then(C::decode) {
        Some(value) => value,
        None => C::decode(&key.default_value()).unwrap_or_default(),
    }
}

fn subscribe<T, C>(
    prefs: &PreferenceStore,
    key: Arc<dyn SettingsKey>,
    cell: Arc<Mutex<Cell<T>>>,
) -> PreferenceSubscription
where
    T: Clone + Default + Send + 'static,
    C: SettingCodec<T>,
{
    prefs.subscribe(move |store, changed| {
        if changed != key.name() {
            return;
        }
        let value = read_value::<T, C>(store, key.as_ref());
        let mut cell = lock(&cell);
        cell.set_to = value.clone();
        cell.value = value;
    })
}
