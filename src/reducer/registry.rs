use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use super::reducer::{combine_reducers, identity_reducer, Reducer, RootReducer, SharedReducer};
use crate::error::RegistryError;
use crate::sync;

/// Reserved key of the slice every registry starts with.
///
/// Keeps the root reducer from ever being empty.
pub const BASELINE_SLICE: &str = "@@baseline";

/// A registry of slice reducers keyed by slice key.
///
/// Registration is append-only: once a key is taken it keeps its first
/// reducer. The registry is a handle; clones share the same contents, so one
/// registry can be threaded through the store manager and every binder.
#[derive(Clone)]
pub struct ReducerRegistry {
    slices: Arc<RwLock<BTreeMap<String, SharedReducer>>>,
}

impl ReducerRegistry {
    /// Create a registry holding only the baseline slice.
    pub fn new() -> Self {
        let mut slices = BTreeMap::new();
        slices.insert(BASELINE_SLICE.to_string(), identity_reducer());
        Self {
            slices: Arc::new(RwLock::new(slices)),
        }
    }

    /// Register `reducer` under `key`.
    ///
    /// Returns `false` when the key is empty or already registered; the
    /// existing reducer is kept in that case.
    pub fn register<R>(&self, key: impl Into<String>, reducer: R) -> bool
    where
        R: Reducer + 'static,
    {
        self.try_register(key, reducer).is_ok()
    }

    /// Register `reducer` under `key`, reporting why registration failed.
    pub fn try_register<R>(&self, key: impl Into<String>, reducer: R) -> Result<(), RegistryError>
    where
        R: Reducer + 'static,
    {
        self.try_register_shared(key.into(), Arc::new(reducer))
    }

    /// Register an already shared reducer.
    pub fn try_register_shared(
        &self,
        key: String,
        reducer: SharedReducer,
    ) -> Result<(), RegistryError> {
        if key.is_empty() {
            return Err(RegistryError::EmptyKey);
        }

        let mut slices = sync::write(&self.slices);
        if slices.contains_key(&key) {
            return Err(RegistryError::Conflict { key });
        }

        debug!(slice = %key, "registered reducer");
        slices.insert(key, reducer);
        Ok(())
    }

    /// Fold the current contents into one root reducer.
    ///
    /// The registry is snapshotted at call time; later registrations are not
    /// seen by the returned reducer.
    pub fn root_reducer(&self) -> RootReducer {
        combine_reducers(sync::read(&self.slices).clone())
    }

    /// Whether `key` is registered.
    pub fn contains(&self, key: &str) -> bool {
        sync::read(&self.slices).contains_key(key)
    }

    /// Registered keys in sorted order, baseline included.
    pub fn keys(&self) -> Vec<String> {
        sync::read(&self.slices).keys().cloned().collect()
    }

    /// Number of registered slices, baseline included.
    pub fn len(&self) -> usize {
        sync::read(&self.slices).len()
    }

    /// Always `false` for a registry built with [`ReducerRegistry::new`].
    pub fn is_empty(&self) -> bool {
        sync::read(&self.slices).is_empty()
    }
}

impl Default for ReducerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
