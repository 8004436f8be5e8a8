use std::sync::{Arc, RwLock};

use tracing::debug;

use super::middleware::{Middleware, MiddlewareContext, Next, ObserverStage, SharedMiddleware};
use super::store::{Store, Subscription};
use crate::action::Action;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::reducer::{ReducerRegistry, RootState};
use crate::sync;

struct ManagerInner {
    registry: ReducerRegistry,
    store: Store,
    config: StoreConfig,
    // Configured stages in insertion order, observer first when present.
    stages: RwLock<Vec<SharedMiddleware>>,
    // The pipeline actions currently run through; refreshed by `rebuild`.
    pipeline: RwLock<Arc<[SharedMiddleware]>>,
}

/// Owns the store built from a [`ReducerRegistry`] and its middleware.
///
/// Like [`Store`], the manager is a cheap handle; clones share the same
/// store, registry and pipeline.
#[derive(Clone)]
pub struct StoreManager {
    inner: Arc<ManagerInner>,
}

impl StoreManager {
    /// Build the store from the registry's current slices.
    ///
    /// With `config.devtools` set, [`ObserverStage::tracing`] takes the
    /// first pipeline slot.
    pub fn initialize(registry: ReducerRegistry, config: StoreConfig) -> Self {
        let observer = config.devtools.then(ObserverStage::tracing);
        Self::initialize_with_observer(registry, config, observer)
    }

    /// Build the store with a host-supplied observer in the first slot.
    ///
    /// The observer replaces the devtools stage `config` would otherwise
    /// install.
    pub fn initialize_with_observer(
        registry: ReducerRegistry,
        config: StoreConfig,
        observer: Option<ObserverStage>,
    ) -> Self {
        let stages: Vec<SharedMiddleware> = observer
            .into_iter()
            .map(|stage| Arc::new(stage) as SharedMiddleware)
            .collect();
        let pipeline: Arc<[SharedMiddleware]> = stages.clone().into();
        let store = Store::new(registry.root_reducer());

        debug!(slices = ?registry.keys(), stages = stages.len(), "store initialized");

        Self {
            inner: Arc::new(ManagerInner {
                registry,
                store,
                config,
                stages: RwLock::new(stages),
                pipeline: RwLock::new(pipeline),
            }),
        }
    }

    /// Re-derive the root reducer and pipeline and swap them into the store.
    ///
    /// Existing slices keep their state, new slices initialise. Running it
    /// twice with no registry change leaves the state untouched.
    pub fn rebuild(&self) -> Result<(), StoreError> {
        let stages: Arc<[SharedMiddleware]> = sync::read(&self.inner.stages).clone().into();
        *sync::write(&self.inner.pipeline) = stages;

        let reducer = self.inner.registry.root_reducer();
        self.inner.store.replace_reducer(reducer)?;
        debug!(slices = ?self.inner.registry.keys(), "store rebuilt");
        Ok(())
    }

    /// Append a stage to the pipeline and rebuild.
    pub fn add_middleware<M>(&self, stage: M) -> Result<(), StoreError>
    where
        M: Middleware + 'static,
    {
        self.add_shared_middleware(Arc::new(stage))
    }

    /// Append an already shared stage to the pipeline and rebuild.
    pub fn add_shared_middleware(&self, stage: SharedMiddleware) -> Result<(), StoreError> {
        sync::write(&self.inner.stages).push(stage);
        self.rebuild()
    }

    /// Feed `action` through the pipeline into the store.
    pub fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        if action.kind.is_empty() {
            return Err(StoreError::InvalidAction);
        }

        let pipeline = Arc::clone(&sync::read(&self.inner.pipeline));
        let ctx = MiddlewareContext::new(self.clone());
        Next::new(&self.inner.store, &ctx, &pipeline).run(action)
    }

    /// Current root state.
    pub fn state(&self) -> RootState {
        self.inner.store.state()
    }

    /// Subscribe to state changes.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RootState) + Send + Sync + 'static,
    {
        self.inner.store.subscribe(callback)
    }

    /// The managed store.
    pub fn store(&self) -> &Store {
        &self.inner.store
    }

    /// The registry the store is built from.
    pub fn registry(&self) -> &ReducerRegistry {
        &self.inner.registry
    }

    /// The configuration the manager was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Number of configured stages, observer included.
    pub fn middleware_count(&self) -> usize {
        sync::read(&self.inner.stages).len()
    }
}
