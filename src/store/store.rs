use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, Weak};

use serde_json::Value;
use tracing::trace;

use crate::action::{Action, INIT, REPLACE};
use crate::error::StoreError;
use crate::reducer::{RootReducer, RootState};
use crate::sync;

type Subscriber = Arc<dyn Fn(&RootState) + Send + Sync>;

thread_local! {
    // Set while a reducer runs on this thread.
    static REDUCING: Cell<bool> = const { Cell::new(false) };
}

/// Marks the current thread as reducing until dropped, panics included.
struct ReducingGuard;

impl ReducingGuard {
    fn enter(action: &Action) -> Result<Self, StoreError> {
        if REDUCING.with(Cell::get) {
            return Err(StoreError::Reentrant {
                kind: action.kind.clone(),
            });
        }
        REDUCING.with(|flag| flag.set(true));
        Ok(Self)
    }
}

impl Drop for ReducingGuard {
    fn drop(&mut self) {
        REDUCING.with(|flag| flag.set(false));
    }
}

struct StoreInner {
    state: RwLock<RootState>,
    reducer: RwLock<RootReducer>,
    subscribers: RwLock<Vec<(usize, Subscriber)>>,
    next_subscriber: AtomicUsize,
}

/// A thread-safe state container advanced by a root reducer.
///
/// `Store` is a handle: clones point at the same container, and
/// [`replace_reducer`](Store::replace_reducer) swaps the reducer in place so
/// existing handles and subscribers stay valid.
#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Store {
    /// Create a store and initialise every slice with an `INIT` action.
    pub fn new(reducer: RootReducer) -> Self {
        let initial = reducer(&RootState::new(), &Action::new(INIT));

        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(initial),
                reducer: RwLock::new(reducer),
                subscribers: RwLock::new(Vec::new()),
                next_subscriber: AtomicUsize::new(0),
            }),
        }
    }

    /// Feed `action` through the root reducer and notify subscribers.
    ///
    /// Middleware is not applied here; see
    /// [`StoreManager::dispatch`](crate::StoreManager::dispatch).
    pub fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        if action.kind.is_empty() {
            return Err(StoreError::InvalidAction);
        }
        self.reduce(&action)?;
        self.notify();
        Ok(())
    }

    /// Swap in a new root reducer, keeping the handle and its subscribers.
    ///
    /// A `REPLACE` action follows so newly added slices initialise while
    /// existing slices keep their state.
    pub fn replace_reducer(&self, reducer: RootReducer) -> Result<(), StoreError> {
        *sync::write(&self.inner.reducer) = reducer;
        self.dispatch(Action::new(REPLACE))
    }

    /// Get a clone of the current root state.
    pub fn state(&self) -> RootState {
        sync::read(&self.inner.state).clone()
    }

    /// Get a clone of one slice, if present.
    pub fn slice(&self, key: &str) -> Option<Value> {
        sync::read(&self.inner.state).get(key).cloned()
    }

    /// Read state without cloning it.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&RootState) -> R,
    {
        let state = sync::read(&self.inner.state);
        f(&state)
    }

    /// Subscribe to state changes.
    ///
    /// The callback runs after every dispatch, including the `REPLACE`
    /// that follows a reducer swap. It stops when the returned
    /// [`Subscription`] is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&RootState) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscriber.fetch_add(1, Ordering::SeqCst);
        sync::write(&self.inner.subscribers).push((id, Arc::new(callback)));
        Subscription {
            id,
            store: Arc::downgrade(&self.inner),
        }
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        sync::read(&self.inner.subscribers).len()
    }

    /// Whether two handles point at the same container.
    pub fn ptr_eq(&self, other: &Store) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn reduce(&self, action: &Action) -> Result<(), StoreError> {
        let _reducing = ReducingGuard::enter(action)?;
        // Read the reducer under the state lock so a concurrent swap is
        // either fully before or fully after this action.
        let mut state = sync::write(&self.inner.state);
        let reducer = sync::read(&self.inner.reducer).clone();
        let next = reducer(&state, action);
        *state = next;
        trace!(kind = %action.kind, "reduced action");
        Ok(())
    }

    /// Notify all subscribers of a state change.
    fn notify(&self) {
        // Snapshot so callbacks may subscribe or unsubscribe.
        let subscribers: Vec<Subscriber> = sync::read(&self.inner.subscribers)
            .iter()
            .map(|(_, subscriber)| Arc::clone(subscriber))
            .collect();
        let state = self.state();
        for subscriber in subscribers {
            subscriber(&state);
        }
    }
}

/// RAII guard for a store subscription.
pub struct Subscription {
    id: usize,
    store: Weak<StoreInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(store) = self.store.upgrade() {
            sync::write(&store.subscribers).retain(|(id, _)| *id != self.id);
        }
    }
}
