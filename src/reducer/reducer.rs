use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::action::Action;

/// The root state: slice key to slice state.
pub type RootState = Map<String, Value>;

/// A reducer shared between the registry and the root reducers built from it.
pub type SharedReducer = Arc<dyn Reducer>;

/// The folded transition function over the whole root state.
pub type RootReducer = Arc<dyn Fn(&RootState, &Action) -> RootState + Send + Sync>;

/// A pure transition function for one slice of state.
///
/// Called with `None` the reducer must return the slice's initial state.
/// Reducers must be total and free of side effects; a panicking reducer
/// aborts the dispatch that called it.
pub trait Reducer: Send + Sync {
    /// Compute the next slice state.
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Value;
}

/// Reducer backed by a closure. Built with [`reducer_fn`].
pub struct ReducerFn<F> {
    f: F,
}

impl<F> Reducer for ReducerFn<F>
where
    F: Fn(Option<&Value>, &Action) -> Value + Send + Sync,
{
    fn reduce(&self, state: Option<&Value>, action: &Action) -> Value {
        (self.f)(state, action)
    }
}

/// Create a reducer from a closure.
///
/// # Example
///
/// ```
/// use serde_json::{json, Value};
/// use slicebind::{reducer_fn, Action, Reducer};
///
/// let counter = reducer_fn(|state, action| {
///     let n = state.and_then(Value::as_i64).unwrap_or(0);
///     match action.kind.as_str() {
///         "inc" => json!(n + 1),
///         _ => json!(n),
///     }
/// });
///
/// assert_eq!(counter.reduce(None, &Action::new("inc")), json!(1));
/// ```
#[must_use]
pub fn reducer_fn<F>(f: F) -> ReducerFn<F>
where
    F: Fn(Option<&Value>, &Action) -> Value + Send + Sync,
{
    ReducerFn { f }
}

/// The reducer used when a slice declares none.
///
/// Returns the current state unchanged, or an empty object when absent.
pub fn identity_reducer() -> SharedReducer {
    Arc::new(reducer_fn(|state, _action| {
        state.cloned().unwrap_or_else(|| Value::Object(Map::new()))
    }))
}

/// Fold slice reducers into one root reducer.
///
/// Every reducer sees only its own slice and the action; results are
/// collected under the same key. Slices in the input state with no reducer
/// are dropped from the output.
pub fn combine_reducers(slices: BTreeMap<String, SharedReducer>) -> RootReducer {
    Arc::new(move |state: &RootState, action: &Action| -> RootState {
        if action.is_reserved() {
            for key in state.keys().filter(|key| !slices.contains_key(*key)) {
                debug!(slice = %key, "dropping state for unregistered slice");
            }
        }

        slices
            .iter()
            .map(|(key, reducer)| (key.clone(), reducer.reduce(state.get(key), action)))
            .collect()
    })
}
