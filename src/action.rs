//! Actions: the events fed through reducers.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Prefix shared by all action kinds the store dispatches on its own.
pub const RESERVED_PREFIX: &str = "@@slicebind/";

/// Dispatched once when a store is created so every slice initialises.
pub const INIT: &str = "@@slicebind/INIT";

/// Dispatched after the root reducer is replaced so new slices initialise.
pub const REPLACE: &str = "@@slicebind/REPLACE";

/// An event describing a requested state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// What happened, e.g. `"inc"`.
    pub kind: String,
    /// Optional data carried by the action; `Null` when unused.
    #[serde(default)]
    pub payload: Value,
}

impl Action {
    /// Create an action with no payload.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: Value::Null,
        }
    }

    /// Create an action carrying a payload.
    pub fn with_payload(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            payload,
        }
    }

    /// Whether this action was produced by the store itself.
    pub fn is_reserved(&self) -> bool {
        self.kind.starts_with(RESERVED_PREFIX)
    }
}

/// A function producing an action from a payload.
///
/// Creators are cheap to clone; bound versions are produced by
/// [`bind_action_creators`](crate::bind::bind_action_creators).
#[derive(Clone)]
pub struct ActionCreator(Arc<dyn Fn(Value) -> Action + Send + Sync>);

impl ActionCreator {
    /// Wrap a closure as an action creator.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Action + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// A creator that always emits `kind` and forwards the payload.
    pub fn kind(kind: impl Into<String>) -> Self {
        let kind = kind.into();
        Self::new(move |payload| Action::with_payload(kind.clone(), payload))
    }

    /// Produce the action for `payload`.
    pub fn create(&self, payload: Value) -> Action {
        (self.0)(payload)
    }

    /// Whether both creators wrap the same function.
    pub fn ptr_eq(&self, other: &ActionCreator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for ActionCreator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionCreator").finish_non_exhaustive()
    }
}
