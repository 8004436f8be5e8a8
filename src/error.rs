//! Error types for registry, store and binding operations.

/// Why a reducer could not be registered.
///
/// Registration failures are never fatal: [`ReducerRegistry::register`]
/// collapses them into `false`.
///
/// [`ReducerRegistry::register`]: crate::reducer::ReducerRegistry::register
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The slice key was empty.
    #[error("slice key must not be empty")]
    EmptyKey,
    /// A reducer is already registered under this key.
    #[error("slice `{key}` is already registered")]
    Conflict {
        /// The contested slice key.
        key: String,
    },
}

/// Errors from dispatching actions into a store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    /// The action kind was empty.
    #[error("action kind must not be empty")]
    InvalidAction,
    /// A reducer tried to dispatch while the store was reducing.
    #[error("reducers may not dispatch actions (dispatched `{kind}` while reducing)")]
    Reentrant {
        /// Kind of the rejected action.
        kind: String,
    },
    /// A middleware stage rejected the action.
    #[error("middleware error: {0}")]
    Middleware(String),
}

/// Errors from connecting a component.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// Another component already owns this slice and the conflict policy rejects sharing.
    #[error("slice `{key}` is already owned by another component")]
    SliceConflict {
        /// The contested slice key.
        key: String,
    },
    /// Rebuilding the store after registration failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Umbrella error for callers that mix operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Registry error.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Store error.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// Binding error.
    #[error(transparent)]
    Bind(#[from] BindError),
}

/// Convenience alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;
