//! # Slicebind
//!
//! Dynamic reducer registration and component binding for a shared store.
//!
//! Components bring their own slice of state and their own actions at the
//! moment they are connected, instead of declaring every slice up front.
//!
//! ## Registry (state slices)
//!
//! - `ReducerRegistry` - slice key to reducer, append-only per key
//! - `combine_reducers` - folds the registry into one root reducer
//!
//! ## Store
//!
//! - `Store` - thread-safe container advanced by the root reducer
//! - `Middleware` - ordered stages around every dispatched action
//! - `StoreManager` - keeps the store in step with the registry
//!
//! ## Binding
//!
//! - `Binder::connect` - registers a component's slice and binds its actions
//! - `Connected` / `Mounted` - merged props and re-rendering on slice changes
//!
//! # Example
//!
//! ```
//! use serde_json::{json, Value};
//! use slicebind::{
//!     component_fn, reducer_fn, ActionCreator, BindConfig, Binder, OwnProps, ReducerRegistry,
//!     StoreConfig, StoreManager,
//! };
//!
//! fn main() -> slicebind::Result<()> {
//!     let manager = StoreManager::initialize(ReducerRegistry::new(), StoreConfig::default());
//!     let binder = Binder::new(manager.clone());
//!
//!     let counter = binder.connect(
//!         component_fn(|_props| {}).named("Counter"),
//!         BindConfig::new()
//!             .reducer(reducer_fn(|state, action| {
//!                 let n = state.and_then(Value::as_i64).unwrap_or(0);
//!                 if action.kind == "inc" { json!(n + 1) } else { json!(n) }
//!             }))
//!             .action("increment", ActionCreator::kind("inc")),
//!     )?;
//!
//!     let props = counter.props(&OwnProps::new());
//!     let counter_actions = props.actions().namespace("counter");
//!     if let Some(increment) = counter_actions.and_then(|ns| ns.action("increment")) {
//!         increment.call()?;
//!     }
//!
//!     assert_eq!(manager.state().get("counter"), Some(&json!(1)));
//!     Ok(())
//! }
//! ```

pub mod action;
pub mod bind;
pub mod config;
pub mod error;
pub mod reducer;
pub mod store;

mod sync;

// Re-export main types for convenience
pub use action::{Action, ActionCreator};
pub use bind::{
    bind_action_creators, component_fn, derive_state_key, lower_camel_case, merge_actions,
    ActionMap, ActionNode, BindConfig, Binder, BoundAction, Component, Connected, KeySource,
    Mounted, OwnProps, Props,
};
pub use config::{ConflictPolicy, StoreConfig};
pub use error::{BindError, Error, RegistryError, Result, StoreError};
pub use reducer::{
    combine_reducers, identity_reducer, reducer_fn, Reducer, ReducerRegistry, RootReducer,
    RootState, BASELINE_SLICE,
};
pub use store::{
    middleware_fn, LoggingMiddleware, Middleware, MiddlewareContext, ObserverStage, Store,
    StoreManager, Subscription,
};
