//! The state container and the manager that keeps it in step with the
//! reducer registry.
//!
//! - [`Store`] holds the root state and swaps reducers in place.
//! - [`Middleware`] stages wrap every dispatched action.
//! - [`StoreManager`] builds the store from a registry, owns the pipeline
//!   and rebuilds both when slices or stages are added.

mod manager;
mod middleware;
mod store;

pub use manager::StoreManager;
pub use middleware::{
    middleware_fn, LoggingMiddleware, Middleware, MiddlewareContext, Next, ObserverStage,
    SharedMiddleware,
};
pub use store::{Store, Subscription};
