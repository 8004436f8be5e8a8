//! Reducers and the registry of state slices.
//!
//! A reducer owns one slice of the root state. The [`ReducerRegistry`]
//! collects reducers by slice key and folds them into a single root reducer
//! with [`combine_reducers`] whenever the store needs one.

mod reducer;
mod registry;

pub use reducer::{
    combine_reducers, identity_reducer, reducer_fn, Reducer, ReducerFn, RootReducer, RootState,
    SharedReducer,
};
pub use registry::{ReducerRegistry, BASELINE_SLICE};
