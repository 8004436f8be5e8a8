//! Binding components to their slice of the store.
//!
//! [`Binder::connect`] resolves a slice key for a component, registers the
//! component's reducer under it and returns a [`Connected`] binding whose
//! props merge, from lowest to highest precedence:
//!
//! 1. the props passed in by the parent ([`OwnProps`]);
//! 2. the component's slice, under the slice key;
//! 3. `actions`, built by [`merge_actions`].

mod actions;
mod component;
mod connect;
mod key;
mod props;

pub use actions::{
    bind_action_creators, merge_actions, ActionMap, ActionNode, BoundAction, Dispatch,
};
pub use component::{component_fn, Component, FnComponent};
pub use connect::{BindConfig, Binder, Connected, Mounted};
pub use key::{derive_state_key, lower_camel_case, KeySource};
pub use props::{OwnProps, Props};
