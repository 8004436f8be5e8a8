use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::action::{Action, ActionCreator};
use crate::error::StoreError;

/// The entry point bound actions dispatch into.
pub type Dispatch = Arc<dyn Fn(Action) -> Result<(), StoreError> + Send + Sync>;

/// An action creator already wired to a dispatch entry point.
#[derive(Clone)]
pub struct BoundAction {
    name: String,
    creator: ActionCreator,
    dispatch: Dispatch,
}

impl BoundAction {
    /// Bind `creator` to `dispatch`.
    pub fn new(name: impl Into<String>, creator: ActionCreator, dispatch: Dispatch) -> Self {
        Self {
            name: name.into(),
            creator,
            dispatch,
        }
    }

    /// Name the action was bound under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Create and dispatch the action with no payload.
    pub fn call(&self) -> Result<(), StoreError> {
        self.call_with(Value::Null)
    }

    /// Create and dispatch the action with `payload`.
    pub fn call_with(&self, payload: Value) -> Result<(), StoreError> {
        (self.dispatch)(self.creator.create(payload))
    }
}

impl PartialEq for BoundAction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.creator.ptr_eq(&other.creator)
            && Arc::ptr_eq(&self.dispatch, &other.dispatch)
    }
}

impl fmt::Debug for BoundAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// One entry of an [`ActionMap`].
#[derive(Debug, Clone, PartialEq)]
pub enum ActionNode {
    /// A callable action.
    Action(BoundAction),
    /// A nested namespace, usually one bound component's actions.
    Namespace(ActionMap),
}

/// The `actions` prop: callables and namespaces keyed by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionMap {
    entries: BTreeMap<String, ActionNode>,
}

impl ActionMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, replacing any entry under the same key.
    pub fn insert(&mut self, key: impl Into<String>, node: ActionNode) -> Option<ActionNode> {
        self.entries.insert(key.into(), node)
    }

    /// Entry under `key`.
    pub fn get(&self, key: &str) -> Option<&ActionNode> {
        self.entries.get(key)
    }

    /// Callable under `key`, if that entry is one.
    pub fn action(&self, key: &str) -> Option<&BoundAction> {
        match self.entries.get(key) {
            Some(ActionNode::Action(action)) => Some(action),
            _ => None,
        }
    }

    /// Namespace under `key`, if that entry is one.
    pub fn namespace(&self, key: &str) -> Option<&ActionMap> {
        match self.entries.get(key) {
            Some(ActionNode::Namespace(map)) => Some(map),
            _ => None,
        }
    }

    /// Keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ActionNode> {
        self.entries.iter()
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Extend<(String, ActionNode)> for ActionMap {
    fn extend<T: IntoIterator<Item = (String, ActionNode)>>(&mut self, iter: T) {
        self.entries.extend(iter);
    }
}

impl FromIterator<(String, ActionNode)> for ActionMap {
    fn from_iter<T: IntoIterator<Item = (String, ActionNode)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for ActionMap {
    type Item = (String, ActionNode);
    type IntoIter = btree_map::IntoIter<String, ActionNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Wire every creator to `dispatch`.
pub fn bind_action_creators(
    creators: &BTreeMap<String, ActionCreator>,
    dispatch: &Dispatch,
) -> ActionMap {
    creators
        .iter()
        .map(|(name, creator)| {
            let bound = BoundAction::new(name.clone(), creator.clone(), Arc::clone(dispatch));
            (name.clone(), ActionNode::Action(bound))
        })
        .collect()
}

/// Merge a component's bound actions into the actions it was given.
///
/// With an `actions_key`, `bound` is nested under that key next to the
/// inherited entries. Without one, the bound callables are layered flat over
/// the inherited entries instead of replacing them, so a component with no
/// namespace still hands its parent's actions down. Either way the later
/// write wins on a duplicate key.
pub fn merge_actions(
    inherited: &ActionMap,
    actions_key: Option<&str>,
    bound: ActionMap,
) -> ActionMap {
    let mut merged = inherited.clone();
    match actions_key {
        Some(key) => {
            merged.insert(key, ActionNode::Namespace(bound));
        }
        None => merged.extend(bound),
    }
    merged
}
