use serde_json::{Map, Value};

use super::actions::ActionMap;

/// Props passed to a bound component by its parent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OwnProps {
    /// Plain data props.
    pub values: Map<String, Value>,
    /// Actions injected by the parent.
    pub actions: ActionMap,
}

impl OwnProps {
    /// Empty props.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a data prop.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Replace the injected actions.
    #[must_use]
    pub fn with_actions(mut self, actions: ActionMap) -> Self {
        self.actions = actions;
        self
    }
}

/// The merged props a bound component renders with.
///
/// Precedence, low to high: own props, the state prop, then `actions`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props {
    values: Map<String, Value>,
    actions: ActionMap,
}

impl Props {
    /// Merge own props with the state prop and the final actions.
    pub fn merge(own: &OwnProps, state: Option<(&str, Value)>, actions: ActionMap) -> Self {
        let mut values = own.values.clone();
        if let Some((key, value)) = state {
            values.insert(key.to_string(), value);
        }
        Self { values, actions }
    }

    /// Data prop under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// All data props.
    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    /// The `actions` prop.
    pub fn actions(&self) -> &ActionMap {
        &self.actions
    }

    /// Hand these props down to a child binding.
    pub fn into_own(self) -> OwnProps {
        OwnProps {
            values: self.values,
            actions: self.actions,
        }
    }
}
