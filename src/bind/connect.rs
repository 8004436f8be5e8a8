use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, RwLock};

use serde_json::Value;
use tracing::{debug, warn};

use super::actions::{bind_action_creators, merge_actions, ActionMap, Dispatch};
use super::component::Component;
use super::key::{derive_state_key, KeySource};
use super::props::{OwnProps, Props};
use crate::action::{Action, ActionCreator};
use crate::config::ConflictPolicy;
use crate::error::{BindError, RegistryError};
use crate::reducer::{identity_reducer, Reducer, RootState, SharedReducer};
use crate::store::{StoreManager, Subscription};
use crate::sync;

/// How a component binds to the store. Every field is optional.
#[derive(Clone, Default)]
pub struct BindConfig {
    /// Reducer for the component's slice; the identity reducer when absent.
    pub reducer: Option<SharedReducer>,
    /// Action creators to bind; none when empty.
    pub actions: BTreeMap<String, ActionCreator>,
    /// Where the slice key comes from.
    pub state_key: KeySource,
    /// Namespace for the bound actions; the slice key when absent.
    pub actions_key: Option<String>,
}

impl BindConfig {
    /// Default configuration: derived key, identity reducer, no actions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the slice reducer.
    #[must_use]
    pub fn reducer<R>(mut self, reducer: R) -> Self
    where
        R: Reducer + 'static,
    {
        self.reducer = Some(Arc::new(reducer));
        self
    }

    /// Add an action creator under `name`.
    #[must_use]
    pub fn action(mut self, name: impl Into<String>, creator: ActionCreator) -> Self {
        self.actions.insert(name.into(), creator);
        self
    }

    /// Use an explicit slice key.
    #[must_use]
    pub fn state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = KeySource::Explicit(key.into());
        self
    }

    /// Bind without a slice.
    #[must_use]
    pub fn stateless(mut self) -> Self {
        self.state_key = KeySource::Stateless;
        self
    }

    /// Use an explicit actions namespace.
    #[must_use]
    pub fn actions_key(mut self, key: impl Into<String>) -> Self {
        self.actions_key = Some(key.into());
        self
    }
}

impl fmt::Debug for BindConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindConfig")
            .field("reducer", &self.reducer.is_some())
            .field("actions", &self.actions.keys().collect::<Vec<_>>())
            .field("state_key", &self.state_key)
            .field("actions_key", &self.actions_key)
            .finish()
    }
}

/// Connects components to a [`StoreManager`].
///
/// Connecting registers the component's reducer under its slice key,
/// rebuilds the store so the slice takes part in dispatch, and binds the
/// component's actions to the manager.
#[derive(Clone)]
pub struct Binder {
    manager: StoreManager,
    policy: ConflictPolicy,
}

impl Binder {
    /// Create a binder using the manager's configured conflict policy.
    pub fn new(manager: StoreManager) -> Self {
        let policy = manager.config().conflict_policy;
        Self { manager, policy }
    }

    /// Override the conflict policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ConflictPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The conflict policy in effect.
    pub fn policy(&self) -> ConflictPolicy {
        self.policy
    }

    /// The manager components are bound to.
    pub fn manager(&self) -> &StoreManager {
        &self.manager
    }

    /// Bind `component` to the store.
    ///
    /// Fails only when the slice key is taken and the policy is
    /// [`ConflictPolicy::Reject`], or when the rebuild after registration
    /// fails.
    pub fn connect<C>(&self, component: C, config: BindConfig) -> Result<Connected<C>, BindError>
    where
        C: Component + 'static,
    {
        let BindConfig {
            reducer,
            actions,
            state_key: source,
            actions_key,
        } = config;

        let reducer = reducer.unwrap_or_else(identity_reducer);
        let state_key = derive_state_key(&component, &source);
        let actions_key = actions_key
            .filter(|key| !key.is_empty())
            .or_else(|| state_key.clone());

        if let Some(key) = &state_key {
            self.register(key, reducer)?;
        }

        let manager = self.manager.clone();
        let dispatch: Dispatch = Arc::new(move |action: Action| manager.dispatch(action));
        let bound = bind_action_creators(&actions, &dispatch);

        debug!(
            state_key = ?state_key,
            actions_key = ?actions_key,
            actions = bound.len(),
            "connected component"
        );

        Ok(Connected {
            inner: Arc::new(ConnectedInner {
                component,
                state_key,
                actions_key,
                bound,
                manager: self.manager.clone(),
            }),
        })
    }

    fn register(&self, key: &str, reducer: SharedReducer) -> Result<(), BindError> {
        let registry = self.manager.registry();
        match registry.try_register_shared(key.to_string(), reducer) {
            Ok(()) => {
                self.manager.rebuild()?;
                Ok(())
            }
            Err(RegistryError::Conflict { key }) => match self.policy {
                ConflictPolicy::Allow => Ok(()),
                ConflictPolicy::Warn => {
                    warn!(slice = %key, "slice already registered, sharing the existing reducer");
                    Ok(())
                }
                ConflictPolicy::Reject => Err(BindError::SliceConflict { key }),
            },
            // Derived keys are never empty.
            Err(RegistryError::EmptyKey) => Ok(()),
        }
    }
}

struct ConnectedInner<C> {
    component: C,
    state_key: Option<String>,
    actions_key: Option<String>,
    bound: ActionMap,
    manager: StoreManager,
}

/// A component bound to its slice and actions.
pub struct Connected<C> {
    inner: Arc<ConnectedInner<C>>,
}

impl<C> Clone for Connected<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> Connected<C>
where
    C: Component + 'static,
{
    /// The slice this binding reads, if any.
    pub fn state_key(&self) -> Option<&str> {
        self.inner.state_key.as_deref()
    }

    /// The namespace the bound actions are nested under, if any.
    pub fn actions_key(&self) -> Option<&str> {
        self.inner.actions_key.as_deref()
    }

    /// The wrapped component.
    pub fn component(&self) -> &C {
        &self.inner.component
    }

    /// This binding's own actions, before merging.
    pub fn bound_actions(&self) -> &ActionMap {
        &self.inner.bound
    }

    /// Merged props against the current state.
    pub fn props(&self, own: &OwnProps) -> Props {
        self.props_for(own, &self.inner.manager.state())
    }

    /// Render once with merged props and return them.
    pub fn render(&self, own: &OwnProps) -> Props {
        let props = self.props(own);
        self.inner.component.render(&props);
        props
    }

    /// Render now and re-render whenever this binding's slice changes.
    ///
    /// Stateless bindings render once and never subscribe.
    pub fn mount(&self, own: OwnProps) -> Mounted<C> {
        let state = self.inner.manager.state();
        let props = self.props_for(&own, &state);
        let own = Arc::new(RwLock::new(own));
        let last = Arc::new(RwLock::new(self.slice_of(&state)));
        self.inner.component.render(&props);

        let subscription = self.inner.state_key.is_some().then(|| {
            let binding = self.clone();
            let own = Arc::clone(&own);
            let last = Arc::clone(&last);
            self.inner.manager.subscribe(move |state| {
                let slice = binding.slice_of(state);
                {
                    let mut last = sync::write(&last);
                    if *last == slice {
                        return;
                    }
                    *last = slice;
                }
                let props = binding.props_for(&sync::read(&own), state);
                binding.inner.component.render(&props);
            })
        });

        Mounted {
            binding: self.clone(),
            own,
            subscription,
        }
    }

    fn slice_of(&self, state: &RootState) -> Option<Value> {
        self.inner
            .state_key
            .as_deref()
            .and_then(|key| state.get(key).cloned())
    }

    fn props_for(&self, own: &OwnProps, state: &RootState) -> Props {
        let state_prop = self
            .inner
            .state_key
            .as_deref()
            .map(|key| (key, state.get(key).cloned().unwrap_or(Value::Null)));
        let actions = merge_actions(
            &own.actions,
            self.inner.actions_key.as_deref(),
            self.inner.bound.clone(),
        );
        Props::merge(own, state_prop, actions)
    }
}

/// A mounted binding. Dropping it stops re-rendering.
pub struct Mounted<C> {
    binding: Connected<C>,
    own: Arc<RwLock<OwnProps>>,
    subscription: Option<Subscription>,
}

impl<C> Mounted<C>
where
    C: Component + 'static,
{
    /// Replace the own props and re-render.
    pub fn set_props(&self, own: OwnProps) {
        *sync::write(&self.own) = own;
        let props = self.props();
        self.binding.inner.component.render(&props);
    }

    /// Merged props against the current state.
    pub fn props(&self) -> Props {
        self.binding.props(&sync::read(&self.own))
    }

    /// Whether the binding follows store changes.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind::component_fn;
    use crate::config::StoreConfig;
    use crate::reducer::{reducer_fn, ReducerRegistry};
    use serde_json::json;
    use std::sync::Mutex;

    struct Panel {
        display_name: &'static str,
        renders: Arc<Mutex<Vec<Props>>>,
    }

    impl Panel {
        fn new(display_name: &'static str) -> Self {
            Self {
                display_name,
                renders: Arc::default(),
            }
        }
    }

    impl Component for Panel {
        fn display_name(&self) -> Option<&str> {
            Some(self.display_name)
        }

        fn render(&self, props: &Props) {
            self.renders.lock().unwrap().push(props.clone());
        }
    }

    fn counter() -> impl Reducer {
        reducer_fn(|state, action| {
            let n = state.and_then(Value::as_i64).unwrap_or(0);
            match action.kind.as_str() {
                "inc" => json!(n + 1),
                _ => json!(n),
            }
        })
    }

    fn binder() -> Binder {
        let manager = StoreManager::initialize(ReducerRegistry::new(), StoreConfig::default());
        Binder::new(manager)
    }

    #[test]
    fn display_name_derives_slice_key() {
        let binder = binder();
        let connected = binder
            .connect(Panel::new("UserPanel"), BindConfig::new())
            .unwrap();

        assert_eq!(connected.state_key(), Some("userPanel"));
        assert_eq!(connected.actions_key(), Some("userPanel"));
        assert!(binder.manager().registry().contains("userPanel"));

        let props = connected.props(&OwnProps::new());
        assert_eq!(props.get("userPanel"), Some(&json!({})));
    }

    #[test]
    fn connected_reducer_receives_actions() {
        let binder = binder();
        let connected = binder
            .connect(
                Panel::new("Counter"),
                BindConfig::new()
                    .reducer(counter())
                    .action("increment", ActionCreator::kind("inc")),
            )
            .unwrap();

        let props = connected.props(&OwnProps::new());
        let increment = props
            .actions()
            .namespace("counter")
            .and_then(|actions| actions.action("increment"))
            .unwrap();
        increment.call().unwrap();
        increment.call().unwrap();

        assert_eq!(binder.manager().state().get("counter"), Some(&json!(2)));
        assert_eq!(connected.props(&OwnProps::new()).get("counter"), Some(&json!(2)));
    }

    #[test]
    fn explicit_keys_override_names() {
        let binder = binder();
        let connected = binder
            .connect(
                Panel::new("UserPanel"),
                BindConfig::new().state_key("session").actions_key("auth"),
            )
            .unwrap();

        assert_eq!(connected.state_key(), Some("session"));
        assert_eq!(connected.actions_key(), Some("auth"));
    }

    #[test]
    fn stateless_binding_passes_actions_through() {
        let binder = binder();
        let parent = binder
            .connect(
                Panel::new("Parent"),
                BindConfig::new().action("open", ActionCreator::kind("open")),
            )
            .unwrap();
        let inherited = parent.props(&OwnProps::new()).actions().clone();

        let keys_before = binder.manager().registry().keys();
        let child = binder
            .connect(Panel::new("Child"), BindConfig::new().stateless())
            .unwrap();
        assert_eq!(binder.manager().registry().keys(), keys_before);

        let own = OwnProps::new()
            .with("label", json!("x"))
            .with_actions(inherited.clone());
        let props = child.props(&own);
        assert_eq!(props.actions(), &inherited);
        assert_eq!(props.values(), &own.values);

        let props = child.props(&OwnProps::new());
        assert!(props.actions().is_empty());
    }

    #[test]
    fn anonymous_component_is_stateless() {
        let binder = binder();
        let connected = binder
            .connect(component_fn(|_props: &Props| {}), BindConfig::new())
            .unwrap();

        assert_eq!(connected.state_key(), None);
        assert_eq!(connected.actions_key(), None);
        assert_eq!(binder.manager().registry().len(), 1);
    }

    #[test]
    fn conflict_policies() {
        let binder = binder();
        binder
            .connect(Panel::new("Counter"), BindConfig::new().reducer(counter()))
            .unwrap();

        let shared = binder
            .clone()
            .with_policy(ConflictPolicy::Allow)
            .connect(Panel::new("Counter"), BindConfig::new())
            .unwrap();
        assert_eq!(shared.props(&OwnProps::new()).get("counter"), Some(&json!(0)));

        let rejected = binder
            .clone()
            .with_policy(ConflictPolicy::Reject)
            .connect(Panel::new("Counter"), BindConfig::new());
        assert!(matches!(
            rejected,
            Err(BindError::SliceConflict { key }) if key == "counter"
        ));
    }

    #[test]
    fn mounted_binding_rerenders_on_own_slice_only() {
        let binder = binder();
        let panel = Panel::new("Counter");
        let renders = panel.renders.clone();
        let connected = binder
            .connect(
                panel,
                BindConfig::new()
                    .reducer(counter())
                    .action("increment", ActionCreator::kind("inc")),
            )
            .unwrap();
        binder
            .connect(
                Panel::new("Other"),
                BindConfig::new().reducer(reducer_fn(|state, action| match action.kind.as_str() {
                    "poke" => json!(true),
                    _ => state.cloned().unwrap_or(json!(false)),
                })),
            )
            .unwrap();

        let mounted = connected.mount(OwnProps::new());
        assert!(mounted.is_subscribed());
        assert_eq!(renders.lock().unwrap().len(), 1);

        binder.manager().dispatch(Action::new("poke")).unwrap();
        assert_eq!(renders.lock().unwrap().len(), 1);

        binder.manager().dispatch(Action::new("inc")).unwrap();
        assert_eq!(renders.lock().unwrap().len(), 2);
        assert_eq!(
            renders.lock().unwrap()[1].get("counter"),
            Some(&json!(1))
        );

        mounted.set_props(OwnProps::new().with("title", json!("Clicks")));
        assert_eq!(renders.lock().unwrap().len(), 3);
        assert_eq!(mounted.props().get("title"), Some(&json!("Clicks")));

        drop(mounted);
        binder.manager().dispatch(Action::new("inc")).unwrap();
        assert_eq!(renders.lock().unwrap().len(), 3);
    }

    #[test]
    fn mounted_stateless_binding_renders_once() {
        let binder = binder();
        binder
            .connect(Panel::new("Counter"), BindConfig::new().reducer(counter()))
            .unwrap();
        let subscribers = binder.manager().store().subscriber_count();

        let footer = Panel::new("Footer");
        let renders = footer.renders.clone();
        let connected = binder
            .connect(footer, BindConfig::new().stateless())
            .unwrap();

        let mounted = connected.mount(OwnProps::new());
        assert!(!mounted.is_subscribed());
        assert_eq!(binder.manager().store().subscriber_count(), subscribers);
        assert_eq!(renders.lock().unwrap().len(), 1);

        binder.manager().dispatch(Action::new("inc")).unwrap();
        assert_eq!(renders.lock().unwrap().len(), 1);
    }

    #[test]
    fn anonymous_component_keeps_inherited_actions() {
        let binder = binder();
        let parent = binder
            .connect(
                Panel::new("Parent"),
                BindConfig::new().action("open", ActionCreator::kind("open")),
            )
            .unwrap();
        let inherited = parent.props(&OwnProps::new()).actions().clone();

        let child = binder
            .connect(
                component_fn(|_props: &Props| {}),
                BindConfig::new().action("ping", ActionCreator::kind("ping")),
            )
            .unwrap();
        let props = child.props(&OwnProps::new().with_actions(inherited));

        assert_eq!(props.actions().keys().collect::<Vec<_>>(), vec!["parent", "ping"]);
        assert!(props.actions().namespace("parent").unwrap().action("open").is_some());
        assert!(props.actions().action("ping").is_some());
    }
}
