//! Integration tests for Slicebind

use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use serde_json::{json, Value};
use slicebind::{
    reducer_fn, Action, ActionCreator, BindConfig, Binder, Component, ConflictPolicy, OwnProps,
    Props, Reducer, ReducerRegistry, RootState, StoreConfig, StoreManager,
};

struct Widget {
    display_name: Option<&'static str>,
    renders: Arc<Mutex<Vec<Props>>>,
}

impl Widget {
    fn named(display_name: &'static str) -> Self {
        Self {
            display_name: Some(display_name),
            renders: Arc::default(),
        }
    }
}

impl Component for Widget {
    fn display_name(&self) -> Option<&str> {
        self.display_name
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

fn tagged(tag: &'static str) -> impl Reducer {
    reducer_fn(move |state, action| {
        let mut seen = state
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if action.kind == "mark" {
            seen.push(json!(tag));
        }
        Value::Array(seen)
    })
}

fn setup() -> (StoreManager, Binder) {
    let manager = StoreManager::initialize(ReducerRegistry::new(), StoreConfig::default());
    let binder = Binder::new(manager.clone());
    (manager, binder)
}

#[test]
fn counter_slice_counts_dispatches() {
    let registry = ReducerRegistry::new();
    assert!(registry.register("counter", counter()));
    let manager = StoreManager::initialize(registry, StoreConfig::default());

    manager.dispatch(Action::new("inc")).unwrap();
    manager.dispatch(Action::new("inc")).unwrap();

    assert_eq!(manager.state().get("counter"), Some(&json!(2)));
}

#[test]
fn root_reducer_is_independent_of_registration_order() {
    let forward = ReducerRegistry::new();
    forward.register("a", tagged("a"));
    forward.register("b", tagged("b"));

    let backward = ReducerRegistry::new();
    backward.register("b", tagged("b"));
    backward.register("a", tagged("a"));

    let mut state = RootState::new();
    state.insert("a".to_string(), json!(["start"]));
    state.insert("b".to_string(), json!([]));

    let unknown = Action::new("unknown");
    let expected_a = tagged("a").reduce(state.get("a"), &unknown);
    let expected_b = tagged("b").reduce(state.get("b"), &unknown);

    for registry in [forward, backward] {
        let next = registry.root_reducer()(&state, &unknown);
        assert_eq!(next.get("a"), Some(&expected_a));
        assert_eq!(next.get("b"), Some(&expected_b));
    }
}

#[test]
fn rebuild_twice_leaves_state_unchanged() {
    let (manager, binder) = setup();
    binder
        .connect(Widget::named("Counter"), BindConfig::new().reducer(counter()))
        .unwrap();
    manager.dispatch(Action::new("inc")).unwrap();

    manager.rebuild().unwrap();
    let first = manager.state();
    manager.rebuild().unwrap();

    assert_eq!(manager.state(), first);
    assert_eq!(first.get("counter"), Some(&json!(1)));
}

#[test]
fn late_connected_slice_joins_running_store() {
    let (manager, binder) = setup();
    let store = manager.store().clone();

    binder
        .connect(Widget::named("Counter"), BindConfig::new().reducer(counter()))
        .unwrap();
    manager.dispatch(Action::new("inc")).unwrap();

    binder
        .connect(Widget::named("Marks"), BindConfig::new().reducer(tagged("m")))
        .unwrap();
    manager.dispatch(Action::new("mark")).unwrap();

    assert!(store.ptr_eq(manager.store()));
    assert_eq!(store.slice("counter"), Some(json!(1)));
    assert_eq!(store.slice("marks"), Some(json!(["m"])));
}

#[test]
fn nested_components_keep_outer_actions() {
    let (manager, binder) = setup();

    let outer = binder
        .connect(
            Widget::named("TodoApp"),
            BindConfig::new()
                .reducer(counter())
                .action("add", ActionCreator::kind("inc")),
        )
        .unwrap();
    let outer_props = outer.props(&OwnProps::new().with("title", json!("Todos")));

    let inner = binder
        .connect(
            Widget::named("TodoItem"),
            BindConfig::new()
                .reducer(tagged("item"))
                .action("toggle", ActionCreator::kind("mark")),
        )
        .unwrap();
    let inner_props = inner.props(&outer_props.clone().into_own());

    let actions = inner_props.actions();
    assert_eq!(actions.keys().collect::<Vec<_>>(), vec!["todoApp", "todoItem"]);
    assert_eq!(
        actions.namespace("todoApp"),
        outer_props.actions().namespace("todoApp")
    );
    assert_eq!(inner_props.get("title"), Some(&json!("Todos")));

    actions
        .namespace("todoApp")
        .and_then(|ns| ns.action("add"))
        .unwrap()
        .call()
        .unwrap();
    actions
        .namespace("todoItem")
        .and_then(|ns| ns.action("toggle"))
        .unwrap()
        .call()
        .unwrap();

    let state = manager.state();
    assert_eq!(state.get("todoApp"), Some(&json!(1)));
    assert_eq!(state.get("todoItem"), Some(&json!(["item"])));
}

#[test]
fn stateless_binding_receives_no_state_prop() {
    let (manager, binder) = setup();
    let keys_before = manager.registry().keys();

    let bound = binder
        .connect(Widget::named("Footer"), BindConfig::new().stateless())
        .unwrap();

    assert_eq!(bound.state_key(), None);
    assert_eq!(manager.registry().keys(), keys_before);

    let props = bound.props(&OwnProps::new());
    assert!(props.values().is_empty());
    assert!(props.actions().is_empty());
}

#[test]
fn mounted_component_follows_its_slice() {
    let (manager, binder) = setup();
    let widget = Widget::named("Counter");
    let renders = widget.renders.clone();

    let bound = binder
        .connect(
            widget,
            BindConfig::new()
                .reducer(counter())
                .action("increment", ActionCreator::kind("inc")),
        )
        .unwrap();
    let mounted = bound.mount(OwnProps::new());

    let increment = mounted
        .props()
        .actions()
        .namespace("counter")
        .and_then(|ns| ns.action("increment"))
        .cloned()
        .unwrap();
    increment.call().unwrap();
    manager.dispatch(Action::new("unrelated")).unwrap();

    let seen: Vec<Option<Value>> = renders
        .lock()
        .unwrap()
        .iter()
        .map(|props| props.get("counter").cloned())
        .collect();
    assert_eq!(seen, vec![Some(json!(0)), Some(json!(1))]);
}

#[test]
fn rejecting_binder_reports_shared_slice() {
    let config = StoreConfig {
        conflict_policy: ConflictPolicy::Reject,
        ..StoreConfig::default()
    };
    let manager = StoreManager::initialize(ReducerRegistry::new(), config);
    let binder = Binder::new(manager);

    binder
        .connect(Widget::named("Panel"), BindConfig::new())
        .unwrap();
    let err = binder
        .connect(Widget::named("Panel"), BindConfig::new())
        .err()
        .unwrap();
    assert_eq!(err.to_string(), "slice `panel` is already owned by another component");
}

proptest! {
    #[test]
    fn register_succeeds_once_per_key(key in "[a-zA-Z][a-zA-Z0-9_]{0,12}", attempts in 1usize..5) {
        let registry = ReducerRegistry::new();
        prop_assert!(registry.register(key.clone(), counter()));
        for _ in 0..attempts {
            prop_assert!(!registry.register(key.clone(), tagged("other")));
        }
        prop_assert!(registry.contains(&key));
    }
}
