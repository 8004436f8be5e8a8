//! Counter application: a connected counter with nested bound components

use serde_json::{json, Value};
use slicebind::{
    component_fn, reducer_fn, Action, ActionCreator, BindConfig, Binder, LoggingMiddleware,
    OwnProps, Props, ReducerRegistry, StoreConfig, StoreManager,
};

fn counter_reducer() -> impl slicebind::Reducer {
    reducer_fn(|state, action| {
        let count = state.and_then(Value::as_i64).unwrap_or(0);
        let step = action.payload.as_i64().unwrap_or(1);
        match action.kind.as_str() {
            "counter/increment" => json!(count + step),
            "counter/decrement" => json!(count - step),
            "counter/reset" => json!(0),
            _ => json!(count),
        }
    })
}

fn history_reducer() -> impl slicebind::Reducer {
    reducer_fn(|state, action| {
        let mut history = state
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        if action.kind.starts_with("counter/") {
            history.push(json!(action.kind));
        }
        Value::Array(history)
    })
}

fn show(label: &'static str) -> impl Fn(&Props) + Send + Sync {
    move |props| {
        let values = serde_json::to_string(props.values()).unwrap_or_default();
        let actions: Vec<&str> = props.actions().keys().collect();
        println!("   [{label}] values: {values}, actions: {actions:?}");
    }
}

fn main() -> slicebind::Result<()> {
    println!("=== Counter Application ===\n");

    println!("1. Initializing an empty store");
    let manager = StoreManager::initialize(ReducerRegistry::new(), StoreConfig::from_env());
    manager.add_middleware(LoggingMiddleware)?;
    let binder = Binder::new(manager.clone());
    println!("   Slices: {:?}", manager.registry().keys());

    println!("\n2. Connecting the Counter component");
    let counter = binder.connect(
        component_fn(show("Counter")).named("Counter"),
        BindConfig::new()
            .reducer(counter_reducer())
            .action("increment", ActionCreator::kind("counter/increment"))
            .action("decrement", ActionCreator::kind("counter/decrement"))
            .action("reset", ActionCreator::kind("counter/reset")),
    )?;
    let mounted = counter.mount(OwnProps::new().with("title", json!("Clicks")));
    println!("   Slices: {:?}", manager.registry().keys());

    println!("\n3. Connecting a nested History component");
    let history = binder.connect(
        component_fn(show("History")).named("History"),
        BindConfig::new().reducer(history_reducer()),
    )?;
    let _history = history.mount(mounted.props().into_own());

    println!("\n4. A stateless Toolbar inherits the counter's actions");
    let toolbar = binder.connect(component_fn(show("Toolbar")), BindConfig::new().stateless())?;
    let toolbar_props = toolbar.render(&mounted.props().into_own());

    println!("\n5. Clicking through the toolbar");
    let counter_actions = toolbar_props.actions().namespace("counter");
    if let Some(increment) = counter_actions.and_then(|ns| ns.action("increment")) {
        increment.call()?;
        increment.call_with(json!(5))?;
    }
    if let Some(decrement) = counter_actions.and_then(|ns| ns.action("decrement")) {
        decrement.call()?;
    }

    println!("\n6. Unrelated actions leave the counter alone");
    manager.dispatch(Action::new("app/noop"))?;

    println!("\n7. Resetting");
    if let Some(reset) = counter_actions.and_then(|ns| ns.action("reset")) {
        reset.call()?;
    }

    println!("\n=== Final State ===");
    let state = manager.state();
    println!("{}", serde_json::to_string_pretty(&state).unwrap_or_default());

    Ok(())
}
