//! Middleware stages around every dispatched action.
//!
//! Each stage receives the action and a [`Next`] that continues the chain;
//! the end of the chain feeds the action into the [`Store`]. A stage can
//! inspect or rewrite the action, swallow it by not calling `next.run`, or
//! observe the state once the rest of the chain has run.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use tracing::debug;

use super::manager::StoreManager;
use super::store::Store;
use crate::action::Action;
use crate::error::StoreError;
use crate::reducer::RootState;

/// A middleware stage shared by the pipeline.
pub type SharedMiddleware = Arc<dyn Middleware>;

/// A stage in the dispatch pipeline.
pub trait Middleware: Send + Sync {
    /// Process an action, optionally delegating to the rest of the chain.
    fn process(
        &self,
        ctx: &MiddlewareContext,
        action: Action,
        next: Next<'_>,
    ) -> Result<(), StoreError>;
}

/// What a stage can reach besides the action itself.
pub struct MiddlewareContext {
    manager: StoreManager,
}

impl MiddlewareContext {
    pub(crate) fn new(manager: StoreManager) -> Self {
        Self { manager }
    }

    /// Current root state.
    pub fn state(&self) -> RootState {
        self.manager.state()
    }

    /// Dispatch a new action through the full pipeline.
    pub fn dispatch(&self, action: Action) -> Result<(), StoreError> {
        self.manager.dispatch(action)
    }
}

/// The remaining stages plus the store at the end of the chain.
///
/// Consumed on call to prevent double-invoke.
pub struct Next<'a> {
    store: &'a Store,
    ctx: &'a MiddlewareContext,
    stages: &'a [SharedMiddleware],
}

impl<'a> Next<'a> {
    pub(crate) fn new(
        store: &'a Store,
        ctx: &'a MiddlewareContext,
        stages: &'a [SharedMiddleware],
    ) -> Self {
        Self { store, ctx, stages }
    }

    /// Continue the chain, eventually reducing the action.
    pub fn run(self, action: Action) -> Result<(), StoreError> {
        if let Some((head, tail)) = self.stages.split_first() {
            head.process(self.ctx, action, Next::new(self.store, self.ctx, tail))
        } else {
            self.store.dispatch(action)
        }
    }
}

/// Wrapper that implements `Middleware` for a closure.
struct MiddlewareFn<F> {
    f: F,
}

impl<F> Middleware for MiddlewareFn<F>
where
    F: Fn(&MiddlewareContext, Action, Next<'_>) -> Result<(), StoreError> + Send + Sync,
{
    fn process(
        &self,
        ctx: &MiddlewareContext,
        action: Action,
        next: Next<'_>,
    ) -> Result<(), StoreError> {
        (self.f)(ctx, action, next)
    }
}

/// Create middleware from a closure.
///
/// # Example
///
/// ```
/// use slicebind::{middleware_fn, Action};
///
/// // Drop every action whose kind starts with `debug/`.
/// let filter = middleware_fn(|_ctx, action: Action, next| {
///     if action.kind.starts_with("debug/") {
///         return Ok(());
///     }
///     next.run(action)
/// });
/// # let _ = filter;
/// ```
#[must_use]
pub fn middleware_fn<F>(f: F) -> impl Middleware
where
    F: Fn(&MiddlewareContext, Action, Next<'_>) -> Result<(), StoreError> + Send + Sync,
{
    MiddlewareFn { f }
}

/// Logs every action and the slices it changed.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn process(
        &self,
        ctx: &MiddlewareContext,
        action: Action,
        next: Next<'_>,
    ) -> Result<(), StoreError> {
        let before = ctx.state();
        let kind = action.kind.clone();
        let result = next.run(action);
        let after = ctx.state();

        let changed: Vec<&str> = after
            .iter()
            .filter(|(key, value)| before.get(key.as_str()) != Some(*value))
            .map(|(key, _)| key.as_str())
            .collect();

        match &result {
            Ok(()) => debug!(%kind, ?changed, "action dispatched"),
            Err(err) => debug!(%kind, %err, "action failed"),
        }
        result
    }
}

type ObserverFn = Arc<dyn Fn(&Action, &RootState) + Send + Sync>;

/// The host observability hook.
///
/// Sees each action together with the state it produced and never alters
/// the action. The store manager installs it in the first pipeline slot.
#[derive(Clone)]
pub struct ObserverStage {
    observer: ObserverFn,
}

impl ObserverStage {
    /// Observe with a host callback.
    pub fn new<F>(observer: F) -> Self
    where
        F: Fn(&Action, &RootState) + Send + Sync + 'static,
    {
        Self {
            observer: Arc::new(observer),
        }
    }

    /// Observer that emits every action and resulting state as tracing events.
    pub fn tracing() -> Self {
        Self::new(|action, state| {
            let state = Value::Object(state.clone());
            debug!(
                target: "slicebind::devtools",
                kind = %action.kind,
                payload = %action.payload,
                %state,
                "devtools"
            );
        })
    }
}

impl fmt::Debug for ObserverStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverStage").finish_non_exhaustive()
    }
}

impl Middleware for ObserverStage {
    fn process(
        &self,
        ctx: &MiddlewareContext,
        action: Action,
        next: Next<'_>,
    ) -> Result<(), StoreError> {
        let observed = action.clone();
        next.run(action)?;
        (self.observer)(&observed, &ctx.state());
        Ok(())
    }
}
