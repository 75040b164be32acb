//! Hook handler types.
//!
//! Handlers come in two styles — plain functions that return immediately
//! and async functions that complete later — and both are normalized to a
//! single boxed-future shape at the binding boundary, so the engine's
//! sequencing logic never needs to know which style a plugin used.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures::future::{self, BoxFuture, FutureExt};

use crate::context::HookContext;

/// Future returned by a hook handler.
pub type HookFuture = BoxFuture<'static, anyhow::Result<()>>;

/// A hook handler: called with the run context, yields an eventual result.
pub type HookFn = Arc<dyn Fn(HookContext) -> HookFuture + Send + Sync + 'static>;

/// Ordered set of `(event name, handler)` bindings contributed by one
/// plugin.
///
/// Order is preserved exactly as bound; the host uses it as the secondary
/// ordering (after plugin load order) when several events fire. A plugin
/// binds at most one handler per event name — the host rejects duplicates
/// at build time.
#[derive(Clone, Default)]
pub struct Hooks {
    entries: Vec<(String, HookFn)>,
}

impl Hooks {
    /// Create an empty binding set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind an async handler to an event name.
    pub fn on<F, Fut>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let handler: HookFn = Arc::new(move |ctx| handler(ctx).boxed());
        self.entries.push((event.into(), handler));
        self
    }

    /// Bind a synchronous handler; its result is wrapped in an
    /// immediately-ready future.
    pub fn on_sync<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HookContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        let handler: HookFn = Arc::new(move |ctx| future::ready(handler(ctx)).boxed());
        self.entries.push((event.into(), handler));
        self
    }

    /// Bind an already-wrapped handler.
    pub fn push(&mut self, event: impl Into<String>, handler: HookFn) {
        self.entries.push((event.into(), handler));
    }

    /// Iterate bindings in bound order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HookFn)> {
        self.entries.iter().map(|(event, handler)| (event.as_str(), handler))
    }

    /// Event names in bound order.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(event, _)| event.as_str())
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no handlers are bound.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Hooks {
    type Item = (String, HookFn);
    type IntoIter = std::vec::IntoIter<(String, HookFn)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.events()).finish()
    }
}
