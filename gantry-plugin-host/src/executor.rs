//! Sequential lifecycle executor.
//!
//! Walks a resolved event sequence strictly in order: every handler is
//! awaited to completion before the next handler of the same event starts,
//! and every event's handlers finish before the next event fires. This is
//! the engine's core ordering guarantee — a handler bound to
//! `before:deploy:functions` has fully completed before any handler bound
//! to `deploy:functions` begins.

use thiserror::Error;
use tracing::{debug, trace};

use gantry_plugin_api::HookContext;

use crate::registry::HookRegistry;

/// A handler failure, identifying the event and the owning plugin.
///
/// Raised for the first handler that errors; no later handler or event
/// runs after it. Side effects of handlers that already completed are not
/// rolled back.
#[derive(Debug, Error)]
#[error("hook '{event}' from plugin '{plugin}' failed")]
pub struct HookFailure {
    /// The fully-qualified event name whose handler failed.
    pub event: String,
    /// Name of the plugin that bound the failing handler.
    pub plugin: String,
    /// The handler's own error.
    #[source]
    pub source: anyhow::Error,
}

/// Drains the hook registry for each event in a resolved sequence.
pub struct LifecycleExecutor<'a> {
    registry: &'a HookRegistry,
}

impl<'a> LifecycleExecutor<'a> {
    /// Create an executor over a frozen registry.
    pub fn new(registry: &'a HookRegistry) -> Self {
        Self { registry }
    }

    /// Run every handler bound to `events`, strictly in order.
    ///
    /// An empty sequence completes immediately. Handlers receive a copy of
    /// `ctx` stamped with the event being fired.
    pub async fn run(&self, events: &[String], ctx: &HookContext) -> Result<(), HookFailure> {
        for event in events {
            let bindings = self.registry.handlers_for(event);
            if bindings.is_empty() {
                trace!(event = %event, "no handlers bound, skipping");
                continue;
            }

            debug!(event = %event, handlers = bindings.len(), "firing event");
            for binding in bindings {
                let event_ctx = ctx.for_event(event.clone());
                (*binding.handler)(event_ctx)
                    .await
                    .map_err(|source| HookFailure {
                        event: event.clone(),
                        plugin: binding.plugin.clone(),
                        source,
                    })?;
            }
        }
        Ok(())
    }
}
