//! gantry-plugin-sdk: helpers for writing gantry plugins
//!
//! Most plugins are plain data — a handful of commands plus hook bindings —
//! and do not need a hand-written [`Plugin`] impl. [`StaticPlugin`]
//! assembles one from builder calls.
//!
//! ## Quick Start
//!
//! ```rust
//! use gantry_plugin_sdk::prelude::*;
//!
//! let plugin = StaticPlugin::new("deploy")
//!     .command(
//!         CommandNode::new("deploy", "Deploy to the default infrastructure")
//!             .lifecycle_events(["resources", "functions"])
//!             .option("resource", "The resource you want to deploy"),
//!     )
//!     .hook_sync("deploy:resources", |_ctx| {
//!         // provision resources
//!         Ok(())
//!     })
//!     .hook("deploy:functions", |ctx| async move {
//!         // upload functions; the engine awaits this before `after:` hooks
//!         let _ = ctx.options().get("resource");
//!         Ok(())
//!     });
//! ```
//!
//! Plugins with private state implement [`Plugin`] directly and capture
//! their state (typically `Arc<Mutex<…>>`) in the closures returned from
//! `hooks()`.

use std::future::Future;

use gantry_plugin_api::{CommandMap, CommandNode, HookContext, Hooks, Plugin};

pub use gantry_plugin_api as api;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::StaticPlugin;
    pub use gantry_plugin_api::{
        event, CommandMap, CommandNode, HookContext, Hooks, OptionSpec, Options, Plugin,
    };
}

/// A plugin assembled from plain data: named commands plus hook bindings.
pub struct StaticPlugin {
    name: String,
    commands: CommandMap,
    hooks: Hooks,
}

impl StaticPlugin {
    /// Create an empty plugin with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            commands: CommandMap::new(),
            hooks: Hooks::new(),
        }
    }

    /// Contribute a command (and its nested subcommands).
    pub fn command(mut self, node: CommandNode) -> Self {
        self.commands.insert(node);
        self
    }

    /// Bind an async handler to an event name.
    pub fn hook<F, Fut>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HookContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.hooks = self.hooks.on(event, handler);
        self
    }

    /// Bind a synchronous handler to an event name.
    pub fn hook_sync<F>(mut self, event: impl Into<String>, handler: F) -> Self
    where
        F: Fn(HookContext) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.hooks = self.hooks.on_sync(event, handler);
        self
    }
}

impl Plugin for StaticPlugin {
    fn name(&self) -> &str {
        &self.name
    }

    fn commands(&self) -> CommandMap {
        self.commands.clone()
    }

    fn hooks(&self) -> Hooks {
        self.hooks.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_plugin_api::{NoopRunner, Options};
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_static_plugin_exposes_contributions() {
        let plugin = StaticPlugin::new("deploy")
            .command(CommandNode::new("deploy", "Deploy").lifecycle_event("resources"))
            .hook_sync("deploy:resources", |_| Ok(()));

        assert_eq!(plugin.name(), "deploy");
        assert_eq!(plugin.commands().len(), 1);
        assert_eq!(plugin.hooks().len(), 1);
    }

    #[test]
    fn test_hooks_keep_binding_order() {
        let plugin = StaticPlugin::new("deploy")
            .hook_sync("before:deploy:resources", |_| Ok(()))
            .hook("deploy:resources", |_| async { Ok(()) })
            .hook_sync("after:deploy:resources", |_| Ok(()));

        let events: Vec<&str> = plugin.hooks.events().collect();
        assert_eq!(
            events,
            [
                "before:deploy:resources",
                "deploy:resources",
                "after:deploy:resources",
            ]
        );
    }

    #[tokio::test]
    async fn test_handlers_accumulate_private_state() {
        // The plugin-private-state pattern: a counter captured by the
        // handler survives across invocations.
        let invocations = Arc::new(Mutex::new(0));
        let counter = invocations.clone();

        let plugin = StaticPlugin::new("deploy").hook_sync("deploy:functions", move |_| {
            *counter.lock().unwrap() += 1;
            Ok(())
        });

        let hooks = plugin.hooks();
        let (_, handler) = hooks.iter().next().unwrap();
        let handler = handler.clone();
        let ctx = HookContext::new(
            vec!["deploy".to_string()],
            Options::new(),
            Arc::new(NoopRunner),
        );

        (*handler)(ctx.for_event("deploy:functions")).await.unwrap();
        (*handler)(ctx.for_event("deploy:functions")).await.unwrap();

        assert_eq!(*invocations.lock().unwrap(), 2);
    }
}
