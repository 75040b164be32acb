//! gantry-plugin-api: shared plugin contract for the gantry dispatch engine
//!
//! This crate defines what a plugin exposes to the host: a tree of commands
//! and a set of lifecycle hooks. Both are read once when the plugin is
//! loaded and treated as immutable afterwards.
//!
//! ## Quick Start
//!
//! ```rust
//! use gantry_plugin_api::{CommandMap, CommandNode, Hooks, Plugin};
//!
//! struct DeployPlugin;
//!
//! impl Plugin for DeployPlugin {
//!     fn name(&self) -> &str {
//!         "deploy"
//!     }
//!
//!     fn commands(&self) -> CommandMap {
//!         CommandMap::new().with(
//!             CommandNode::new("deploy", "Deploy to the default infrastructure")
//!                 .lifecycle_events(["resources", "functions"])
//!                 .option("resource", "The resource you want to deploy"),
//!         )
//!     }
//!
//!     fn hooks(&self) -> Hooks {
//!         Hooks::new()
//!             .on_sync("deploy:resources", |_ctx| Ok(()))
//!             .on("deploy:functions", |_ctx| async { Ok(()) })
//!     }
//! }
//! ```

pub mod command;
pub mod context;
pub mod event;
pub mod hook;

pub use command::{CommandMap, CommandNode, OptionSpec};
pub use context::{CommandRunner, HookContext, NoopRunner, Options};
pub use hook::{HookFn, HookFuture, Hooks};

/// An independently loaded extension contributing commands and hooks.
///
/// A plugin is owned by the host for the entire process lifetime: loaded
/// once at startup, never unloaded mid-run. The engine only ever reads the
/// structures returned here; plugin-private state (counters, caches,
/// clients) lives inside the plugin itself, typically behind an
/// `Arc<Mutex<…>>` captured by its handlers.
pub trait Plugin: Send + Sync + 'static {
    /// Unique plugin name, used to attribute hook failures.
    fn name(&self) -> &str;

    /// The command tree this plugin contributes. May be empty for plugins
    /// that only hook into commands defined elsewhere.
    fn commands(&self) -> CommandMap {
        CommandMap::new()
    }

    /// The lifecycle hooks this plugin binds. May be empty for plugins
    /// that only define commands.
    fn hooks(&self) -> Hooks {
        Hooks::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct HookOnlyPlugin;

    impl Plugin for HookOnlyPlugin {
        fn name(&self) -> &str {
            "hook-only"
        }

        fn hooks(&self) -> Hooks {
            Hooks::new().on_sync("deploy:functions", |_| Ok(()))
        }
    }

    #[test]
    fn test_default_contributions_are_empty() {
        let plugin = HookOnlyPlugin;
        assert!(plugin.commands().is_empty());
        assert_eq!(plugin.hooks().len(), 1);
    }

    #[test]
    fn test_plugin_is_object_safe() {
        let plugin: Box<dyn Plugin> = Box::new(HookOnlyPlugin);
        assert_eq!(plugin.name(), "hook-only");
    }
}
