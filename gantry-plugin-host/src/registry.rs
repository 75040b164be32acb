//! Hook registry: event name → ordered handler bindings.
//!
//! Bindings are appended as plugins register, so for any event name the
//! handler list follows plugin load order, with a plugin's own binding
//! order as the tie-breaker across events. The registry is populated once
//! during the build phase and read-only afterwards.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;
use tracing::debug;

use gantry_plugin_api::{HookFn, Plugin};

/// Errors raised while registering plugin hooks.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A plugin bound the same event name more than once.
    #[error("plugin '{plugin}' registered hook '{event}' more than once")]
    DuplicateHook { plugin: String, event: String },
}

/// One (plugin, handler) binding for an event.
#[derive(Clone)]
pub struct HookBinding {
    /// Name of the plugin that bound the handler.
    pub plugin: String,
    /// The handler itself.
    pub handler: HookFn,
}

impl fmt::Debug for HookBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookBinding")
            .field("plugin", &self.plugin)
            .finish()
    }
}

/// Load-order-preserving mapping from event name to handler bindings.
#[derive(Debug, Default)]
pub struct HookRegistry {
    handlers: HashMap<String, Vec<HookBinding>>,
}

impl HookRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every hook of `plugin` to the registry.
    ///
    /// Call once per plugin, in load order; that order is what
    /// [`HookRegistry::handlers_for`] later reproduces.
    pub fn register(&mut self, plugin: &dyn Plugin) -> Result<(), RegistryError> {
        let name = plugin.name().to_string();
        for (event, handler) in plugin.hooks() {
            let bindings = self.handlers.entry(event.clone()).or_default();
            if bindings.iter().any(|binding| binding.plugin == name) {
                return Err(RegistryError::DuplicateHook {
                    plugin: name,
                    event,
                });
            }
            debug!(event = %event, plugin = %name, "hook registered");
            bindings.push(HookBinding {
                plugin: name.clone(),
                handler,
            });
        }
        Ok(())
    }

    /// Handlers bound to `event`, in plugin-load order.
    ///
    /// Unknown event names yield an empty slice — a stage nobody hooked
    /// simply performs no work.
    pub fn handlers_for(&self, event: &str) -> &[HookBinding] {
        self.handlers.get(event).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether any handler is bound to `event`.
    pub fn has_handlers(&self, event: &str) -> bool {
        !self.handlers_for(event).is_empty()
    }

    /// Number of handlers bound to `event`.
    pub fn handler_count(&self, event: &str) -> usize {
        self.handlers_for(event).len()
    }

    /// All event names with at least one binding, in no particular order.
    pub fn events(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_plugin_api::Hooks;

    struct HooksPlugin {
        name: &'static str,
        hooks: Hooks,
    }

    impl Plugin for HooksPlugin {
        fn name(&self) -> &str {
            self.name
        }

        fn hooks(&self) -> Hooks {
            self.hooks.clone()
        }
    }

    fn register_in_order(registry: &mut HookRegistry, plugins: &[HooksPlugin]) {
        for plugin in plugins {
            registry.register(plugin).unwrap();
        }
    }

    #[test]
    fn test_handlers_follow_plugin_load_order() {
        let plugins = [
            HooksPlugin {
                name: "first",
                hooks: Hooks::new().on_sync("deploy:functions", |_| Ok(())),
            },
            HooksPlugin {
                name: "second",
                hooks: Hooks::new().on_sync("deploy:functions", |_| Ok(())),
            },
            HooksPlugin {
                name: "third",
                hooks: Hooks::new().on_sync("deploy:functions", |_| Ok(())),
            },
        ];

        let mut registry = HookRegistry::new();
        register_in_order(&mut registry, &plugins);

        let order: Vec<&str> = registry
            .handlers_for("deploy:functions")
            .iter()
            .map(|binding| binding.plugin.as_str())
            .collect();
        assert_eq!(order, ["first", "second", "third"]);
    }

    #[test]
    fn test_unknown_event_yields_empty_slice() {
        let registry = HookRegistry::new();
        assert!(registry.handlers_for("after:deploy:functions").is_empty());
        assert!(!registry.has_handlers("after:deploy:functions"));
        assert_eq!(registry.handler_count("after:deploy:functions"), 0);
    }

    #[test]
    fn test_duplicate_hook_within_plugin_is_rejected() {
        let plugin = HooksPlugin {
            name: "dupe",
            hooks: Hooks::new()
                .on_sync("deploy:resources", |_| Ok(()))
                .on_sync("deploy:resources", |_| Ok(())),
        };

        let mut registry = HookRegistry::new();
        let err = registry.register(&plugin).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateHook {
                plugin: "dupe".to_string(),
                event: "deploy:resources".to_string(),
            }
        );
    }

    #[test]
    fn test_same_event_from_different_plugins_is_fine() {
        let plugins = [
            HooksPlugin {
                name: "one",
                hooks: Hooks::new()
                    .on_sync("deploy:resources", |_| Ok(()))
                    .on_sync("deploy:functions", |_| Ok(())),
            },
            HooksPlugin {
                name: "two",
                hooks: Hooks::new().on_sync("deploy:resources", |_| Ok(())),
            },
        ];

        let mut registry = HookRegistry::new();
        register_in_order(&mut registry, &plugins);

        assert_eq!(registry.handler_count("deploy:resources"), 2);
        assert_eq!(registry.handler_count("deploy:functions"), 1);
        assert_eq!(registry.events().count(), 2);
    }
}
