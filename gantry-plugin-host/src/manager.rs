//! Plugin loading and end-to-end dispatch.
//!
//! [`PluginManager`] accumulates plugins in load order during startup;
//! [`PluginManager::build`] freezes their merged command tree and hook
//! registry into a [`Dispatcher`]. After that point nothing mutates the
//! tree or the registry — every `run` only reads them, so concurrent and
//! re-entrant runs need no locking.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::info;

use gantry_plugin_api::{CommandRunner, HookContext, Options, Plugin};

use crate::executor::{HookFailure, LifecycleExecutor};
use crate::registry::{HookRegistry, RegistryError};
use crate::sequencer::{self, ResolveError};
use crate::tree::{CommandTree, TreeError};

/// Errors raised while freezing the plugin set, before any command runs.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Conflicting command contributions between plugins.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Invalid hook registration.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Errors raised by a dispatch run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The command path did not resolve to a runnable node; no hook ran.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A handler failed; the remaining sequence was aborted.
    #[error(transparent)]
    Hook(#[from] HookFailure),
}

impl RunError {
    /// True when the failure is an unresolvable command path, so a CLI
    /// front-end can render "unknown command" help instead of an error
    /// trace.
    pub fn is_command_not_found(&self) -> bool {
        matches!(
            self,
            RunError::Resolve(ResolveError::CommandNotFound { .. })
                | RunError::Resolve(ResolveError::NotRunnable { .. })
        )
    }
}

/// Accumulates plugins in load order.
///
/// Load order matters: it decides execution order between handlers of
/// different plugins bound to the same event. Hosts register core plugins
/// first, then user/service-contributed ones.
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    /// Create an empty manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one plugin.
    pub fn register(&mut self, plugin: impl Plugin) {
        self.register_arc(Arc::new(plugin));
    }

    /// Append an already-shared plugin.
    pub fn register_arc(&mut self, plugin: Arc<dyn Plugin>) {
        info!(plugin = %plugin.name(), "plugin loaded");
        self.plugins.push(plugin);
    }

    /// Append a batch of plugins, preserving their order.
    pub fn register_all(&mut self, plugins: impl IntoIterator<Item = Arc<dyn Plugin>>) {
        for plugin in plugins {
            self.register_arc(plugin);
        }
    }

    /// The loaded plugins, in load order.
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.plugins
    }

    /// Number of loaded plugins.
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin has been registered.
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Freeze the plugin set: merge every command tree and register every
    /// hook, yielding a runnable [`Dispatcher`].
    pub fn build(self) -> Result<Dispatcher, BuildError> {
        let tree = CommandTree::build(&self.plugins)?;
        let mut registry = HookRegistry::new();
        for plugin in &self.plugins {
            registry.register(plugin.as_ref())?;
        }
        info!(plugins = self.plugins.len(), "dispatcher built");
        Ok(Dispatcher {
            inner: Arc::new(DispatcherInner {
                plugins: self.plugins,
                tree,
                registry,
            }),
        })
    }
}

struct DispatcherInner {
    plugins: Vec<Arc<dyn Plugin>>,
    tree: CommandTree,
    registry: HookRegistry,
}

/// Read-only dispatch engine produced by [`PluginManager::build`].
///
/// Cloning is cheap; all clones share the same tree and registry. A
/// handler may hold a clone (through its context's runner handle) and
/// dispatch further commands while another run is in flight — each run
/// keeps its own position in its own event sequence.
#[derive(Clone)]
pub struct Dispatcher {
    inner: Arc<DispatcherInner>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("plugins", &self.inner.plugins.len())
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// The merged command tree.
    pub fn tree(&self) -> &CommandTree {
        &self.inner.tree
    }

    /// The frozen hook registry.
    pub fn registry(&self) -> &HookRegistry {
        &self.inner.registry
    }

    /// The loaded plugins, in load order.
    pub fn plugins(&self) -> &[Arc<dyn Plugin>] {
        &self.inner.plugins
    }

    /// Resolve `commands` and run its full lifecycle with `options`.
    ///
    /// On success returns the final options — handlers share one option
    /// set per run and may have mutated it.
    pub async fn run(&self, commands: &[String], options: Options) -> Result<Options, RunError> {
        let events = sequencer::resolve(commands, &self.inner.tree)?;
        let ctx = HookContext::new(commands.to_vec(), options.clone(), Arc::new(self.clone()));
        LifecycleExecutor::new(&self.inner.registry)
            .run(&events, &ctx)
            .await?;
        Ok(options)
    }
}

#[async_trait]
impl CommandRunner for Dispatcher {
    async fn run_command(&self, commands: &[String], options: Options) -> anyhow::Result<()> {
        self.run(commands, options).await?;
        Ok(())
    }
}
