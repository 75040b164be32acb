//! gantry-plugin-host: command-tree and lifecycle engine for gantry plugins
//!
//! This crate aggregates the commands and hooks contributed by loaded
//! plugins and runs command lifecycles against them:
//!
//! 1. [`tree::CommandTree`] merges every plugin's command tree,
//! 2. [`registry::HookRegistry`] collects hook bindings in load order,
//! 3. [`sequencer::resolve`] expands a command path into its ordered
//!    event sequence,
//! 4. [`executor::LifecycleExecutor`] runs every bound handler, awaiting
//!    each before the next starts.
//!
//! [`manager::PluginManager`] ties the phases together and produces the
//! runnable [`manager::Dispatcher`].

pub mod executor;
pub mod help;
pub mod manager;
pub mod registry;
pub mod sequencer;
pub mod tree;

pub use executor::{HookFailure, LifecycleExecutor};
pub use help::{render_command_help, render_help};
pub use manager::{BuildError, Dispatcher, PluginManager, RunError};
pub use registry::{HookBinding, HookRegistry, RegistryError};
pub use sequencer::{resolve, ResolveError};
pub use tree::{CommandTree, TreeError};

pub use gantry_plugin_api::{
    CommandMap, CommandNode, CommandRunner, HookContext, Hooks, OptionSpec, Options, Plugin,
};
