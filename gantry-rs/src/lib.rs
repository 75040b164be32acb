//! # Gantry: plugin-driven command dispatch for infrastructure CLIs
//!
//! Gantry turns a set of plugins — each contributing a tree of commands and
//! a set of lifecycle hooks — into one dispatchable command surface. A run
//! resolves a command path, expands its lifecycle stages into
//! `before:`/stage/`after:` events, and executes every bound hook across
//! all plugins in a stable order.
//!
//! ## Core Principles
//!
//! - **Load order is law**: hooks sharing an event run in plugin load
//!   order, core plugins before service plugins.
//! - **One eventual shape**: sync and async handlers are normalized to the
//!   same awaited future, so ordering guarantees hold for both.
//! - **Explicit context**: handlers receive everything through a context
//!   argument — options, command path, and a re-entrant dispatch handle —
//!   never through globals.
//!
//! ## Quick Start
//!
//! ```rust
//! use gantry::{Gantry, Options};
//! use gantry_plugin_sdk::prelude::*;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> gantry::CliResult<()> {
//!     let engine = Gantry::builder()
//!         .plugin(
//!             StaticPlugin::new("deploy")
//!                 .command(
//!                     CommandNode::new("deploy", "Deploy the service")
//!                         .lifecycle_event("resources"),
//!                 )
//!                 .hook_sync("deploy:resources", |_ctx| Ok(())),
//!         )
//!         .build()?;
//!
//!     engine.run(&["deploy".to_string()], Options::new()).await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

// Optional modules
pub mod build_info;
pub mod tracing_support;

// Re-export tracing itself (required for #[instrument] macro)
#[cfg(feature = "tracing")]
pub use tracing_support::tracing;

// Re-export commonly used items
#[cfg(feature = "tracing")]
pub use tracing_support::{
    debug, error, info, init_subscriber, init_subscriber_with_config, instrument, trace, warn,
    TracingConfig, TracingFormat,
};

#[cfg(feature = "build-info")]
pub use build_info::{version_info, version_short};

pub use gantry_plugin_api::{
    event, CommandMap, CommandNode, CommandRunner, HookContext, Hooks, OptionSpec, Options, Plugin,
};
pub use gantry_plugin_host::{
    render_command_help, render_help, BuildError, CommandTree, Dispatcher, HookFailure,
    HookRegistry, PluginManager, ResolveError, RunError,
};

// ============================================================================
// Framework Facade
// ============================================================================

/// The framework object: owns the dispatcher built from all loaded plugins.
///
/// Construct one at startup via [`Gantry::builder`], then feed it the
/// already-parsed `(commands, options)` pairs your CLI front-end produces.
pub struct Gantry {
    dispatcher: Dispatcher,
}

impl std::fmt::Debug for Gantry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gantry").finish_non_exhaustive()
    }
}

impl Gantry {
    /// Start assembling a framework instance.
    pub fn builder() -> GantryBuilder {
        GantryBuilder::default()
    }

    /// Resolve `commands` and run its full lifecycle.
    ///
    /// Returns the final options on success — handlers may have mutated
    /// them — or a [`CliError`] describing the failure.
    pub async fn run(&self, commands: &[String], options: Options) -> CliResult<Options> {
        self.dispatcher
            .run(commands, options)
            .await
            .map_err(CliError::from)
    }

    /// The underlying dispatch engine.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Render the command listing for all loaded plugins.
    pub fn help(&self) -> String {
        render_help(self.dispatcher.tree())
    }
}

/// Collects plugins before freezing them into a [`Gantry`].
///
/// Core plugins are always registered ahead of service plugins, whatever
/// the call order, so framework-provided hooks keep their precedence.
#[derive(Default)]
pub struct GantryBuilder {
    core: Vec<Arc<dyn Plugin>>,
    service: Vec<Arc<dyn Plugin>>,
}

impl GantryBuilder {
    /// Add a core (framework-provided) plugin.
    pub fn core_plugin(mut self, plugin: impl Plugin) -> Self {
        self.core.push(Arc::new(plugin));
        self
    }

    /// Add a service (user-contributed) plugin.
    pub fn plugin(mut self, plugin: impl Plugin) -> Self {
        self.service.push(Arc::new(plugin));
        self
    }

    /// Merge every plugin's commands and hooks into a runnable framework
    /// instance. Conflicting contributions fail here, before any command
    /// can run.
    pub fn build(self) -> CliResult<Gantry> {
        let mut manager = PluginManager::new();
        manager.register_all(self.core);
        manager.register_all(self.service);
        let dispatcher = manager.build().map_err(CliError::from)?;
        Ok(Gantry { dispatcher })
    }
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Error Types
// ============================================================================

/// Top-level error type for CLI operations.
///
/// Distinguishes between user-fixable errors (exit code 1) and system
/// failures (exit code 101).
#[derive(Debug)]
pub enum CliError {
    /// User-fixable errors (exit code 1).
    User(UserError),

    /// System-level failures (exit code 101).
    System(SystemError),
}

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::User(_) => 1,
            CliError::System(_) => 101,
        }
    }

    /// Convenience constructor for user errors.
    pub fn user(message: impl Into<String>) -> Self {
        CliError::User(UserError::Generic(message.into()))
    }

    /// Convenience constructor for system errors.
    pub fn system(message: impl Into<String>) -> Self {
        CliError::System(SystemError::Internal(message.into()))
    }

    /// True when the failure is an unknown or non-runnable command, so a
    /// front-end can print help instead of an error trace.
    pub fn is_command_not_found(&self) -> bool {
        matches!(
            self,
            CliError::User(UserError::UnknownCommand { .. })
                | CliError::User(UserError::NotRunnable { .. })
        )
    }
}

/// User-fixable errors (exit code 1).
#[derive(Debug)]
pub enum UserError {
    /// Generic user error with a message.
    Generic(String),

    /// The command path matched no known command.
    UnknownCommand { path: String },

    /// The command only groups subcommands and cannot run directly.
    NotRunnable { path: String },

    /// A plugin hook failed during a run.
    HookFailed {
        event: String,
        plugin: String,
        message: String,
    },

    /// Two plugins contributed conflicting command definitions.
    PluginConflict { detail: String },
}

impl std::fmt::Display for UserError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserError::Generic(msg) => write!(f, "Error: {}", msg),
            UserError::UnknownCommand { path } => {
                write!(
                    f,
                    "Error: Unknown command '{}'\n\nUse the help output to list available commands.",
                    path
                )
            }
            UserError::NotRunnable { path } => {
                write!(
                    f,
                    "Error: '{}' only groups subcommands\n\nRun one of its subcommands instead.",
                    path
                )
            }
            UserError::HookFailed {
                event,
                plugin,
                message,
            } => {
                write!(
                    f,
                    "Error: Plugin '{}' failed during '{}'\n\n{}",
                    plugin, event, message
                )
            }
            UserError::PluginConflict { detail } => {
                write!(f, "Error: Plugin configuration conflict\n\n{}", detail)
            }
        }
    }
}

/// System-level failures (exit code 101).
#[derive(Debug)]
pub enum SystemError {
    /// Generic internal error.
    Internal(String),

    /// I/O error.
    Io(std::io::Error),
}

impl std::fmt::Display for SystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SystemError::Internal(msg) => {
                write!(f, "Internal Error: {}\n\nThis is likely a bug.", msg)
            }
            SystemError::Io(e) => {
                write!(
                    f,
                    "Internal Error: I/O operation failed\n\n{:?}\n\nThis is likely a bug.",
                    e
                )
            }
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::System(SystemError::Io(e))
    }
}

impl From<RunError> for CliError {
    fn from(err: RunError) -> Self {
        match err {
            RunError::Resolve(ResolveError::CommandNotFound { path }) => {
                CliError::User(UserError::UnknownCommand { path })
            }
            RunError::Resolve(ResolveError::NotRunnable { path }) => {
                CliError::User(UserError::NotRunnable { path })
            }
            RunError::Hook(failure) => CliError::User(UserError::HookFailed {
                event: failure.event,
                plugin: failure.plugin,
                // `{:#}` flattens the error chain into one line.
                message: format!("{:#}", failure.source),
            }),
        }
    }
}

impl From<BuildError> for CliError {
    fn from(err: BuildError) -> Self {
        CliError::User(UserError::PluginConflict {
            detail: err.to_string(),
        })
    }
}

// ============================================================================
// Response Types
// ============================================================================

/// Response returned to a CLI front-end after a run.
///
/// Contains the exit code and output to be displayed to the user.
pub struct Response {
    /// Exit code (0 = success, 1 = user error, 101 = system error).
    pub exit_code: i32,

    /// Output to display (text, JSON, or silent).
    pub output: Output,
}

impl Response {
    /// Create a successful response with text output.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            output: Output::Text(content.into()),
        }
    }

    /// Create a successful silent response.
    pub fn silent() -> Self {
        Self {
            exit_code: 0,
            output: Output::Silent,
        }
    }

    /// Create an error response.
    pub fn error(exit_code: i32, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            output: Output::Text(message.into()),
        }
    }
}

/// Output type for responses.
#[derive(Debug)]
pub enum Output {
    /// No output.
    Silent,

    /// Text output (printed to stdout).
    Text(String),

    /// JSON output (for machine-readable responses).
    Json(String),
}

impl Output {
    /// Check if output is empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, Output::Silent)
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::Silent => Ok(()),
            Output::Text(s) | Output::Json(s) => write!(f, "{}", s),
        }
    }
}

// ============================================================================
// Response Conversion Trait
// ============================================================================

/// Trait for converting run results into front-end responses.
pub trait IntoResponse {
    /// Convert into a response.
    fn into_response(self) -> Response;
}

impl IntoResponse for String {
    fn into_response(self) -> Response {
        Response::text(self)
    }
}

impl IntoResponse for () {
    fn into_response(self) -> Response {
        Response::silent()
    }
}

impl IntoResponse for Options {
    fn into_response(self) -> Response {
        let map = self.snapshot();
        if map.is_empty() {
            return Response::silent();
        }
        Response {
            exit_code: 0,
            output: Output::Json(serde_json::to_string_pretty(&map).unwrap_or_default()),
        }
    }
}

impl<T: IntoResponse> IntoResponse for CliResult<T> {
    fn into_response(self) -> Response {
        match self {
            Ok(value) => value.into_response(),
            Err(e) => {
                let exit_code = e.exit_code();
                let message = match e {
                    CliError::User(user_err) => format!("{}", user_err),
                    CliError::System(sys_err) => format!("{}", sys_err),
                };
                Response::error(exit_code, message)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
